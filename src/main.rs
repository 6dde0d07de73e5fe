//! CrossWap - Cross-chain swap wallet CLI

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crosswap_wallet::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in config.toml)
    dotenvy::dotenv().ok();

    let app = cli::init();
    // The configured level is the fallback when no verbosity flag is set;
    // load errors are reported later by the command itself.
    let config_level = if app.offline {
        None
    } else {
        crosswap_wallet::config::load_config(&app.config)
            .ok()
            .map(|c| c.logging.level)
    };
    init_logging(app.verbose, app.debug, config_level.as_deref());

    cli::execute(app).await
}

fn init_logging(verbose: bool, debug: bool, config_level: Option<&str>) {
    let default = default_directive(verbose, debug, config_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_target(false).init();
}

/// Filter directive priority: RUST_LOG wins in `init_logging`; below that,
/// CLI flags override the configured level, which overrides "warn".
fn default_directive(verbose: bool, debug: bool, config_level: Option<&str>) -> String {
    if debug {
        "debug".to_string()
    } else if verbose {
        "info".to_string()
    } else {
        config_level.unwrap_or("warn").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::default_directive;

    #[test]
    fn test_config_level_used_when_no_flags() {
        assert_eq!(default_directive(false, false, Some("info")), "info");
        assert_eq!(default_directive(false, false, None), "warn");
    }

    #[test]
    fn test_flags_override_config_level() {
        assert_eq!(default_directive(true, false, Some("error")), "info");
        assert_eq!(default_directive(false, true, Some("error")), "debug");
    }
}
