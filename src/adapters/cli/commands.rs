//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the CrossWap wallet.

use clap::{Parser, Subcommand};
use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::ethereum::EthRpcProvider;
use crate::adapters::fusion::{FixedRateQuoter, FusionClient, FusionConfig};
use crate::application::{AuthPolicy, QuoteSlot, WalletApp};
use crate::config::load_config;
use crate::domain::{
    QuoteInput, SessionState, SessionStore, SwapIntent, TokenRegistry, TransferIntent,
};
use crate::ports::mocks::MockProvider;
use crate::ports::provider::WalletProvider;
use crate::ports::swap_api::SwapApi;

/// Demo account used by offline mode.
const DEMO_ACCOUNT: &str = "0xa1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0";
/// Demo native balance, 2.45 ETH in wei.
const DEMO_ETH_BALANCE: &str = "0x22002604f3b50000";

/// CrossWap - Cross-chain wallet for the ETH/TON corridor
#[derive(Parser, Debug)]
#[command(
    name = "crosswap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Cross-chain swap wallet CLI",
    long_about = "CrossWap connects to an EIP-1193 style wallet provider, tracks balances \
                  across the supported token set, and quotes and executes cross-chain swaps."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        default_value = "config/wallet.toml"
    )]
    pub config: PathBuf,

    /// Run against the built-in demo provider and fixed rates
    #[arg(long, global = true)]
    pub offline: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show session state and connected account
    Status,

    /// Connect a wallet and establish a session
    Connect(ConnectCmd),

    /// Clear the session
    Logout,

    /// Show balances for every supported token
    Balances,

    /// List the supported token set
    Tokens,

    /// Get a swap quote
    Quote(QuoteCmd),

    /// Quote and execute a swap
    Swap(SwapCmd),

    /// Send a native transfer
    Send(SendCmd),

    /// Build a payment request link and QR code URL
    Request(RequestCmd),
}

/// Connect a wallet
#[derive(Parser, Debug)]
pub struct ConnectCmd {
    /// Require a signed login challenge instead of account approval alone
    #[arg(long)]
    pub sign_challenge: bool,
}

/// Get swap quote
#[derive(Parser, Debug)]
pub struct QuoteCmd {
    /// Input token symbol (e.g., ETH)
    #[arg(value_name = "FROM")]
    pub from_token: String,

    /// Output token symbol (e.g., TON)
    #[arg(value_name = "TO")]
    pub to_token: String,

    /// Amount to swap
    #[arg(value_name = "AMOUNT")]
    pub amount: String,
}

/// Execute swap
#[derive(Parser, Debug)]
pub struct SwapCmd {
    /// Input token symbol (e.g., ETH)
    #[arg(value_name = "FROM")]
    pub from_token: String,

    /// Output token symbol (e.g., TON)
    #[arg(value_name = "TO")]
    pub to_token: String,

    /// Amount to swap
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    /// Slippage tolerance in basis points (overrides config)
    #[arg(long, value_name = "BPS")]
    pub slippage: Option<u16>,

    /// Wait for the transaction to be mined
    #[arg(long)]
    pub wait: bool,
}

/// Send native transfer
#[derive(Parser, Debug)]
pub struct SendCmd {
    /// Recipient address
    #[arg(value_name = "TO")]
    pub to: String,

    /// Amount in ETH
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    /// Wait for the transaction to be mined
    #[arg(long)]
    pub wait: bool,
}

/// Build a payment request
#[derive(Parser, Debug)]
pub struct RequestCmd {
    /// Amount in ETH to request (optional)
    #[arg(value_name = "AMOUNT")]
    pub amount: Option<String>,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let policy = match &app.command {
        Command::Connect(cmd) if cmd.sign_challenge => AuthPolicy::SignedChallenge,
        _ => AuthPolicy::AccountsOnly,
    };
    let env = WalletEnv::build(&app, policy).await?;

    match app.command {
        Command::Status => status_command(&env).await,
        Command::Connect(_) => connect_command(&env).await,
        Command::Logout => logout_command(&env).await,
        Command::Balances => balances_command(&env).await,
        Command::Tokens => tokens_command(),
        Command::Quote(cmd) => quote_command(&env, cmd).await,
        Command::Swap(cmd) => swap_command(&env, cmd).await,
        Command::Send(cmd) => send_command(&env, cmd).await,
        Command::Request(cmd) => request_command(&env, cmd).await,
    }
}

/// Assembled wallet bound to its provider and swap API.
struct WalletEnv {
    wallet: WalletApp,
}

impl WalletEnv {
    async fn build(app: &CliApp, policy: AuthPolicy) -> Result<Self> {
        let config = if app.offline {
            None
        } else {
            Some(
                load_config(&app.config)
                    .with_context(|| format!("failed to load {}", app.config.display()))?,
            )
        };

        let (provider, api): (Arc<dyn WalletProvider>, Arc<dyn SwapApi>) = if app.offline {
            tracing::info!("Offline mode: demo provider and fixed rates");
            (Arc::new(demo_provider()), Arc::new(FixedRateQuoter::new()))
        } else {
            let config = config.as_ref().unwrap();
            let provider = EthRpcProvider::new(config.provider.get_rpc_url())
                .context("failed to create RPC provider")?;
            let fusion = FusionClient::with_config(FusionConfig {
                api_base_url: config.swap.api_url.clone(),
                api_key: config.swap.get_api_key(),
                ..FusionConfig::default()
            })
            .context("failed to create swap API client")?;
            (Arc::new(provider), Arc::new(fusion))
        };

        let store = match &config {
            Some(config) => SessionStore::new(config.session.expanded_store_path()),
            None => SessionStore::new(
                std::env::temp_dir().join("crosswap-demo").join("session.json"),
            ),
        };
        let ttl_hours = config
            .as_ref()
            .map(|c| c.session.ttl_hours)
            .unwrap_or(crate::domain::SESSION_TTL_HOURS);
        let debounce_ms = config
            .as_ref()
            .map(|c| c.swap.quote_debounce_ms)
            .unwrap_or(crate::application::DEFAULT_DEBOUNCE_MS);
        let slippage_bps = config.as_ref().map(|c| c.swap.slippage_bps).unwrap_or(100);

        let wallet = WalletApp::new(
            api,
            TokenRegistry::new(),
            store,
            chrono::Duration::hours(ttl_hours),
        )
        .with_auth_policy(policy)
        .with_quote_debounce(Duration::from_millis(debounce_ms))
        .with_slippage_bps(slippage_bps);

        wallet.startup(Some(provider)).await;
        Ok(Self { wallet })
    }
}

/// An offline provider that can answer the whole wallet surface.
fn demo_provider() -> MockProvider {
    let tx_hash = format!(
        "0x{:032x}{:032x}",
        rand::random::<u128>(),
        rand::random::<u128>()
    );
    MockProvider::with_connected_account(DEMO_ACCOUNT)
        .with_response("eth_getBalance", serde_json::json!(DEMO_ETH_BALANCE))
        .with_response("eth_call", serde_json::json!("0x0"))
        .with_response("eth_sendTransaction", serde_json::json!(tx_hash))
        .with_response(
            "eth_getTransactionReceipt",
            serde_json::json!({ "status": "0x1" }),
        )
}

async fn status_command(env: &WalletEnv) -> Result<()> {
    match env.wallet.state().await {
        SessionState::ProviderAbsent => println!("No wallet provider available"),
        SessionState::Authenticated { account } => {
            println!("Connected: {}", account.short());
        }
        state => println!("{:?}", state),
    }
    Ok(())
}

async fn connect_command(env: &WalletEnv) -> Result<()> {
    let state = env.wallet.connect().await?;
    match state {
        SessionState::Authenticated { account } => {
            println!("Connected as {}", account.as_str());
        }
        SessionState::Error { reason } => bail!("connect failed: {:?}", reason),
        other => println!("{:?}", other),
    }
    Ok(())
}

async fn logout_command(env: &WalletEnv) -> Result<()> {
    env.wallet.logout().await?;
    println!("Logged out");
    Ok(())
}

async fn balances_command(env: &WalletEnv) -> Result<()> {
    require_account(env).await?;
    env.wallet.refresh_balances().await?;

    println!("{:<8} {:>16}  {}", "TOKEN", "BALANCE", "STATUS");
    for (token, balance) in env.wallet.balances().snapshot().await {
        match balance {
            Some(balance) => println!(
                "{:<8} {:>16}  {:?}",
                token.symbol,
                balance.display(),
                balance.state
            ),
            None => println!("{:<8} {:>16}  -", token.symbol, "-"),
        }
    }
    Ok(())
}

fn tokens_command() -> Result<()> {
    let registry = TokenRegistry::new();
    println!("{:<8} {:<20} {:>9} {:>8}", "SYMBOL", "NAME", "DECIMALS", "CHAIN");
    for token in registry.all() {
        println!(
            "{:<8} {:<20} {:>9} {:>8}",
            token.symbol, token.name, token.decimals, token.chain_id
        );
    }
    Ok(())
}

async fn quote_command(env: &WalletEnv, cmd: QuoteCmd) -> Result<()> {
    let amount = parse_amount(&cmd.amount)?;
    let quote = fetch_quote(env, &cmd.from_token, &cmd.to_token, amount).await?;

    println!(
        "{} {} -> {} {}",
        quote.from_amount, quote.from_token, quote.to_amount_display(), quote.to_token
    );
    println!("Rate: {}", quote.rate_display());
    println!("Estimated gas: {}", quote.estimated_gas);
    Ok(())
}

async fn swap_command(env: &WalletEnv, cmd: SwapCmd) -> Result<()> {
    require_account(env).await?;
    let amount = parse_amount(&cmd.amount)?;
    let quote = fetch_quote(env, &cmd.from_token, &cmd.to_token, amount).await?;
    println!("Quote: {}", quote.rate_display());

    let intent = SwapIntent::new(
        cmd.from_token.clone(),
        cmd.to_token.clone(),
        amount,
        cmd.slippage.unwrap_or(100),
    );
    let handle = env.wallet.send_swap(&intent).await?;
    println!("Submitted: {}", handle.hash);

    if cmd.wait {
        wait_for_receipt(env, &handle).await?;
    }
    Ok(())
}

async fn send_command(env: &WalletEnv, cmd: SendCmd) -> Result<()> {
    require_account(env).await?;
    env.wallet.refresh_balances().await?;

    let amount = parse_amount(&cmd.amount)?;
    let intent = TransferIntent::new(cmd.to.clone(), amount);
    let handle = env.wallet.send_transfer(&intent).await?;
    println!("Submitted: {}", handle.hash);

    if cmd.wait {
        wait_for_receipt(env, &handle).await?;
    }
    Ok(())
}

async fn request_command(env: &WalletEnv, cmd: RequestCmd) -> Result<()> {
    let account = require_account(env).await?;

    let uri = match &cmd.amount {
        Some(amount) => {
            let amount = parse_amount(amount)?;
            format!("ethereum:{}?value={}", account.as_str(), amount)
        }
        None => format!("ethereum:{}", account.as_str()),
    };

    println!("Payment request: {}", uri);
    println!(
        "QR code: https://api.qrserver.com/v1/create-qr-code/?size=200x200&data={}",
        percent_encode(&uri)
    );
    Ok(())
}

async fn require_account(env: &WalletEnv) -> Result<crate::domain::Account> {
    match env.wallet.account().await {
        Some(account) => Ok(account),
        None => bail!("not connected; run `crosswap connect` first"),
    }
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    let amount =
        Decimal::from_str(raw).with_context(|| format!("invalid amount '{}'", raw))?;
    if amount <= Decimal::ZERO {
        bail!("amount must be positive");
    }
    Ok(amount)
}

/// Drive the quote engine and wait for the slot to settle.
async fn fetch_quote(
    env: &WalletEnv,
    from: &str,
    to: &str,
    amount: Decimal,
) -> Result<crate::domain::Quote> {
    env.wallet
        .update_quote_input(QuoteInput::new(from, to, amount))
        .await;

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        match env.wallet.quote_slot().await {
            QuoteSlot::Ready(quote) => return Ok(quote),
            QuoteSlot::Failed(reason) => bail!("quote failed: {}", reason),
            QuoteSlot::Idle => bail!("quote input was rejected"),
            QuoteSlot::Pending => {
                if tokio::time::Instant::now() >= deadline {
                    bail!("timed out waiting for quote");
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}

async fn wait_for_receipt(
    env: &WalletEnv,
    handle: &crate::application::TxHandle,
) -> Result<()> {
    println!("Waiting for confirmation...");
    let receipt = env
        .wallet
        .await_receipt(handle, Duration::from_secs(2), Duration::from_secs(120))
        .await?;
    println!("Mined: status {}", receipt["status"]);
    Ok(())
}

/// Minimal percent-encoding for a URL query value.
fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_encode_payment_uri() {
        let uri = format!("ethereum:{}?value=0.5", DEMO_ACCOUNT);
        let encoded = percent_encode(&uri);
        assert!(encoded.contains("ethereum%3A"));
        assert!(encoded.contains("%3Fvalue%3D0.5"));
        assert!(!encoded.contains('?'));
    }

    #[test]
    fn test_parse_amount() {
        assert!(parse_amount("1.5").is_ok());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_demo_account_is_valid() {
        assert!(crate::domain::is_valid_address(DEMO_ACCOUNT));
    }

    #[test]
    fn test_cli_parses_swap() {
        use clap::Parser;
        let app = CliApp::parse_from(["crosswap", "--offline", "swap", "ETH", "TON", "1.5"]);
        assert!(app.offline);
        assert!(matches!(app.command, Command::Swap(_)));
    }
}
