use clap::Parser;

/// Beutel: a small, stable REST API for Bitcoin wallet data backed by a
/// mempool.space-compatible block explorer.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Network to serve: mainnet, testnet3, testnet4 or signet.
    /// Unrecognized names fall back to mainnet.
    #[arg(long, default_value = "mainnet", env = "NETWORK")]
    pub network: String,

    /// Address to bind the web server to.
    #[arg(long, default_value = "0.0.0.0", env = "BIND")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "3000", env = "PORT")]
    pub port: u16,

    /// Explorer base URL (defaults to the network's public mempool.space endpoint).
    #[arg(long, env = "UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Upper bound, in seconds, for a single upstream call.
    #[arg(long, default_value = "30", env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: u64,

    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}
