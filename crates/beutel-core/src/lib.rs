pub mod enrich;
pub mod error;
pub mod log_context;
pub mod network;
pub mod provider;
#[cfg(test)]
mod test_util;
pub mod types;

pub use error::{CoreError, UpstreamError};
pub use log_context::LogContext;
pub use network::Network;
pub use provider::{ChainProvider, MempoolClient, MempoolOptions};
