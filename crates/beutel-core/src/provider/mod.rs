//! Chain data provider abstraction.
//!
//! Defines the [`ChainProvider`] trait consumed by the request layer and
//! provides a mempool.space-compatible HTTP implementation
//! ([`MempoolClient`]).

mod mempool;

pub use mempool::{MempoolClient, MempoolOptions};

use async_trait::async_trait;
use bitcoin::Txid;

use crate::error::CoreError;
use crate::log_context::LogContext;
use crate::network::Network;
use crate::types::{Balance, EnrichedTransaction, FeeRates, Utxo};

/// The wallet-facing operations a chain data source must offer.
///
/// Each data-fetching call is a single upstream round trip with no retries.
/// Failures surface as [`CoreError::Upstream`]; caller mistakes caught before
/// any network activity surface as [`CoreError::Validation`]. Implementations
/// record upstream call details into the request's [`LogContext`].
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Confirmed and mempool balance of `address`.
    async fn get_balance(&self, log: &LogContext, address: &str) -> Result<Balance, CoreError>;

    /// Unspent outputs owned by `address`.
    async fn get_utxos(&self, log: &LogContext, address: &str) -> Result<Vec<Utxo>, CoreError>;

    /// Transaction history of `address`, enriched from its point of view.
    async fn get_transactions(
        &self,
        log: &LogContext,
        address: &str,
    ) -> Result<Vec<EnrichedTransaction>, CoreError>;

    /// Recommended fee rates.
    async fn get_fee_rates(&self, log: &LogContext) -> Result<FeeRates, CoreError>;

    /// Broadcast a signed transaction and return its txid. Implementations
    /// must call [`validate_tx_hex`] before touching the network.
    async fn broadcast_tx(&self, log: &LogContext, tx_hex: &str) -> Result<Txid, CoreError>;

    /// The network this provider serves.
    fn network(&self) -> Network;
}

/// Reject a broadcast payload that cannot possibly be a transaction.
pub fn validate_tx_hex(tx_hex: &str) -> Result<(), CoreError> {
    if tx_hex.is_empty() {
        return Err(CoreError::Validation("txHex is required".to_owned()));
    }
    Ok(())
}
