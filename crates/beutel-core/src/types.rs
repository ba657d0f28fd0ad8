//! Domain types for Beutel's wallet view of the chain.
//!
//! Contains the raw transaction shape consumed by enrichment (`RawTransaction`,
//! `RawInput`, `RawOutput`), the enriched history entry handed to wallet
//! clients (`EnrichedTransaction`), and the balance, UTXO and fee-rate value
//! objects. Everything here is an immutable value built fresh per request.

use bitcoin::Txid;
use serde::{Deserialize, Serialize};

/// Satoshi-denominated amount. Signed so that balance deltas never need a
/// separate representation; no floating point anywhere.
pub type Sats = i64;

/// An opaque output-owner identifier. Never validated; an address that matches
/// nothing simply degrades to an empty result.
pub type Address = String;

// ==============================================================================
// Block Height
// ==============================================================================

/// A Bitcoin block height, wrapped for type safety.
///
/// `#[serde(transparent)]` keeps the JSON representation a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHeight(pub u32);

// ==============================================================================
// Raw Transactions
// ==============================================================================

/// The output spent by an input, as resolved by the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrevOut {
    /// `None` when the spent script has no standard address.
    pub address: Option<Address>,
    pub value: Sats,
}

/// A transaction input. `prevout` is `None` for coinbase inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    pub prevout: Option<PrevOut>,
}

impl RawInput {
    /// Owner of the spent output, if one can be resolved.
    pub fn owner(&self) -> Option<&str> {
        self.prevout.as_ref()?.address.as_deref()
    }
}

/// A transaction output. Outputs without a standard address (OP_RETURN and
/// friends) carry an empty address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    pub address: Address,
    pub value: Sats,
}

/// A transaction as fetched from the upstream, before enrichment.
/// Input and output order is significant for counterparty tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub txid: Txid,
    pub inputs: Vec<RawInput>,
    pub outputs: Vec<RawOutput>,
    pub fee: Sats,
    pub confirmed: bool,
    pub block_height: Option<BlockHeight>,
    /// Unix timestamp of the confirming block.
    pub block_time: Option<i64>,
}

// ==============================================================================
// Enriched Transactions
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Send,
    Receive,
}

/// A history entry classified from the vantage point of one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTransaction {
    pub txid: Txid,
    #[serde(rename = "type")]
    pub direction: Direction,
    /// Amount that left (send) or entered (receive) the address, change excluded.
    pub amount_sats: Sats,
    /// Recipient for a send, sender for a receive. May be empty.
    pub other_addr: Address,
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<BlockHeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<i64>,
    pub fee_sats: Sats,
}

// ==============================================================================
// Balance, UTXOs, Fees
// ==============================================================================

/// Confirmed and unconfirmed satoshi balance of an address.
///
/// `total` is derived at construction and cannot be set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    confirmed: Sats,
    unconfirmed: Sats,
    total: Sats,
}

impl Balance {
    /// Arithmetic saturates at the `i64` bounds.
    pub fn new(confirmed: Sats, unconfirmed: Sats) -> Self {
        Self {
            confirmed,
            unconfirmed,
            total: confirmed.saturating_add(unconfirmed),
        }
    }

    pub fn confirmed(&self) -> Sats {
        self.confirmed
    }

    pub fn unconfirmed(&self) -> Sats {
        self.unconfirmed
    }

    pub fn total(&self) -> Sats {
        self.total
    }
}

/// An unspent output owned by the queried address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub txid: Txid,
    pub vout: u32,
    pub value: Sats,
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<BlockHeight>,
}

/// Recommended fee rates in sat/vB. No ordering between tiers is enforced;
/// the upstream is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRates {
    pub fastest_fee: u64,
    pub half_hour_fee: u64,
    pub hour_fee: u64,
    pub economy_fee: u64,
    pub minimum_fee: u64,
}
