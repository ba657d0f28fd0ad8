//! Upstream JSON shapes and their conversion into domain types.

use bitcoin::Txid;
use serde::Deserialize;

use crate::types::{Balance, BlockHeight, PrevOut, RawInput, RawOutput, RawTransaction, Sats, Utxo};

// ==============================================================================
// GET /api/address/{addr}
// ==============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct AddressInfo {
    #[serde(default)]
    chain_stats: TxoStats,
    #[serde(default)]
    mempool_stats: TxoStats,
}

#[derive(Debug, Default, Deserialize)]
struct TxoStats {
    #[serde(default)]
    funded_txo_sum: Sats,
    #[serde(default)]
    spent_txo_sum: Sats,
}

impl TxoStats {
    fn net(&self) -> Sats {
        self.funded_txo_sum.saturating_sub(self.spent_txo_sum)
    }
}

impl From<AddressInfo> for Balance {
    fn from(info: AddressInfo) -> Self {
        Balance::new(info.chain_stats.net(), info.mempool_stats.net())
    }
}

// ==============================================================================
// Shared status object
// ==============================================================================

#[derive(Debug, Default, Deserialize)]
struct TxStatus {
    #[serde(default)]
    confirmed: bool,
    block_height: Option<u32>,
    block_time: Option<i64>,
}

// ==============================================================================
// GET /api/address/{addr}/utxo
// ==============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct UtxoEntry {
    txid: Txid,
    vout: u32,
    value: Sats,
    #[serde(default)]
    status: TxStatus,
}

impl From<UtxoEntry> for Utxo {
    fn from(entry: UtxoEntry) -> Self {
        Utxo {
            txid: entry.txid,
            vout: entry.vout,
            value: entry.value,
            confirmed: entry.status.confirmed,
            block_height: entry.status.block_height.map(BlockHeight),
        }
    }
}

// ==============================================================================
// GET /api/address/{addr}/txs
// ==============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct TxEntry {
    txid: Txid,
    #[serde(default)]
    status: TxStatus,
    #[serde(default)]
    vin: Vec<VinEntry>,
    #[serde(default)]
    vout: Vec<VoutEntry>,
    #[serde(default)]
    fee: Sats,
}

#[derive(Debug, Deserialize)]
struct VinEntry {
    /// `null` for coinbase inputs.
    prevout: Option<VoutEntry>,
}

#[derive(Debug, Deserialize)]
struct VoutEntry {
    /// Absent for scripts without a standard address (OP_RETURN, bare multisig).
    scriptpubkey_address: Option<String>,
    #[serde(default)]
    value: Sats,
}

impl From<TxEntry> for RawTransaction {
    fn from(entry: TxEntry) -> Self {
        let inputs = entry
            .vin
            .into_iter()
            .map(|vin| RawInput {
                prevout: vin.prevout.map(|prevout| PrevOut {
                    address: prevout.scriptpubkey_address.filter(|a| !a.is_empty()),
                    value: prevout.value,
                }),
            })
            .collect();

        let outputs = entry
            .vout
            .into_iter()
            .map(|vout| RawOutput {
                address: vout.scriptpubkey_address.unwrap_or_default(),
                value: vout.value,
            })
            .collect();

        RawTransaction {
            txid: entry.txid,
            inputs,
            outputs,
            fee: entry.fee,
            confirmed: entry.status.confirmed,
            block_height: entry.status.block_height.map(BlockHeight),
            block_time: entry.status.block_time,
        }
    }
}
