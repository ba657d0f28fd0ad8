//! Shared test helpers for `beutel-core` unit tests.
//!
//! Builders for raw transactions so that enrichment, wire-decoding and type
//! tests share one source of truth for dummy data.

use bitcoin::hashes::Hash;
use bitcoin::Txid;

use crate::types::{BlockHeight, PrevOut, RawInput, RawOutput, RawTransaction, Sats};

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

/// An input spending an output owned by `owner`.
pub fn input(owner: &str, value: Sats) -> RawInput {
    RawInput {
        prevout: Some(PrevOut {
            address: Some(owner.to_string()),
            value,
        }),
    }
}

/// A coinbase input (no prevout).
pub fn coinbase_input() -> RawInput {
    RawInput { prevout: None }
}

pub fn output(address: &str, value: Sats) -> RawOutput {
    RawOutput {
        address: address.to_string(),
        value,
    }
}

/// Build a confirmed `RawTransaction` with sane defaults.
/// Override individual fields after construction when needed.
pub fn raw_tx(inputs: Vec<RawInput>, outputs: Vec<RawOutput>) -> RawTransaction {
    RawTransaction {
        txid: txid_from_byte(1),
        inputs,
        outputs,
        fee: 1_000,
        confirmed: true,
        block_height: Some(BlockHeight(840_000)),
        block_time: Some(1_713_571_767),
    }
}
