//! Transaction enrichment.
//!
//! Classifies a raw transaction from the vantage point of one subject
//! address: direction (send or receive), net amount with change netted out,
//! and the counterparty address. Pure functions over owned data; no I/O and
//! no error path. Degenerate input still yields a valid entry.

use crate::types::{Direction, EnrichedTransaction, RawTransaction, Sats};

/// Enrich every transaction in `txs` for `address`, preserving order.
pub fn enrich_transactions(txs: &[RawTransaction], address: &str) -> Vec<EnrichedTransaction> {
    txs.iter().map(|tx| enrich_transaction(tx, address)).collect()
}

/// Classify `tx` from the point of view of `address`.
#[must_use]
pub fn enrich_transaction(tx: &RawTransaction, address: &str) -> EnrichedTransaction {
    let direction = classify_direction(tx, address);

    EnrichedTransaction {
        txid: tx.txid,
        direction,
        amount_sats: net_amount(tx, address, direction),
        other_addr: resolve_counterparty(tx, address, direction),
        confirmed: tx.confirmed,
        block_height: tx.block_height,
        block_time: tx.block_time,
        fee_sats: tx.fee,
    }
}

// ==============================================================================
// Direction
// ==============================================================================

/// Spending one of the address's outputs is the only evidence of sending.
/// Inputs without a resolvable owner never match.
#[must_use]
pub fn classify_direction(tx: &RawTransaction, address: &str) -> Direction {
    if tx.inputs.iter().any(|input| input.owner() == Some(address)) {
        Direction::Send
    } else {
        Direction::Receive
    }
}

// ==============================================================================
// Net Amount
// ==============================================================================

/// For a send, everything paid to other addresses (change back to `address`
/// is excluded). For a receive, everything paid to `address`, which may span
/// several outputs.
#[must_use]
pub fn net_amount(tx: &RawTransaction, address: &str, direction: Direction) -> Sats {
    let to_subject = matches!(direction, Direction::Receive);
    tx.outputs
        .iter()
        .filter(|output| (output.address == address) == to_subject)
        .fold(0, |acc: Sats, output| acc.saturating_add(output.value))
}

// ==============================================================================
// Counterparty
// ==============================================================================

/// Recipient of a send: the first output not paying `address`, falling back
/// to the first output (a self-send names the subject itself).
///
/// Sender of a receive: the first resolvable input owner other than
/// `address`, falling back to the first resolvable input owner.
///
/// Empty when neither rule finds anything.
#[must_use]
pub fn resolve_counterparty(tx: &RawTransaction, address: &str, direction: Direction) -> String {
    let found = match direction {
        Direction::Send => tx
            .outputs
            .iter()
            .find(|output| output.address != address)
            .or_else(|| tx.outputs.first())
            .map(|output| output.address.as_str()),
        Direction::Receive => {
            let mut owners = tx.inputs.iter().filter_map(|input| input.owner());
            let first = owners.clone().next();
            owners.find(|owner| *owner != address).or(first)
        }
    };

    found.unwrap_or_default().to_string()
}
