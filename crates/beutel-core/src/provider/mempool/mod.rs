//! mempool.space / Esplora REST client.
//!
//! Implements [`ChainProvider`](super::ChainProvider) over the explorer's
//! JSON API using `reqwest`: one request per operation, a bounded timeout,
//! and upstream call details recorded into the request's log context.

mod client;
mod url;
mod wire;

pub use client::{MempoolClient, MempoolOptions};
