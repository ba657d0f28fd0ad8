use std::time::{Duration, Instant};

use async_trait::async_trait;
use bitcoin::Txid;
use reqwest::{header, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::enrich::enrich_transactions;
use crate::error::{CoreError, UpstreamError};
use crate::log_context::LogContext;
use crate::network::Network;
use crate::types::{Balance, EnrichedTransaction, FeeRates, RawTransaction, Utxo};

use super::super::{validate_tx_hex, ChainProvider};
use super::url::{endpoint, parse_base_url};
use super::wire::{AddressInfo, TxEntry, UtxoEntry};

/// Default upper bound for one upstream round trip.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Construction options for [`MempoolClient`].
#[derive(Debug, Clone)]
pub struct MempoolOptions {
    /// Overrides the network's public mempool.space URL, e.g. for a
    /// self-hosted explorer.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for MempoolOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// mempool.space (Esplora-compatible) REST client.
///
/// Holds a pooled `reqwest::Client`; safe to share across concurrent
/// requests. Every operation performs exactly one upstream call.
pub struct MempoolClient {
    client: reqwest::Client,
    network: Network,
    base_url: Url,
}

/// A completed upstream exchange that answered 200.
struct UpstreamReply {
    status: u16,
    body: String,
}

impl UpstreamReply {
    fn invalid(self, reason: String) -> CoreError {
        UpstreamError::InvalidResponse {
            status: self.status,
            reason,
            body: self.body,
        }
        .into()
    }
}

impl MempoolClient {
    /// Client for the network's public endpoint with default options.
    pub fn new(network: Network) -> Result<Self, CoreError> {
        Self::with_options(network, MempoolOptions::default())
    }

    pub fn with_options(network: Network, options: MempoolOptions) -> Result<Self, CoreError> {
        let base_url = parse_base_url(
            options
                .base_url
                .as_deref()
                .unwrap_or_else(|| network.mempool_base_url()),
        )?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(options.timeout)
            .pool_max_idle_per_host(32)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client builder uses valid static config");

        Ok(Self {
            client,
            network,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        log: &LogContext,
        segments: &[&str],
    ) -> Result<T, CoreError> {
        let url = endpoint(&self.base_url, segments)?;
        let reply = self.send(log, Method::GET, url.clone(), None).await?;
        match serde_json::from_str(&reply.body) {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = reply.invalid(format!("decode {}: {e}", url.path()));
                log.add("upstream_error", err.to_string());
                Err(err)
            }
        }
    }

    async fn send(
        &self,
        log: &LogContext,
        method: Method,
        url: Url,
        text_body: Option<&str>,
    ) -> Result<UpstreamReply, CoreError> {
        debug!(upstream.method = %method, upstream.url = %url, "upstream call");

        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(text) = text_body {
            builder = builder
                .header(header::CONTENT_TYPE, "text/plain")
                .body(text.to_owned());
        }

        let started = Instant::now();
        let result = builder.send().await;

        log.add("upstream_url", url.as_str());
        log.add("upstream_method", method.as_str());
        log.add(
            "upstream_duration_ms",
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                log.add("upstream_error", err.to_string());
                return Err(UpstreamError::Transport(err).into());
            }
        };

        let status = response.status();
        log.add("upstream_status", status.as_u16());

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                log.add("upstream_error", err.to_string());
                return Err(UpstreamError::Transport(err).into());
            }
        };
        debug!(upstream.url = %url, %status, body_len = body.len(), "upstream response");
        trace!(upstream.url = %url, body = %body, "upstream response body");

        // Every endpoint answers 200 on success; anything else, 2xx included,
        // is surfaced with its status.
        if status != StatusCode::OK {
            let err = UpstreamError::Status {
                status: status.as_u16(),
                body,
            };
            log.add("upstream_error", err.to_string());
            return Err(err.into());
        }

        Ok(UpstreamReply {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ChainProvider for MempoolClient {
    async fn get_balance(&self, log: &LogContext, address: &str) -> Result<Balance, CoreError> {
        let info: AddressInfo = self.get_json(log, &["api", "address", address]).await?;
        Ok(info.into())
    }

    async fn get_utxos(&self, log: &LogContext, address: &str) -> Result<Vec<Utxo>, CoreError> {
        let entries: Vec<UtxoEntry> = self
            .get_json(log, &["api", "address", address, "utxo"])
            .await?;
        Ok(entries.into_iter().map(Utxo::from).collect())
    }

    async fn get_transactions(
        &self,
        log: &LogContext,
        address: &str,
    ) -> Result<Vec<EnrichedTransaction>, CoreError> {
        let entries: Vec<TxEntry> = self
            .get_json(log, &["api", "address", address, "txs"])
            .await?;
        let raw: Vec<RawTransaction> = entries.into_iter().map(RawTransaction::from).collect();
        Ok(enrich_transactions(&raw, address))
    }

    async fn get_fee_rates(&self, log: &LogContext) -> Result<FeeRates, CoreError> {
        self.get_json(log, &["api", "v1", "fees", "recommended"])
            .await
    }

    async fn broadcast_tx(&self, log: &LogContext, tx_hex: &str) -> Result<Txid, CoreError> {
        validate_tx_hex(tx_hex)?;

        let url = endpoint(&self.base_url, &["api", "tx"])?;
        let reply = self.send(log, Method::POST, url, Some(tx_hex)).await?;

        // The explorer answers with the bare txid as plain text.
        let txid: Txid = match reply.body.trim().parse() {
            Ok(txid) => txid,
            Err(e) => {
                let err = reply.invalid(format!("broadcast returned invalid txid: {e}"));
                log.add("upstream_error", err.to_string());
                return Err(err);
            }
        };
        log.add("txid", txid.to_string());
        Ok(txid)
    }

    fn network(&self) -> Network {
        self.network
    }
}
