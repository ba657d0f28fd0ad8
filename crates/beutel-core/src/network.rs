use serde::{Deserialize, Serialize};

/// The Bitcoin network this gateway serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet3,
    Testnet4,
    Signet,
}

impl Network {
    /// Parse a configured network name. Anything unrecognized, including the
    /// empty string, selects mainnet.
    pub fn parse(name: &str) -> Self {
        match name {
            "testnet3" => Self::Testnet3,
            "testnet4" => Self::Testnet4,
            "signet" => Self::Signet,
            _ => Self::Mainnet,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet3 => "testnet3",
            Self::Testnet4 => "testnet4",
            Self::Signet => "signet",
        }
    }

    /// Public mempool.space endpoint for this network.
    pub fn mempool_base_url(self) -> &'static str {
        match self {
            Self::Mainnet => "https://mempool.space",
            Self::Testnet3 => "https://mempool.space/testnet",
            Self::Testnet4 => "https://mempool.space/testnet4",
            Self::Signet => "https://mempool.space/signet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
