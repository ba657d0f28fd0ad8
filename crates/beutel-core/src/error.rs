#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Caller input failed a precondition checked before any network activity.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl CoreError {
    /// Stable tag recorded in the canonical request log.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Upstream(_) => "upstream_error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A 200 reply whose body could not be interpreted.
    #[error("invalid upstream response (status {status}): {reason}")]
    InvalidResponse {
        status: u16,
        reason: String,
        body: String,
    },
}

impl UpstreamError {
    /// HTTP status returned by the upstream, if a response arrived at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::InvalidResponse { status, .. } => Some(*status),
        }
    }
}
