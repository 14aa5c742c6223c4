/// Why a single upstream source could not produce a healthy reading.
///
/// Never crosses a component boundary: every adapter folds it into its own
/// status value, so the fan-in never handles errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("missing configuration")]
    MissingConfiguration,

    #[error("missing credential")]
    MissingCredential,

    #[error("timeout")]
    Timeout,

    #[error("{provider} API HTTP {status}")]
    Http { provider: &'static str, status: u16 },

    #[error("{0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Empty(&'static str),
}

impl SourceError {
    /// Configuration gaps and empty listings say nothing about health, so they
    /// surface as `unknown` rather than `error`.
    pub fn is_unknown(&self) -> bool {
        matches!(
            self,
            SourceError::MissingConfiguration
                | SourceError::MissingCredential
                | SourceError::Empty(_)
        )
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout
        } else if e.is_decode() {
            SourceError::Decode(e.to_string())
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}
