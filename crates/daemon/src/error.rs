use snapfind_protocol::{ErrorKind, ExceptionBody};

/// Every way a request can fail to produce a normal response.
///
/// `NotFound` and `MethodNotAllowed` carry no body (404/405, empty).
/// `Silent`, `Integrity`, and `Internal` all answer 500 with an
/// `{"exception","class","args"}` body; only `Internal` gets logged with
/// its full chain; `Silent` is an expected recoverable condition (e.g.
/// `unignore` of a pattern that was never added) and `Integrity` is a
/// search-engine invariant violation, both logged at a lower level without
/// a stack trace.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no route for {method} {path}")]
    NotFound { method: String, path: String },
    #[error("method not allowed for {path}")]
    MethodNotAllowed { path: String },
    #[error("{0}")]
    Silent(String),
    #[error("shard integrity error: {0}")]
    Integrity(#[from] snapfind_engine::ShardError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NotFound { .. } => 404,
            ApiError::MethodNotAllowed { .. } => 405,
            ApiError::Silent(_) | ApiError::Integrity(_) | ApiError::Internal(_) => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self.status() {
            404 => "Not Found",
            405 => "Method Not Allowed",
            _ => "Internal Server Error",
        }
    }

    /// `true` for the two statuses that carry an empty body.
    pub fn has_empty_body(&self) -> bool {
        matches!(self, ApiError::NotFound { .. } | ApiError::MethodNotAllowed { .. })
    }

    pub fn body(&self) -> ExceptionBody {
        let class = match self {
            ApiError::NotFound { .. } | ApiError::MethodNotAllowed { .. } => ErrorKind::NotFound,
            ApiError::Silent(_) => ErrorKind::Silent,
            ApiError::Integrity(_) => ErrorKind::Integrity,
            ApiError::Internal(_) => ErrorKind::Internal,
        };
        ExceptionBody { exception: self.to_string(), class, args: Vec::new() }
    }

    /// Whether the router should log this failure with its full chain.
    /// `Silent` and `Integrity` are expected/contained conditions; only a
    /// genuine `Internal` failure warrants a stack trace in the log.
    pub fn should_log_trace(&self) -> bool {
        matches!(self, ApiError::Internal(_))
    }
}
