use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// 401/403
    Auth,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    Other,
}

impl StatusKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::RateLimit,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("completion backend could not be initialized: {0}")]
    Init(String),

    #[error("completion request failed")]
    Network(#[source] reqwest::Error),

    #[error("completion request timed out")]
    Timeout,

    #[error("completion backend returned {status} ({kind:?}): {body}")]
    Status {
        kind: StatusKind,
        status: u16,
        body: String,
    },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("completion response contained no message content")]
    EmptyCompletion,
}

impl ClassifierError {
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Status {
            kind: StatusKind::from_status(status),
            status,
            body: truncate_body(body),
        }
    }

    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 300;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        let head = body.chars().take(MAX_CHARS).collect::<String>();
        format!("{head}...")
    }
}
