use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("http status {0}")]
    Status(reqwest::StatusCode),

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("http client setup failed: {0}")]
    Client(String),
}

/// Transport-level faults: the request never produced a usable response.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("connect failure: {0}")]
    Connect(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("too many redirects")]
    RedirectLoop,

    #[error("body read failed: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        let network = if err.is_timeout() {
            if err.is_connect() {
                NetworkError::ConnectTimeout
            } else {
                NetworkError::RequestTimeout
            }
        } else if err.is_redirect() {
            NetworkError::RedirectLoop
        } else if let Some(status) = err.status() {
            return Self::Status(status);
        } else if err.is_connect() || err.is_request() {
            // DNS and refused connections both surface here
            NetworkError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            NetworkError::Body(err.to_string())
        } else {
            NetworkError::Other(err.to_string())
        };
        Self::Network(network)
    }
}
