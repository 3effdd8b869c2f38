use serde::Deserialize;

/// Whether the held token is believed to be accepted upstream.
///
/// `Unknown -> Valid` after a successful refresh,
/// `Valid -> Unknown` when upstream answers 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Unknown,
    Valid,
}

/// Bearer credential, ready to be used as the `Authorization` header value
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub value: String,
    pub status: TokenStatus,
}

impl AuthToken {
    /// Empty token held before the first successful refresh
    pub fn empty() -> Self {
        Self { value: String::new(), status: TokenStatus::Unknown }
    }

    pub fn valid(value: String) -> Self {
        Self { value, status: TokenStatus::Valid }
    }
}

/// Auth endpoint response, extra fields are ignored
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
}

impl TokenResponse {
    /// `"<token_type> <access_token>"`
    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
