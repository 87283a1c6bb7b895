use serde::{Deserialize, Serialize};

/// Generic message payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON payload containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
        }
    }
}

/// Pagination query parameters for list endpoints.
///
/// `limit` caps what the store returns; `skip` is applied in-process to
/// the returned page, as the store has no offset support.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: i32,
}

fn default_limit() -> i32 {
    100
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl ListParams {
    /// Applies the in-process skip to a fetched page.
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        if self.skip > 0 && self.skip < items.len() {
            items.into_iter().skip(self.skip).collect()
        } else {
            items
        }
    }
}
