use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
///
/// `sub` is the user ID as a string; `exp` is a Unix timestamp in
/// seconds, validated on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}
