mod error;
mod functions;
mod types;

pub use error::{AuthError, Result};
pub use functions::{
    create_access_token, decode_access_token, hash_password, verify_password,
};
pub use types::Claims;
