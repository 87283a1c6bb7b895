mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{BookRepository, UserRepository};
pub use types::{BookPatch, UserPatch};
