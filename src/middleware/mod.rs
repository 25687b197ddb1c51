pub mod auth;
pub mod authorize;
pub mod response;

pub use auth::bearer_auth_middleware;
pub use authorize::enforce;
pub use response::{ApiResponse, ApiResult};
