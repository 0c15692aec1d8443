pub mod auth;
pub mod extract;
pub mod guards;
pub mod response;

pub use auth::{authenticate, current_identity};
pub use extract::ValidJson;
pub use guards::{require_admin, require_logged_in, require_self_or_admin};
pub use response::{ApiResponse, ApiResult};
