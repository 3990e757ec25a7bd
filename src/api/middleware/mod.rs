pub mod cms_guard;
pub mod request_id;

pub use cms_guard::{CmsAuthorized, CmsWriteGuard};
pub use request_id::{RequestId, RequestIdMiddleware};
