pub mod errors;
pub mod posts;
pub mod tags;

pub use errors::{ServiceError, ServiceResult};
