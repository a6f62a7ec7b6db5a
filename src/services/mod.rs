pub mod auth;
pub mod comments;
pub mod errors;
pub mod listing;
pub mod ownership;
pub mod posts;
pub mod profiles;

pub use errors::{ServiceError, ServiceResult};

#[cfg(test)]
pub(crate) mod fixtures;
