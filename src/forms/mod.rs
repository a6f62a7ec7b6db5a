//! HTML form inputs and their validated payloads.

pub mod comments;
pub mod posts;
pub mod users;
