pub mod category;
pub mod comment;
pub mod config;
pub mod location;
pub mod post;
pub mod user;
