pub mod auth;
pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod types;
pub mod user;
pub mod visibility;
