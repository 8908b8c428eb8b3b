pub mod analytics;
pub mod auth;
pub mod common;
pub mod orders;
pub mod provider;
pub mod users;
