pub mod common;
pub mod menu;
pub mod order;
pub mod user;
