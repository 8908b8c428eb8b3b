pub mod analytics;
pub mod day_window;
pub mod lifecycle;
pub mod pricing;
pub mod summary;
