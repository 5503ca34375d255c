pub mod analytics;
pub mod csv_loader;
pub mod store;
