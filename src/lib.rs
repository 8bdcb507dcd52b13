pub mod app;
pub mod config;
pub mod share;
pub mod staging;
pub mod upload;
pub mod utils;
