pub mod aggregator;
pub mod app;
pub mod catalog;
pub mod config;
pub mod fallback;
pub mod landing;
pub mod models;
pub mod presentation;
