pub mod api;
pub mod config;
pub mod minecraft;
pub mod store;
pub mod util;
