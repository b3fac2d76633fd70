mod cache;
pub mod config;
pub mod errors;
pub(crate) mod memory_cache;
pub mod stats;

pub use cache::{ErrorHook, ImageCache};
