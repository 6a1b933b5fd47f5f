pub mod cache_adapter;
pub mod config_service;
pub mod paths;

pub use crate::cache_adapter::{CacheRecordAdapter, ResolvedField};
pub use crate::config_service::ConfigService;
pub use crate::paths::AlgoscopePaths;
