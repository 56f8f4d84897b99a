pub mod dashboard_service;
pub mod export;
pub mod filter_compiler;
pub mod query_cache;
