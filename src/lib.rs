pub mod ai_summary;
pub mod analysis;
pub mod http_client;
pub mod loaders;
pub mod normalize;
pub mod provider;
pub mod query_params;
pub mod sheet_cache;
pub mod sheets;
pub mod state;
pub mod tables;
pub mod trends;
pub mod views;
