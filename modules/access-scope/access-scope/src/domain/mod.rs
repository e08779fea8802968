pub mod error;
pub mod filter_resolver;
pub mod grants;
pub mod hierarchy;
pub mod local_client;
pub mod record_filter;
pub mod repo;
pub mod resolver;
pub mod service;
pub mod synchronizer;
