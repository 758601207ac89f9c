// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod docker_repo;
pub mod error;
pub mod format;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod presenter;
pub mod sink;
pub mod source;
