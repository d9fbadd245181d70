//! asdeploy library
//!
//! Builds a project and deploys the artifact to a local or remote
//! application server instance.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;
