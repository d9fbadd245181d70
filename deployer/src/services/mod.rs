//! Collaborators the deployment pipeline drives

pub mod builder;
pub mod debugger;
pub mod status;
pub mod ui;
