//! Deployment module

pub mod fsm;
pub mod invoker;
pub mod orchestrator;
pub mod outcome;
pub mod request;
pub mod strategy;
