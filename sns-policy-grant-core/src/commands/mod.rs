//! Commands module - service layer for SNS Policy Grant operations

mod apply;
mod plan;
pub(crate) mod service;

pub use plan::prepare;
pub use service::PolicyGrantService;
