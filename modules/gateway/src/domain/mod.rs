pub mod client;
pub(crate) mod service;
pub mod translator;

pub(crate) use service::{GatewayService, ProcessedOrder};
