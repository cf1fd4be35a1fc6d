pub(crate) mod service;
pub(crate) mod store;

pub(crate) use service::{DemoService, ValidatedUser};
