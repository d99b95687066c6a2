//! Command handlers grouped by endpoint.

pub(crate) mod compress;
pub(crate) mod health;
