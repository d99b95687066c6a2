//! HTTP routing, handlers, and middleware.

pub(crate) mod compress;
pub(crate) mod constants;
pub(crate) mod errors;
pub(crate) mod health;
pub mod router;
pub(crate) mod telemetry;
