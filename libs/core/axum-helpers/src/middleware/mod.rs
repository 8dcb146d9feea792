//! Cross-cutting HTTP middleware applied around every route.

pub mod cors;
pub mod logging;

pub use cors::{apply_cors, options_preflight};
pub use logging::request_logging;
