//! Infrastructure layer implementations.

pub mod http;
pub mod logging;

pub use http::ReqwestTransport;
pub use logging::{NoopLogger, TracingLogger};
