//! Test utilities: transport spy and recording logger.

mod mocks;

pub use mocks::{MockConfig, MockTransport, RecordingLogger};
