//! Application layer: the request dispatcher and the client operations.

pub mod client;
pub mod dispatcher;

pub use client::{ACCOUNTS_PATH, MUTATIONS_PATH, MutasikuClient};
pub use dispatcher::Dispatcher;
