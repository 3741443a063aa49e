//! Client library for the Mutasiku API.
//!
//! Query linked bank and e-wallet accounts and their transaction history
//! ("mutasi"), link new accounts through an OTP flow, and drive DANA
//! transfers (bank list, QRIS payment, bank transfer init/confirm).
//!
//! ```no_run
//! use mutasiku_sdk::{MutasikuClient, TransactionQuery};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MutasikuClient::from_api_key("your-api-key")?;
//! let history = client
//!     .get_mutations(&TransactionQuery {
//!         days: Some(30),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{:?}", history.data);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::{Dispatcher, MutasikuClient};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use domain::{
    AccountQuery, AddAccountAction, AddAccountRequest, ApiResult, BankTransferConfirm,
    BankTransferInit, ConfigError, ErrorKind, HttpTransport, LogContext, QrisPayment,
    ResponseEnvelope, SdkError, SdkLogger, TransactionQuery, TransferAction, ValidationError,
    VerifyAccountRequest, VerifyAction,
};
pub use infra::{NoopLogger, ReqwestTransport, TracingLogger};
