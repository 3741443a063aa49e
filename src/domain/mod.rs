//! Domain layer containing core types, traits, and error definitions.

pub mod error;
pub mod request;
pub mod traits;
pub mod types;

pub use error::{
    ApiResult, ConfigError, DEFAULT_FAILURE_MESSAGE, ErrorKind, SdkError, ValidationError,
};
pub use request::{
    API_KEY_HEADER, ApiRequest, FormPart, HttpMethod, MultipartForm, Payload, RequestBody,
    TransportError, TransportResponse,
};
pub use traits::{HttpTransport, LogContext, SdkLogger};
pub use types::{
    AccountQuery, AddAccountAction, AddAccountRequest, BankTransferConfirm, BankTransferInit,
    MIN_TRANSFER_AMOUNT, MutationParams, QrisPayment, ResponseEnvelope, TransactionQuery,
    TransferAction, VerifyAccountRequest, VerifyAction,
};
