//! Mutasiku client: one method per API capability.
//!
//! Each method validates its input locally, shapes the payload and hands it
//! to the [`Dispatcher`]. A validation failure returns before any request
//! is built.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::app::dispatcher::Dispatcher;
use crate::config::ClientConfig;
use crate::domain::types::{NoFields, TransferPayload};
use crate::domain::{
    AccountQuery, AddAccountRequest, ApiResult, BankTransferConfirm, BankTransferInit,
    ConfigError, HttpMethod, HttpTransport, MultipartForm, Payload, QrisPayment,
    ResponseEnvelope, SdkError, TransactionQuery, TransferAction, ValidationError,
    VerifyAccountRequest,
};
use crate::infra::ReqwestTransport;

pub const ACCOUNTS_PATH: &str = "/api/v1/accounts";
pub const MUTATIONS_PATH: &str = "/api/v1/mutations";

/// Stateless facade over the Mutasiku API.
///
/// Cheap to clone; clones share the same transport.
#[derive(Clone)]
pub struct MutasikuClient {
    dispatcher: Dispatcher,
}

impl MutasikuClient {
    /// Client using the production `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            dispatcher: Dispatcher::new(config, transport),
        }
    }

    /// Shortcut for `ClientConfig::new(api_key)` + [`MutasikuClient::new`].
    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(ClientConfig::new(api_key)?)
    }

    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// List linked accounts.
    #[instrument(skip(self))]
    pub async fn get_accounts(&self, query: &AccountQuery) -> ApiResult<ResponseEnvelope> {
        let payload = json_payload(query)?;
        self.dispatcher
            .dispatch(ACCOUNTS_PATH, payload, HttpMethod::Get)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: &str) -> ApiResult<ResponseEnvelope> {
        require_account_id(account_id)?;
        self.dispatcher
            .dispatch(&account_path(account_id), Payload::None, HttpMethod::Get)
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove_account(&self, account_id: &str) -> ApiResult<ResponseEnvelope> {
        require_account_id(account_id)?;
        info!("Removing account");
        self.dispatcher
            .dispatch(&account_path(account_id), Payload::None, HttpMethod::Delete)
            .await
    }

    // ------------------------------------------------------------------
    // Transaction history
    // ------------------------------------------------------------------

    /// List transaction history ("mutasi").
    ///
    /// `limit` defaults to 10 and `page` to 1. When `days` is set the window
    /// ends now and replaces any explicit start/end date. A `days` value
    /// past the calendar range is rejected before any request is made.
    #[instrument(skip(self))]
    pub async fn get_mutations(&self, query: &TransactionQuery) -> ApiResult<ResponseEnvelope> {
        let params = query.resolve_at(Utc::now()).map_err(reject)?;
        let payload = json_payload(&params)?;
        self.dispatcher
            .dispatch(MUTATIONS_PATH, payload, HttpMethod::Get)
            .await
    }

    // ------------------------------------------------------------------
    // Account linking
    // ------------------------------------------------------------------

    /// Link an account and trigger the OTP.
    ///
    /// The response carries the `sessionId` needed by [`Self::verify_account`];
    /// read it with [`ResponseEnvelope::session_id`].
    #[instrument(skip(self, request), fields(action = %request.action, provider = %request.provider_code))]
    pub async fn add_account(&self, request: &AddAccountRequest) -> ApiResult<ResponseEnvelope> {
        request.check().map_err(reject)?;
        let payload = json_payload(&request.to_payload())?;
        self.dispatcher
            .dispatch(ACCOUNTS_PATH, payload, HttpMethod::Post)
            .await
    }

    #[instrument(skip(self, request), fields(action = %request.action))]
    pub async fn verify_account(
        &self,
        request: &VerifyAccountRequest,
    ) -> ApiResult<ResponseEnvelope> {
        request.check().map_err(reject)?;
        let payload = json_payload(&request.to_payload())?;
        self.dispatcher
            .dispatch(ACCOUNTS_PATH, payload, HttpMethod::Post)
            .await
    }

    // ------------------------------------------------------------------
    // Transfers
    // ------------------------------------------------------------------

    /// Banks reachable from the account's transfer endpoint.
    #[instrument(skip(self))]
    pub async fn get_transfer_banks(&self, account_id: &str) -> ApiResult<ResponseEnvelope> {
        require_account_id(account_id)?;
        self.transfer(account_id, TransferAction::BankList, &NoFields {})
            .await
    }

    /// Pay a QRIS code from an image, sent as multipart/form-data.
    #[instrument(skip(self, payment), fields(amount = payment.amount))]
    pub async fn pay_qris(
        &self,
        account_id: &str,
        payment: &QrisPayment,
    ) -> ApiResult<ResponseEnvelope> {
        require_account_id(account_id)?;
        payment.check().map_err(reject)?;

        let form = MultipartForm::new()
            .text("action", TransferAction::QrisCreate.as_str())
            .file(
                "qrImage",
                payment.file_name.clone(),
                payment.mime_type.clone(),
                payment.qr_image.clone(),
            )
            .text("amount", payment.amount.to_string());

        self.dispatcher
            .dispatch(
                &transfer_path(account_id),
                Payload::Multipart(form),
                HttpMethod::Post,
            )
            .await
    }

    /// First step of a bank transfer. Amounts below 10,000 are rejected locally.
    #[instrument(skip(self, transfer), fields(amount = transfer.amount, inst_id = %transfer.inst_id))]
    pub async fn init_bank_transfer(
        &self,
        account_id: &str,
        transfer: &BankTransferInit,
    ) -> ApiResult<ResponseEnvelope> {
        require_account_id(account_id)?;
        transfer.check().map_err(reject)?;
        self.transfer(account_id, TransferAction::BankInit, transfer)
            .await
    }

    /// Second step of a bank transfer.
    #[instrument(skip(self, transfer), fields(amount = transfer.amount))]
    pub async fn confirm_bank_transfer(
        &self,
        account_id: &str,
        transfer: &BankTransferConfirm,
    ) -> ApiResult<ResponseEnvelope> {
        require_account_id(account_id)?;
        transfer.check().map_err(reject)?;
        self.transfer(account_id, TransferAction::BankCreate, transfer)
            .await
    }

    async fn transfer<T: Serialize>(
        &self,
        account_id: &str,
        action: TransferAction,
        fields: &T,
    ) -> ApiResult<ResponseEnvelope> {
        let payload = json_payload(&TransferPayload { action, fields })?;
        self.dispatcher
            .dispatch(&transfer_path(account_id), payload, HttpMethod::Post)
            .await
    }
}

fn account_path(account_id: &str) -> String {
    format!("{ACCOUNTS_PATH}/{account_id}")
}

fn transfer_path(account_id: &str) -> String {
    format!("{ACCOUNTS_PATH}/{account_id}/transfer")
}

fn reject(err: ValidationError) -> SdkError {
    warn!(error = %err, "Request rejected by local validation");
    SdkError::Validation(err)
}

fn require_account_id(account_id: &str) -> ApiResult<()> {
    if account_id.trim().is_empty() {
        return Err(reject(ValidationError::Required("Account ID".to_string())));
    }
    Ok(())
}

fn json_payload<T: Serialize>(value: &T) -> ApiResult<Payload> {
    serde_json::to_value(value)
        .map(Payload::Json)
        .map_err(|e| reject(ValidationError::Invalid(format!("Unserializable payload: {e}"))))
}
