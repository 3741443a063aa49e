//! Domain types: the response envelope, query filters, action tags and
//! request payloads with their local validation rules.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use super::error::ValidationError;

/// Smallest amount accepted by the bank transfer endpoints.
pub const MIN_TRANSFER_AMOUNT: i64 = 10_000;

/// Default page size for transaction history queries.
pub const DEFAULT_MUTATION_LIMIT: u32 = 10;

/// Default page for transaction history queries.
pub const DEFAULT_MUTATION_PAGE: u32 = 1;

/// Default OTP polling interval when none is provided.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 1;

/// Default OTP delivery channel.
pub const DEFAULT_VERIFICATION_METHOD: &str = "SMS";

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

/// Uniform response wrapper emitted by the Mutasiku service.
///
/// Fields the SDK does not model (for example a top-level `sessionId`) are
/// kept in `extra` so nothing in the remote body is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T = Value> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseEnvelope<Value> {
    /// Bare `{success: true}` envelope, used when a 2xx carries no body.
    #[must_use]
    pub fn empty_success() -> Self {
        Self {
            success: true,
            status: None,
            message: None,
            data: None,
            error: None,
            extra: Map::new(),
        }
    }

    /// Envelope for the decoded body of a successful exchange.
    ///
    /// Object members whose JSON type does not fit an envelope field stay in
    /// `extra` under their own key. A body that is not an object becomes
    /// `data` of a successful envelope.
    #[must_use]
    pub fn from_body(body: Value) -> Self {
        let mut map = match body {
            Value::Object(map) => map,
            other => {
                return Self {
                    data: Some(other),
                    ..Self::empty_success()
                };
            }
        };

        let success = match map.remove("success") {
            Some(Value::Bool(flag)) => flag,
            Some(other) => {
                map.insert("success".to_string(), other);
                false
            }
            None => false,
        };
        let status = take_string(&mut map, "status");
        let message = take_string(&mut map, "message");
        let data = map.remove("data").filter(|v| !v.is_null());
        let error = map.remove("error").filter(|v| !v.is_null());

        Self {
            success,
            status,
            message,
            data,
            error,
            extra: map,
        }
    }

    /// OTP session identifier returned by an account-linking call.
    ///
    /// Looked up at the top level first, then inside `data`.
    pub fn session_id(&self) -> Option<&str> {
        self.extra
            .get("sessionId")
            .and_then(Value::as_str)
            .or_else(|| {
                self.data
                    .as_ref()
                    .and_then(|d| d.get("sessionId"))
                    .and_then(Value::as_str)
            })
    }

    /// Deserialize `data` into a caller-chosen type.
    pub fn decode_data<U: DeserializeOwned>(&self) -> Result<Option<U>, serde_json::Error> {
        self.data
            .clone()
            .map(serde_json::from_value)
            .transpose()
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            map.insert(key.to_string(), other);
            None
        }
    }
}

// ============================================================================
// QUERY FILTERS
// ============================================================================

/// Filters for listing linked accounts.
///
/// Zero counts and blank strings are treated as unset and never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountQuery {
    #[serde(skip_serializing_if = "is_unset_count")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "is_unset_count")]
    pub page: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "is_unset_text")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "is_unset_text")]
    pub provider_code: Option<String>,
}

fn is_unset_count(value: &Option<u32>) -> bool {
    value.is_none_or(|v| v == 0)
}

fn is_unset_text(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(is_blank)
}

/// Filters for the transaction history ("mutasi") listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    /// Relative window in days. Takes precedence over `start_date`/`end_date`.
    pub days: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub account_id: Option<String>,
    pub transaction_type: Option<String>,
    pub provider_code: Option<String>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub search: Option<String>,
}

/// Query parameters actually sent to `GET /mutations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationParams {
    pub limit: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl TransactionQuery {
    /// Resolve defaults and the relative date window against `now`.
    ///
    /// Fails when `days` reaches past the representable date range.
    pub fn resolve_at(&self, now: DateTime<Utc>) -> Result<MutationParams, ValidationError> {
        let (start_date, end_date) = match self.days.filter(|d| *d > 0) {
            Some(days) => {
                let start = Duration::try_days(i64::from(days))
                    .and_then(|window| now.checked_sub_signed(window))
                    .ok_or_else(|| ValidationError::Invalid("days is out of range".to_string()))?;
                (Some(iso_timestamp(start)), Some(iso_timestamp(now)))
            }
            None => (
                non_blank(self.start_date.as_deref()),
                non_blank(self.end_date.as_deref()),
            ),
        };

        Ok(MutationParams {
            limit: self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_MUTATION_LIMIT),
            page: self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_MUTATION_PAGE),
            start_date,
            end_date,
            account_id: non_blank(self.account_id.as_deref()),
            transaction_type: non_blank(self.transaction_type.as_deref())
                .map(|t| t.to_uppercase()),
            provider_code: non_blank(self.provider_code.as_deref()).map(|p| p.to_uppercase()),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            search: non_blank(self.search.as_deref()),
        })
    }
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T08:00:00.000Z`.
fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn collect_missing(fields: &[(&str, bool)]) -> Result<(), ValidationError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(name, _)| (*name).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// First human-readable message out of a `validator` error set.
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

// ============================================================================
// ACTION TAGS
// ============================================================================

macro_rules! action_tag {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(Self::$variant),)+
                    _ => Err(ValidationError::UnknownAction(s.to_string())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

action_tag!(
    /// Account-linking actions that trigger an OTP.
    AddAccountAction {
        DanaSendOtp => "dana-send-otp",
        OvoSendOtp => "ovo-send-otp",
    }
);

action_tag!(
    /// OTP verification actions completing an account link.
    VerifyAction {
        DanaVerifyOtp => "dana-verify-otp",
        OvoVerifyOtp => "ovo-verify-otp",
    }
);

action_tag!(
    /// Actions accepted by `POST /accounts/{id}/transfer`.
    TransferAction {
        BankList => "dana-bank-list",
        QrisCreate => "dana-qris-create",
        BankInit => "dana-bank-init",
        BankCreate => "dana-bank-create",
    }
);

impl AddAccountAction {
    /// DANA asks for the wallet PIN when the OTP is sent.
    pub fn requires_pin(&self) -> bool {
        match self {
            Self::DanaSendOtp => true,
            Self::OvoSendOtp => false,
        }
    }
}

impl VerifyAction {
    /// OVO asks for the wallet PIN when the OTP is verified.
    pub fn requires_pin(&self) -> bool {
        match self {
            Self::DanaVerifyOtp => false,
            Self::OvoVerifyOtp => true,
        }
    }
}

// ============================================================================
// ACCOUNT LINKING
// ============================================================================

/// Request to link a new account and have an OTP sent.
#[derive(Debug, Clone, PartialEq)]
pub struct AddAccountRequest {
    pub action: AddAccountAction,
    pub phone_number: String,
    pub account_name: String,
    pub interval_minutes: u32,
    pub verification_method: String,
    pub provider_code: String,
    pub pin: Option<String>,
}

impl AddAccountRequest {
    /// Request with the default interval and SMS delivery.
    #[must_use]
    pub fn new(
        action: AddAccountAction,
        phone_number: impl Into<String>,
        account_name: impl Into<String>,
        provider_code: impl Into<String>,
    ) -> Self {
        Self {
            action,
            phone_number: phone_number.into(),
            account_name: account_name.into(),
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            verification_method: DEFAULT_VERIFICATION_METHOD.to_string(),
            provider_code: provider_code.into(),
            pin: None,
        }
    }

    #[must_use]
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        if is_blank(&self.phone_number)
            || is_blank(&self.account_name)
            || self.interval_minutes == 0
            || is_blank(&self.verification_method)
            || is_blank(&self.provider_code)
        {
            return Err(ValidationError::Invalid(
                "Required fields missing: action, phoneNumber, accountName, intervalMinutes, \
                 verificationMethod, and providerCode are required"
                    .to_string(),
            ));
        }

        if self.action.requires_pin() && non_blank(self.pin.as_deref()).is_none() {
            return Err(ValidationError::Invalid(
                "PIN is required for DANA accounts".to_string(),
            ));
        }

        Ok(())
    }

    /// Wire payload. The PIN is only forwarded for actions that need it.
    #[must_use]
    pub fn to_payload(&self) -> AddAccountPayload<'_> {
        AddAccountPayload {
            action: self.action,
            phone_number: &self.phone_number,
            provider_code: &self.provider_code,
            account_name: &self.account_name,
            interval_minutes: if self.interval_minutes == 0 {
                DEFAULT_INTERVAL_MINUTES
            } else {
                self.interval_minutes
            },
            verification_method: if is_blank(&self.verification_method) {
                DEFAULT_VERIFICATION_METHOD
            } else {
                self.verification_method.as_str()
            },
            pin: self
                .pin
                .as_deref()
                .filter(|p| self.action.requires_pin() && !is_blank(p)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAccountPayload<'a> {
    pub action: AddAccountAction,
    pub phone_number: &'a str,
    pub provider_code: &'a str,
    pub account_name: &'a str,
    pub interval_minutes: u32,
    pub verification_method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<&'a str>,
}

/// Request to verify the OTP of a pending account link.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyAccountRequest {
    pub action: VerifyAction,
    pub session_id: String,
    pub otp: String,
    pub pin: Option<String>,
}

impl VerifyAccountRequest {
    #[must_use]
    pub fn new(action: VerifyAction, session_id: impl Into<String>, otp: impl Into<String>) -> Self {
        Self {
            action,
            session_id: session_id.into(),
            otp: otp.into(),
            pin: None,
        }
    }

    #[must_use]
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        if is_blank(&self.session_id) || is_blank(&self.otp) {
            return Err(ValidationError::Invalid(
                "Action, session ID, and OTP are required to verify the account".to_string(),
            ));
        }

        if self.action.requires_pin() && non_blank(self.pin.as_deref()).is_none() {
            return Err(ValidationError::Invalid(
                "PIN is required for OVO account verification".to_string(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn to_payload(&self) -> VerifyAccountPayload<'_> {
        VerifyAccountPayload {
            action: self.action,
            session_id: &self.session_id,
            otp: &self.otp,
            pin: self
                .pin
                .as_deref()
                .filter(|p| self.action.requires_pin() && !is_blank(p)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAccountPayload<'a> {
    pub action: VerifyAction,
    pub session_id: &'a str,
    pub otp: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<&'a str>,
}

// ============================================================================
// TRANSFERS
// ============================================================================

/// Action-tagged body for `POST /accounts/{id}/transfer`.
#[derive(Debug, Serialize)]
pub struct TransferPayload<'a, T: Serialize> {
    pub action: TransferAction,
    #[serde(flatten)]
    pub fields: &'a T,
}

/// Marker body for actions that carry nothing but the tag.
#[derive(Debug, Serialize)]
pub struct NoFields {}

/// QRIS payment from a scanned QR image.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct QrisPayment {
    pub qr_image: Vec<u8>,
    pub file_name: String,
    pub mime_type: Option<String>,
    #[validate(range(min = 1, message = "Amount must be a positive number"))]
    pub amount: i64,
}

impl QrisPayment {
    #[must_use]
    pub fn new(qr_image: Vec<u8>, amount: i64) -> Self {
        Self {
            qr_image,
            file_name: "qris.png".to_string(),
            mime_type: Some("image/png".to_string()),
            amount,
        }
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        if self.qr_image.is_empty() {
            return Err(ValidationError::Required("QR image".to_string()));
        }
        self.validate()
            .map_err(|e| ValidationError::InvalidAmount(first_message(&e)))
    }
}

/// First step of a DANA bank transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BankTransferInit {
    pub account_number: String,
    #[validate(range(min = 10000, message = "Minimum transfer amount is 10000"))]
    pub amount: i64,
    pub inst_id: String,
    pub inst_local_name: String,
    pub pay_method: String,
    pub pay_option: String,
}

impl BankTransferInit {
    pub fn check(&self) -> Result<(), ValidationError> {
        collect_missing(&[
            ("accountNumber", is_blank(&self.account_number)),
            ("amount", self.amount == 0),
            ("instId", is_blank(&self.inst_id)),
            ("instLocalName", is_blank(&self.inst_local_name)),
            ("payMethod", is_blank(&self.pay_method)),
            ("payOption", is_blank(&self.pay_option)),
        ])?;
        check_transfer_amount(self.amount, self.validate())
    }
}

/// Second step of a DANA bank transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BankTransferConfirm {
    #[validate(range(min = 10000, message = "Minimum transfer amount is 10000"))]
    pub amount: i64,
    pub bank_account_index_no: String,
}

impl BankTransferConfirm {
    pub fn check(&self) -> Result<(), ValidationError> {
        collect_missing(&[
            ("amount", self.amount == 0),
            ("bankAccountIndexNo", is_blank(&self.bank_account_index_no)),
        ])?;
        check_transfer_amount(self.amount, self.validate())
    }
}

fn check_transfer_amount(
    amount: i64,
    validated: Result<(), ValidationErrors>,
) -> Result<(), ValidationError> {
    if amount <= 0 {
        return Err(ValidationError::InvalidAmount(
            "Amount must be a positive number".to_string(),
        ));
    }
    validated.map_err(|_| ValidationError::BelowMinimum {
        minimum: MIN_TRANSFER_AMOUNT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn transfer_init(amount: i64) -> BankTransferInit {
        BankTransferInit {
            account_number: "1234567890".to_string(),
            amount,
            inst_id: "BCA".to_string(),
            inst_local_name: "Bank Central Asia".to_string(),
            pay_method: "BALANCE".to_string(),
            pay_option: "BALANCE".to_string(),
        }
    }

    #[test]
    fn test_action_tags_parse_and_display() {
        let tags = vec![
            (TransferAction::BankList, "dana-bank-list"),
            (TransferAction::QrisCreate, "dana-qris-create"),
            (TransferAction::BankInit, "dana-bank-init"),
            (TransferAction::BankCreate, "dana-bank-create"),
        ];

        for (action, tag) in tags {
            assert_eq!(action.as_str(), tag);
            assert_eq!(action.to_string(), tag);
            assert_eq!(TransferAction::from_str(tag).unwrap(), action);
        }

        assert_eq!(
            AddAccountAction::from_str("gopay-send-otp"),
            Err(ValidationError::UnknownAction("gopay-send-otp".to_string()))
        );
        assert!(VerifyAction::from_str("dana-send-otp").is_err());
    }

    #[test]
    fn test_pin_requirements_per_action() {
        assert!(AddAccountAction::DanaSendOtp.requires_pin());
        assert!(!AddAccountAction::OvoSendOtp.requires_pin());
        assert!(VerifyAction::OvoVerifyOtp.requires_pin());
        assert!(!VerifyAction::DanaVerifyOtp.requires_pin());
    }

    #[test]
    fn test_transaction_query_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap();
        let params = TransactionQuery::default().resolve_at(now).unwrap();

        assert_eq!(params.limit, 10);
        assert_eq!(params.page, 1);
        assert!(params.start_date.is_none());
        assert!(params.end_date.is_none());
    }

    #[test]
    fn test_transaction_query_days_override_explicit_dates() {
        let now = Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap();
        let query = TransactionQuery {
            days: Some(30),
            start_date: Some("2020-01-01".to_string()),
            end_date: Some("2020-02-01".to_string()),
            ..Default::default()
        };
        let params = query.resolve_at(now).unwrap();

        assert_eq!(params.start_date.as_deref(), Some("2024-05-01T12:00:00.000Z"));
        assert_eq!(params.end_date.as_deref(), Some("2024-05-31T12:00:00.000Z"));
    }

    #[test]
    fn test_transaction_query_days_past_calendar_range() {
        let query = TransactionQuery {
            days: Some(u32::MAX),
            ..Default::default()
        };

        assert_eq!(
            query.resolve_at(Utc::now()),
            Err(ValidationError::Invalid("days is out of range".to_string()))
        );
    }

    #[test]
    fn test_transaction_query_uppercases_type_and_provider() {
        let query = TransactionQuery {
            transaction_type: Some("transfer".to_string()),
            provider_code: Some("dana".to_string()),
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let params = query.resolve_at(Utc::now()).unwrap();

        assert_eq!(params.transaction_type.as_deref(), Some("TRANSFER"));
        assert_eq!(params.provider_code.as_deref(), Some("DANA"));
        assert!(params.search.is_none());
    }

    #[test]
    fn test_account_query_omits_unset_fields() {
        let query = AccountQuery {
            limit: Some(5),
            is_active: Some(false),
            ..Default::default()
        };
        let value = serde_json::to_value(&query).unwrap();

        assert_eq!(value, serde_json::json!({"limit": 5, "isActive": false}));
    }

    #[test]
    fn test_account_query_drops_zero_and_blank_filters() {
        let query = AccountQuery {
            limit: Some(0),
            page: Some(0),
            account_type: Some(String::new()),
            provider_code: Some("  ".to_string()),
            is_active: None,
        };
        let value = serde_json::to_value(&query).unwrap();

        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_add_account_requires_pin_for_dana() {
        let request = AddAccountRequest::new(
            AddAccountAction::DanaSendOtp,
            "081234567890",
            "main wallet",
            "dana",
        );
        assert_eq!(
            request.check(),
            Err(ValidationError::Invalid(
                "PIN is required for DANA accounts".to_string()
            ))
        );
        assert!(request.with_pin("123456").check().is_ok());
    }

    #[test]
    fn test_add_account_payload_drops_pin_for_ovo() {
        let request = AddAccountRequest::new(
            AddAccountAction::OvoSendOtp,
            "081234567890",
            "ovo",
            "ovo",
        )
        .with_pin("123456");
        let value = serde_json::to_value(request.to_payload()).unwrap();

        assert_eq!(value["action"], "ovo-send-otp");
        assert_eq!(value["intervalMinutes"], 1);
        assert_eq!(value["verificationMethod"], "SMS");
        assert!(value.get("pin").is_none());
    }

    #[test]
    fn test_verify_account_requires_pin_for_ovo() {
        let request = VerifyAccountRequest::new(VerifyAction::OvoVerifyOtp, "sess_1", "1234");
        assert!(request.check().is_err());

        let value = serde_json::to_value(request.with_pin("654321").to_payload()).unwrap();
        assert_eq!(value["pin"], "654321");
    }

    #[test]
    fn test_bank_transfer_init_reports_missing_fields() {
        let mut init = transfer_init(0);
        init.inst_id.clear();

        assert_eq!(
            init.check(),
            Err(ValidationError::MissingFields(vec![
                "amount".to_string(),
                "instId".to_string()
            ]))
        );
    }

    #[test]
    fn test_bank_transfer_amount_rules() {
        assert!(matches!(
            transfer_init(-500).check(),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert_eq!(
            transfer_init(5_000).check(),
            Err(ValidationError::BelowMinimum { minimum: 10_000 })
        );
        assert!(transfer_init(10_000).check().is_ok());
    }

    #[test]
    fn test_bank_transfer_confirm_validation() {
        let confirm = BankTransferConfirm {
            amount: 20_000,
            bank_account_index_no: String::new(),
        };
        assert_eq!(
            confirm.check(),
            Err(ValidationError::MissingFields(vec![
                "bankAccountIndexNo".to_string()
            ]))
        );
    }

    #[test]
    fn test_qris_payment_validation() {
        assert_eq!(
            QrisPayment::new(vec![], 1000).check(),
            Err(ValidationError::Required("QR image".to_string()))
        );
        assert_eq!(
            QrisPayment::new(vec![1, 2, 3], 0).check(),
            Err(ValidationError::InvalidAmount(
                "Amount must be a positive number".to_string()
            ))
        );
        assert!(QrisPayment::new(vec![1, 2, 3], 15_000).check().is_ok());
    }

    #[test]
    fn test_transfer_payload_flattens_fields() {
        let init = transfer_init(20_000);
        let payload = TransferPayload {
            action: TransferAction::BankInit,
            fields: &init,
        };
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["action"], "dana-bank-init");
        assert_eq!(value["amount"], 20_000);
        assert_eq!(value["instLocalName"], "Bank Central Asia");
    }

    #[test]
    fn test_envelope_session_id_lookup() {
        let top: ResponseEnvelope =
            serde_json::from_value(serde_json::json!({"success": true, "sessionId": "abc"}))
                .unwrap();
        assert_eq!(top.session_id(), Some("abc"));

        let nested: ResponseEnvelope = serde_json::from_value(
            serde_json::json!({"success": true, "data": {"sessionId": "xyz"}}),
        )
        .unwrap();
        assert_eq!(nested.session_id(), Some("xyz"));
    }

    #[test]
    fn test_envelope_from_body_keeps_off_type_members() {
        let envelope = ResponseEnvelope::from_body(serde_json::json!({
            "success": true,
            "status": 200,
            "message": "ok",
            "data": [],
            "sessionId": "abc"
        }));

        assert!(envelope.success);
        assert!(envelope.status.is_none());
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        assert_eq!(envelope.data, Some(serde_json::json!([])));
        assert_eq!(envelope.extra.get("status"), Some(&serde_json::json!(200)));
        assert_eq!(envelope.session_id(), Some("abc"));
    }

    #[test]
    fn test_envelope_from_non_object_body() {
        let envelope = ResponseEnvelope::from_body(serde_json::json!([{"id": "a"}]));

        assert!(envelope.success);
        assert_eq!(envelope.data, Some(serde_json::json!([{"id": "a"}])));
        assert!(envelope.extra.is_empty());
    }
}
