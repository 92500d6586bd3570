//! Canonical verification output.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, VerifyError};
use crate::models::request::Provider;

/// The normalized, provider-agnostic receipt field set.
///
/// Which fields are guaranteed present depends on the provider's
/// mandatory-field subset; optional fields are absent rather than
/// defaulted, so a missing amount is never confusable with a zero one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Provider that answered.
    pub provider: Provider,

    /// Name of the paying party.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,

    /// Paying party's account, exactly as printed (masking preserved).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_account: Option<String>,

    /// Name of the receiving party.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,

    /// Receiving party's account, exactly as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_account: Option<String>,

    /// Transferred amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Payment date and time as printed on the receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,

    /// Transaction reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Narrative / purpose string, where the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Service charge or commission, where reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_charge: Option<Decimal>,

    /// VAT on the service charge, where reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat: Option<Decimal>,

    /// Total amount debited including charges, where reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
}

impl Receipt {
    pub fn empty(provider: Provider) -> Self {
        Self {
            provider,
            payer: None,
            payer_account: None,
            receiver: None,
            receiver_account: None,
            amount: None,
            date: None,
            reference: None,
            reason: None,
            service_charge: None,
            vat: None,
            total_amount: None,
        }
    }
}

/// Final outcome of a verification request.
///
/// Constructed once at the end of the pipeline and immutable thereafter.
/// The shape is identical on every path: `success` plus either the full
/// canonical receipt or a classified error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the receipt was located and all mandatory fields parsed.
    pub success: bool,

    /// Canonical receipt, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,

    /// Human-readable error, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Machine-readable error classification, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl VerificationResult {
    pub fn verified(receipt: Receipt) -> Self {
        Self {
            success: true,
            receipt: Some(receipt),
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(error: &VerifyError) -> Self {
        Self {
            success: false,
            receipt: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }
}
