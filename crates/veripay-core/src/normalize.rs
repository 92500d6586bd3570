//! Result normalization.
//!
//! Maps a provider's extracted field set onto the canonical receipt and
//! enforces the provider's mandatory-field subset. The check runs over
//! what was actually extracted, so one failed rule fails the whole
//! verification with the field named rather than yielding a receipt with
//! silent holes.

use tracing::debug;

use crate::error::{Result, VerifyError};
use crate::models::Receipt;
use crate::providers::ProviderSpec;
use crate::rules::{ExtractedFields, FieldKey};

/// Build the canonical receipt, failing with `FieldsIncomplete` if any
/// mandatory field is absent.
pub fn build_receipt(spec: &ProviderSpec, fields: &ExtractedFields) -> Result<Receipt> {
    let missing: Vec<&str> = spec
        .mandatory
        .iter()
        .filter(|key| fields.get(**key).is_none())
        .map(|key| key.name())
        .collect();

    if !missing.is_empty() {
        return Err(VerifyError::FieldsIncomplete(missing.join(", ")));
    }

    let mut receipt = Receipt::empty(spec.provider);
    receipt.payer = fields.text(FieldKey::Payer).map(str::to_string);
    receipt.payer_account = fields.text(FieldKey::PayerAccount).map(str::to_string);
    receipt.receiver = fields.text(FieldKey::Receiver).map(str::to_string);
    receipt.receiver_account = fields.text(FieldKey::ReceiverAccount).map(str::to_string);
    receipt.amount = fields.amount(FieldKey::Amount);
    receipt.date = fields.date(FieldKey::Date);
    receipt.reference = fields.text(FieldKey::Reference).map(str::to_string);
    receipt.reason = fields.text(FieldKey::Reason).map(str::to_string);
    receipt.service_charge = fields.amount(FieldKey::ServiceCharge);
    receipt.vat = fields.amount(FieldKey::Vat);
    receipt.total_amount = fields.amount(FieldKey::TotalAmount);

    debug!(provider = %spec.provider, reference = ?receipt.reference, "Receipt normalized");
    Ok(receipt)
}
