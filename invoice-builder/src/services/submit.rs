//! Draft validation and the two-step save against the backend.

use client_core::backend::models::{CreateInvoice, CreateLineItem, Invoice};
use client_core::backend::Backend;
use client_core::error::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::InvoiceDraft;

const CLIENT_REQUIRED: &str = "Please select a client before saving.";
const ITEMS_REQUIRED: &str = "Add at least one line item before saving.";
const TAX_RATE_RANGE: &str = "Tax rate must be between 0 and 100.";

fn validation_failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

impl Validate for InvoiceDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.client_id().is_none() {
            errors.add("client_id", validation_failure("required", CLIENT_REQUIRED));
        }
        if self.line_items().is_empty() {
            errors.add("line_items", validation_failure("length", ITEMS_REQUIRED));
        }
        if self.tax_rate() < Decimal::ZERO || self.tax_rate() > Decimal::ONE_HUNDRED {
            errors.add("tax_rate", validation_failure("range", TAX_RATE_RANGE));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Failure modes of [`submit_draft`].
///
/// The invoice row and its line items are separate backend commands, so a
/// save can fail after the invoice already exists. [`SubmitError::LineItems`]
/// reports how far it got.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Invoice creation failed: {source}")]
    CreateInvoice { source: AppError },
    #[error(
        "Invoice {} saved, but line item {} failed: {}",
        .invoice.invoice_number,
        .failed_index,
        .source
    )]
    LineItems {
        invoice: Box<Invoice>,
        failed_index: usize,
        source: AppError,
    },
}

/// Validate the draft, create the invoice, then append its line items in
/// draft order.
///
/// No rollback is attempted when an item fails; the created invoice is
/// reported back so the user can finish it elsewhere.
#[instrument(skip(backend, draft))]
pub async fn submit_draft(
    backend: &dyn Backend,
    draft: &InvoiceDraft,
) -> Result<Invoice, SubmitError> {
    draft.validate()?;
    let Some(client_id) = draft.client_id() else {
        let mut errors = ValidationErrors::new();
        errors.add("client_id", validation_failure("required", CLIENT_REQUIRED));
        return Err(errors.into());
    };

    let notes = (!draft.notes().is_empty()).then(|| draft.notes().to_string());
    let tax_rate = (draft.tax_rate() > Decimal::ZERO).then_some(draft.tax_rate());

    let invoice = backend
        .create_invoice(CreateInvoice {
            client_id,
            issue_date: draft.issue_date(),
            due_date: draft.due_date(),
            notes,
            tax_rate,
        })
        .await
        .map_err(|source| SubmitError::CreateInvoice { source })?;

    tracing::info!(
        invoice_number = %invoice.invoice_number,
        line_items = draft.line_items().len(),
        "invoice created, saving line items"
    );

    for (index, item) in draft.line_items().iter().enumerate() {
        let result = backend
            .add_line_item(CreateLineItem {
                invoice_id: invoice.id,
                description: item.description().to_string(),
                quantity: item.quantity(),
                unit_price: item.unit_price(),
                sort_order: item.sort_order(),
            })
            .await;

        if let Err(source) = result {
            tracing::error!(
                invoice_number = %invoice.invoice_number,
                failed_index = index,
                error = %source,
                "line item save failed, invoice left partially saved"
            );
            return Err(SubmitError::LineItems {
                invoice: Box::new(invoice),
                failed_index: index,
                source,
            });
        }
    }

    tracing::info!(invoice_number = %invoice.invoice_number, "invoice saved");
    Ok(invoice)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::LineItem;

    fn ready_draft() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.set_client_id(Some(Uuid::new_v4()));
        draft.add_line_item(LineItem::new("Design", Decimal::ONE, Decimal::ONE_HUNDRED, 0));
        draft
    }

    #[test]
    fn empty_draft_fails_validation() {
        let errors = InvoiceDraft::new()
            .validate()
            .expect_err("empty draft must fail");
        let fields = errors.field_errors();

        assert!(fields.contains_key("client_id"));
        assert!(fields.contains_key("line_items"));
        assert_eq!(
            fields["client_id"][0].message.as_deref(),
            Some("Please select a client before saving.")
        );
        assert_eq!(
            fields["line_items"][0].message.as_deref(),
            Some("Add at least one line item before saving.")
        );
    }

    #[test]
    fn tax_rate_must_stay_in_range() {
        let mut draft = ready_draft();

        draft.set_tax_rate(Decimal::from(150));
        let errors = draft.validate().expect_err("150% must fail");
        assert!(errors.field_errors().contains_key("tax_rate"));

        draft.set_tax_rate(Decimal::from(-1));
        assert!(draft.validate().is_err());

        draft.set_tax_rate(Decimal::ZERO);
        assert!(draft.validate().is_ok());

        draft.set_tax_rate(Decimal::ONE_HUNDRED);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn ready_draft_passes_validation() {
        assert!(ready_draft().validate().is_ok());
    }
}
