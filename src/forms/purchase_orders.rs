use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::purchase_order::{NewPurchaseOrder, PurchaseOrderStatus, UpdatePurchaseOrder};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for an order reference.
const REFERENCE_MAX_LEN: u64 = 100;

/// Result type returned by the purchase order form helpers.
pub type PurchaseOrderFormResult<T> = Result<T, PurchaseOrderFormError>;

/// Errors that can occur while processing purchase order forms.
#[derive(Debug, Error)]
pub enum PurchaseOrderFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// Quantity must be at least one unit.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    /// The provided unit cost could not be parsed as a non-negative amount.
    #[error("invalid unit cost `{value}`")]
    InvalidUnitCost { value: String },
    /// The provided currency code is invalid.
    #[error("invalid currency code `{value}`")]
    InvalidCurrency { value: String },
    /// The provided status is not a known lifecycle state.
    #[error("unknown status `{value}`")]
    UnknownStatus { value: String },
}

/// Form payload emitted when submitting the "Add purchase order" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddPurchaseOrderForm {
    pub supplier_id: i32,
    #[serde(default, deserialize_with = "crate::forms::empty_to_none_i32")]
    pub digital_product_id: Option<i32>,
    #[validate(length(max = REFERENCE_MAX_LEN))]
    #[serde(default)]
    pub reference: Option<String>,
    pub quantity: i32,
    /// Cost per unit as entered, e.g. `9.50`.
    pub unit_cost: String,
    pub currency: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AddPurchaseOrderForm {
    /// Validates and sanitizes the payload into a domain `NewPurchaseOrder`.
    ///
    /// The order total is derived from the quantity and unit cost; it is
    /// never accepted from the client.
    pub fn into_new_purchase_order(self, hub_id: i32) -> PurchaseOrderFormResult<NewPurchaseOrder> {
        self.validate()?;

        if self.quantity < 1 {
            return Err(PurchaseOrderFormError::InvalidQuantity);
        }

        let unit_cost_cents = parse_unit_cost(&self.unit_cost)?;
        let currency = sanitize_currency(&self.currency)?;

        let mut new_order =
            NewPurchaseOrder::new(hub_id, self.supplier_id, self.quantity, unit_cost_cents, currency);

        if let Some(digital_product_id) = self.digital_product_id {
            new_order = new_order.for_digital_product(digital_product_id);
        }
        if let Some(reference) = self
            .reference
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|v| !v.is_empty())
        {
            new_order = new_order.with_reference(reference);
        }
        if let Some(notes) = self
            .notes
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|v| !v.is_empty())
        {
            new_order = new_order.with_notes(notes);
        }

        Ok(new_order)
    }
}

/// Form payload emitted when submitting the "Edit purchase order" form.
///
/// Quantities and costs are fixed once the order is placed; only the
/// lifecycle status, reference and notes can change.
#[derive(Debug, Deserialize, Validate)]
pub struct EditPurchaseOrderForm {
    pub id: i32,
    pub status: String,
    #[validate(length(max = REFERENCE_MAX_LEN))]
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EditPurchaseOrderForm {
    /// Validates and sanitizes the payload into a domain `UpdatePurchaseOrder`.
    pub fn into_update_purchase_order(self) -> PurchaseOrderFormResult<UpdatePurchaseOrder> {
        self.validate()?;

        let status = PurchaseOrderStatus::parse(self.status.trim()).ok_or_else(|| {
            PurchaseOrderFormError::UnknownStatus {
                value: self.status.trim().to_string(),
            }
        })?;

        let reference = self
            .reference
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|v| !v.is_empty());
        let notes = self
            .notes
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|v| !v.is_empty());

        Ok(UpdatePurchaseOrder::new()
            .status(status)
            .reference(reference)
            .notes(notes))
    }
}

fn parse_unit_cost(raw: &str) -> PurchaseOrderFormResult<i64> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| PurchaseOrderFormError::InvalidUnitCost {
            value: trimmed.to_string(),
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(PurchaseOrderFormError::InvalidUnitCost {
            value: trimmed.to_string(),
        });
    }
    Ok((value * 100.0).round() as i64)
}

fn sanitize_currency(input: &str) -> PurchaseOrderFormResult<String> {
    let trimmed = input.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(PurchaseOrderFormError::InvalidCurrency {
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_ascii_uppercase())
}
