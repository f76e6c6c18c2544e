use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: u64 = 255;

/// Maximum allowed length for a SKU.
const SKU_MAX_LEN: u64 = 100;

/// ISO 4217 currency codes are three ASCII alphabetic characters.
const CURRENCY_CODE_LEN: u64 = 3;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing catalog product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The provided currency code is invalid.
    #[error("invalid currency code `{value}`")]
    InvalidCurrency { value: String },
    /// The provided price could not be parsed as a non-negative amount.
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
}

/// Form payload emitted when submitting the "Add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = SKU_MAX_LEN))]
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Selling price as entered, e.g. `24.99`.
    pub selling_price: String,
    #[validate(length(equal = CURRENCY_CODE_LEN))]
    pub currency: String,
    /// Stock SKU backing this product, if any.
    #[serde(default, deserialize_with = "crate::forms::empty_to_none_i32")]
    pub digital_product_id: Option<i32>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self, hub_id: i32) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let selling_price_cents = parse_price(&self.selling_price)?;
        let currency = sanitize_currency(&self.currency)?;

        let mut new_product = NewProduct::new(hub_id, sanitized_name, selling_price_cents, currency);

        if let Some(sku) = self
            .sku
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|v| !v.is_empty())
        {
            new_product = new_product.with_sku(sku);
        }
        if let Some(brand) = self
            .brand
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|v| !v.is_empty())
        {
            new_product = new_product.with_brand(brand);
        }
        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|v| !v.is_empty())
        {
            new_product = new_product.with_description(description);
        }
        if let Some(digital_product_id) = self.digital_product_id {
            new_product = new_product.backed_by(digital_product_id);
        }

        Ok(new_product)
    }
}

/// Form payload emitted when submitting the "Edit product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    pub id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = SKU_MAX_LEN))]
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub selling_price: String,
    #[validate(length(equal = CURRENCY_CODE_LEN))]
    pub currency: String,
    #[serde(default)]
    pub is_archived: bool,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let selling_price_cents = parse_price(&self.selling_price)?;
        let currency = sanitize_currency(&self.currency)?;

        let sku = self
            .sku
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|v| !v.is_empty());
        let brand = self
            .brand
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|v| !v.is_empty());
        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|v| !v.is_empty());

        Ok(UpdateProduct::new()
            .name(sanitized_name)
            .sku(sku)
            .brand(brand)
            .description(description)
            .selling_price_cents(selling_price_cents)
            .currency(currency)
            .archived(self.is_archived))
    }
}

/// Parse an operator-entered decimal price into cents.
fn parse_price(raw: &str) -> ProductFormResult<i64> {
    let trimmed = raw.trim();
    let value: f64 = trimmed.parse().map_err(|_| ProductFormError::InvalidPrice {
        value: trimmed.to_string(),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ProductFormError::InvalidPrice {
            value: trimmed.to_string(),
        });
    }
    Ok((value * 100.0).round() as i64)
}

fn sanitize_currency(input: &str) -> ProductFormResult<String> {
    let trimmed = input.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ProductFormError::InvalidCurrency {
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form() -> AddProductForm {
        AddProductForm {
            name: "Gift Card 25".to_string(),
            sku: Some(" GC-25 ".to_string()),
            brand: Some("Acme".to_string()),
            description: Some("Redeemable online.\n\n\nNo expiry.".to_string()),
            selling_price: "24.99".to_string(),
            currency: "usd".to_string(),
            digital_product_id: Some(11),
        }
    }

    #[test]
    fn add_form_builds_domain_payload() {
        let new_product = add_form().into_new_product(2).expect("form should validate");

        assert_eq!(new_product.hub_id, 2);
        assert_eq!(new_product.selling_price_cents, 2499);
        assert_eq!(new_product.currency, "USD");
        assert_eq!(new_product.sku.as_deref(), Some("GC-25"));
        assert_eq!(new_product.digital_product_id, Some(11));
        assert_eq!(
            new_product.description.as_deref(),
            Some("Redeemable online.\n\nNo expiry.")
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut form = add_form();
        form.selling_price = "-5".to_string();

        assert!(matches!(
            form.into_new_product(1),
            Err(ProductFormError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn bad_currency_is_rejected() {
        let mut form = add_form();
        form.currency = "US1".to_string();

        assert!(matches!(
            form.into_new_product(1),
            Err(ProductFormError::InvalidCurrency { .. })
        ));
    }

    #[test]
    fn edit_form_produces_full_patch() {
        let form = EditProductForm {
            id: 9,
            name: "Gift Card 25".to_string(),
            sku: None,
            brand: None,
            description: None,
            selling_price: "20".to_string(),
            currency: "EUR".to_string(),
            is_archived: true,
        };

        let updates = form.into_update_product().expect("form should validate");

        assert_eq!(updates.selling_price_cents, Some(2000));
        assert_eq!(updates.sku, Some(None));
        assert_eq!(updates.is_archived, Some(true));
    }
}
