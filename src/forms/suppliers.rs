use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::supplier::{NewSupplier, UpdateSupplier};
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for a supplier name.
const NAME_MAX_LEN: u64 = 255;

/// Result type returned by the supplier form helpers.
pub type SupplierFormResult<T> = Result<T, SupplierFormError>;

/// Errors that can occur while processing supplier forms.
#[derive(Debug, Error)]
pub enum SupplierFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("supplier name cannot be empty")]
    EmptyName,
}

/// Form payload emitted when submitting the "Add supplier" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddSupplierForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(email)]
    #[serde(default, deserialize_with = "crate::forms::empty_to_none")]
    pub email: Option<String>,
    #[validate(url)]
    #[serde(default, deserialize_with = "crate::forms::empty_to_none")]
    pub website: Option<String>,
}

impl AddSupplierForm {
    /// Validates and sanitizes the payload into a domain `NewSupplier`.
    pub fn into_new_supplier(self, hub_id: i32) -> SupplierFormResult<NewSupplier> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(SupplierFormError::EmptyName);
        }

        let mut new_supplier = NewSupplier::new(hub_id, sanitized_name);
        if let Some(email) = self.email.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            new_supplier = new_supplier.with_email(email);
        }
        if let Some(website) = self
            .website
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            new_supplier = new_supplier.with_website(website);
        }

        Ok(new_supplier)
    }
}

/// Form payload emitted when submitting the "Edit supplier" form.
#[derive(Debug, Deserialize, Validate)]
pub struct EditSupplierForm {
    pub id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(email)]
    #[serde(default, deserialize_with = "crate::forms::empty_to_none")]
    pub email: Option<String>,
    #[validate(url)]
    #[serde(default, deserialize_with = "crate::forms::empty_to_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
}

impl EditSupplierForm {
    /// Validates and sanitizes the payload into a domain `UpdateSupplier`.
    pub fn into_update_supplier(self) -> SupplierFormResult<UpdateSupplier> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(SupplierFormError::EmptyName);
        }

        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let website = self
            .website
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(UpdateSupplier::new()
            .name(sanitized_name)
            .email(email)
            .website(website)
            .archived(self.is_archived))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_builds_domain_payload() {
        let form = AddSupplierForm {
            name: "  Acme   Digital ".to_string(),
            email: Some("sales@acme.example".to_string()),
            website: Some("https://acme.example".to_string()),
        };

        let new_supplier = form.into_new_supplier(4).expect("form should validate");

        assert_eq!(new_supplier.hub_id, 4);
        assert_eq!(new_supplier.name, "Acme Digital");
        assert_eq!(new_supplier.email.as_deref(), Some("sales@acme.example"));
    }

    #[test]
    fn add_form_rejects_invalid_email() {
        let form = AddSupplierForm {
            name: "Acme".to_string(),
            email: Some("not-an-email".to_string()),
            website: None,
        };

        assert!(matches!(
            form.into_new_supplier(1),
            Err(SupplierFormError::Validation(_))
        ));
    }

    #[test]
    fn edit_form_clears_blank_optionals() {
        let form = EditSupplierForm {
            id: 2,
            name: "Acme".to_string(),
            email: None,
            website: None,
            is_archived: true,
        };

        let updates = form.into_update_supplier().expect("form should validate");

        assert_eq!(updates.email, Some(None));
        assert_eq!(updates.website, Some(None));
        assert_eq!(updates.is_archived, Some(true));
    }

    #[test]
    fn whitespace_only_name_is_rejected() {
        let form = AddSupplierForm {
            name: "   ".to_string(),
            email: None,
            website: None,
        };

        assert!(matches!(
            form.into_new_supplier(1),
            Err(SupplierFormError::Validation(_)) | Err(SupplierFormError::EmptyName)
        ));
    }
}
