use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Domain representation of a marketplace-facing catalog product.
///
/// Distinct from [`crate::domain::digital_product::DigitalProduct`]: a
/// product is what buyers see, optionally backed by one stock SKU.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Stock SKU backing this product, if any.
    pub digital_product_id: Option<i32>,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional stock keeping unit identifier.
    pub sku: Option<String>,
    /// Optional brand shown on the storefront.
    pub brand: Option<String>,
    /// Optional longer description shown to buyers.
    pub description: Option<String>,
    /// Selling price in the smallest currency unit.
    pub selling_price_cents: i64,
    /// ISO 4217 currency code associated with the price.
    pub currency: String,
    /// Flag indicating whether the product has been archived.
    pub is_archived: bool,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product for a hub.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Stock SKU backing this product, if any.
    pub digital_product_id: Option<i32>,
    pub name: String,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    /// Selling price in the smallest currency unit.
    pub selling_price_cents: i64,
    pub currency: String,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(
        hub_id: i32,
        name: impl Into<String>,
        selling_price_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            digital_product_id: None,
            name: name.into(),
            sku: None,
            brand: None,
            description: None,
            selling_price_cents,
            currency: currency.into(),
            updated_at: now,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn backed_by(mut self, digital_product_id: i32) -> Self {
        self.digital_product_id = Some(digital_product_id);
        self
    }
}

/// Patch data applied when updating an existing product.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub sku: Option<Option<String>>,
    pub brand: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub selling_price_cents: Option<i64>,
    pub currency: Option<String>,
    pub is_archived: Option<bool>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: None,
            sku: None,
            brand: None,
            description: None,
            selling_price_cents: None,
            currency: None,
            is_archived: None,
            updated_at: now,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sku(mut self, sku: Option<impl Into<String>>) -> Self {
        self.sku = Some(sku.map(|value| value.into()));
        self
    }

    pub fn brand(mut self, brand: Option<impl Into<String>>) -> Self {
        self.brand = Some(brand.map(|value| value.into()));
        self
    }

    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    pub fn selling_price_cents(mut self, cents: i64) -> Self {
        self.selling_price_cents = Some(cents);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn archived(mut self, is_archived: bool) -> Self {
        self.is_archived = Some(is_archived);
        self
    }
}

/// Query definition used to list products for a hub.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Optional exact SKU filter.
    pub sku: Option<String>,
    /// Whether archived products should be included in the results.
    pub include_archived: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets all products belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            sku: None,
            include_archived: false,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results by an exact SKU match.
    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Include archived products in the results.
    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
