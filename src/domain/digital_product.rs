use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Whether a stock item is offered for sale.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DigitalProductStatus {
    Active,
    InActive,
}

impl DigitalProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DigitalProductStatus::Active => "active",
            DigitalProductStatus::InActive => "in_active",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(DigitalProductStatus::Active),
            "in_active" => Some(DigitalProductStatus::InActive),
            _ => None,
        }
    }
}

impl Default for DigitalProductStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Domain representation of a supplier-sourced SKU (for example a gift
/// card denomination) held as digital stock by a hub.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DigitalProduct {
    /// Unique identifier of the stock item.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Supplier this SKU is sourced from.
    pub supplier_id: i32,
    /// Human-readable name of the stock item.
    pub name: String,
    /// Stock keeping unit identifier.
    pub sku: String,
    /// Optional brand the SKU belongs to.
    pub brand: Option<String>,
    /// Optional longer description shown to operators.
    pub description: Option<String>,
    /// Free-form tags attached to the item.
    pub tags: Vec<String>,
    /// Optional image URL.
    pub image: Option<String>,
    /// Purchase cost in the smallest currency unit.
    pub cost_price_cents: i64,
    /// Face value in the smallest currency unit.
    pub face_value_cents: i64,
    /// Current selling price in the smallest currency unit.
    pub selling_price_cents: i64,
    /// Whether the item is offered for sale.
    pub status: DigitalProductStatus,
    /// Regions the item can be redeemed in.
    pub regions: Vec<String>,
    /// Optional free-form metadata attached at import time.
    pub metadata: Option<serde_json::Value>,
    /// ISO 4217 currency code for all money fields.
    pub currency: String,
    /// Timestamp for when the record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new digital product for a hub.
#[derive(Debug, Clone)]
pub struct NewDigitalProduct {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Supplier this SKU is sourced from.
    pub supplier_id: i32,
    pub name: String,
    pub sku: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub cost_price_cents: i64,
    pub face_value_cents: i64,
    pub selling_price_cents: i64,
    pub status: DigitalProductStatus,
    pub regions: Vec<String>,
    pub metadata: Option<serde_json::Value>,
    pub currency: String,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewDigitalProduct {
    /// Build a new stock payload with the supplied details and current timestamp.
    pub fn new(
        hub_id: i32,
        supplier_id: i32,
        name: impl Into<String>,
        sku: impl Into<String>,
        cost_price_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            supplier_id,
            name: name.into(),
            sku: sku.into(),
            brand: None,
            description: None,
            tags: Vec::new(),
            image: None,
            cost_price_cents,
            face_value_cents: 0,
            selling_price_cents: 0,
            status: DigitalProductStatus::default(),
            regions: Vec::new(),
            metadata: None,
            currency: currency.into(),
            updated_at: now,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_prices(mut self, face_value_cents: i64, selling_price_cents: i64) -> Self {
        self.face_value_cents = face_value_cents;
        self.selling_price_cents = selling_price_cents;
        self
    }

    pub fn with_status(mut self, status: DigitalProductStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Patch data applied when updating an existing digital product.
#[derive(Debug, Clone)]
pub struct UpdateDigitalProduct {
    pub name: Option<String>,
    pub brand: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub image: Option<Option<String>>,
    pub cost_price_cents: Option<i64>,
    pub face_value_cents: Option<i64>,
    pub selling_price_cents: Option<i64>,
    pub status: Option<DigitalProductStatus>,
    pub regions: Option<Vec<String>>,
    pub metadata: Option<Option<serde_json::Value>>,
    pub currency: Option<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateDigitalProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateDigitalProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: None,
            brand: None,
            description: None,
            tags: None,
            image: None,
            cost_price_cents: None,
            face_value_cents: None,
            selling_price_cents: None,
            status: None,
            regions: None,
            metadata: None,
            currency: None,
            updated_at: now,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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

    pub fn status(mut self, status: DigitalProductStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Query definition used to list digital products for a hub.
#[derive(Debug, Clone)]
pub struct DigitalProductListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional name, SKU or brand search term.
    pub search: Option<String>,
    /// Optional supplier filter.
    pub supplier_id: Option<i32>,
    /// Optional status filter.
    pub status: Option<DigitalProductStatus>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl DigitalProductListQuery {
    /// Construct a query that targets all digital products belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            supplier_id: None,
            status: None,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to name, SKU or brand.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results to a single supplier.
    pub fn supplier(mut self, supplier_id: i32) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// Filter the results by status.
    pub fn status(mut self, status: DigitalProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
