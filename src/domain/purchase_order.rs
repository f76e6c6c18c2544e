use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Possible lifecycle states for a purchase order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    /// Order has been placed with the supplier but stock not yet received.
    Pending,
    /// Stock (voucher codes) has been received and imported.
    Received,
    /// Order was cancelled before fulfilment.
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "pending",
            PurchaseOrderStatus::Received => "received",
            PurchaseOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PurchaseOrderStatus::Pending),
            "received" => Some(PurchaseOrderStatus::Received),
            "cancelled" => Some(PurchaseOrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl Default for PurchaseOrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Domain representation of a stock purchase from a supplier.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PurchaseOrder {
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Supplier the stock was purchased from.
    pub supplier_id: i32,
    /// SKU the order is for, when known at creation time.
    pub digital_product_id: Option<i32>,
    /// External human-friendly reference for the order.
    pub reference: Option<String>,
    pub status: PurchaseOrderStatus,
    /// Number of units (voucher codes) purchased.
    pub quantity: i32,
    /// Cost per unit in the smallest currency unit.
    pub unit_cost_cents: i64,
    /// Total amount in the smallest currency unit.
    pub total_cents: i64,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new purchase order for a hub.
#[derive(Debug, Clone)]
pub struct NewPurchaseOrder {
    pub hub_id: i32,
    pub supplier_id: i32,
    pub digital_product_id: Option<i32>,
    pub reference: Option<String>,
    pub status: PurchaseOrderStatus,
    pub quantity: i32,
    pub unit_cost_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewPurchaseOrder {
    /// Build a new purchase order payload; the total is derived from the
    /// quantity and unit cost.
    pub fn new(
        hub_id: i32,
        supplier_id: i32,
        quantity: i32,
        unit_cost_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            supplier_id,
            digital_product_id: None,
            reference: None,
            status: PurchaseOrderStatus::default(),
            quantity,
            unit_cost_cents,
            total_cents: unit_cost_cents * quantity as i64,
            currency: currency.into(),
            notes: None,
            updated_at: now,
        }
    }

    pub fn for_digital_product(mut self, digital_product_id: i32) -> Self {
        self.digital_product_id = Some(digital_product_id);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Patch data applied when updating an existing purchase order.
#[derive(Debug, Clone)]
pub struct UpdatePurchaseOrder {
    pub status: Option<PurchaseOrderStatus>,
    pub reference: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdatePurchaseOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdatePurchaseOrder {
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            status: None,
            reference: None,
            notes: None,
            updated_at: now,
        }
    }

    pub fn status(mut self, status: PurchaseOrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn reference(mut self, reference: Option<impl Into<String>>) -> Self {
        self.reference = Some(reference.map(|value| value.into()));
        self
    }

    pub fn notes(mut self, notes: Option<impl Into<String>>) -> Self {
        self.notes = Some(notes.map(|value| value.into()));
        self
    }
}

/// Query definition used to list purchase orders for a hub.
#[derive(Debug, Clone)]
pub struct PurchaseOrderListQuery {
    pub hub_id: i32,
    /// Optional reference or notes search term.
    pub search: Option<String>,
    pub supplier_id: Option<i32>,
    pub status: Option<PurchaseOrderStatus>,
    pub pagination: Option<Pagination>,
}

impl PurchaseOrderListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            supplier_id: None,
            status: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn supplier(mut self, supplier_id: i32) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn status(mut self, status: PurchaseOrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
