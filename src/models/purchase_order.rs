use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::purchase_order::{
    NewPurchaseOrder as DomainNewPurchaseOrder, PurchaseOrder as DomainPurchaseOrder,
    PurchaseOrderStatus, UpdatePurchaseOrder as DomainUpdatePurchaseOrder,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::purchase_orders)]
pub struct PurchaseOrder {
    pub id: i32,
    pub hub_id: i32,
    pub supplier_id: i32,
    pub digital_product_id: Option<i32>,
    pub reference: Option<String>,
    pub status: String,
    pub quantity: i32,
    pub unit_cost_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::purchase_orders)]
pub struct NewPurchaseOrder {
    pub hub_id: i32,
    pub supplier_id: i32,
    pub digital_product_id: Option<i32>,
    pub reference: Option<String>,
    pub status: String,
    pub quantity: i32,
    pub unit_cost_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub notes: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::purchase_orders)]
pub struct UpdatePurchaseOrder {
    pub status: Option<String>,
    pub reference: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl From<PurchaseOrder> for DomainPurchaseOrder {
    fn from(value: PurchaseOrder) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            supplier_id: value.supplier_id,
            digital_product_id: value.digital_product_id,
            reference: value.reference,
            status: PurchaseOrderStatus::parse(&value.status).unwrap_or_default(),
            quantity: value.quantity,
            unit_cost_cents: value.unit_cost_cents,
            total_cents: value.total_cents,
            currency: value.currency,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&DomainNewPurchaseOrder> for NewPurchaseOrder {
    fn from(value: &DomainNewPurchaseOrder) -> Self {
        Self {
            hub_id: value.hub_id,
            supplier_id: value.supplier_id,
            digital_product_id: value.digital_product_id,
            reference: value.reference.clone(),
            status: value.status.as_str().to_string(),
            quantity: value.quantity,
            unit_cost_cents: value.unit_cost_cents,
            total_cents: value.total_cents,
            currency: value.currency.clone(),
            notes: value.notes.clone(),
        }
    }
}

impl From<&DomainUpdatePurchaseOrder> for UpdatePurchaseOrder {
    fn from(value: &DomainUpdatePurchaseOrder) -> Self {
        Self {
            status: value.status.map(|status| status.as_str().to_string()),
            reference: value.reference.clone(),
            notes: value.notes.clone(),
            updated_at: value.updated_at,
        }
    }
}
