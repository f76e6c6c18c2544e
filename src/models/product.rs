use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub hub_id: i32,
    pub digital_product_id: Option<i32>,
    pub name: String,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub selling_price_cents: i64,
    pub currency: String,
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub hub_id: i32,
    pub digital_product_id: Option<i32>,
    pub name: String,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub selling_price_cents: i64,
    pub currency: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub sku: Option<Option<String>>,
    pub brand: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub selling_price_cents: Option<i64>,
    pub currency: Option<String>,
    pub is_archived: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            digital_product_id: value.digital_product_id,
            name: value.name,
            sku: value.sku,
            brand: value.brand,
            description: value.description,
            selling_price_cents: value.selling_price_cents,
            currency: value.currency,
            is_archived: value.is_archived,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&DomainNewProduct> for NewProduct {
    fn from(value: &DomainNewProduct) -> Self {
        Self {
            hub_id: value.hub_id,
            digital_product_id: value.digital_product_id,
            name: value.name.clone(),
            sku: value.sku.clone(),
            brand: value.brand.clone(),
            description: value.description.clone(),
            selling_price_cents: value.selling_price_cents,
            currency: value.currency.clone(),
        }
    }
}

impl From<&DomainUpdateProduct> for UpdateProduct {
    fn from(value: &DomainUpdateProduct) -> Self {
        Self {
            name: value.name.clone(),
            sku: value.sku.clone(),
            brand: value.brand.clone(),
            description: value.description.clone(),
            selling_price_cents: value.selling_price_cents,
            currency: value.currency.clone(),
            is_archived: value.is_archived,
            updated_at: value.updated_at,
        }
    }
}
