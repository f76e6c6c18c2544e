use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::supplier::{
    NewSupplier as DomainNewSupplier, Supplier as DomainSupplier,
    UpdateSupplier as DomainUpdateSupplier,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::suppliers)]
pub struct Supplier {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::suppliers)]
pub struct NewSupplier {
    pub hub_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::suppliers)]
pub struct UpdateSupplier {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub is_archived: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<Supplier> for DomainSupplier {
    fn from(value: Supplier) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            email: value.email,
            website: value.website,
            is_archived: value.is_archived,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&DomainNewSupplier> for NewSupplier {
    fn from(value: &DomainNewSupplier) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.clone(),
            email: value.email.clone(),
            website: value.website.clone(),
        }
    }
}

impl From<&DomainUpdateSupplier> for UpdateSupplier {
    fn from(value: &DomainUpdateSupplier) -> Self {
        Self {
            name: value.name.clone(),
            email: value.email.clone(),
            website: value.website.clone(),
            is_archived: value.is_archived,
            updated_at: value.updated_at,
        }
    }
}
