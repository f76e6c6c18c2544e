use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::digital_product::{
    DigitalProduct as DomainDigitalProduct, DigitalProductStatus,
    NewDigitalProduct as DomainNewDigitalProduct, UpdateDigitalProduct as DomainUpdateDigitalProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::digital_products)]
pub struct DigitalProduct {
    pub id: i32,
    pub hub_id: i32,
    pub supplier_id: i32,
    pub name: String,
    pub sku: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    /// Comma-separated tag list.
    pub tags: Option<String>,
    pub image: Option<String>,
    pub cost_price_cents: i64,
    pub face_value_cents: i64,
    pub selling_price_cents: i64,
    pub status: String,
    /// Comma-separated region list.
    pub regions: Option<String>,
    /// Free-form metadata serialized as JSON.
    pub metadata: Option<String>,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::digital_products)]
pub struct NewDigitalProduct {
    pub hub_id: i32,
    pub supplier_id: i32,
    pub name: String,
    pub sku: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub image: Option<String>,
    pub cost_price_cents: i64,
    pub face_value_cents: i64,
    pub selling_price_cents: i64,
    pub status: String,
    pub regions: Option<String>,
    pub metadata: Option<String>,
    pub currency: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::digital_products)]
pub struct UpdateDigitalProduct {
    pub name: Option<String>,
    pub brand: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub tags: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub cost_price_cents: Option<i64>,
    pub face_value_cents: Option<i64>,
    pub selling_price_cents: Option<i64>,
    pub status: Option<String>,
    pub regions: Option<Option<String>>,
    pub metadata: Option<Option<String>>,
    pub currency: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Join a list into the comma-separated storage form, `None` when empty.
fn join_list(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

/// Split the comma-separated storage form back into a list.
fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|joined| {
            joined
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn encode_metadata(metadata: &Option<serde_json::Value>) -> Option<String> {
    metadata.as_ref().map(|value| value.to_string())
}

impl From<DigitalProduct> for DomainDigitalProduct {
    fn from(value: DigitalProduct) -> Self {
        let metadata = value
            .metadata
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());
        Self {
            id: value.id,
            hub_id: value.hub_id,
            supplier_id: value.supplier_id,
            name: value.name,
            sku: value.sku,
            brand: value.brand,
            description: value.description,
            tags: split_list(value.tags),
            image: value.image,
            cost_price_cents: value.cost_price_cents,
            face_value_cents: value.face_value_cents,
            selling_price_cents: value.selling_price_cents,
            status: DigitalProductStatus::parse(&value.status).unwrap_or_default(),
            regions: split_list(value.regions),
            metadata,
            currency: value.currency,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&DomainNewDigitalProduct> for NewDigitalProduct {
    fn from(value: &DomainNewDigitalProduct) -> Self {
        Self {
            hub_id: value.hub_id,
            supplier_id: value.supplier_id,
            name: value.name.clone(),
            sku: value.sku.clone(),
            brand: value.brand.clone(),
            description: value.description.clone(),
            tags: join_list(&value.tags),
            image: value.image.clone(),
            cost_price_cents: value.cost_price_cents,
            face_value_cents: value.face_value_cents,
            selling_price_cents: value.selling_price_cents,
            status: value.status.as_str().to_string(),
            regions: join_list(&value.regions),
            metadata: encode_metadata(&value.metadata),
            currency: value.currency.clone(),
        }
    }
}

impl From<&DomainUpdateDigitalProduct> for UpdateDigitalProduct {
    fn from(value: &DomainUpdateDigitalProduct) -> Self {
        Self {
            name: value.name.clone(),
            brand: value.brand.clone(),
            description: value.description.clone(),
            tags: value.tags.as_deref().map(join_list),
            image: value.image.clone(),
            cost_price_cents: value.cost_price_cents,
            face_value_cents: value.face_value_cents,
            selling_price_cents: value.selling_price_cents,
            status: value.status.map(|status| status.as_str().to_string()),
            regions: value.regions.as_deref().map(join_list),
            metadata: value.metadata.as_ref().map(encode_metadata),
            currency: value.currency.clone(),
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_round_trips_through_comma_form() {
        let joined = join_list(&["US".to_string(), "CA".to_string()]);
        assert_eq!(joined.as_deref(), Some("US,CA"));
        assert_eq!(
            split_list(joined),
            vec!["US".to_string(), "CA".to_string()]
        );
        assert_eq!(join_list(&[]), None);
        assert!(split_list(None).is_empty());
    }
}
