use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::digital_product::{
    DigitalProduct, DigitalProductListQuery, DigitalProductStatus, UpdateDigitalProduct,
};
use crate::domain::supplier::{Supplier, SupplierListQuery};
use crate::forms::digital_products::{BulkProductForm, UploadProductsForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{DigitalProductReader, DigitalProductWriter, SupplierReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the digital stock index page.
#[derive(Debug, Default, Deserialize)]
pub struct DigitalProductsQuery {
    /// Optional name, SKU or brand search string.
    pub search: Option<String>,
    /// Optional supplier filter.
    #[serde(default, deserialize_with = "crate::forms::empty_to_none_i32")]
    pub supplier_id: Option<i32>,
    /// Optional status filter (`active` / `in_active`).
    pub status: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the digital stock index template.
pub struct DigitalProductsPageData {
    pub products: Paginated<DigitalProduct>,
    /// Suppliers used to render the filter dropdown and the bulk entry
    /// supplier selector.
    pub suppliers: Vec<Supplier>,
    pub search: Option<String>,
    pub supplier_id: Option<i32>,
    pub status: Option<DigitalProductStatus>,
}

/// Loads the digital stock overview page.
pub fn load_digital_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: DigitalProductsQuery,
) -> ServiceResult<DigitalProductsPageData>
where
    R: DigitalProductReader + SupplierReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let DigitalProductsQuery {
        search,
        supplier_id,
        status,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let status = status.as_deref().and_then(DigitalProductStatus::parse);

    let mut list_query =
        DigitalProductListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(supplier_id) = supplier_id {
        list_query = list_query.supplier(supplier_id);
    }
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, items) = repo.list_digital_products(list_query)?;
    let (_, suppliers) = repo.list_suppliers(SupplierListQuery::new(user.hub_id))?;

    Ok(DigitalProductsPageData {
        products: Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total),
        suppliers,
        search,
        supplier_id,
        status,
    })
}

/// Persists a bulk entry batch for the authenticated user's hub.
///
/// The whole batch validates before anything is written; an empty batch
/// is rejected outright.
pub fn create_digital_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: BulkProductForm,
) -> ServiceResult<Vec<DigitalProduct>>
where
    R: DigitalProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payloads = form
        .into_new_products(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_digital_products(&payloads)?)
}

/// Imports digital stock from an uploaded CSV file.
pub fn import_digital_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UploadProductsForm,
) -> ServiceResult<usize>
where
    R: DigitalProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payloads = form
        .parse(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo.create_digital_products(&payloads)?;
    Ok(created.len())
}

/// Applies a patch to a stock item in the user's hub.
pub fn update_digital_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    digital_product_id: i32,
    updates: UpdateDigitalProduct,
) -> ServiceResult<DigitalProduct>
where
    R: DigitalProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.update_digital_product(digital_product_id, user.hub_id, &updates)?)
}

/// Deletes a stock item in the user's hub.
pub fn delete_digital_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    digital_product_id: i32,
) -> ServiceResult<()>
where
    R: DigitalProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.delete_digital_product(digital_product_id, user.hub_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::forms::digital_products::ProductEntryPatch;
    use crate::repository::mock::{MockDigitalProductWriter, MockStockPageRepo};

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn user_with_role(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user".to_string(),
            email: "user@example.com".to_string(),
            hub_id: 11,
            name: "User".to_string(),
            roles: vec![role.to_string()],
            exp: 0,
        }
    }

    fn sample_product(id: i32) -> DigitalProduct {
        DigitalProduct {
            id,
            hub_id: 11,
            supplier_id: 7,
            name: format!("Card {id}"),
            sku: format!("GC-{id}"),
            brand: None,
            description: None,
            tags: Vec::new(),
            image: None,
            cost_price_cents: 900,
            face_value_cents: 1000,
            selling_price_cents: 1000,
            status: DigitalProductStatus::Active,
            regions: Vec::new(),
            metadata: None,
            currency: "USD".to_string(),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn filled_batch() -> BulkProductForm {
        let mut form = BulkProductForm::new();
        let id = form.entries[0].id.clone();
        form.update_form(
            &id,
            ProductEntryPatch {
                supplier_id: Some(Some(7)),
                name: Some("Card".to_string()),
                sku: Some("GC-1".to_string()),
                cost_price: Some("9.00".to_string()),
                ..ProductEntryPatch::default()
            },
        );
        form
    }

    #[test]
    fn load_page_requires_role() {
        let repo = MockStockPageRepo::new();
        let user = user_with_role("viewer");

        assert!(matches!(
            load_digital_products_page(&repo, &user, DigitalProductsQuery::default()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn load_page_returns_products_and_suppliers() {
        let mut repo = MockStockPageRepo::new();
        repo.expect_list_digital_products()
            .returning(|_| Ok((1, vec![sample_product(1)])));
        repo.expect_list_suppliers().returning(|_| Ok((0, Vec::new())));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        let data = load_digital_products_page(&repo, &user, DigitalProductsQuery::default())
            .expect("page loads");

        assert_eq!(data.products.items.len(), 1);
        assert_eq!(data.products.meta.total, 1);
    }

    #[test]
    fn empty_batch_is_rejected() {
        let repo = MockDigitalProductWriter::new();
        let user = user_with_role(SERVICE_ACCESS_ROLE);
        let mut form = BulkProductForm::new();
        let id = form.entries[0].id.clone();
        form.remove_product(&id);

        assert!(matches!(
            create_digital_products(&repo, &user, form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn valid_batch_is_persisted() {
        let mut repo = MockDigitalProductWriter::new();
        repo.expect_create_digital_products()
            .withf(|payloads| payloads.len() == 1 && payloads[0].hub_id == 11)
            .returning(|_| Ok(vec![sample_product(1)]));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        let created =
            create_digital_products(&repo, &user, filled_batch()).expect("batch persists");

        assert_eq!(created.len(), 1);
    }

    #[test]
    fn invalid_entry_blocks_the_whole_batch() {
        let repo = MockDigitalProductWriter::new();
        let user = user_with_role(SERVICE_ACCESS_ROLE);
        let mut form = filled_batch();
        let second = form.add_product();
        form.update_form(
            &second,
            ProductEntryPatch {
                cost_price: Some("free".to_string()),
                ..ProductEntryPatch::default()
            },
        );

        assert!(matches!(
            create_digital_products(&repo, &user, form),
            Err(ServiceError::Form(_))
        ));
    }
}
