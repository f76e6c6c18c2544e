use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the catalog products index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional name or description search string.
    pub search: Option<String>,
    /// Optional exact SKU filter.
    pub sku: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
    /// Whether archived products should be included.
    #[serde(default)]
    pub show_archived: bool,
}

/// Data required to render the catalog products index template.
pub struct ProductsPageData {
    pub products: Paginated<Product>,
    pub search: Option<String>,
    pub show_archived: bool,
}

/// Loads the catalog products overview page.
pub fn load_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ProductsQuery {
        search,
        sku,
        page,
        show_archived,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query = ProductListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(sku) = sku.as_ref() {
        list_query = list_query.sku(sku);
    }
    if show_archived {
        list_query = list_query.include_archived();
    }

    let (total, items) = repo.list_products(list_query)?;

    Ok(ProductsPageData {
        products: Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total),
        search,
        show_archived,
    })
}

/// Creates a new catalog product for the authenticated user's hub.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_product(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_product(&payload)?)
}

/// Updates a catalog product in the user's hub.
pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let product_id = form.id;
    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.update_product(product_id, user.hub_id, &updates)?)
}

/// Deletes a catalog product in the user's hub.
pub fn delete_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.delete_product(product_id, user.hub_id)?)
}
