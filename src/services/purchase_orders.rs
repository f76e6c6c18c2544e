use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::purchase_order::{PurchaseOrder, PurchaseOrderListQuery, PurchaseOrderStatus};
use crate::domain::supplier::{Supplier, SupplierListQuery};
use crate::forms::purchase_orders::{AddPurchaseOrderForm, EditPurchaseOrderForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{PurchaseOrderReader, PurchaseOrderWriter, SupplierReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the purchase orders index page.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseOrdersQuery {
    /// Optional reference or notes search string.
    pub search: Option<String>,
    /// Optional supplier filter.
    #[serde(default, deserialize_with = "crate::forms::empty_to_none_i32")]
    pub supplier_id: Option<i32>,
    /// Optional status filter (`pending` / `received` / `cancelled`).
    pub status: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the purchase orders index template.
pub struct PurchaseOrdersPageData {
    pub orders: Paginated<PurchaseOrder>,
    pub suppliers: Vec<Supplier>,
    pub search: Option<String>,
    pub supplier_id: Option<i32>,
    pub status: Option<PurchaseOrderStatus>,
}

/// Loads the purchase orders overview page.
pub fn load_purchase_orders_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PurchaseOrdersQuery,
) -> ServiceResult<PurchaseOrdersPageData>
where
    R: PurchaseOrderReader + SupplierReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let PurchaseOrdersQuery {
        search,
        supplier_id,
        status,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let status = status.as_deref().and_then(PurchaseOrderStatus::parse);

    let mut list_query =
        PurchaseOrderListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(supplier_id) = supplier_id {
        list_query = list_query.supplier(supplier_id);
    }
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, items) = repo.list_purchase_orders(list_query)?;
    let (_, suppliers) = repo.list_suppliers(SupplierListQuery::new(user.hub_id))?;

    Ok(PurchaseOrdersPageData {
        orders: Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total),
        suppliers,
        search,
        supplier_id,
        status,
    })
}

/// Creates a new purchase order for the authenticated user's hub.
pub fn create_purchase_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddPurchaseOrderForm,
) -> ServiceResult<PurchaseOrder>
where
    R: PurchaseOrderWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_purchase_order(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_purchase_order(&payload)?)
}

/// Updates a purchase order's lifecycle fields.
pub fn update_purchase_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditPurchaseOrderForm,
) -> ServiceResult<PurchaseOrder>
where
    R: PurchaseOrderWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let order_id = form.id;
    let updates = form
        .into_update_purchase_order()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.update_purchase_order(order_id, user.hub_id, &updates)?)
}
