use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::digital_product::{DigitalProduct, DigitalProductListQuery};
use crate::domain::voucher::{Voucher, VoucherListQuery, VoucherStatus};
use crate::forms::vouchers::ImportVouchersForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{DigitalProductReader, VoucherReader, VoucherWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the vouchers index page.
#[derive(Debug, Default, Deserialize)]
pub struct VouchersQuery {
    /// Optional exact code lookup.
    pub code: Option<String>,
    /// Optional stock item filter.
    #[serde(default, deserialize_with = "crate::forms::empty_to_none_i32")]
    pub digital_product_id: Option<i32>,
    /// Optional status filter (`available` / `sold` / `redeemed`).
    pub status: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the vouchers index template.
pub struct VouchersPageData {
    pub vouchers: Paginated<Voucher>,
    /// Stock items used to render the filter dropdown and the import form.
    pub digital_products: Vec<DigitalProduct>,
    pub code: Option<String>,
    pub digital_product_id: Option<i32>,
    pub status: Option<VoucherStatus>,
}

/// Loads the vouchers overview page.
pub fn load_vouchers_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: VouchersQuery,
) -> ServiceResult<VouchersPageData>
where
    R: VoucherReader + DigitalProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let VouchersQuery {
        code,
        digital_product_id,
        status,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let status = status.as_deref().and_then(VoucherStatus::parse);

    let mut list_query = VoucherListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(code) = code.as_ref() {
        list_query = list_query.code(code);
    }
    if let Some(digital_product_id) = digital_product_id {
        list_query = list_query.digital_product(digital_product_id);
    }
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, items) = repo.list_vouchers(list_query)?;
    let (_, digital_products) =
        repo.list_digital_products(DigitalProductListQuery::new(user.hub_id))?;

    Ok(VouchersPageData {
        vouchers: Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total),
        digital_products,
        code,
        digital_product_id,
        status,
    })
}

/// Imports voucher codes for the authenticated user's hub.
///
/// When the form carries both a file and manual rows the file wins. All
/// codes insert in one transaction; a code already held for the same
/// stock item rolls the whole import back.
pub fn import_vouchers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ImportVouchersForm,
) -> ServiceResult<usize>
where
    R: VoucherWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payloads = form
        .into_new_vouchers(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_vouchers(&payloads)?)
}
