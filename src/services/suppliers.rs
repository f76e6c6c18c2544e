use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::supplier::{Supplier, SupplierListQuery};
use crate::forms::suppliers::{AddSupplierForm, EditSupplierForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{SupplierReader, SupplierWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the suppliers index page.
#[derive(Debug, Default, Deserialize)]
pub struct SuppliersQuery {
    /// Optional name or email search string.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
    /// Whether archived suppliers should be included.
    #[serde(default)]
    pub show_archived: bool,
}

/// Data required to render the suppliers index template.
pub struct SuppliersPageData {
    pub suppliers: Paginated<Supplier>,
    pub search: Option<String>,
    pub show_archived: bool,
}

/// Loads the suppliers overview page.
pub fn load_suppliers_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SuppliersQuery,
) -> ServiceResult<SuppliersPageData>
where
    R: SupplierReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let SuppliersQuery {
        search,
        page,
        show_archived,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query =
        SupplierListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if show_archived {
        list_query = list_query.include_archived();
    }

    let (total, items) = repo.list_suppliers(list_query)?;

    Ok(SuppliersPageData {
        suppliers: Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total),
        search,
        show_archived,
    })
}

/// Creates a new supplier for the authenticated user's hub.
pub fn create_supplier<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddSupplierForm,
) -> ServiceResult<Supplier>
where
    R: SupplierWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_supplier(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_supplier(&payload)?)
}

/// Updates a supplier in the user's hub.
pub fn update_supplier<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditSupplierForm,
) -> ServiceResult<Supplier>
where
    R: SupplierWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let supplier_id = form.id;
    let updates = form
        .into_update_supplier()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.update_supplier(supplier_id, user.hub_id, &updates)?)
}

/// Deletes a supplier in the user's hub.
pub fn delete_supplier<R>(repo: &R, user: &AuthenticatedUser, supplier_id: i32) -> ServiceResult<()>
where
    R: SupplierWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.delete_supplier(supplier_id, user.hub_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::{MockSupplierReader, MockSupplierWriter};

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

    fn sample_supplier(id: i32) -> Supplier {
        Supplier {
            id,
            hub_id: 11,
            name: format!("Supplier {id}"),
            email: None,
            website: None,
            is_archived: false,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    #[test]
    fn load_page_requires_role() {
        let repo = MockSupplierReader::new();
        let user = user_with_role("viewer");

        assert!(matches!(
            load_suppliers_page(&repo, &user, SuppliersQuery::default()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn create_supplier_sanitizes_and_persists() {
        let mut repo = MockSupplierWriter::new();
        repo.expect_create_supplier()
            .withf(|payload| payload.hub_id == 11 && payload.name == "Acme Digital")
            .returning(|_| Ok(sample_supplier(1)));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        let form = AddSupplierForm {
            name: " Acme   Digital ".to_string(),
            email: None,
            website: None,
        };

        assert!(create_supplier(&repo, &user, form).is_ok());
    }

    #[test]
    fn delete_missing_supplier_is_not_found() {
        let mut repo = MockSupplierWriter::new();
        repo.expect_delete_supplier()
            .returning(|_, _| Err(RepositoryError::NotFound));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        assert!(matches!(
            delete_supplier(&repo, &user, 9),
            Err(ServiceError::NotFound)
        ));
    }
}
