use serde::Serialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::digital_product::DigitalProductListQuery;
use crate::domain::price_rule::{PriceRuleListQuery, RuleStatus};
use crate::domain::product::ProductListQuery;
use crate::domain::purchase_order::{PurchaseOrderListQuery, PurchaseOrderStatus};
use crate::domain::voucher::{VoucherListQuery, VoucherStatus};
use crate::repository::{
    DigitalProductReader, PriceRuleReader, ProductReader, PurchaseOrderReader, VoucherReader,
};
use crate::services::{ServiceError, ServiceResult};

/// Headline numbers shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub products: usize,
    pub digital_products: usize,
    pub vouchers_available: usize,
    pub active_rules: usize,
    pub pending_orders: usize,
}

/// Loads the dashboard counters for the authenticated user's hub.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: ProductReader
        + DigitalProductReader
        + VoucherReader
        + PriceRuleReader
        + PurchaseOrderReader
        + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    // Counts only; page size one keeps the payloads tiny.
    let (products, _) =
        repo.list_products(ProductListQuery::new(user.hub_id).paginate(1, 1))?;
    let (digital_products, _) =
        repo.list_digital_products(DigitalProductListQuery::new(user.hub_id).paginate(1, 1))?;
    let (vouchers_available, _) = repo.list_vouchers(
        VoucherListQuery::new(user.hub_id)
            .status(VoucherStatus::Available)
            .paginate(1, 1),
    )?;
    let (active_rules, _) = repo.list_price_rules(
        PriceRuleListQuery::new(user.hub_id)
            .status(RuleStatus::Active)
            .paginate(1, 1),
    )?;
    let (pending_orders, _) = repo.list_purchase_orders(
        PurchaseOrderListQuery::new(user.hub_id)
            .status(PurchaseOrderStatus::Pending)
            .paginate(1, 1),
    )?;

    Ok(DashboardData {
        products,
        digital_products,
        vouchers_available,
        active_rules,
        pending_orders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repository::mock::MockDashboardRepo;

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

    #[test]
    fn dashboard_requires_role() {
        let repo = MockDashboardRepo::new();
        let user = user_with_role("viewer");

        assert!(matches!(
            load_dashboard(&repo, &user),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn dashboard_aggregates_counts() {
        let mut repo = MockDashboardRepo::new();
        repo.expect_list_products().returning(|_| Ok((12, Vec::new())));
        repo.expect_list_digital_products()
            .returning(|_| Ok((34, Vec::new())));
        repo.expect_list_vouchers().returning(|_| Ok((560, Vec::new())));
        repo.expect_list_price_rules().returning(|_| Ok((3, Vec::new())));
        repo.expect_list_purchase_orders()
            .returning(|_| Ok((2, Vec::new())));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        let data = load_dashboard(&repo, &user).expect("dashboard loads");

        assert_eq!(data.products, 12);
        assert_eq!(data.digital_products, 34);
        assert_eq!(data.vouchers_available, 560);
        assert_eq!(data.active_rules, 3);
        assert_eq!(data.pending_orders, 2);
    }
}
