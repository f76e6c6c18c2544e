use cardstock::domain::condition::{Condition, ConditionField, ConditionOperator};
use cardstock::domain::digital_product::{
    DigitalProductListQuery, DigitalProductStatus, NewDigitalProduct, UpdateDigitalProduct,
};
use cardstock::domain::price_rule::{
    ActionMode, ActionOperator, NewPriceRule, PriceRuleListQuery, UpdatePriceRule,
};
use cardstock::domain::purchase_order::{
    NewPurchaseOrder, PurchaseOrderListQuery, PurchaseOrderStatus, UpdatePurchaseOrder,
};
use cardstock::domain::supplier::{NewSupplier, SupplierListQuery, UpdateSupplier};
use cardstock::domain::voucher::{NewVoucher, VoucherListQuery, VoucherStatus};
use cardstock::repository::{
    DieselRepository, DigitalProductReader, DigitalProductWriter, PriceRuleReader,
    PriceRuleWriter, PurchaseOrderReader, PurchaseOrderWriter, RepositoryError, SupplierReader,
    SupplierWriter, VoucherReader, VoucherWriter,
};

mod common;

fn seed_supplier(repo: &DieselRepository, hub_id: i32, name: &str) -> i32 {
    repo.create_supplier(&NewSupplier::new(hub_id, name))
        .unwrap()
        .id
}

fn seed_digital_product(repo: &DieselRepository, hub_id: i32, supplier_id: i32, name: &str) -> i32 {
    repo.create_digital_products(&[NewDigitalProduct::new(
        hub_id,
        supplier_id,
        name,
        format!("SKU-{name}"),
        900,
        "USD",
    )
    .with_prices(1000, 1000)])
        .unwrap()[0]
        .id
}

#[test]
fn test_supplier_repository_crud() {
    let test_db = common::TestDb::new("test_supplier_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let alice = repo
        .create_supplier(&NewSupplier::new(1, "Alice Cards").with_email("alice@example.com"))
        .unwrap();
    repo.create_supplier(&NewSupplier::new(1, "Bobby Codes"))
        .unwrap();
    repo.create_supplier(&NewSupplier::new(2, "Other Hub"))
        .unwrap();

    let (total, items) = repo.list_suppliers(SupplierListQuery::new(1)).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);

    let (found, _) = repo
        .list_suppliers(SupplierListQuery::new(1).search("alice"))
        .unwrap();
    assert_eq!(found, 1);

    let updated = repo
        .update_supplier(alice.id, 1, &UpdateSupplier::new().archived(true))
        .unwrap();
    assert!(updated.is_archived);

    // Archived suppliers drop out of the default listing.
    let (total, _) = repo.list_suppliers(SupplierListQuery::new(1)).unwrap();
    assert_eq!(total, 1);
    let (total, _) = repo
        .list_suppliers(SupplierListQuery::new(1).include_archived())
        .unwrap();
    assert_eq!(total, 2);

    // Hub scoping: wrong hub cannot touch the record.
    let err = repo
        .update_supplier(alice.id, 2, &UpdateSupplier::new().name("intruder"))
        .expect_err("expected hub-scoped update to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let err = repo
        .delete_supplier(alice.id, 2)
        .expect_err("expected hub-scoped delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    repo.delete_supplier(alice.id, 1).unwrap();
    assert!(repo.get_supplier_by_id(alice.id, 1).unwrap().is_none());
}

#[test]
fn test_digital_product_batch_and_filters() {
    let test_db = common::TestDb::new("test_digital_product_batch_and_filters.db");
    let repo = DieselRepository::new(test_db.pool());
    let supplier_id = seed_supplier(&repo, 1, "Acme");

    let created = repo
        .create_digital_products(&[
            NewDigitalProduct::new(1, supplier_id, "Gift Card 10", "GC-10", 900, "USD")
                .with_brand("Acme")
                .with_tags(vec!["gift".to_string()])
                .with_prices(1000, 999)
                .with_regions(vec!["US".to_string(), "CA".to_string()]),
            NewDigitalProduct::new(1, supplier_id, "Gift Card 25", "GC-25", 2250, "USD")
                .with_status(DigitalProductStatus::InActive),
        ])
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].regions, vec!["US", "CA"]);

    let (total, _) = repo
        .list_digital_products(DigitalProductListQuery::new(1))
        .unwrap();
    assert_eq!(total, 2);

    let (active, _) = repo
        .list_digital_products(
            DigitalProductListQuery::new(1).status(DigitalProductStatus::Active),
        )
        .unwrap();
    assert_eq!(active, 1);

    let (by_sku, items) = repo
        .list_digital_products(DigitalProductListQuery::new(1).search("GC-25"))
        .unwrap();
    assert_eq!(by_sku, 1);
    assert_eq!(items[0].sku, "GC-25");

    let updated = repo
        .update_digital_product(
            created[0].id,
            1,
            &UpdateDigitalProduct::new().selling_price_cents(899),
        )
        .unwrap();
    assert_eq!(updated.selling_price_cents, 899);
    // Untouched fields survive a partial patch.
    assert_eq!(updated.name, "Gift Card 10");
    assert_eq!(updated.tags, vec!["gift"]);

    repo.delete_digital_product(created[1].id, 1).unwrap();
    let (total, _) = repo
        .list_digital_products(DigitalProductListQuery::new(1))
        .unwrap();
    assert_eq!(total, 1);
}

#[test]
fn test_price_rule_conditions_round_trip() {
    let test_db = common::TestDb::new("test_price_rule_conditions_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());

    let rule = repo
        .create_price_rule(
            &NewPriceRule::new(1, "Acme markdown")
                .with_conditions(vec![
                    Condition {
                        id: "c1".to_string(),
                        field: ConditionField::BrandName,
                        operator: ConditionOperator::Eq,
                        value: "Acme".to_string(),
                    },
                    Condition {
                        id: "c2".to_string(),
                        field: ConditionField::SellingPrice,
                        operator: ConditionOperator::Gt,
                        value: "10".to_string(),
                    },
                ])
                .with_action(5.0, ActionOperator::Subtract, ActionMode::Percentage),
        )
        .unwrap();

    let stored = repo.get_price_rule_by_id(rule.id, 1).unwrap().unwrap();
    assert_eq!(stored.conditions.len(), 2);
    assert_eq!(stored.conditions[0].field, ConditionField::BrandName);
    assert_eq!(stored.conditions[1].operator, ConditionOperator::Gt);
    assert_eq!(stored.action_value, Some(5.0));

    let updated = repo
        .update_price_rule(
            rule.id,
            1,
            &UpdatePriceRule {
                name: "Acme markdown v2".to_string(),
                description: None,
                status: stored.status,
                match_type: stored.match_type,
                conditions: vec![Condition {
                    id: "c1".to_string(),
                    field: ConditionField::Name,
                    operator: ConditionOperator::Contains,
                    value: "gift".to_string(),
                }],
                action_value: Some(2.0),
                action_operator: ActionOperator::Add,
                action_mode: ActionMode::Absolute,
                updated_at: chrono::Local::now().naive_utc(),
            },
        )
        .unwrap();
    assert_eq!(updated.conditions.len(), 1);
    assert_eq!(updated.conditions[0].operator, ConditionOperator::Contains);

    // Hub scoping on read.
    assert!(repo.get_price_rule_by_id(rule.id, 2).unwrap().is_none());

    let (total, _) = repo.list_price_rules(PriceRuleListQuery::new(1)).unwrap();
    assert_eq!(total, 1);

    repo.delete_price_rule(rule.id, 1).unwrap();
    let err = repo
        .delete_price_rule(rule.id, 1)
        .expect_err("second delete should fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_voucher_import_rolls_back_on_duplicate() {
    let test_db = common::TestDb::new("test_voucher_import_rolls_back_on_duplicate.db");
    let repo = DieselRepository::new(test_db.pool());
    let supplier_id = seed_supplier(&repo, 1, "Acme");
    let product_id = seed_digital_product(&repo, 1, supplier_id, "Gift Card 10");

    let inserted = repo
        .create_vouchers(&[
            NewVoucher::new(1, product_id, "AAA-111"),
            NewVoucher::new(1, product_id, "BBB-222"),
        ])
        .unwrap();
    assert_eq!(inserted, 2);

    // The second batch clashes on BBB-222; nothing from it may survive.
    let err = repo
        .create_vouchers(&[
            NewVoucher::new(1, product_id, "CCC-333"),
            NewVoucher::new(1, product_id, "BBB-222"),
        ])
        .expect_err("duplicate code should abort the import");
    assert!(matches!(err, RepositoryError::Database(_)));

    let (total, items) = repo.list_vouchers(VoucherListQuery::new(1)).unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|v| v.status == VoucherStatus::Available));
    assert!(items.iter().all(|v| v.code != "CCC-333"));

    let (by_code, _) = repo
        .list_vouchers(VoucherListQuery::new(1).code("AAA-111"))
        .unwrap();
    assert_eq!(by_code, 1);
}

#[test]
fn test_purchase_order_lifecycle() {
    let test_db = common::TestDb::new("test_purchase_order_lifecycle.db");
    let repo = DieselRepository::new(test_db.pool());
    let supplier_id = seed_supplier(&repo, 1, "Acme");
    let product_id = seed_digital_product(&repo, 1, supplier_id, "Gift Card 10");

    let order = repo
        .create_purchase_order(
            &NewPurchaseOrder::new(1, supplier_id, 100, 950, "USD")
                .for_digital_product(product_id)
                .with_reference("PO-2024-001"),
        )
        .unwrap();
    assert_eq!(order.total_cents, 95_000);
    assert_eq!(order.status, PurchaseOrderStatus::Pending);

    let received = repo
        .update_purchase_order(
            order.id,
            1,
            &UpdatePurchaseOrder::new()
                .status(PurchaseOrderStatus::Received)
                .notes(Some("codes imported")),
        )
        .unwrap();
    assert_eq!(received.status, PurchaseOrderStatus::Received);
    // Quantities and costs are immutable after creation.
    assert_eq!(received.quantity, 100);
    assert_eq!(received.total_cents, 95_000);

    let (pending, _) = repo
        .list_purchase_orders(
            PurchaseOrderListQuery::new(1).status(PurchaseOrderStatus::Pending),
        )
        .unwrap();
    assert_eq!(pending, 0);

    let (by_reference, _) = repo
        .list_purchase_orders(PurchaseOrderListQuery::new(1).search("PO-2024"))
        .unwrap();
    assert_eq!(by_reference, 1);

    let err = repo
        .update_purchase_order(order.id, 2, &UpdatePurchaseOrder::new())
        .expect_err("expected hub-scoped update to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}
