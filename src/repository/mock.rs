use mockall::mock;

use super::{
    DigitalProductReader, DigitalProductWriter, PriceRuleReader, PriceRuleWriter, ProductReader,
    ProductWriter, PurchaseOrderReader, PurchaseOrderWriter, SupplierReader, SupplierWriter,
    VoucherReader, VoucherWriter,
};
use crate::domain::{
    digital_product::{
        DigitalProduct, DigitalProductListQuery, NewDigitalProduct, UpdateDigitalProduct,
    },
    price_rule::{NewPriceRule, PriceRule, PriceRuleListQuery, UpdatePriceRule},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    purchase_order::{NewPurchaseOrder, PurchaseOrder, PurchaseOrderListQuery, UpdatePurchaseOrder},
    supplier::{NewSupplier, Supplier, SupplierListQuery, UpdateSupplier},
    voucher::{NewVoucher, Voucher, VoucherListQuery},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub SupplierReader {}

    impl SupplierReader for SupplierReader {
        fn get_supplier_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Supplier>>;
        fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)>;
    }
}

mock! {
    pub SupplierWriter {}

    impl SupplierWriter for SupplierWriter {
        fn create_supplier(&self, new_supplier: &NewSupplier) -> RepositoryResult<Supplier>;
        fn update_supplier(&self, supplier_id: i32, hub_id: i32, updates: &UpdateSupplier) -> RepositoryResult<Supplier>;
        fn delete_supplier(&self, supplier_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, hub_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub DigitalProductReader {}

    impl DigitalProductReader for DigitalProductReader {
        fn get_digital_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DigitalProduct>>;
        fn list_digital_products(&self, query: DigitalProductListQuery) -> RepositoryResult<(usize, Vec<DigitalProduct>)>;
    }
}

mock! {
    pub DigitalProductWriter {}

    impl DigitalProductWriter for DigitalProductWriter {
        fn create_digital_products(&self, new_products: &[NewDigitalProduct]) -> RepositoryResult<Vec<DigitalProduct>>;
        fn update_digital_product(&self, digital_product_id: i32, hub_id: i32, updates: &UpdateDigitalProduct) -> RepositoryResult<DigitalProduct>;
        fn delete_digital_product(&self, digital_product_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub PurchaseOrderReader {}

    impl PurchaseOrderReader for PurchaseOrderReader {
        fn get_purchase_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<PurchaseOrder>>;
        fn list_purchase_orders(&self, query: PurchaseOrderListQuery) -> RepositoryResult<(usize, Vec<PurchaseOrder>)>;
    }
}

mock! {
    pub PurchaseOrderWriter {}

    impl PurchaseOrderWriter for PurchaseOrderWriter {
        fn create_purchase_order(&self, new_purchase_order: &NewPurchaseOrder) -> RepositoryResult<PurchaseOrder>;
        fn update_purchase_order(&self, purchase_order_id: i32, hub_id: i32, updates: &UpdatePurchaseOrder) -> RepositoryResult<PurchaseOrder>;
    }
}

mock! {
    pub VoucherReader {}

    impl VoucherReader for VoucherReader {
        fn list_vouchers(&self, query: VoucherListQuery) -> RepositoryResult<(usize, Vec<Voucher>)>;
    }
}

mock! {
    pub VoucherWriter {}

    impl VoucherWriter for VoucherWriter {
        fn create_vouchers(&self, new_vouchers: &[NewVoucher]) -> RepositoryResult<usize>;
    }
}

// Combined mocks for services that read across several traits.
mock! {
    pub StockPageRepo {}

    impl DigitalProductReader for StockPageRepo {
        fn get_digital_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DigitalProduct>>;
        fn list_digital_products(&self, query: DigitalProductListQuery) -> RepositoryResult<(usize, Vec<DigitalProduct>)>;
    }

    impl SupplierReader for StockPageRepo {
        fn get_supplier_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Supplier>>;
        fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)>;
    }
}

mock! {
    pub DashboardRepo {}

    impl ProductReader for DashboardRepo {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }

    impl DigitalProductReader for DashboardRepo {
        fn get_digital_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DigitalProduct>>;
        fn list_digital_products(&self, query: DigitalProductListQuery) -> RepositoryResult<(usize, Vec<DigitalProduct>)>;
    }

    impl VoucherReader for DashboardRepo {
        fn list_vouchers(&self, query: VoucherListQuery) -> RepositoryResult<(usize, Vec<Voucher>)>;
    }

    impl PriceRuleReader for DashboardRepo {
        fn get_price_rule_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<PriceRule>>;
        fn list_price_rules(&self, query: PriceRuleListQuery) -> RepositoryResult<(usize, Vec<PriceRule>)>;
    }

    impl PurchaseOrderReader for DashboardRepo {
        fn get_purchase_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<PurchaseOrder>>;
        fn list_purchase_orders(&self, query: PurchaseOrderListQuery) -> RepositoryResult<(usize, Vec<PurchaseOrder>)>;
    }
}

mock! {
    pub PriceRuleReader {}

    impl PriceRuleReader for PriceRuleReader {
        fn get_price_rule_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<PriceRule>>;
        fn list_price_rules(&self, query: PriceRuleListQuery) -> RepositoryResult<(usize, Vec<PriceRule>)>;
    }
}

mock! {
    pub PriceRuleWriter {}

    impl PriceRuleWriter for PriceRuleWriter {
        fn create_price_rule(&self, new_rule: &NewPriceRule) -> RepositoryResult<PriceRule>;
        fn update_price_rule(&self, rule_id: i32, hub_id: i32, updates: &UpdatePriceRule) -> RepositoryResult<PriceRule>;
        fn delete_price_rule(&self, rule_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}
