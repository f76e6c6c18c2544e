use crate::db::{DbConnection, DbPool};
use crate::domain::digital_product::{
    DigitalProduct, DigitalProductListQuery, NewDigitalProduct, UpdateDigitalProduct,
};
use crate::domain::price_rule::{NewPriceRule, PriceRule, PriceRuleListQuery, UpdatePriceRule};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::purchase_order::{
    NewPurchaseOrder, PurchaseOrder, PurchaseOrderListQuery, UpdatePurchaseOrder,
};
use crate::domain::supplier::{NewSupplier, Supplier, SupplierListQuery, UpdateSupplier};
use crate::domain::voucher::{NewVoucher, Voucher, VoucherListQuery};

pub mod errors;

pub mod digital_product;
pub mod price_rule;
pub mod product;
pub mod purchase_order;
pub mod supplier;
pub mod voucher;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over supplier records.
pub trait SupplierReader {
    fn get_supplier_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Supplier>>;
    fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)>;
}

/// Write operations over supplier records.
pub trait SupplierWriter {
    fn create_supplier(&self, new_supplier: &NewSupplier) -> RepositoryResult<Supplier>;
    fn update_supplier(
        &self,
        supplier_id: i32,
        hub_id: i32,
        updates: &UpdateSupplier,
    ) -> RepositoryResult<Supplier>;
    fn delete_supplier(&self, supplier_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over marketplace product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over marketplace product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        hub_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over digital stock records.
pub trait DigitalProductReader {
    fn get_digital_product_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DigitalProduct>>;
    fn list_digital_products(
        &self,
        query: DigitalProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DigitalProduct>)>;
}

/// Write operations over digital stock records.
pub trait DigitalProductWriter {
    /// Insert a batch of stock items, returning them in insertion order.
    fn create_digital_products(
        &self,
        new_products: &[NewDigitalProduct],
    ) -> RepositoryResult<Vec<DigitalProduct>>;
    fn update_digital_product(
        &self,
        digital_product_id: i32,
        hub_id: i32,
        updates: &UpdateDigitalProduct,
    ) -> RepositoryResult<DigitalProduct>;
    fn delete_digital_product(&self, digital_product_id: i32, hub_id: i32)
    -> RepositoryResult<()>;
}

/// Read-only operations over purchase order records.
pub trait PurchaseOrderReader {
    fn get_purchase_order_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<PurchaseOrder>>;
    fn list_purchase_orders(
        &self,
        query: PurchaseOrderListQuery,
    ) -> RepositoryResult<(usize, Vec<PurchaseOrder>)>;
}

/// Write operations over purchase order records.
pub trait PurchaseOrderWriter {
    fn create_purchase_order(
        &self,
        new_purchase_order: &NewPurchaseOrder,
    ) -> RepositoryResult<PurchaseOrder>;
    fn update_purchase_order(
        &self,
        purchase_order_id: i32,
        hub_id: i32,
        updates: &UpdatePurchaseOrder,
    ) -> RepositoryResult<PurchaseOrder>;
}

/// Read-only operations over voucher records.
pub trait VoucherReader {
    fn list_vouchers(&self, query: VoucherListQuery) -> RepositoryResult<(usize, Vec<Voucher>)>;
}

/// Write operations over voucher records.
pub trait VoucherWriter {
    /// Insert a batch of voucher codes, returning how many were stored.
    fn create_vouchers(&self, new_vouchers: &[NewVoucher]) -> RepositoryResult<usize>;
}

/// Read-only operations over price rule records.
pub trait PriceRuleReader {
    fn get_price_rule_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<PriceRule>>;
    fn list_price_rules(
        &self,
        query: PriceRuleListQuery,
    ) -> RepositoryResult<(usize, Vec<PriceRule>)>;
}

/// Write operations over price rule records.
pub trait PriceRuleWriter {
    fn create_price_rule(&self, new_rule: &NewPriceRule) -> RepositoryResult<PriceRule>;
    fn update_price_rule(
        &self,
        rule_id: i32,
        hub_id: i32,
        updates: &UpdatePriceRule,
    ) -> RepositoryResult<PriceRule>;
    fn delete_price_rule(&self, rule_id: i32, hub_id: i32) -> RepositoryResult<()>;
}
