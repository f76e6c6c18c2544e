use diesel::prelude::*;

use crate::domain::purchase_order::{
    NewPurchaseOrder as DomainNewPurchaseOrder, PurchaseOrder as DomainPurchaseOrder,
    PurchaseOrderListQuery, UpdatePurchaseOrder as DomainUpdatePurchaseOrder,
};
use crate::models::purchase_order::{
    NewPurchaseOrder as DbNewPurchaseOrder, PurchaseOrder as DbPurchaseOrder,
    UpdatePurchaseOrder as DbUpdatePurchaseOrder,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, PurchaseOrderReader, PurchaseOrderWriter};

impl PurchaseOrderReader for DieselRepository {
    fn get_purchase_order_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainPurchaseOrder>> {
        use crate::schema::purchase_orders;

        let mut conn = self.conn()?;
        let order = purchase_orders::table
            .filter(purchase_orders::id.eq(id))
            .filter(purchase_orders::hub_id.eq(hub_id))
            .first::<DbPurchaseOrder>(&mut conn)
            .optional()?;

        Ok(order.map(Into::into))
    }

    fn list_purchase_orders(
        &self,
        query: PurchaseOrderListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainPurchaseOrder>)> {
        use crate::schema::purchase_orders;

        let mut conn = self.conn()?;

        let mut count_query = purchase_orders::table
            .filter(purchase_orders::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                purchase_orders::reference
                    .like(pattern.clone())
                    .or(purchase_orders::notes.like(pattern)),
            );
        }

        if let Some(supplier_id) = query.supplier_id {
            count_query = count_query.filter(purchase_orders::supplier_id.eq(supplier_id));
        }

        if let Some(status) = query.status {
            count_query = count_query.filter(purchase_orders::status.eq(status.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = purchase_orders::table
            .filter(purchase_orders::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                purchase_orders::reference
                    .like(pattern.clone())
                    .or(purchase_orders::notes.like(pattern)),
            );
        }

        if let Some(supplier_id) = query.supplier_id {
            items = items.filter(purchase_orders::supplier_id.eq(supplier_id));
        }

        if let Some(status) = query.status {
            items = items.filter(purchase_orders::status.eq(status.as_str()));
        }

        items = items.order(purchase_orders::created_at.desc());

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let db_orders = items.load::<DbPurchaseOrder>(&mut conn)?;
        let orders = db_orders.into_iter().map(Into::into).collect();

        Ok((total, orders))
    }
}

impl PurchaseOrderWriter for DieselRepository {
    fn create_purchase_order(
        &self,
        new_purchase_order: &DomainNewPurchaseOrder,
    ) -> RepositoryResult<DomainPurchaseOrder> {
        use crate::schema::purchase_orders;

        let mut conn = self.conn()?;
        let db_new = DbNewPurchaseOrder::from(new_purchase_order);

        let created = diesel::insert_into(purchase_orders::table)
            .values(&db_new)
            .get_result::<DbPurchaseOrder>(&mut conn)?;

        Ok(created.into())
    }

    fn update_purchase_order(
        &self,
        purchase_order_id: i32,
        hub_id: i32,
        updates: &DomainUpdatePurchaseOrder,
    ) -> RepositoryResult<DomainPurchaseOrder> {
        use crate::schema::purchase_orders;

        let mut conn = self.conn()?;
        let db_updates = DbUpdatePurchaseOrder::from(updates);

        let target = purchase_orders::table
            .filter(purchase_orders::id.eq(purchase_order_id))
            .filter(purchase_orders::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbPurchaseOrder>(&mut conn)?;

        Ok(updated.into())
    }
}
