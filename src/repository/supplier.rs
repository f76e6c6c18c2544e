use diesel::prelude::*;

use crate::domain::supplier::{
    NewSupplier as DomainNewSupplier, Supplier as DomainSupplier, SupplierListQuery,
    UpdateSupplier as DomainUpdateSupplier,
};
use crate::models::supplier::{
    NewSupplier as DbNewSupplier, Supplier as DbSupplier, UpdateSupplier as DbUpdateSupplier,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, SupplierReader, SupplierWriter};

impl SupplierReader for DieselRepository {
    fn get_supplier_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainSupplier>> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let supplier = suppliers::table
            .filter(suppliers::id.eq(id))
            .filter(suppliers::hub_id.eq(hub_id))
            .first::<DbSupplier>(&mut conn)
            .optional()?;

        Ok(supplier.map(Into::into))
    }

    fn list_suppliers(
        &self,
        query: SupplierListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainSupplier>)> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;

        let mut count_query = suppliers::table
            .filter(suppliers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_archived {
            count_query = count_query.filter(suppliers::is_archived.eq(false));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                suppliers::name
                    .like(pattern.clone())
                    .or(suppliers::email.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = suppliers::table
            .filter(suppliers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_archived {
            items = items.filter(suppliers::is_archived.eq(false));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                suppliers::name
                    .like(pattern.clone())
                    .or(suppliers::email.like(pattern)),
            );
        }

        items = items.order((suppliers::is_archived.asc(), suppliers::name.asc()));

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let db_suppliers = items.load::<DbSupplier>(&mut conn)?;
        let suppliers = db_suppliers.into_iter().map(Into::into).collect();

        Ok((total, suppliers))
    }
}

impl SupplierWriter for DieselRepository {
    fn create_supplier(&self, new_supplier: &DomainNewSupplier) -> RepositoryResult<DomainSupplier> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let db_new = DbNewSupplier::from(new_supplier);

        let created = diesel::insert_into(suppliers::table)
            .values(&db_new)
            .get_result::<DbSupplier>(&mut conn)?;

        Ok(created.into())
    }

    fn update_supplier(
        &self,
        supplier_id: i32,
        hub_id: i32,
        updates: &DomainUpdateSupplier,
    ) -> RepositoryResult<DomainSupplier> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateSupplier::from(updates);

        let target = suppliers::table
            .filter(suppliers::id.eq(supplier_id))
            .filter(suppliers::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbSupplier>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_supplier(&self, supplier_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;

        let target = suppliers::table
            .filter(suppliers::id.eq(supplier_id))
            .filter(suppliers::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
