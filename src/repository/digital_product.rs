use diesel::prelude::*;

use crate::domain::digital_product::{
    DigitalProduct as DomainDigitalProduct, DigitalProductListQuery,
    NewDigitalProduct as DomainNewDigitalProduct, UpdateDigitalProduct as DomainUpdateDigitalProduct,
};
use crate::models::digital_product::{
    DigitalProduct as DbDigitalProduct, NewDigitalProduct as DbNewDigitalProduct,
    UpdateDigitalProduct as DbUpdateDigitalProduct,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, DigitalProductReader, DigitalProductWriter};

impl DigitalProductReader for DieselRepository {
    fn get_digital_product_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainDigitalProduct>> {
        use crate::schema::digital_products;

        let mut conn = self.conn()?;
        let product = digital_products::table
            .filter(digital_products::id.eq(id))
            .filter(digital_products::hub_id.eq(hub_id))
            .first::<DbDigitalProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn list_digital_products(
        &self,
        query: DigitalProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainDigitalProduct>)> {
        use crate::schema::digital_products;

        let mut conn = self.conn()?;

        let mut count_query = digital_products::table
            .filter(digital_products::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                digital_products::name
                    .like(pattern.clone())
                    .or(digital_products::sku.like(pattern.clone()))
                    .or(digital_products::brand.like(pattern)),
            );
        }

        if let Some(supplier_id) = query.supplier_id {
            count_query = count_query.filter(digital_products::supplier_id.eq(supplier_id));
        }

        if let Some(status) = query.status {
            count_query = count_query.filter(digital_products::status.eq(status.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = digital_products::table
            .filter(digital_products::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                digital_products::name
                    .like(pattern.clone())
                    .or(digital_products::sku.like(pattern.clone()))
                    .or(digital_products::brand.like(pattern)),
            );
        }

        if let Some(supplier_id) = query.supplier_id {
            items = items.filter(digital_products::supplier_id.eq(supplier_id));
        }

        if let Some(status) = query.status {
            items = items.filter(digital_products::status.eq(status.as_str()));
        }

        items = items.order(digital_products::created_at.desc());

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let db_products = items.load::<DbDigitalProduct>(&mut conn)?;
        let products = db_products.into_iter().map(Into::into).collect();

        Ok((total, products))
    }
}

impl DigitalProductWriter for DieselRepository {
    fn create_digital_products(
        &self,
        new_products: &[DomainNewDigitalProduct],
    ) -> RepositoryResult<Vec<DomainDigitalProduct>> {
        use crate::schema::digital_products;

        let mut conn = self.conn()?;

        // One transaction per batch so a failing row rolls back the lot.
        let created = conn.transaction::<Vec<DbDigitalProduct>, diesel::result::Error, _>(
            |conn| {
                let mut created = Vec::with_capacity(new_products.len());
                for new_product in new_products {
                    let db_new = DbNewDigitalProduct::from(new_product);
                    let row = diesel::insert_into(digital_products::table)
                        .values(&db_new)
                        .get_result::<DbDigitalProduct>(conn)?;
                    created.push(row);
                }
                Ok(created)
            },
        )?;

        Ok(created.into_iter().map(Into::into).collect())
    }

    fn update_digital_product(
        &self,
        digital_product_id: i32,
        hub_id: i32,
        updates: &DomainUpdateDigitalProduct,
    ) -> RepositoryResult<DomainDigitalProduct> {
        use crate::schema::digital_products;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateDigitalProduct::from(updates);

        let target = digital_products::table
            .filter(digital_products::id.eq(digital_product_id))
            .filter(digital_products::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbDigitalProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_digital_product(
        &self,
        digital_product_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<()> {
        use crate::schema::digital_products;

        let mut conn = self.conn()?;

        let target = digital_products::table
            .filter(digital_products::id.eq(digital_product_id))
            .filter(digital_products::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
