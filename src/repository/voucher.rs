use diesel::prelude::*;

use crate::domain::voucher::{NewVoucher as DomainNewVoucher, Voucher as DomainVoucher, VoucherListQuery};
use crate::models::voucher::{NewVoucher as DbNewVoucher, Voucher as DbVoucher};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, VoucherReader, VoucherWriter};

impl VoucherReader for DieselRepository {
    fn list_vouchers(
        &self,
        query: VoucherListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainVoucher>)> {
        use crate::schema::vouchers;

        let mut conn = self.conn()?;

        let mut count_query = vouchers::table
            .filter(vouchers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(code) = query.code.as_ref() {
            count_query = count_query.filter(vouchers::code.eq(code));
        }

        if let Some(digital_product_id) = query.digital_product_id {
            count_query = count_query.filter(vouchers::digital_product_id.eq(digital_product_id));
        }

        if let Some(status) = query.status {
            count_query = count_query.filter(vouchers::status.eq(status.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = vouchers::table
            .filter(vouchers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(code) = query.code.as_ref() {
            items = items.filter(vouchers::code.eq(code));
        }

        if let Some(digital_product_id) = query.digital_product_id {
            items = items.filter(vouchers::digital_product_id.eq(digital_product_id));
        }

        if let Some(status) = query.status {
            items = items.filter(vouchers::status.eq(status.as_str()));
        }

        items = items.order(vouchers::created_at.desc());

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let db_vouchers = items.load::<DbVoucher>(&mut conn)?;
        let vouchers = db_vouchers.into_iter().map(Into::into).collect();

        Ok((total, vouchers))
    }
}

impl VoucherWriter for DieselRepository {
    fn create_vouchers(&self, new_vouchers: &[DomainNewVoucher]) -> RepositoryResult<usize> {
        use crate::schema::vouchers;

        let mut conn = self.conn()?;

        // One transaction per import so a duplicate code rolls back the lot.
        let inserted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let mut inserted = 0;
            for new_voucher in new_vouchers {
                let db_new = DbNewVoucher::from(new_voucher);
                inserted += diesel::insert_into(vouchers::table)
                    .values(&db_new)
                    .execute(conn)?;
            }
            Ok(inserted)
        })?;

        Ok(inserted)
    }
}
