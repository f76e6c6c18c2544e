use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::voucher::{
    NewVoucher as DomainNewVoucher, Voucher as DomainVoucher, VoucherStatus,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::vouchers)]
pub struct Voucher {
    pub id: i32,
    pub hub_id: i32,
    pub digital_product_id: i32,
    pub purchase_order_id: Option<i32>,
    pub code: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::vouchers)]
pub struct NewVoucher {
    pub hub_id: i32,
    pub digital_product_id: i32,
    pub purchase_order_id: Option<i32>,
    pub code: String,
    pub status: String,
}

impl From<Voucher> for DomainVoucher {
    fn from(value: Voucher) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            digital_product_id: value.digital_product_id,
            purchase_order_id: value.purchase_order_id,
            code: value.code,
            status: VoucherStatus::parse(&value.status).unwrap_or_default(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&DomainNewVoucher> for NewVoucher {
    fn from(value: &DomainNewVoucher) -> Self {
        Self {
            hub_id: value.hub_id,
            digital_product_id: value.digital_product_id,
            purchase_order_id: value.purchase_order_id,
            code: value.code.clone(),
            status: value.status.as_str().to_string(),
        }
    }
}
