use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Redemption state of a voucher code.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoucherStatus {
    /// Held in stock, not yet sold.
    Available,
    /// Sold to a buyer but not yet redeemed.
    Sold,
    /// Redeemed by the end user.
    Redeemed,
}

impl VoucherStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VoucherStatus::Available => "available",
            VoucherStatus::Sold => "sold",
            VoucherStatus::Redeemed => "redeemed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(VoucherStatus::Available),
            "sold" => Some(VoucherStatus::Sold),
            "redeemed" => Some(VoucherStatus::Redeemed),
            _ => None,
        }
    }
}

impl Default for VoucherStatus {
    fn default() -> Self {
        Self::Available
    }
}

/// Domain representation of a single redeemable voucher code.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Voucher {
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Stock SKU this code belongs to.
    pub digital_product_id: i32,
    /// Purchase order the code arrived with, if tracked.
    pub purchase_order_id: Option<i32>,
    /// The redeemable code itself.
    pub code: String,
    pub status: VoucherStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new voucher for a hub.
#[derive(Debug, Clone)]
pub struct NewVoucher {
    pub hub_id: i32,
    pub digital_product_id: i32,
    pub purchase_order_id: Option<i32>,
    pub code: String,
    pub status: VoucherStatus,
    pub updated_at: NaiveDateTime,
}

impl NewVoucher {
    pub fn new(hub_id: i32, digital_product_id: i32, code: impl Into<String>) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            digital_product_id,
            purchase_order_id: None,
            code: code.into(),
            status: VoucherStatus::default(),
            updated_at: now,
        }
    }

    pub fn from_purchase_order(mut self, purchase_order_id: i32) -> Self {
        self.purchase_order_id = Some(purchase_order_id);
        self
    }
}

/// Query definition used to list vouchers for a hub.
#[derive(Debug, Clone)]
pub struct VoucherListQuery {
    pub hub_id: i32,
    /// Optional exact code lookup.
    pub code: Option<String>,
    pub digital_product_id: Option<i32>,
    pub status: Option<VoucherStatus>,
    pub pagination: Option<Pagination>,
}

impl VoucherListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            code: None,
            digital_product_id: None,
            status: None,
            pagination: None,
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn digital_product(mut self, digital_product_id: i32) -> Self {
        self.digital_product_id = Some(digital_product_id);
        self
    }

    pub fn status(mut self, status: VoucherStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
