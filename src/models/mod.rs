pub mod digital_product;
pub mod price_rule;
pub mod product;
pub mod purchase_order;
pub mod supplier;
pub mod voucher;
