pub mod common;

pub mod a001_color;
pub mod a002_location;
pub mod a003_product;
pub mod a004_goods_receipt;
pub mod a005_sale;
