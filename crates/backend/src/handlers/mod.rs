pub mod a001_color;
pub mod a002_location;
pub mod a003_product;
pub mod a004_goods_receipt;
pub mod a005_sale;
pub mod p900_stock;
pub mod p901_conversion;
pub mod p902_conversion_history;
