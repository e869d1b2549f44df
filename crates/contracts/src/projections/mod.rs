pub mod p900_stock_balance;
pub mod p901_conversion;
pub mod p902_conversion_history;
