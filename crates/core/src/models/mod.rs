pub mod chart;
pub mod price;
pub mod settings;
pub mod symbol;
pub mod transaction;
pub mod valuation;
