pub mod chart_service;
pub mod ledger_service;
pub mod price_service;
pub mod valuation_service;
