pub mod app_user;
pub mod business_area;
pub mod contract;
pub mod contract_history;
pub mod contract_manager;
pub mod manager;
