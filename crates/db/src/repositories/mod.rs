pub mod alert;
pub mod building;
pub mod external_id;
pub mod listing;
pub mod master_property;
pub mod price_history;
pub mod retry;
