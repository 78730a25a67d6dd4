pub mod assessment;
pub mod dashboard;
pub mod patient;
pub mod transaction;
pub mod usage;
pub mod user;
