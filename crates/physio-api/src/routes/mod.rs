pub mod admin;
pub mod assessments;
pub mod auth;
pub mod cost;
pub mod findings;
pub mod health;
pub mod patients;
pub mod suggestions;
