pub mod authentication;
pub mod health;
pub mod root;
