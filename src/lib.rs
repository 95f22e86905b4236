// Public modules
pub mod auth;
pub mod client;
pub mod domains;
pub mod errors;
