pub mod config;
pub mod nav;
pub mod routes;
pub mod types;
