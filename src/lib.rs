#[macro_use]
extern crate diesel;

#[macro_use]
extern crate log;

pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod deployment;
pub mod errors;
pub mod models;
pub mod pagination;
pub mod portfolio;
pub mod price;
pub mod responses;
pub mod rpc;
pub mod schema;
pub mod store;
pub mod utils;
