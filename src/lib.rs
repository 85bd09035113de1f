#[macro_use]
pub mod macros;

pub mod amount;
pub mod api;
pub mod batch;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod discovery;
pub mod parser;
pub mod retry;
pub mod schema;
pub mod updater;
pub mod validate;
