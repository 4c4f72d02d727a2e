//! Persistence implementations

mod postgres;
mod rows;

pub use postgres::{CREATE_ORDERS_TABLE, PostgresOrderRepository};
