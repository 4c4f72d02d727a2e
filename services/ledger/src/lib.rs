//! ledger - 订单记账服务
//!
//! 接收 `POST /record` 的订单 JSON，写入 PostgreSQL 的 `orders` 表

pub mod api;
pub mod domain;
pub mod error;
pub mod infrastructure;
