//! 领域层

mod order;
mod repository;

pub use order::{NewOrder, RecordedOrder};
pub use repository::OrderRepository;
