use chrono::NaiveDateTime;

use crate::domain::RecordedOrder;

/// INSERT ... RETURNING 返回的行
#[derive(Debug, sqlx::FromRow)]
pub struct RecordedOrderRow {
    pub id: i32,
    pub order_date: NaiveDateTime,
}

impl From<RecordedOrderRow> for RecordedOrder {
    fn from(row: RecordedOrderRow) -> Self {
        Self {
            id: row.id,
            order_date: row.order_date,
        }
    }
}
