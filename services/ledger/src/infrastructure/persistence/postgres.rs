//! PostgreSQL implementation of OrderRepository

use async_trait::async_trait;
use errors::{AppError, AppResult};
use sqlx::{Connection, PgConnection, PgPool};
use tracing::debug;

use crate::domain::{NewOrder, OrderRepository, RecordedOrder};

use super::rows::RecordedOrderRow;

pub const CREATE_ORDERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS orders (
        id SERIAL PRIMARY KEY,
        user_id TEXT,
        product_id TEXT,
        name TEXT,
        quantity INTEGER,
        price NUMERIC,
        total_amount NUMERIC,
        order_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

const INSERT_ORDER: &str = r#"
    INSERT INTO orders (user_id, product_id, name, quantity, price, total_amount)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, order_date
"#;

/// 建表时持有的 advisory lock，多个实例同时启动时串行执行 DDL
const SCHEMA_LOCK_KEY: i64 = 0x6f72_6465_7273;

/// 每次写入前都在同一连接上确认 orders 表存在，表被删除后下一笔订单会重建
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn create_orders_table(conn: &mut PgConnection) -> AppResult<()> {
    let mut tx = conn
        .begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to ensure orders table: {}", e)))?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to ensure orders table: {}", e)))?;

    sqlx::query(CREATE_ORDERS_TABLE)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to ensure orders table: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to ensure orders table: {}", e)))?;

    debug!("Orders table ensured");
    Ok(())
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn ensure_schema(&self) -> AppResult<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::unavailable(format!("Failed to connect to database: {}", e)))?;

        create_orders_table(&mut conn).await
    }

    async fn record(&self, order: &NewOrder) -> AppResult<RecordedOrder> {
        // 连接在函数返回时归还连接池，成功和失败路径一致
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::unavailable(format!("Failed to connect to database: {}", e)))?;
        debug!("Connected to PostgreSQL");

        create_orders_table(&mut conn).await?;

        let row = sqlx::query_as::<_, RecordedOrderRow>(INSERT_ORDER)
            .bind(&order.user_id)
            .bind(&order.product_id)
            .bind(&order.name)
            .bind(order.quantity)
            .bind(order.price)
            .bind(order.total_amount)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert order: {}", e)))?;

        Ok(row.into())
    }
}
