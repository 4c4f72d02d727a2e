//! 订单

use chrono::NaiveDateTime;
use errors::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;
use serde_json::Value;

/// 调用方提交的订单，六个字段原样入库
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewOrder {
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_amount: Decimal,
}

impl NewOrder {
    /// 从请求体解码订单
    ///
    /// 缺字段、类型不符、JSON 格式错误或数值为负时整体失败
    pub fn from_json(body: &[u8]) -> AppResult<Self> {
        let order: Self = serde_json::from_slice(body)?;
        order.validate()?;
        Ok(order)
    }

    fn validate(&self) -> AppResult<()> {
        if self.quantity < 0 {
            return Err(AppError::validation(format!(
                "quantity must not be negative, got {}",
                self.quantity
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        if self.total_amount < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "total_amount must not be negative, got {}",
                self.total_amount
            )));
        }
        Ok(())
    }
}

/// 存储分配的字段
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedOrder {
    pub id: i32,
    pub order_date: NaiveDateTime,
}

/// 标识符允许字符串或数字，数字保留请求中的原文（`1e3` 仍为 `1e3`）
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Err(de::Error::invalid_type(Unexpected::Bool(b), &"a string or number")),
        Value::Null => Err(de::Error::invalid_type(Unexpected::Unit, &"a string or number")),
        Value::Array(_) => Err(de::Error::invalid_type(Unexpected::Seq, &"a string or number")),
        Value::Object(_) => Err(de::Error::invalid_type(Unexpected::Map, &"a string or number")),
    }
}
