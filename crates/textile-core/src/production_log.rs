//! 生產紀錄模型

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 生產紀錄（一次產量申報）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionLogEntry {
    /// 紀錄ID
    pub id: Uuid,

    /// 所屬訂單ID
    pub order_id: Uuid,

    /// 申報數量
    pub quantity: i64,

    /// 申報時間
    pub logged_at: NaiveDateTime,
}

impl ProductionLogEntry {
    /// 創建新的生產紀錄
    pub fn new(order_id: Uuid, quantity: i64, logged_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            quantity,
            logged_at,
        }
    }

    /// 申報日期
    pub fn date(&self) -> NaiveDate {
        self.logged_at.date()
    }

    /// 申報時刻
    pub fn time(&self) -> NaiveTime {
        self.logged_at.time()
    }
}
