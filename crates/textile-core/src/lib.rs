//! # Textile Core
//!
//! 生產訂單核心資料模型、工作日曆與錯誤類型

pub mod calendar;
pub mod config;
pub mod module;
pub mod order;
pub mod production_log;

// Re-export 主要類型
pub use calendar::WorkCalendar;
pub use config::PlannerConfig;
pub use module::ModuleId;
pub use order::{CompletionStatus, ProductionOrder};
pub use production_log::ProductionLogEntry;

use uuid::Uuid;

/// 排產錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("訂單資料無效 (訂單 {order_id}, 欄位 {field}): {reason}")]
    InvalidOrder {
        order_id: Uuid,
        field: &'static str,
        reason: String,
    },

    #[error(
        "生產數量超出訂單總量 (訂單 {order_id}): 申報 {requested}，已生產 {produced}/{total}"
    )]
    OverproductionRejected {
        order_id: Uuid,
        requested: i64,
        produced: i64,
        total: i64,
    },

    #[error("生產數量必須大於 0 (訂單 {order_id}): {quantity}")]
    InvalidQuantity { order_id: Uuid, quantity: i64 },

    #[error("無效的生產模組: {0}")]
    InvalidModule(ModuleId),

    #[error("找不到訂單: {0}")]
    OrderNotFound(Uuid),

    #[error("找不到生產紀錄: {0}")]
    EntryNotFound(Uuid),

    #[error("訂單編號已存在: {0}")]
    DuplicateOrderNumber(String),

    #[error("排程位置超出範圍: {index}（共 {len} 筆）")]
    SequenceIndexOutOfRange { index: usize, len: usize },

    #[error("無效的日期: {0}")]
    InvalidDate(String),

    #[error("配置錯誤: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
