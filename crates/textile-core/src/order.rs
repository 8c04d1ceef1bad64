//! 生產訂單模型

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ModuleId, PlannerError, ProductionLogEntry, Result};

/// 完工狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    /// 生產中（已生產 < 訂單數量）
    Incomplete,
    /// 已完工（已生產 == 訂單數量）
    Complete,
}

/// 生產訂單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    /// 訂單ID
    pub id: Uuid,

    /// 生產單號（全域唯一）
    pub order_number: String,

    /// 款式編號
    pub reference: String,

    /// 顏色
    pub color: String,

    /// 入單日期（完整計劃的起算日）
    pub entry_date: NaiveDate,

    /// 訂單數量
    pub total_quantity: i64,

    /// 平均日產量（每個工作日）
    pub daily_rate: i64,

    /// 已生產數量（生產紀錄的合計）
    pub produced_quantity: i64,

    /// 生產模組
    pub module: ModuleId,

    /// 物料是否已到倉（排程前提）
    pub materials_ready: bool,

    /// 是否為模組目前在線生產的訂單
    pub in_production: bool,

    /// 手動排程順序
    pub sequence_order: u32,

    /// 建立時間
    pub created_at: NaiveDateTime,

    /// 預估完工日期（衍生欄位）
    pub estimated_completion_date: Option<NaiveDate>,

    /// 生產紀錄
    pub production_log: Vec<ProductionLogEntry>,
}

impl ProductionOrder {
    /// 創建新的生產訂單
    pub fn new(
        order_number: String,
        entry_date: NaiveDate,
        total_quantity: i64,
        daily_rate: i64,
        module: ModuleId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_number,
            reference: String::new(),
            color: String::new(),
            entry_date,
            total_quantity,
            daily_rate,
            produced_quantity: 0,
            module,
            materials_ready: false,
            in_production: false,
            sequence_order: 0,
            created_at: entry_date.and_time(chrono::NaiveTime::MIN),
            estimated_completion_date: None,
            production_log: Vec::new(),
        }
    }

    /// 建構器模式：設置款式與顏色
    pub fn with_reference(mut self, reference: String, color: String) -> Self {
        self.reference = reference;
        self.color = color;
        self
    }

    /// 建構器模式：設置物料到倉
    pub fn with_materials_ready(mut self, ready: bool) -> Self {
        self.materials_ready = ready;
        self
    }

    /// 建構器模式：設置已生產數量（從外部快照載入時使用）
    pub fn with_produced_quantity(mut self, produced: i64) -> Self {
        self.produced_quantity = produced;
        self
    }

    /// 建構器模式：設置排程順序
    pub fn with_sequence_order(mut self, sequence_order: u32) -> Self {
        self.sequence_order = sequence_order;
        self
    }

    /// 建構器模式：設置建立時間
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// 檢查訂單資料完整性
    ///
    /// 生產單號不可為空；訂單數量與日產量必須大於 0，已生產數量必須介於 0 與訂單數量之間。
    pub fn validate(&self) -> Result<()> {
        if self.order_number.trim().is_empty() {
            return Err(self.invalid("order_number", "不可為空".to_string()));
        }

        if self.total_quantity <= 0 {
            return Err(self.invalid("total_quantity", format!("必須大於 0，實際為 {}", self.total_quantity)));
        }

        if self.daily_rate <= 0 {
            return Err(self.invalid("daily_rate", format!("必須大於 0，實際為 {}", self.daily_rate)));
        }

        if self.produced_quantity < 0 || self.produced_quantity > self.total_quantity {
            return Err(self.invalid(
                "produced_quantity",
                format!(
                    "必須介於 0 與 {} 之間，實際為 {}",
                    self.total_quantity, self.produced_quantity
                ),
            ));
        }

        Ok(())
    }

    /// 建立帶有訂單上下文的資料錯誤
    pub fn invalid(&self, field: &'static str, reason: String) -> PlannerError {
        PlannerError::InvalidOrder {
            order_id: self.id,
            field,
            reason,
        }
    }

    /// 完工狀態
    pub fn status(&self) -> CompletionStatus {
        if self.produced_quantity >= self.total_quantity {
            CompletionStatus::Complete
        } else {
            CompletionStatus::Incomplete
        }
    }

    /// 檢查是否已完工
    pub fn is_complete(&self) -> bool {
        self.status() == CompletionStatus::Complete
    }

    /// 生產紀錄合計數量
    pub fn logged_quantity(&self) -> i64 {
        self.production_log.iter().map(|entry| entry.quantity).sum()
    }

    /// 查找生產紀錄
    pub fn find_entry(&self, entry_id: Uuid) -> Option<&ProductionLogEntry> {
        self.production_log.iter().find(|entry| entry.id == entry_id)
    }
}
