//! 訂單進度計算

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use textile_core::{CompletionStatus, ProductionOrder};

/// 訂單進度快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProgress {
    /// 剩餘數量
    pub remaining_quantity: i64,

    /// 完成百分比（一位小數）
    pub progress_percent: Decimal,

    /// 剩餘工作天數（未進位）
    pub remaining_work_days: Decimal,

    /// 完工狀態
    pub status: CompletionStatus,
}

/// 進度計算器
pub struct ProgressCalculator;

impl ProgressCalculator {
    /// 計算完整進度快照
    pub fn snapshot(order: &ProductionOrder) -> textile_core::Result<OrderProgress> {
        Ok(OrderProgress {
            remaining_quantity: Self::remaining_quantity(order),
            progress_percent: Self::progress_percent(order)?,
            remaining_work_days: Self::remaining_work_days(order)?,
            status: order.status(),
        })
    }

    /// 剩餘數量（不小於 0）
    pub fn remaining_quantity(order: &ProductionOrder) -> i64 {
        (order.total_quantity - order.produced_quantity).max(0)
    }

    /// 完成百分比，四捨五入到一位小數
    pub fn progress_percent(order: &ProductionOrder) -> textile_core::Result<Decimal> {
        Self::ensure_positive_quantity(order)?;

        let ratio = Decimal::from(order.produced_quantity) / Decimal::from(order.total_quantity);
        Ok((ratio * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
    }

    /// 剩餘工作天數 = 剩餘數量 / 日產量
    ///
    /// 不在此處進位，由使用端套用 `WorkCalendar::whole_work_days`。
    pub fn remaining_work_days(order: &ProductionOrder) -> textile_core::Result<Decimal> {
        Self::ensure_positive_quantity(order)?;
        Self::ensure_positive_rate(order)?;

        Ok(Decimal::from(Self::remaining_quantity(order)) / Decimal::from(order.daily_rate))
    }

    /// 完整計劃工作天數 = 訂單數量 / 日產量
    pub fn planned_work_days(order: &ProductionOrder) -> textile_core::Result<Decimal> {
        Self::ensure_positive_quantity(order)?;
        Self::ensure_positive_rate(order)?;

        Ok(Decimal::from(order.total_quantity) / Decimal::from(order.daily_rate))
    }

    fn ensure_positive_quantity(order: &ProductionOrder) -> textile_core::Result<()> {
        if order.total_quantity <= 0 {
            return Err(order.invalid(
                "total_quantity",
                format!("必須大於 0，實際為 {}", order.total_quantity),
            ));
        }
        Ok(())
    }

    fn ensure_positive_rate(order: &ProductionOrder) -> textile_core::Result<()> {
        if order.daily_rate <= 0 {
            return Err(order.invalid(
                "daily_rate",
                format!("必須大於 0，實際為 {}", order.daily_rate),
            ));
        }
        Ok(())
    }
}
