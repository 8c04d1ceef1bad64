//! 單一訂單完工日期預估

use chrono::NaiveDate;
use rust_decimal::Decimal;
use textile_core::{ProductionOrder, WorkCalendar};

use crate::progress::ProgressCalculator;

/// 預估模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateMode {
    /// 從入單日期起算完整訂單數量（建立或修改訂單時）
    PlanFromEntry,
    /// 從參考日期起算剩餘數量（看板顯示、申報產量後）
    RemainingFrom(NaiveDate),
}

/// 完工日期預估器
pub struct CompletionEstimator<'a> {
    calendar: &'a WorkCalendar,
}

impl<'a> CompletionEstimator<'a> {
    /// 創建新的預估器
    pub fn new(calendar: &'a WorkCalendar) -> Self {
        Self { calendar }
    }

    /// 按模式預估完工日期
    pub fn estimate(
        &self,
        order: &ProductionOrder,
        mode: EstimateMode,
    ) -> textile_core::Result<NaiveDate> {
        match mode {
            EstimateMode::PlanFromEntry => self.plan_from_entry(order),
            EstimateMode::RemainingFrom(reference_date) => {
                self.remaining_from(order, reference_date)
            }
        }
    }

    /// 完整計劃：入單日期 + 訂單數量 / 日產量
    pub fn plan_from_entry(&self, order: &ProductionOrder) -> textile_core::Result<NaiveDate> {
        let work_days = ProgressCalculator::planned_work_days(order)?;
        self.calendar.add_business_days(order.entry_date, work_days)
    }

    /// 剩餘預估：參考日期 + 剩餘數量 / 日產量
    ///
    /// 已完工的訂單直接返回參考日期。
    pub fn remaining_from(
        &self,
        order: &ProductionOrder,
        reference_date: NaiveDate,
    ) -> textile_core::Result<NaiveDate> {
        let remaining_days = ProgressCalculator::remaining_work_days(order)?;
        if remaining_days <= Decimal::ZERO {
            return Ok(reference_date);
        }

        self.calendar.add_business_days(reference_date, remaining_days)
    }

    /// 重新計算完整計劃並寫回訂單
    pub fn refresh_plan(&self, order: &mut ProductionOrder) -> textile_core::Result<NaiveDate> {
        let estimate = self.plan_from_entry(order)?;
        tracing::debug!(
            "訂單 {} 完整計劃完工日: {}",
            order.order_number,
            estimate
        );
        order.estimated_completion_date = Some(estimate);
        Ok(estimate)
    }
}
