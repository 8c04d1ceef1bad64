//! 產量申報與其對訂單的連帶更新
//!
//! 狀態只有「生產中」與「已完工」兩種：
//! - 生產中 → 生產中：新增紀錄、累加已生產數量，並從申報當天重估完工日
//! - 生產中 → 已完工：新增紀錄、累加到訂單數量，不再重估
//! - 刪除紀錄：扣回數量；若回到生產中，從刪除當天重估完工日

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use textile_core::{CompletionStatus, PlannerError, ProductionLogEntry, ProductionOrder, WorkCalendar};
use uuid::Uuid;

use crate::estimator::CompletionEstimator;
use crate::progress::ProgressCalculator;

/// 申報結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionOutcome {
    /// 新增或刪除的生產紀錄
    pub entry: ProductionLogEntry,

    /// 更新後的已生產數量
    pub produced_quantity: i64,

    /// 更新後的完工狀態
    pub status: CompletionStatus,

    /// 更新後的預估完工日
    pub estimated_completion_date: Option<chrono::NaiveDate>,
}

impl ProductionOutcome {
    fn from_order(entry: ProductionLogEntry, order: &ProductionOrder) -> Self {
        Self {
            entry,
            produced_quantity: order.produced_quantity,
            status: order.status(),
            estimated_completion_date: order.estimated_completion_date,
        }
    }
}

/// 產量申報處理器
pub struct ProductionRecorder<'a> {
    estimator: CompletionEstimator<'a>,
}

impl<'a> ProductionRecorder<'a> {
    /// 創建新的申報處理器
    pub fn new(calendar: &'a WorkCalendar) -> Self {
        Self {
            estimator: CompletionEstimator::new(calendar),
        }
    }

    /// 申報產量
    ///
    /// 超出訂單總量的申報會被拒絕，訂單與紀錄保持不變。
    pub fn record(
        &self,
        order: &mut ProductionOrder,
        quantity: i64,
        logged_at: NaiveDateTime,
    ) -> textile_core::Result<ProductionOutcome> {
        order.validate()?;

        if quantity <= 0 {
            return Err(PlannerError::InvalidQuantity {
                order_id: order.id,
                quantity,
            });
        }

        let remaining = ProgressCalculator::remaining_quantity(order);
        if quantity > remaining {
            tracing::warn!(
                "訂單 {} 申報 {} 件超出剩餘 {} 件，已拒絕",
                order.order_number,
                quantity,
                remaining
            );
            return Err(PlannerError::OverproductionRejected {
                order_id: order.id,
                requested: quantity,
                produced: order.produced_quantity,
                total: order.total_quantity,
            });
        }

        let entry = ProductionLogEntry::new(order.id, quantity, logged_at);
        order.production_log.push(entry.clone());
        order.produced_quantity += quantity;

        match order.status() {
            CompletionStatus::Incomplete => {
                let estimate = self.estimator.remaining_from(order, logged_at.date())?;
                order.estimated_completion_date = Some(estimate);
                tracing::info!(
                    "訂單 {} 申報 {} 件（{}/{}），預估完工日更新為 {}",
                    order.order_number,
                    quantity,
                    order.produced_quantity,
                    order.total_quantity,
                    estimate
                );
            }
            CompletionStatus::Complete => {
                tracing::info!(
                    "訂單 {} 申報 {} 件，已完工（{}/{}）",
                    order.order_number,
                    quantity,
                    order.produced_quantity,
                    order.total_quantity
                );
            }
        }

        Ok(ProductionOutcome::from_order(entry, order))
    }

    /// 刪除生產紀錄並扣回已生產數量
    ///
    /// 在副本上完成扣回與重估，全部成功後才寫回；失敗時訂單保持不變。
    pub fn remove_entry(
        &self,
        order: &mut ProductionOrder,
        entry_id: Uuid,
        at: NaiveDateTime,
    ) -> textile_core::Result<ProductionOutcome> {
        order.validate()?;

        let index = order
            .production_log
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or(PlannerError::EntryNotFound(entry_id))?;

        let previous_status = order.status();
        let mut updated = order.clone();
        let entry = updated.production_log.remove(index);
        updated.produced_quantity = (updated.produced_quantity - entry.quantity).max(0);

        if updated.status() == CompletionStatus::Incomplete {
            let estimate = self.estimator.remaining_from(&updated, at.date())?;
            updated.estimated_completion_date = Some(estimate);

            if previous_status == CompletionStatus::Complete {
                tracing::info!("訂單 {} 刪除紀錄後重新開啟", updated.order_number);
            }
        }

        *order = updated;

        tracing::info!(
            "訂單 {} 刪除生產紀錄 {}（{} 件），已生產 {}/{}",
            order.order_number,
            entry.id,
            entry.quantity,
            order.produced_quantity,
            order.total_quantity
        );

        Ok(ProductionOutcome::from_order(entry, order))
    }
}
