//! 模組排程時間軸
//!
//! 將同一模組內物料已到倉、尚未完工的訂單依序串接：
//! 第一筆從參考日期開工，其後每筆在前一筆完工後的下一個工作日開工。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use textile_core::{ModuleId, PlannerError, ProductionOrder, WorkCalendar};
use uuid::Uuid;

use crate::progress::ProgressCalculator;

/// 排程時段（每次計算重新產生，不持久化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSlot {
    /// 訂單ID
    pub order_id: Uuid,

    /// 生產單號
    pub order_number: String,

    /// 生產模組
    pub module: ModuleId,

    /// 排程位置（從 0 開始）
    pub sequence_position: usize,

    /// 剩餘數量
    pub remaining_quantity: i64,

    /// 工作天數（已進位）
    pub work_days: u32,

    /// 計劃開工日
    pub planned_start_date: NaiveDate,

    /// 計劃完工日
    pub planned_end_date: NaiveDate,
}

/// 排程順序（交由持久層保存）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceAssignment {
    pub order_id: Uuid,
    pub sequence_order: u32,
}

/// 排程時間軸
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// 參考日期（第一筆的開工日）
    pub reference_date: NaiveDate,

    /// 模組範圍（None 表示全部模組）
    pub module: Option<ModuleId>,

    /// 參與排程的訂單快照（按排程順序）
    pub orders: Vec<ProductionOrder>,

    /// 排程時段
    pub slots: Vec<ScheduledSlot>,

    /// 總工作天數
    pub total_work_days: u32,

    /// 最終完工日
    pub final_end_date: Option<NaiveDate>,
}

impl Timeline {
    /// 創建空的時間軸
    pub fn empty(reference_date: NaiveDate, module: Option<ModuleId>) -> Self {
        Self {
            reference_date,
            module,
            orders: Vec::new(),
            slots: Vec::new(),
            total_work_days: 0,
            final_end_date: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 第一筆的開工日
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.slots.first().map(|slot| slot.planned_start_date)
    }

    /// 查找訂單的排程時段
    pub fn slot_for(&self, order_id: Uuid) -> Option<&ScheduledSlot> {
        self.slots.iter().find(|slot| slot.order_id == order_id)
    }

    /// 目前的排程順序
    pub fn sequence_assignments(&self) -> Vec<SequenceAssignment> {
        self.slots
            .iter()
            .map(|slot| SequenceAssignment {
                order_id: slot.order_id,
                sequence_order: slot.sequence_position as u32,
            })
            .collect()
    }
}

/// 時間軸排程器
pub struct TimelineScheduler<'a> {
    calendar: &'a WorkCalendar,
}

impl<'a> TimelineScheduler<'a> {
    /// 創建新的排程器
    pub fn new(calendar: &'a WorkCalendar) -> Self {
        Self { calendar }
    }

    /// 檢查訂單是否可排程（物料到倉且未完工）
    ///
    /// 以數量直接比較，避免 99.96% 被四捨五入成 100% 而漏排。
    pub fn is_eligible(order: &ProductionOrder) -> textile_core::Result<bool> {
        if !order.materials_ready {
            return Ok(false);
        }

        order.validate()?;
        Ok(!order.is_complete())
    }

    /// 篩選可排程訂單，保持輸入順序
    pub fn eligible_orders(
        orders: &[ProductionOrder],
        module: Option<ModuleId>,
    ) -> textile_core::Result<Vec<ProductionOrder>> {
        let mut eligible = Vec::new();

        for order in orders {
            if module.is_some_and(|m| m != order.module) {
                continue;
            }
            if Self::is_eligible(order)? {
                eligible.push(order.clone());
            }
        }

        Ok(eligible)
    }

    /// 依持久化的排程順序排序（相同順序保持輸入順序）
    pub fn sort_by_sequence(orders: &mut [ProductionOrder]) {
        orders.sort_by_key(|order| order.sequence_order);
    }

    /// 計算時間軸
    ///
    /// `orders` 的順序即排程順序；不可排程的訂單會被略過。
    pub fn compute(
        &self,
        orders: &[ProductionOrder],
        module: Option<ModuleId>,
        reference_date: NaiveDate,
    ) -> textile_core::Result<Timeline> {
        let eligible = Self::eligible_orders(orders, module)?;
        tracing::info!(
            "計算排程時間軸：模組 {:?}，候選 {} 筆，可排程 {} 筆",
            module,
            orders.len(),
            eligible.len()
        );

        self.build(eligible, module, reference_date)
    }

    /// 每個模組各自計算一條時間軸
    pub fn schedule_by_module(
        &self,
        orders: &[ProductionOrder],
        modules: &[ModuleId],
        reference_date: NaiveDate,
    ) -> textile_core::Result<BTreeMap<ModuleId, Timeline>> {
        let mut timelines = BTreeMap::new();

        for &module in modules {
            let timeline = self.compute(orders, Some(module), reference_date)?;
            timelines.insert(module, timeline);
        }

        Ok(timelines)
    }

    /// 手動調整順序：將 `from` 位置的訂單移到 `to`，整條時間軸重新計算
    ///
    /// `from == to` 時不檢查位置也不重新計算，直接返回原時間軸（空時間軸亦同）。
    pub fn reorder(
        &self,
        timeline: &Timeline,
        from: usize,
        to: usize,
    ) -> textile_core::Result<Timeline> {
        if from == to {
            tracing::debug!("排程位置未變動 ({} → {})，略過重算", from, to);
            return Ok(timeline.clone());
        }

        let len = timeline.orders.len();
        for index in [from, to] {
            if index >= len {
                return Err(PlannerError::SequenceIndexOutOfRange { index, len });
            }
        }

        let mut orders = timeline.orders.clone();
        let moved = orders.remove(from);
        tracing::info!("調整排程順序：{} 從 {} 移到 {}", moved.order_number, from, to);
        orders.insert(to, moved);

        self.build(orders, timeline.module, timeline.reference_date)
    }

    /// 串接訂單產生排程時段
    fn build(
        &self,
        mut orders: Vec<ProductionOrder>,
        module: Option<ModuleId>,
        reference_date: NaiveDate,
    ) -> textile_core::Result<Timeline> {
        if orders.is_empty() {
            return Ok(Timeline::empty(reference_date, module));
        }

        let mut slots = Vec::with_capacity(orders.len());
        let mut total_work_days: u32 = 0;
        let mut previous_end: Option<NaiveDate> = None;

        for (position, order) in orders.iter_mut().enumerate() {
            let remaining_quantity = ProgressCalculator::remaining_quantity(order);
            let work_days =
                WorkCalendar::whole_work_days(ProgressCalculator::remaining_work_days(order)?)?;

            // 工作天數從前一筆完工日之後起算；第一筆從參考日期起算
            let (anchor, planned_start_date) = match previous_end {
                None => (reference_date, reference_date),
                Some(end) => (end, self.calendar.next_business_day(end)?),
            };
            let planned_end_date = self.calendar.add_whole_business_days(anchor, work_days)?;

            tracing::debug!(
                "#{} {}: 剩餘 {} 件，{} 個工作日，{} ~ {}",
                position,
                order.order_number,
                remaining_quantity,
                work_days,
                planned_start_date,
                planned_end_date
            );

            order.sequence_order = position as u32;
            slots.push(ScheduledSlot {
                order_id: order.id,
                order_number: order.order_number.clone(),
                module: order.module,
                sequence_position: position,
                remaining_quantity,
                work_days,
                planned_start_date,
                planned_end_date,
            });

            total_work_days = total_work_days.saturating_add(work_days);
            previous_end = Some(planned_end_date);
        }

        tracing::info!(
            "時間軸完成：{} 筆，總工作天數 {}，最終完工日 {:?}",
            slots.len(),
            total_work_days,
            previous_end
        );

        Ok(Timeline {
            reference_date,
            module,
            orders,
            slots,
            total_work_days,
            final_end_date: previous_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wednesday() -> NaiveDate {
        date(2025, 10, 8)
    }

    fn ready(number: &str, remaining: i64, rate: i64, module: u8) -> ProductionOrder {
        ProductionOrder::new(number.to_string(), date(2025, 10, 1), remaining, rate, ModuleId(module))
            .with_materials_ready(true)
    }

    #[test]
    fn test_empty_timeline_is_valid() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);

        let timeline = scheduler.compute(&[], None, wednesday()).unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.total_work_days, 0);
        assert_eq!(timeline.final_end_date, None);
        assert_eq!(timeline.start_date(), None);
    }

    #[test]
    fn test_two_orders_chain_across_weekend() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let a = ready("A", 1000, 500, 1);
        let b = ready("B", 300, 100, 1);

        let timeline = scheduler
            .compute(&[a.clone(), b.clone()], Some(ModuleId(1)), wednesday())
            .unwrap();

        assert_eq!(timeline.len(), 2);

        let slot_a = &timeline.slots[0];
        assert_eq!(slot_a.order_id, a.id);
        assert_eq!(slot_a.work_days, 2);
        assert_eq!(slot_a.planned_start_date, date(2025, 10, 8));
        assert_eq!(slot_a.planned_end_date, date(2025, 10, 10));

        let slot_b = &timeline.slots[1];
        assert_eq!(slot_b.order_id, b.id);
        assert_eq!(slot_b.work_days, 3);
        assert_eq!(slot_b.planned_start_date, date(2025, 10, 13));
        assert_eq!(slot_b.planned_end_date, date(2025, 10, 15));

        assert_eq!(timeline.total_work_days, 5);
        assert_eq!(timeline.final_end_date, Some(date(2025, 10, 15)));
    }

    #[test]
    fn test_reorder_regenerates_every_slot() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let a = ready("A", 1000, 500, 1);
        let b = ready("B", 300, 100, 1);

        let before = scheduler.compute(&[a.clone(), b.clone()], None, wednesday()).unwrap();
        let reordered = scheduler.reorder(&before, 1, 0).unwrap();

        assert_eq!(reordered.slots[0].order_id, b.id);
        assert_eq!(reordered.slots[1].order_id, a.id);
        assert_eq!(reordered.slots[0].sequence_position, 0);

        let old_a = before.slot_for(a.id).unwrap();
        let old_b = before.slot_for(b.id).unwrap();
        let new_a = reordered.slot_for(a.id).unwrap();
        let new_b = reordered.slot_for(b.id).unwrap();

        // B: 週三 ~ 下週一；A: 下週二 ~ 下週三
        assert_eq!(new_b.planned_start_date, date(2025, 10, 8));
        assert_eq!(new_b.planned_end_date, date(2025, 10, 13));
        assert_eq!(new_a.planned_start_date, date(2025, 10, 14));
        assert_eq!(new_a.planned_end_date, date(2025, 10, 15));

        assert_ne!(old_a.planned_start_date, new_a.planned_start_date);
        assert_ne!(old_a.planned_end_date, new_a.planned_end_date);
        assert_ne!(old_b.planned_start_date, new_b.planned_start_date);
        assert_ne!(old_b.planned_end_date, new_b.planned_end_date);
        assert_eq!(reordered.total_work_days, 5);
    }

    #[test]
    fn test_reorder_same_position_is_noop() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let orders = vec![ready("A", 1000, 500, 1), ready("B", 300, 100, 1), ready("C", 90, 30, 1)];

        let timeline = scheduler.compute(&orders, None, wednesday()).unwrap();
        let unchanged = scheduler.reorder(&timeline, 1, 1).unwrap();

        assert_eq!(unchanged, timeline);
    }

    #[test]
    fn test_reorder_same_position_on_empty_timeline() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let empty = scheduler.compute(&[], Some(ModuleId(1)), wednesday()).unwrap();

        assert_eq!(scheduler.reorder(&empty, 0, 0).unwrap(), empty);
    }

    #[test]
    fn test_reorder_out_of_range() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let timeline = scheduler.compute(&[ready("A", 10, 5, 1)], None, wednesday()).unwrap();

        assert_eq!(
            scheduler.reorder(&timeline, 0, 3),
            Err(PlannerError::SequenceIndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_ineligible_orders_are_skipped() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);

        let not_ready = ready("WAIT", 100, 10, 1).with_materials_ready(false);
        let done = ready("DONE", 100, 10, 1).with_produced_quantity(100);
        let other_module = ready("M2", 100, 10, 2);
        let active = ready("GO", 100, 10, 1).with_produced_quantity(40);

        let timeline = scheduler
            .compute(&[not_ready, done, other_module, active.clone()], Some(ModuleId(1)), wednesday())
            .unwrap();

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.slots[0].order_id, active.id);
        assert_eq!(timeline.slots[0].remaining_quantity, 60);
        assert_eq!(timeline.slots[0].work_days, 6);
    }

    #[test]
    fn test_nearly_complete_order_stays_eligible() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);

        // 99.99% 顯示為 100.0%，但仍有 1 件待生產
        let order = ready("ALMOST", 10_000, 500, 1).with_produced_quantity(9_999);
        let timeline = scheduler.compute(&[order], None, wednesday()).unwrap();

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.slots[0].work_days, 1);
    }

    #[test]
    fn test_invalid_candidate_fails_fast() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let broken = ready("BROKEN", 100, 0, 1);

        assert!(matches!(
            scheduler.compute(&[broken.clone()], None, wednesday()),
            Err(PlannerError::InvalidOrder { order_id, field: "daily_rate", .. }) if order_id == broken.id
        ));
    }

    #[test]
    fn test_compute_does_not_touch_estimates() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let mut order = ready("A", 1000, 500, 1);
        order.estimated_completion_date = Some(date(2030, 1, 1));

        let timeline = scheduler.compute(&[order], None, wednesday()).unwrap();
        assert_eq!(timeline.orders[0].estimated_completion_date, Some(date(2030, 1, 1)));
    }

    #[test]
    fn test_schedule_by_module() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let orders = vec![ready("A", 1000, 500, 1), ready("B", 300, 100, 2), ready("C", 200, 100, 1)];

        let timelines = scheduler
            .schedule_by_module(&orders, &[ModuleId(1), ModuleId(2), ModuleId(3)], wednesday())
            .unwrap();

        assert_eq!(timelines[&ModuleId(1)].len(), 2);
        assert_eq!(timelines[&ModuleId(1)].total_work_days, 4);
        assert_eq!(timelines[&ModuleId(2)].len(), 1);
        assert!(timelines[&ModuleId(3)].is_empty());
    }

    #[test]
    fn test_sequence_assignments_follow_reorder() {
        let calendar = WorkCalendar::default();
        let scheduler = TimelineScheduler::new(&calendar);
        let a = ready("A", 100, 50, 1);
        let b = ready("B", 100, 50, 1);
        let c = ready("C", 100, 50, 1);

        let timeline = scheduler.compute(&[a.clone(), b.clone(), c.clone()], None, wednesday()).unwrap();
        let reordered = scheduler.reorder(&timeline, 0, 2).unwrap();

        assert_eq!(
            reordered.sequence_assignments(),
            vec![
                SequenceAssignment { order_id: b.id, sequence_order: 0 },
                SequenceAssignment { order_id: c.id, sequence_order: 1 },
                SequenceAssignment { order_id: a.id, sequence_order: 2 },
            ]
        );
        assert_eq!(reordered.orders[2].sequence_order, 2);
    }

    #[test]
    fn test_sort_by_sequence_is_stable() {
        let mut orders = vec![
            ready("X", 10, 5, 1).with_sequence_order(2),
            ready("Y", 10, 5, 1).with_sequence_order(0),
            ready("Z", 10, 5, 1).with_sequence_order(2),
        ];

        TimelineScheduler::sort_by_sequence(&mut orders);

        let numbers: Vec<_> = orders.iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["Y", "X", "Z"]);
    }
}
