//! 排產服務：把訂單指令套用到倉儲，並維持衍生欄位一致

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use textile_calc::{
    CompletionEstimator, OrderProgress, ProductionOutcome, ProductionRecorder,
    ProgressCalculator, Timeline, TimelineScheduler,
};
use textile_core::{ModuleId, PlannerConfig, ProductionOrder, Result, WorkCalendar};
use uuid::Uuid;

use crate::repository::OrderRepository;

/// 訂單修改內容（None 表示不修改）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order_number: Option<String>,
    pub reference: Option<String>,
    pub color: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub total_quantity: Option<i64>,
    pub daily_rate: Option<i64>,
    pub module: Option<ModuleId>,
    pub materials_ready: Option<bool>,

    /// 經由倉儲設定或取消在線生產，維持模組內唯一
    pub in_production: Option<bool>,
}

impl OrderUpdate {
    /// 是否影響完整計劃（入單日期、數量、日產量）
    pub fn affects_plan(&self) -> bool {
        self.entry_date.is_some() || self.total_quantity.is_some() || self.daily_rate.is_some()
    }
}

/// 排產服務
pub struct PlanningService<R: OrderRepository> {
    repository: R,
    config: PlannerConfig,
    calendar: WorkCalendar,
}

impl<R: OrderRepository> PlanningService<R> {
    /// 創建新的排產服務
    pub fn new(repository: R, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let calendar = config.calendar();
        Ok(Self {
            repository,
            config,
            calendar,
        })
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 建立訂單並計算完整計劃完工日
    ///
    /// 新訂單一律從零開始：已生產數量、生產紀錄、在線標記與排程順序都會重設。
    pub fn create_order(&mut self, mut order: ProductionOrder) -> Result<ProductionOrder> {
        self.config.check_module(order.module)?;
        order.produced_quantity = 0;
        order.production_log.clear();
        order.in_production = false;
        order.sequence_order = 0;
        order.validate()?;

        CompletionEstimator::new(&self.calendar).refresh_plan(&mut order)?;
        self.repository.insert(order.clone())?;

        tracing::info!(
            "建立訂單 {}：{} 件，日產 {}，模組 {}，預估完工 {:?}",
            order.order_number,
            order.total_quantity,
            order.daily_rate,
            order.module,
            order.estimated_completion_date
        );
        Ok(order)
    }

    /// 修改訂單；入單日期、數量或日產量變動時重算完整計劃
    ///
    /// 換模組時取消在線標記，除非同一次修改明確要求在新模組上線。
    pub fn update_order(&mut self, id: Uuid, update: OrderUpdate) -> Result<ProductionOrder> {
        let mut order = self.repository.get(id)?;

        if let Some(module) = update.module {
            self.config.check_module(module)?;
            if module != order.module && order.in_production {
                tracing::info!(
                    "訂單 {} 從 {} 移到 {}，取消在線生產",
                    order.order_number,
                    order.module,
                    module
                );
                order.in_production = false;
            }
            order.module = module;
        }
        if let Some(order_number) = update.order_number.clone() {
            order.order_number = order_number;
        }
        if let Some(reference) = update.reference.clone() {
            order.reference = reference;
        }
        if let Some(color) = update.color.clone() {
            order.color = color;
        }
        if let Some(ready) = update.materials_ready {
            order.materials_ready = ready;
        }
        if let Some(entry_date) = update.entry_date {
            order.entry_date = entry_date;
        }
        if let Some(total) = update.total_quantity {
            order.total_quantity = total;
        }
        if let Some(rate) = update.daily_rate {
            order.daily_rate = rate;
        }

        order.validate()?;
        if update.affects_plan() {
            CompletionEstimator::new(&self.calendar).refresh_plan(&mut order)?;
        }

        self.repository.update(order)?;
        match update.in_production {
            Some(true) => self.repository.set_in_production(id)?,
            Some(false) => self.repository.clear_in_production(id)?,
            None => {}
        }

        let order = self.repository.get(id)?;
        tracing::info!("修改訂單 {}", order.order_number);
        Ok(order)
    }

    /// 刪除訂單及其生產紀錄
    pub fn delete_order(&mut self, id: Uuid) -> Result<ProductionOrder> {
        let order = self.repository.remove(id)?;
        tracing::info!(
            "刪除訂單 {}（{} 筆生產紀錄）",
            order.order_number,
            order.production_log.len()
        );
        Ok(order)
    }

    /// 申報產量
    pub fn log_production(
        &mut self,
        id: Uuid,
        quantity: i64,
        logged_at: NaiveDateTime,
    ) -> Result<ProductionOutcome> {
        let mut order = self.repository.get(id)?;
        let outcome = ProductionRecorder::new(&self.calendar).record(&mut order, quantity, logged_at)?;
        self.repository.update(order)?;
        Ok(outcome)
    }

    /// 刪除生產紀錄，扣回已生產數量並重估完工日
    pub fn delete_production_entry(
        &mut self,
        entry_id: Uuid,
        at: NaiveDateTime,
    ) -> Result<ProductionOutcome> {
        let order_id = self.repository.find_entry_owner(entry_id)?;
        let mut order = self.repository.get(order_id)?;
        let outcome = ProductionRecorder::new(&self.calendar).remove_entry(&mut order, entry_id, at)?;
        self.repository.update(order)?;
        Ok(outcome)
    }

    /// 設為模組內在線生產的訂單
    pub fn start_production(&mut self, id: Uuid) -> Result<()> {
        self.repository.set_in_production(id)?;
        tracing::info!("訂單 {} 設為在線生產", id);
        Ok(())
    }

    /// 取消訂單的在線生產標記
    pub fn stop_production(&mut self, id: Uuid) -> Result<()> {
        self.repository.clear_in_production(id)?;
        tracing::info!("訂單 {} 取消在線生產", id);
        Ok(())
    }

    /// 依生產單號搜尋訂單；空字串返回全部訂單
    pub fn search(&self, query: &str) -> Vec<ProductionOrder> {
        self.repository.search_by_order_number(query.trim())
    }

    /// 訂單進度
    pub fn progress(&self, id: Uuid) -> Result<OrderProgress> {
        ProgressCalculator::snapshot(&self.repository.get(id)?)
    }

    /// 看板用的剩餘預估（不寫回訂單）
    pub fn live_estimate(&self, id: Uuid, today: NaiveDate) -> Result<NaiveDate> {
        let order = self.repository.get(id)?;
        CompletionEstimator::new(&self.calendar).remaining_from(&order, today)
    }

    /// 依保存的排程順序計算時間軸
    pub fn timeline(&self, module: Option<ModuleId>, today: NaiveDate) -> Result<Timeline> {
        if let Some(module) = module {
            self.config.check_module(module)?;
        }

        let mut orders = self.repository.list();
        TimelineScheduler::sort_by_sequence(&mut orders);
        TimelineScheduler::new(&self.calendar).compute(&orders, module, today)
    }

    /// 手動調整順序並保存新的排程順序
    pub fn reorder_timeline(
        &mut self,
        timeline: &Timeline,
        from: usize,
        to: usize,
    ) -> Result<Timeline> {
        let reordered = TimelineScheduler::new(&self.calendar).reorder(timeline, from, to)?;
        if from != to {
            self.repository.apply_sequence(&reordered.sequence_assignments())?;
        }
        Ok(reordered)
    }
}
