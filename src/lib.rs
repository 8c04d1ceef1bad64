//! # Textile Planner
//!
//! 紡織生產訂單的完工預估與模組排程
//!
//! - [`textile_core`]：訂單、工作日曆、配置與錯誤類型
//! - [`textile_calc`]：進度、完工預估、時間軸排程、產量申報
//! - [`textile_store`]：倉儲介面與排產服務

pub mod logging;

pub use textile_calc;
pub use textile_core;
pub use textile_store;

pub use textile_calc::{
    CompletionEstimator, EstimateMode, ProductionRecorder, ProgressCalculator, ScheduledSlot,
    Timeline, TimelineScheduler,
};
pub use textile_core::{
    ModuleId, PlannerConfig, PlannerError, ProductionLogEntry, ProductionOrder, Result,
    WorkCalendar,
};
pub use textile_store::{InMemoryOrderRepository, OrderRepository, OrderUpdate, PlanningService};
