//! # Textile Calculation Engine
//!
//! 進度計算、完工預估、模組排程與產量申報

pub mod estimator;
pub mod production;
pub mod progress;
pub mod timeline;

// Re-export 主要類型
pub use estimator::{CompletionEstimator, EstimateMode};
pub use production::{ProductionOutcome, ProductionRecorder};
pub use progress::{OrderProgress, ProgressCalculator};
pub use timeline::{ScheduledSlot, SequenceAssignment, Timeline, TimelineScheduler};
