//! # Textile Store
//!
//! 訂單持久層介面、記憶體實作與排產服務

pub mod memory;
pub mod repository;
pub mod service;

// Re-export 主要類型
pub use memory::InMemoryOrderRepository;
pub use repository::OrderRepository;
pub use service::{OrderUpdate, PlanningService};
