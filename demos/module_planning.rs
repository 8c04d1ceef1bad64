//! 模組排程示例
//!
//! 執行：`RUST_LOG=debug cargo run --example module_planning`

use chrono::NaiveDate;
use textile_planner::{
    logging, InMemoryOrderRepository, ModuleId, PlannerConfig, PlanningService, ProductionOrder,
};

fn main() -> anyhow::Result<()> {
    logging::init();

    println!("=== 模組排程示例 ===\n");

    let mut service = PlanningService::new(InMemoryOrderRepository::new(), PlannerConfig::default())?;

    let entry = NaiveDate::from_ymd_opt(2025, 10, 1).ok_or_else(|| anyhow::anyhow!("無效日期"))?;
    let today = NaiveDate::from_ymd_opt(2025, 10, 8).ok_or_else(|| anyhow::anyhow!("無效日期"))?;

    let jeans = service.create_order(
        ProductionOrder::new("OP-2025-101".to_string(), entry, 1000, 500, ModuleId(1))
            .with_reference("JEAN-SLIM".to_string(), "Índigo".to_string())
            .with_materials_ready(true),
    )?;
    let shirts = service.create_order(
        ProductionOrder::new("OP-2025-102".to_string(), entry, 300, 100, ModuleId(1))
            .with_reference("CAMISA-OX".to_string(), "Blanco".to_string())
            .with_materials_ready(true),
    )?;
    service.create_order(
        ProductionOrder::new("OP-2025-103".to_string(), entry, 2400, 550, ModuleId(1))
            .with_reference("CHAQUETA".to_string(), "Negro".to_string()),
    )?;

    service.start_production(jeans.id)?;
    let logged_at = today.and_hms_opt(15, 30, 0).ok_or_else(|| anyhow::anyhow!("無效時間"))?;
    let outcome = service.log_production(shirts.id, 120, logged_at)?;
    println!(
        "{} 申報 120 件，已生產 {}，預估完工 {:?}\n",
        shirts.order_number, outcome.produced_quantity, outcome.estimated_completion_date
    );

    let timeline = service.timeline(Some(ModuleId(1)), today)?;
    print_timeline("原始順序", &timeline);

    let reordered = service.reorder_timeline(&timeline, 1, 0)?;
    print_timeline("調整後", &reordered);

    Ok(())
}

fn print_timeline(title: &str, timeline: &textile_planner::Timeline) {
    println!("{}:", title);
    for slot in &timeline.slots {
        println!(
            "  #{} {} 剩餘 {} 件，{} 天：{} ~ {}",
            slot.sequence_position + 1,
            slot.order_number,
            slot.remaining_quantity,
            slot.work_days,
            slot.planned_start_date,
            slot.planned_end_date
        );
    }
    println!(
        "  總工作天數 {}，最終完工 {:?}\n",
        timeline.total_work_days, timeline.final_end_date
    );
}
