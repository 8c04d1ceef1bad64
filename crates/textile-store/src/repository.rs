//! 訂單持久層介面

use chrono::NaiveDate;
use textile_calc::SequenceAssignment;
use textile_core::{ProductionOrder, Result};
use uuid::Uuid;

/// 訂單倉儲
///
/// 每個方法都是一次完整的讀取-修改-寫入；實作必須保證其原子性，
/// 尤其是 `set_in_production`：同一模組最多只能有一筆在線生產的訂單。
pub trait OrderRepository {
    /// 新增訂單（生產單號重複時返回 `DuplicateOrderNumber`）
    fn insert(&mut self, order: ProductionOrder) -> Result<()>;

    /// 讀取訂單
    fn get(&self, id: Uuid) -> Result<ProductionOrder>;

    /// 全部訂單（按新增順序）
    fn list(&self) -> Vec<ProductionOrder>;

    /// 整筆覆寫訂單（含生產紀錄）
    fn update(&mut self, order: ProductionOrder) -> Result<()>;

    /// 刪除訂單及其生產紀錄
    fn remove(&mut self, id: Uuid) -> Result<ProductionOrder>;

    /// 保存預估完工日
    fn save_estimate(&mut self, id: Uuid, estimate: Option<NaiveDate>) -> Result<()>;

    /// 查找生產紀錄所屬的訂單
    fn find_entry_owner(&self, entry_id: Uuid) -> Result<Uuid>;

    /// 將訂單設為模組內唯一的在線生產訂單
    fn set_in_production(&mut self, id: Uuid) -> Result<()>;

    /// 取消訂單的在線生產標記
    fn clear_in_production(&mut self, id: Uuid) -> Result<()>;

    /// 生產單號包含關鍵字的訂單（不分大小寫，按新增順序）
    fn search_by_order_number(&self, query: &str) -> Vec<ProductionOrder>;

    /// 保存排程順序（全部成功或全部不變）
    fn apply_sequence(&mut self, assignments: &[SequenceAssignment]) -> Result<()>;
}
