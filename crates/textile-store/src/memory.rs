//! 記憶體訂單倉儲

use chrono::NaiveDate;
use std::collections::HashMap;
use textile_calc::SequenceAssignment;
use textile_core::{PlannerError, ProductionOrder, Result};
use uuid::Uuid;

use crate::repository::OrderRepository;

/// 記憶體訂單倉儲
///
/// 所有寫入都經由 `&mut self`，讀取-修改-寫入天然不會交錯。
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: HashMap<Uuid, ProductionOrder>,
    insertion_order: Vec<Uuid>,
}

impl InMemoryOrderRepository {
    /// 創建空的倉儲
    pub fn new() -> Self {
        Self::default()
    }

    /// 訂單筆數
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut ProductionOrder> {
        self.orders.get_mut(&id).ok_or(PlannerError::OrderNotFound(id))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn insert(&mut self, order: ProductionOrder) -> Result<()> {
        if self
            .orders
            .values()
            .any(|existing| existing.order_number == order.order_number)
        {
            return Err(PlannerError::DuplicateOrderNumber(order.order_number));
        }

        self.insertion_order.push(order.id);
        self.orders.insert(order.id, order);
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<ProductionOrder> {
        self.orders
            .get(&id)
            .cloned()
            .ok_or(PlannerError::OrderNotFound(id))
    }

    fn list(&self) -> Vec<ProductionOrder> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.orders.get(id).cloned())
            .collect()
    }

    fn update(&mut self, order: ProductionOrder) -> Result<()> {
        if self.orders.values().any(|existing| {
            existing.id != order.id && existing.order_number == order.order_number
        }) {
            return Err(PlannerError::DuplicateOrderNumber(order.order_number));
        }

        let slot = self.get_mut(order.id)?;
        *slot = order;
        Ok(())
    }

    fn remove(&mut self, id: Uuid) -> Result<ProductionOrder> {
        let order = self.orders.remove(&id).ok_or(PlannerError::OrderNotFound(id))?;
        self.insertion_order.retain(|existing| *existing != id);
        Ok(order)
    }

    fn save_estimate(&mut self, id: Uuid, estimate: Option<NaiveDate>) -> Result<()> {
        self.get_mut(id)?.estimated_completion_date = estimate;
        Ok(())
    }

    fn find_entry_owner(&self, entry_id: Uuid) -> Result<Uuid> {
        self.orders
            .values()
            .find(|order| order.find_entry(entry_id).is_some())
            .map(|order| order.id)
            .ok_or(PlannerError::EntryNotFound(entry_id))
    }

    fn set_in_production(&mut self, id: Uuid) -> Result<()> {
        let module = self.get_mut(id)?.module;

        for order in self.orders.values_mut() {
            if order.module == module {
                order.in_production = order.id == id;
            }
        }

        Ok(())
    }

    fn clear_in_production(&mut self, id: Uuid) -> Result<()> {
        self.get_mut(id)?.in_production = false;
        Ok(())
    }

    fn search_by_order_number(&self, query: &str) -> Vec<ProductionOrder> {
        let needle = query.to_lowercase();
        self.list()
            .into_iter()
            .filter(|order| order.order_number.to_lowercase().contains(&needle))
            .collect()
    }

    fn apply_sequence(&mut self, assignments: &[SequenceAssignment]) -> Result<()> {
        if let Some(missing) = assignments
            .iter()
            .find(|assignment| !self.orders.contains_key(&assignment.order_id))
        {
            return Err(PlannerError::OrderNotFound(missing.order_id));
        }

        for assignment in assignments {
            self.get_mut(assignment.order_id)?.sequence_order = assignment.sequence_order;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textile_core::{ModuleId, ProductionLogEntry};

    fn order(number: &str, module: u8) -> ProductionOrder {
        ProductionOrder::new(
            number.to_string(),
            NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
            100,
            10,
            ModuleId(module),
        )
    }

    #[test]
    fn test_insert_and_list_keep_insertion_order() {
        let mut repo = InMemoryOrderRepository::new();
        let first = order("OP-1", 1);
        let second = order("OP-2", 1);
        repo.insert(first.clone()).unwrap();
        repo.insert(second.clone()).unwrap();

        let ids: Vec<_> = repo.list().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_duplicate_order_number_rejected() {
        let mut repo = InMemoryOrderRepository::new();
        repo.insert(order("OP-1", 1)).unwrap();

        assert_eq!(
            repo.insert(order("OP-1", 2)),
            Err(PlannerError::DuplicateOrderNumber("OP-1".to_string()))
        );
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_only_one_order_in_production_per_module() {
        let mut repo = InMemoryOrderRepository::new();
        let a = order("A", 1);
        let b = order("B", 1);
        let c = order("C", 2);
        for o in [&a, &b, &c] {
            repo.insert(o.clone()).unwrap();
        }

        repo.set_in_production(c.id).unwrap();
        repo.set_in_production(a.id).unwrap();
        repo.set_in_production(b.id).unwrap();

        assert!(!repo.get(a.id).unwrap().in_production);
        assert!(repo.get(b.id).unwrap().in_production);
        // 其他模組不受影響
        assert!(repo.get(c.id).unwrap().in_production);
    }

    #[test]
    fn test_clear_in_production() {
        let mut repo = InMemoryOrderRepository::new();
        let a = order("A", 1);
        repo.insert(a.clone()).unwrap();
        repo.set_in_production(a.id).unwrap();

        repo.clear_in_production(a.id).unwrap();

        assert!(!repo.get(a.id).unwrap().in_production);
        let ghost = Uuid::new_v4();
        assert_eq!(repo.clear_in_production(ghost), Err(PlannerError::OrderNotFound(ghost)));
    }

    #[test]
    fn test_search_by_order_number_ignores_case() {
        let mut repo = InMemoryOrderRepository::new();
        let first = order("OP-2025-101", 1);
        let second = order("op-2025-102", 2);
        repo.insert(first.clone()).unwrap();
        repo.insert(second.clone()).unwrap();
        repo.insert(order("MUESTRA-7", 1)).unwrap();

        let ids: Vec<_> = repo
            .search_by_order_number("Op-2025")
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(repo.search_by_order_number("").len(), 3);
        assert!(repo.search_by_order_number("xyz").is_empty());
    }

    #[test]
    fn test_apply_sequence_is_all_or_nothing() {
        let mut repo = InMemoryOrderRepository::new();
        let a = order("A", 1);
        repo.insert(a.clone()).unwrap();
        let ghost = Uuid::new_v4();

        let result = repo.apply_sequence(&[
            SequenceAssignment { order_id: a.id, sequence_order: 5 },
            SequenceAssignment { order_id: ghost, sequence_order: 6 },
        ]);

        assert_eq!(result, Err(PlannerError::OrderNotFound(ghost)));
        assert_eq!(repo.get(a.id).unwrap().sequence_order, 0);
    }

    #[test]
    fn test_find_entry_owner_and_remove() {
        let mut repo = InMemoryOrderRepository::new();
        let mut a = order("A", 1);
        let entry = ProductionLogEntry::new(
            a.id,
            10,
            NaiveDate::from_ymd_opt(2025, 10, 7).unwrap().and_hms_opt(9, 0, 0).unwrap(),
        );
        a.production_log.push(entry.clone());
        repo.insert(a.clone()).unwrap();

        assert_eq!(repo.find_entry_owner(entry.id).unwrap(), a.id);

        repo.remove(a.id).unwrap();
        assert!(repo.is_empty());
        assert_eq!(repo.find_entry_owner(entry.id), Err(PlannerError::EntryNotFound(entry.id)));
        assert_eq!(repo.get(a.id), Err(PlannerError::OrderNotFound(a.id)));
    }
}
