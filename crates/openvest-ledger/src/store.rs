//! Append-only order arena keyed by sequential id.
//!
//! Orders are never physically removed: cancellation and completion are
//! status transitions, so the arena doubles as the audit trail. Id `n`
//! lives at index `n - 1`.

use serde::{Deserialize, Serialize};

use openvest_types::{Order, OrderId};

/// The durable mapping of order identifiers to order records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Rebuild a store from previously persisted records.
    ///
    /// Records must already carry their assigned ids in arena order.
    #[must_use]
    pub fn from_records(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// The id the next inserted order will receive.
    #[must_use]
    pub fn next_id(&self) -> OrderId {
        OrderId(self.orders.len() as u64 + 1)
    }

    /// Append an order, assigning the next sequential id.
    pub fn insert(&mut self, mut order: Order) -> OrderId {
        let id = self.next_id();
        order.id = id;
        self.orders.push(order);
        id
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        let index = id.0.checked_sub(1)?;
        self.orders.get(usize::try_from(index).ok()?)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        let index = id.0.checked_sub(1)?;
        self.orders.get_mut(usize::try_from(index).ok()?)
    }

    /// All orders in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Active orders in ascending id order.
    pub fn active(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.is_active())
    }

    /// Sum of `total_amount - released_amount` over Active orders.
    #[must_use]
    pub fn locked_total(&self) -> u128 {
        self.active().map(Order::remaining).sum()
    }

    /// Number of orders ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The raw records, for snapshotting.
    #[must_use]
    pub fn records(&self) -> &[Order] {
        &self.orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openvest_types::OrderStatus;

    #[test]
    fn ids_are_sequential_from_one() {
        let mut store = OrderStore::new();
        assert_eq!(store.next_id(), OrderId(1));
        let a = store.insert(Order::dummy(10, 0, 100, 1));
        let b = store.insert(Order::dummy(20, 0, 100, 1));
        assert_eq!(a, OrderId(1));
        assert_eq!(b, OrderId(2));
        assert_eq!(store.next_id(), OrderId(3));
    }

    #[test]
    fn get_by_id() {
        let mut store = OrderStore::new();
        let id = store.insert(Order::dummy(10, 0, 100, 1));
        assert_eq!(store.get(id).unwrap().id, id);
        assert!(store.get(OrderId(99)).is_none());
        assert!(store.get(OrderId(0)).is_none());
    }

    #[test]
    fn locked_total_counts_active_only() {
        let mut store = OrderStore::new();
        store.insert(Order::dummy(100, 0, 1000, 10));
        let cancelled = store.insert(Order::dummy(50, 0, 1000, 10));
        store.get_mut(cancelled).unwrap().status = OrderStatus::Cancelled;

        let partially = store.insert(Order::dummy(40, 0, 1000, 10));
        store.get_mut(partially).unwrap().released_amount = 15;

        assert_eq!(store.locked_total(), 100 + 25);
    }

    #[test]
    fn terminal_orders_stay_in_arena() {
        let mut store = OrderStore::new();
        let id = store.insert(Order::dummy(10, 0, 100, 1));
        store.get_mut(id).unwrap().status = OrderStatus::Cancelled;
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().status, OrderStatus::Cancelled);
        assert_eq!(store.active().count(), 0);
    }

    #[test]
    fn from_records_preserves_ids() {
        let mut store = OrderStore::new();
        store.insert(Order::dummy(10, 0, 100, 1));
        store.insert(Order::dummy(20, 0, 100, 1));
        let rebuilt = OrderStore::from_records(store.records().to_vec());
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.next_id(), OrderId(3));
        assert_eq!(rebuilt.get(OrderId(2)).unwrap().total_amount, 20);
    }
}
