//! Per-street vehicle queue
//!
//! Vehicles are only ever removed during a run, so the queue is filled once at
//! construction and drains from the front.

use std::collections::VecDeque;

use super::types::{StreetId, VehicleId};

/// FIFO of vehicles waiting on one street
#[derive(Debug, Clone)]
pub struct VehicleQueue {
    vehicles: VecDeque<VehicleId>,
    /// Number of vehicles the queue was filled with
    capacity: usize,
}

impl VehicleQueue {
    /// Create a queue pre-filled with `capacity` vehicles numbered `0..capacity`
    pub fn filled(street: StreetId, capacity: usize) -> Self {
        Self {
            vehicles: (0..capacity).map(|seq| VehicleId::new(street, seq)).collect(),
            capacity,
        }
    }

    /// Remove up to `n` vehicles from the front, oldest first
    ///
    /// Asking for more than are queued is not an error; the result simply holds
    /// every vehicle that was left.
    pub fn remove_front(&mut self, n: usize) -> Vec<VehicleId> {
        let take = n.min(self.vehicles.len());
        self.vehicles.drain(..take).collect()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queued vehicles in crossing order
    pub fn iter(&self) -> impl Iterator<Item = &VehicleId> {
        self.vehicles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_queue_is_in_sequence_order() {
        let queue = VehicleQueue::filled(StreetId(2), 4);
        let seqs: Vec<usize> = queue.iter().map(|v| v.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
        assert!(queue.iter().all(|v| v.street == StreetId(2)));
        assert_eq!(queue.capacity(), 4);
    }

    #[test]
    fn test_remove_front_underflow_returns_what_is_left() {
        let mut queue = VehicleQueue::filled(StreetId(0), 2);
        let removed = queue.remove_front(5);
        assert_eq!(removed.len(), 2);
        assert!(queue.is_empty());
        assert!(queue.remove_front(3).is_empty());
    }

    #[test]
    fn test_remove_zero_is_a_no_op() {
        let mut queue = VehicleQueue::filled(StreetId(0), 3);
        assert!(queue.remove_front(0).is_empty());
        assert_eq!(queue.len(), 3);
    }
}
