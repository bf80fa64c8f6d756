//! The atomic grid unit.

use std::sync::atomic::{AtomicU32, Ordering};

use evac_core::{Classification, Direction, Distance};

/// Navigation state written by the field solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    /// Hops to the nearest exit.
    pub distance: Distance,
    /// Step toward the lowest-distance neighbour. `None` for walls, exits
    /// and unreached cells.
    pub guidance: Option<Direction>,
}

/// Current and peak occupant counters for one cell.
///
/// Both counters are atomics so the agent loop can update them through a
/// shared grid reference while a renderer reads them. `peak` only moves
/// forward between resets.
#[derive(Debug, Default)]
pub struct Occupancy {
    current: AtomicU32,
    peak: AtomicU32,
}

impl Occupancy {
    /// Agents presently in the cell.
    pub fn current(&self) -> u32 {
        self.current.load(Ordering::Acquire)
    }

    /// Highest `current` value seen since the last reset.
    pub fn peak(&self) -> u32 {
        self.peak.load(Ordering::Acquire)
    }

    /// Add one occupant and raise the peak if needed. Returns the new count.
    ///
    /// Saturates at `u32::MAX`.
    pub fn increment(&self) -> u32 {
        let prev = self
            .current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
                Some(c.saturating_add(1))
            })
            .unwrap_or_else(|c| c);
        let now = prev.saturating_add(1);
        self.peak.fetch_max(now, Ordering::AcqRel);
        now
    }

    /// Remove one occupant. Returns `None` (and changes nothing) when the
    /// cell is already empty.
    pub fn decrement(&self) -> Option<u32> {
        self.current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| c.checked_sub(1))
            .ok()
            .map(|prev| prev - 1)
    }

    /// Zero both counters.
    pub fn clear(&self) {
        self.current.store(0, Ordering::Release);
        self.peak.store(0, Ordering::Release);
    }
}

impl Clone for Occupancy {
    fn clone(&self) -> Self {
        Self {
            current: AtomicU32::new(self.current()),
            peak: AtomicU32::new(self.peak()),
        }
    }
}

/// One grid cell: classification, navigation fields and occupancy.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub(crate) classification: Classification,
    pub(crate) nav: NavState,
    pub(crate) occupancy: Occupancy,
}

impl Cell {
    /// The cell's classification.
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Last solved navigation state (default when fields are stale).
    pub fn nav(&self) -> NavState {
        self.nav
    }

    /// Occupancy counters.
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Back to an open cell with no fields and no occupants.
    pub(crate) fn reset(&mut self) {
        self.classification = Classification::Open;
        self.nav = NavState::default();
        self.occupancy.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn enter_three_leave_one() {
        let o = Occupancy::default();
        assert_eq!(o.increment(), 1);
        assert_eq!(o.increment(), 2);
        assert_eq!(o.increment(), 3);
        assert_eq!(o.decrement(), Some(2));
        assert_eq!(o.current(), 2);
        assert_eq!(o.peak(), 3);
    }

    #[test]
    fn decrement_on_empty_is_noop() {
        let o = Occupancy::default();
        assert_eq!(o.decrement(), None);
        assert_eq!(o.current(), 0);
        assert_eq!(o.peak(), 0);
    }

    #[test]
    fn increment_saturates_at_max() {
        let o = Occupancy {
            current: AtomicU32::new(u32::MAX - 1),
            peak: AtomicU32::new(u32::MAX - 1),
        };
        assert_eq!(o.increment(), u32::MAX);
        assert_eq!(o.increment(), u32::MAX);
        assert_eq!(o.current(), u32::MAX);
        assert_eq!(o.peak(), u32::MAX);
        assert_eq!(o.decrement(), Some(u32::MAX - 1));
    }

    #[test]
    fn clear_zeroes_both_counters() {
        let o = Occupancy::default();
        o.increment();
        o.increment();
        o.clear();
        assert_eq!((o.current(), o.peak()), (0, 0));
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let o = std::sync::Arc::new(Occupancy::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let o = std::sync::Arc::clone(&o);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        o.increment();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(o.current(), 4000);
        assert_eq!(o.peak(), 4000);
    }

    proptest! {
        #[test]
        fn peak_never_decreases(ops in proptest::collection::vec(any::<bool>(), 0..200)) {
            let o = Occupancy::default();
            let mut last_peak = 0;
            for enter in ops {
                if enter {
                    o.increment();
                } else {
                    o.decrement();
                }
                prop_assert!(o.peak() >= last_peak);
                prop_assert!(o.peak() >= o.current());
                last_peak = o.peak();
            }
        }
    }
}
