//! Tear-free coefficient publication between the control and audio threads.
//!
//! [`SharedCoefficients`] is a sequence lock over four atomic words. Writers
//! make the sequence odd, store the words, then make it even again. Readers
//! accept a copy only if they saw the same even sequence before and after
//! loading. Neither side ever blocks on the other: a reader that keeps losing
//! the race gives up after [`SNAPSHOT_ATTEMPTS`] tries and keeps whatever
//! complete set it already has.
//!
//! The enable request travels alongside as a plain flag; it is not part of
//! the coefficient set.

use core::hint;
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering, fence};

use crate::coefs::Coefficients;
use crate::fixed::Q31;

/// Read attempts before a snapshot gives up.
pub const SNAPSHOT_ATTEMPTS: usize = 4;

/// Lock-free cell holding one complete [`Coefficients`] set.
#[derive(Debug)]
pub struct SharedCoefficients {
    pub(crate) seq: AtomicU32,
    direct_gain: AtomicI32,
    filter: [AtomicI32; 3],
    enabled: AtomicBool,
}

impl Default for SharedCoefficients {
    fn default() -> Self {
        Self::new(Coefficients::SILENT)
    }
}

impl SharedCoefficients {
    /// Create a cell holding `initial`, with crossfeed not requested.
    pub fn new(initial: Coefficients) -> Self {
        let [c0, c1, c2] = initial.filter.map(Q31::to_bits);
        Self {
            seq: AtomicU32::new(0),
            direct_gain: AtomicI32::new(initial.direct_gain.to_bits()),
            filter: [AtomicI32::new(c0), AtomicI32::new(c1), AtomicI32::new(c2)],
            enabled: AtomicBool::new(false),
        }
    }

    /// Replace the whole set.
    pub fn publish(&self, coefs: Coefficients) {
        self.modify(|c| *c = coefs);
    }

    /// Read-modify-write the set as one unit.
    ///
    /// Concurrent writers are serialized by spinning on the sequence; the
    /// closure should be short.
    pub fn modify(&self, f: impl FnOnce(&mut Coefficients)) {
        let start = self.begin_write();
        let mut coefs = self.load_words();
        f(&mut coefs);
        self.store_words(&coefs);
        self.seq.store(start.wrapping_add(2), Ordering::Release);
    }

    /// Sequence number of the last completed write. Even when idle.
    pub fn version(&self) -> u32 {
        self.seq.load(Ordering::Acquire)
    }

    /// A consistent copy of the set with the version it was taken at, or
    /// `None` if every attempt overlapped a write.
    pub fn snapshot(&self) -> Option<(u32, Coefficients)> {
        for _ in 0..SNAPSHOT_ATTEMPTS {
            let before = self.seq.load(Ordering::Acquire);
            if before & 1 == 1 {
                hint::spin_loop();
                continue;
            }
            let coefs = self.load_words();
            fence(Ordering::Acquire);
            if self.seq.load(Ordering::Relaxed) == before {
                return Some((before, coefs));
            }
        }
        None
    }

    /// Spin until a snapshot succeeds.
    ///
    /// Waits out any write in progress, so it is for construction and tools,
    /// not the audio thread.
    pub fn read(&self) -> (u32, Coefficients) {
        loop {
            if let Some(snapshot) = self.snapshot() {
                return snapshot;
            }
            hint::spin_loop();
        }
    }

    /// Record whether crossfeed is wanted.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Whether crossfeed is wanted.
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Take the write side: move the sequence from even to odd.
    fn begin_write(&self) -> u32 {
        loop {
            let current = self.seq.load(Ordering::Relaxed);
            if current & 1 == 0
                && self
                    .seq
                    .compare_exchange_weak(
                        current,
                        current.wrapping_add(1),
                        Ordering::Acquire,
                        Ordering::Relaxed,
                    )
                    .is_ok()
            {
                fence(Ordering::Release);
                return current;
            }
            hint::spin_loop();
        }
    }

    fn load_words(&self) -> Coefficients {
        Coefficients {
            direct_gain: Q31::from_bits(self.direct_gain.load(Ordering::Relaxed)),
            filter: [
                Q31::from_bits(self.filter[0].load(Ordering::Relaxed)),
                Q31::from_bits(self.filter[1].load(Ordering::Relaxed)),
                Q31::from_bits(self.filter[2].load(Ordering::Relaxed)),
            ],
        }
    }

    fn store_words(&self, coefs: &Coefficients) {
        self.direct_gain
            .store(coefs.direct_gain.to_bits(), Ordering::Relaxed);
        for (slot, c) in self.filter.iter().zip(coefs.filter) {
            slot.store(c.to_bits(), Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn new_holds_initial_set() {
        let coefs = Coefficients::from_db(-15, -60, -220, 700);
        let shared = SharedCoefficients::new(coefs);
        assert_eq!(shared.snapshot(), Some((0, coefs)));
        assert!(!shared.enabled());
    }

    #[test]
    fn publish_bumps_version_by_two() {
        let shared = SharedCoefficients::default();
        let v0 = shared.version();
        shared.publish(Coefficients::unfiltered(Q31::MAX));
        assert_eq!(shared.version(), v0 + 2);
        let (v, c) = shared.snapshot().unwrap();
        assert_eq!(v, v0 + 2);
        assert_eq!(c, Coefficients::unfiltered(Q31::MAX));
    }

    #[test]
    fn modify_touches_only_what_the_closure_changes() {
        let coefs = Coefficients::from_db(-15, -60, -220, 700);
        let shared = SharedCoefficients::new(coefs);
        shared.modify(|c| c.direct_gain = Q31::ZERO);
        let (_, got) = shared.snapshot().unwrap();
        assert_eq!(got.direct_gain, Q31::ZERO);
        assert_eq!(got.filter, coefs.filter);
    }

    #[test]
    fn snapshot_gives_up_while_write_in_progress() {
        let shared = SharedCoefficients::default();
        shared.seq.store(1, Ordering::Release);
        assert_eq!(shared.snapshot(), None);
    }

    #[test]
    fn read_returns_the_current_set() {
        let coefs = Coefficients::from_db(-30, -60, -220, 700);
        let shared = SharedCoefficients::default();
        shared.publish(coefs);
        assert_eq!(shared.read(), (2, coefs));
    }

    #[test]
    fn enabled_flag_round_trips() {
        let shared = SharedCoefficients::default();
        shared.set_enabled(true);
        assert!(shared.enabled());
        shared.set_enabled(false);
        assert!(!shared.enabled());
    }

    #[test]
    fn concurrent_readers_never_see_torn_sets() {
        // every published set has all four words equal
        let uniform = |v: i32| Coefficients {
            direct_gain: Q31::from_bits(v),
            filter: [Q31::from_bits(v); 3],
        };
        let shared = Arc::new(SharedCoefficients::new(uniform(0)));

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for v in 1..=20_000 {
                    shared.publish(uniform(v));
                }
            })
        };

        let mut seen = 0;
        while !writer.is_finished() || seen == 0 {
            if let Some((version, c)) = shared.snapshot() {
                assert_eq!(version & 1, 0);
                let v = c.direct_gain.to_bits();
                assert!(c.filter.iter().all(|f| f.to_bits() == v), "torn: {c:?}");
                seen += 1;
            }
        }
        writer.join().unwrap();
        assert_eq!(shared.snapshot().unwrap().1, uniform(20_000));
    }
}
