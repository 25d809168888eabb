//! Extended monotonic clock built on a 16-bit free-running counter.
//!
//! Timer1 wraps every 8.39 s at clk/1024, so its 16-bit register is widened
//! with a 32-bit overflow count maintained by the TIMER1_OVF handler. The
//! combined 48-bit tick count wraps after roughly 1142 years at 7812.5
//! ticks/s, so nothing here handles wraparound of the extended value (see
//! `config::TICKS_PER_SECOND`).
//!
//! The overflow count and the hardware register are kept as two separate
//! narrow fields, never one wide value. The reader does not mask interrupts;
//! the race where the counter wraps between the two reads of [`now`] is
//! closed by the guarded re-read instead.
//!
//! [`now`]: SystemClock::now

use crate::config::{TICKS_PER_SECOND, WRAP_GUARD};

/// Extended tick count. 48 bits are used: overflow count in the upper 32,
/// hardware counter in the lower 16.
pub type Ticks = u64;

/// Read access to the two fields the extended clock is built from.
///
/// `overflow_count` is written from interrupt context while `counter` free
/// runs in hardware, so implementations must perform real (volatile) reads
/// on every call; the ordering of the reads inside [`SystemClock::now`] is
/// what keeps the combined value monotonic.
pub trait TickSource {
    /// Number of times the hardware counter has wrapped.
    fn overflow_count(&self) -> u32;

    /// Current value of the free-running hardware counter.
    fn counter(&self) -> u16;
}

impl<S: TickSource> TickSource for &S {
    fn overflow_count(&self) -> u32 {
        (**self).overflow_count()
    }

    fn counter(&self) -> u16 {
        (**self).counter()
    }
}

/// Monotonic 48-bit clock over a wrapping 16-bit counter.
pub struct SystemClock<S> {
    source: S,
}

impl<S: TickSource> SystemClock<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Current extended tick count. Polling context only, never callable
    /// from an interrupt handler.
    ///
    /// An overflow interrupt may fire between the two reads: the counter
    /// wraps, the overflow count increments, and the low half read here is
    /// a small post-wrap value while the high half was read pre-increment.
    /// Combining those undercounts by a full wrap (65536 ticks). A low half
    /// below `WRAP_GUARD` is the only value that can be post-wrap that soon,
    /// so the overflow count is re-read in that case. Both the read order
    /// and the re-read must be preserved by any change here.
    pub fn now(&self) -> Ticks {
        let mut high = self.source.overflow_count();
        let low = self.source.counter();
        if low < WRAP_GUARD {
            high = self.source.overflow_count();
        }
        ((high as Ticks) << 16) | low as Ticks
    }

    /// Milliseconds elapsed since `since`, a value previously returned by
    /// [`now`](Self::now).
    pub fn elapsed_ms(&self, since: Ticks) -> u32 {
        ticks_to_ms(self.now().saturating_sub(since))
    }
}

/// Converts a tick interval to milliseconds.
pub fn ticks_to_ms(diff: Ticks) -> u32 {
    ((diff * 1000) / TICKS_PER_SECOND) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Simulated Timer1 plus its overflow interrupt. Every `counter()` read
    /// first advances the register by `read_step`, modelling the ticks that
    /// elapse between the two reads inside `now()`; a wrap during that
    /// advance increments the overflow count exactly as the interrupt
    /// handler would. `advance` models time passing between polls.
    struct SimTimer {
        ovf: Cell<u32>,
        tcnt: Cell<u16>,
        read_step: u16,
        ovf_reads: Cell<u32>,
    }

    impl SimTimer {
        fn new(ovf: u32, tcnt: u16, read_step: u16) -> Self {
            Self {
                ovf: Cell::new(ovf),
                tcnt: Cell::new(tcnt),
                read_step,
                ovf_reads: Cell::new(0),
            }
        }

        fn advance(&self, ticks: u32) {
            let total = self.tcnt.get() as u32 + ticks;
            self.ovf.set(self.ovf.get() + (total >> 16));
            self.tcnt.set(total as u16);
        }
    }

    impl TickSource for SimTimer {
        fn overflow_count(&self) -> u32 {
            self.ovf_reads.set(self.ovf_reads.get() + 1);
            self.ovf.get()
        }

        fn counter(&self) -> u16 {
            let (next, wrapped) = self.tcnt.get().overflowing_add(self.read_step);
            if wrapped {
                self.ovf.set(self.ovf.get() + 1);
            }
            self.tcnt.set(next);
            next
        }
    }

    #[test]
    fn combines_overflow_count_and_counter() {
        let sim = SimTimer::new(5, 0x1234, 0);
        let clock = SystemClock::new(&sim);
        assert_eq!(clock.now(), (5 << 16) | 0x1234);
    }

    #[test]
    fn wrap_between_reads_is_never_undercounted() {
        // Counter sits at 0xFFFD; the read advances it by 3, wrapping to 0
        // and firing the overflow increment mid-read.
        let sim = SimTimer::new(5, 0xFFFD, 3);
        let clock = SystemClock::new(&sim);
        let t = clock.now();
        assert_eq!(t, 6 << 16);
        assert_ne!(t, 5 << 16);
        // The wrap forced a second overflow-count read.
        assert_eq!(sim.ovf_reads.get(), 2);
    }

    #[test]
    fn rereads_only_below_guard_threshold() {
        let sim = SimTimer::new(7, WRAP_GUARD, 0);
        let clock = SystemClock::new(&sim);
        assert_eq!(clock.now(), (7 << 16) | WRAP_GUARD as u64);
        assert_eq!(sim.ovf_reads.get(), 1);

        let sim = SimTimer::new(7, WRAP_GUARD - 1, 0);
        let clock = SystemClock::new(&sim);
        assert_eq!(clock.now(), (7 << 16) | (WRAP_GUARD - 1) as u64);
        assert_eq!(sim.ovf_reads.get(), 2);
    }

    #[test]
    fn monotonic_across_wraps() {
        let sim = SimTimer::new(0, 0, 1);
        let clock = SystemClock::new(&sim);
        let mut prev = clock.now();
        for i in 0u32..10_000 {
            // Advances include runs that cross the 16-bit wrap and runs
            // that land the counter inside the guard zone.
            sim.advance((i * 37) % 70_000);
            let t = clock.now();
            assert!(t >= prev, "now() went backwards: {} < {}", t, prev);
            prev = t;
        }
    }

    #[test]
    fn monotonic_through_guard_zone() {
        // Walk the counter one tick per read across the wrap boundary so
        // every low value in 0..WRAP_GUARD is observed.
        let sim = SimTimer::new(41, 0xFFF8, 1);
        let clock = SystemClock::new(&sim);
        let mut prev = clock.now();
        for _ in 0..32 {
            let t = clock.now();
            assert!(t >= prev);
            prev = t;
        }
        assert_eq!(sim.ovf.get(), 42);
    }

    #[test]
    fn tick_interval_to_milliseconds() {
        assert_eq!(ticks_to_ms(0), 0);
        assert_eq!(ticks_to_ms(TICKS_PER_SECOND), 1000);
        assert_eq!(ticks_to_ms(TICKS_PER_SECOND * 60), 60_000);
    }

    #[test]
    fn elapsed_ms_since_earlier_read() {
        let sim = SimTimer::new(0, 0, 0);
        let clock = SystemClock::new(&sim);
        let start = clock.now();
        sim.advance(TICKS_PER_SECOND as u32 * 2);
        assert_eq!(clock.elapsed_ms(start), 2000);
    }
}
