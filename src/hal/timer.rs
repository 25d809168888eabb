//! Timer1 as the free-running system tick counter.

use avr_device::atmega328p::TC1;
use core::cell::UnsafeCell;
use core::ptr;

use crate::clock::TickSource;

/// Overflow count for Timer1. Written only by the TIMER1_OVF handler and
/// read only from the polling loop; the reader never masks interrupts and
/// instead tolerates a concurrent increment through the guarded re-read in
/// `clock::SystemClock::now`. All access goes through volatile ops.
struct OverflowCell(UnsafeCell<u32>);

// Sound under the single-writer (ISR) / single-reader (polling loop)
// contract above.
unsafe impl Sync for OverflowCell {}

static TIMER1_OVF_COUNT: OverflowCell = OverflowCell(UnsafeCell::new(0));

/// Free-running 16-bit tick counter (Timer1, normal mode, clk/1024).
pub struct Timer1 {
    tc1: TC1,
}

impl Timer1 {
    /// Claims TC1 and starts it from zero. Must run before interrupts are
    /// enabled globally: both the counter register and the overflow count
    /// are zeroed here, and the overflow interrupt is unmasked.
    pub fn init(tc1: TC1) -> Self {
        unsafe { ptr::write_volatile(TIMER1_OVF_COUNT.0.get(), 0) };

        tc1.tccr1a.write(|w| unsafe { w.bits(0) });
        tc1.tcnt1.write(|w| unsafe { w.bits(0) });
        tc1.tccr1b.write(|w| w.cs1().prescale_1024());
        tc1.timsk1.write(|w| w.toie1().set_bit());

        Self { tc1 }
    }

    /// TIMER1_OVF hook: one increment per hardware wrap. Interrupt context
    /// only. Keeps out of TCNT1 entirely.
    #[inline]
    pub fn on_overflow() {
        let p = TIMER1_OVF_COUNT.0.get();
        unsafe { ptr::write_volatile(p, ptr::read_volatile(p).wrapping_add(1)) };
    }
}

impl TickSource for Timer1 {
    #[inline]
    fn overflow_count(&self) -> u32 {
        unsafe { ptr::read_volatile(TIMER1_OVF_COUNT.0.get()) }
    }

    #[inline]
    fn counter(&self) -> u16 {
        self.tc1.tcnt1.read().bits()
    }
}
