//! RGB PWM on Timer0 (OC0A/OC0B) and Timer2 (OC2B).
//!
//! Both timers run in normal mode at clk/8 with clear-on-match outputs, so
//! the OCR value is the duty directly. The overflow hooks re-force a high
//! edge at the start of each period; without that, a duty of 0 would still
//! emit a one-cycle sliver instead of holding the pin off.

use avr_device::atmega328p::{PORTD, TC0, TC2};

/// RGB output driver. Red on OC0B (PD5), green on OC2B (PD3), blue on
/// OC0A (PD6).
pub struct RgbPwm {
    tc0: TC0,
    tc2: TC2,
}

impl RgbPwm {
    /// Claims both PWM timers, drives the output pins, and starts the
    /// timers with all channels at zero duty.
    pub fn init(tc0: TC0, tc2: TC2, portd: &PORTD) -> Self {
        const PIN_MASK: u8 = (1 << 3) | (1 << 5) | (1 << 6);
        portd.ddrd.modify(|r, w| unsafe { w.bits(r.bits() | PIN_MASK) });
        portd.portd.modify(|r, w| unsafe { w.bits(r.bits() | PIN_MASK) });

        tc0.tccr0a
            .write(|w| w.com0a().match_clear().com0b().match_clear());
        tc0.ocr0a.write(|w| unsafe { w.bits(0) });
        tc0.ocr0b.write(|w| unsafe { w.bits(0) });
        tc0.tccr0b.write(|w| w.cs0().prescale_8());
        tc0.timsk0.write(|w| w.toie0().set_bit());

        tc2.tccr2a.write(|w| w.com2b().match_clear());
        tc2.ocr2b.write(|w| unsafe { w.bits(0) });
        tc2.tccr2b.write(|w| w.cs2().prescale_8());
        tc2.timsk2.write(|w| w.toie2().set_bit());

        Self { tc0, tc2 }
    }

    /// Sets the three channel duties. Takes effect from the next period.
    pub fn set_duty(&self, red: u8, green: u8, blue: u8) {
        self.tc0.ocr0b.write(|w| unsafe { w.bits(red) });
        self.tc2.ocr2b.write(|w| unsafe { w.bits(green) });
        self.tc0.ocr0a.write(|w| unsafe { w.bits(blue) });
    }
}

/// TIMER0_OVF hook: force a clean high edge on OC0A/OC0B for the new
/// period, then restore clear-on-match.
pub fn on_timer0_overflow() {
    unsafe {
        let p = &*TC0::ptr();
        p.tccr0a.write(|w| w.com0a().match_set().com0b().match_set());
        p.tcnt0.write(|w| w.bits(0));
        p.tccr0b
            .modify(|_, w| w.foc0a().set_bit().foc0b().set_bit());
        p.tccr0a
            .write(|w| w.com0a().match_clear().com0b().match_clear());
    }
}

/// TIMER2_OVF hook: same forced edge for OC2B.
pub fn on_timer2_overflow() {
    unsafe {
        let p = &*TC2::ptr();
        p.tccr2a.write(|w| w.com2b().match_set());
        p.tcnt2.write(|w| w.bits(0));
        p.tccr2b.modify(|_, w| w.foc2b().set_bit());
        p.tccr2a.write(|w| w.com2b().match_clear());
    }
}
