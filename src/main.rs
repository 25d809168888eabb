//! ATmega328 RGB node firmware entry point.
//!
//! Single polling loop plus interrupt handlers. Timer1 widened by its
//! overflow count is the time base; the report job fires every 60 s and
//! opens a 10 s radio listen window; RGB duty commands arrive over the
//! UART and drive the PWM channels.

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use core::sync::atomic::{AtomicBool, Ordering};

    use avr_device::atmega328p::{Peripherals, USART0};
    use avr_device::interrupt;
    use panic_halt as _;
    use ufmt::uwriteln;

    use atmega328_rgb_node::clock::SystemClock;
    use atmega328_rgb_node::config::{LISTEN_WINDOW_SECS, REPORT_PERIOD_SECS};
    use atmega328_rgb_node::drivers::{command, SerialConsole};
    use atmega328_rgb_node::hal::{pwm, RgbPwm, Timer1, Uart};
    use atmega328_rgb_node::sched;

    /// Consumed by the radio front end: receive path is only live inside
    /// the listen window.
    static RECEIVER_ENABLED: AtomicBool = AtomicBool::new(false);

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        let uart = Uart::new(dp.USART0);
        let mut console = SerialConsole::new(uart);
        let leds = RgbPwm::init(dp.TC0, dp.TC2, &dp.PORTD);

        // Counter and overflow count start from zero before interrupts
        // are enabled globally.
        let clock = SystemClock::new(Timer1::init(dp.TC1));

        unsafe { interrupt::enable() };

        console.write_line("atmega328 rgb node v0.1.0");

        let mut report_deadline = sched::arm(&clock, REPORT_PERIOD_SECS);
        let mut listen_end = sched::NO_DEADLINE;

        loop {
            if let Some(cmd) = command::take() {
                leds.set_duty(cmd.red, cmd.green, cmd.blue);
                uwriteln!(&mut console, "rgb {} {} {}", cmd.red, cmd.green, cmd.blue).ok();
            }

            let current = clock.now();

            // Report job: periodic; rearms itself and chains the listen
            // window from the instant it fires.
            if sched::is_due(report_deadline, current) {
                report_deadline = sched::arm(&clock, REPORT_PERIOD_SECS);
                listen_end = sched::arm(&clock, LISTEN_WINDOW_SECS);
                RECEIVER_ENABLED.store(true, Ordering::SeqCst);
                uwriteln!(&mut console, "report at {}", current).ok();
            }

            // Listen window close: one-shot.
            if sched::is_due(listen_end, current) {
                listen_end = sched::cancel(listen_end);
                RECEIVER_ENABLED.store(false, Ordering::SeqCst);
                uwriteln!(&mut console, "listen window closed at {}", current).ok();
            }
        }
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER1_OVF() {
        Timer1::on_overflow();
    }

    #[avr_device::interrupt(atmega328p)]
    fn USART_RX() {
        let byte = unsafe { (*USART0::ptr()).udr0.read().bits() };
        command::on_rx(byte);
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER0_OVF() {
        pwm::on_timer0_overflow();
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER2_OVF() {
        pwm::on_timer2_overflow();
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
