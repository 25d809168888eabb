//! ATmega328 RGB node firmware library.
//!
//! The clock and scheduler cores are portable and carry their own host-run
//! tests; the HAL and the console driver only exist on the AVR target.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod config;
pub mod drivers;
pub mod sched;

#[cfg(target_arch = "avr")]
pub mod hal;
