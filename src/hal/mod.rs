pub mod pwm;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use pwm::RgbPwm;
pub use timer::Timer1;
pub use uart::Uart;
