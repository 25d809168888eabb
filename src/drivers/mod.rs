pub mod command;
#[cfg(target_arch = "avr")]
pub mod serial_console;

pub use command::RgbCommand;
#[cfg(target_arch = "avr")]
pub use serial_console::SerialConsole;
