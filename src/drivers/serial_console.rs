use core::convert::Infallible;

use embedded_hal::serial::Write;
use nb::block;

use crate::hal::Uart;

/// Line-oriented logging console over USART0. Formatted output goes
/// through `ufmt` (`uwriteln!` and friends) via the `uWrite` impl.
pub struct SerialConsole {
    uart: Uart,
}

impl SerialConsole {
    pub fn new(uart: Uart) -> Self {
        Self { uart }
    }

    pub fn write_byte(&mut self, byte: u8) {
        block!(self.uart.write(byte)).ok();
    }

    pub fn write_line(&mut self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        self.write_byte(b'\r');
        self.write_byte(b'\n');
    }
}

impl ufmt::uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}
