//! USART0 driver: interrupt-driven receive, nonblocking (`nb`) transmit.

use avr_device::atmega328p::USART0;
use core::convert::Infallible;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

pub struct Uart {
    usart: USART0,
}

impl Uart {
    /// Claims USART0: 8N1 at `config::UART_BAUD`, receiver, transmitter
    /// and the RX-complete interrupt enabled. Received bytes are consumed
    /// by the USART_RX handler, not through this driver.
    pub fn new(usart: USART0) -> Self {
        usart.ubrr0.write(|w| unsafe { w.bits(UBRR) });
        usart.ucsr0c.write(|w| w.ucsz0().chr8());
        usart
            .ucsr0b
            .write(|w| w.rxen0().set_bit().txen0().set_bit().rxcie0().set_bit());
        Self { usart }
    }
}

impl embedded_hal::serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if self.usart.ucsr0a.read().udre0().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        self.usart.udr0.write(|w| unsafe { w.bits(byte) });
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.usart.ucsr0a.read().udre0().bit_is_clear() {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }
}
