//! RGB duty commands received over the UART.
//!
//! A frame is up to three payload bytes followed by a 0 terminator:
//! red duty, green duty, blue duty. The USART_RX handler feeds bytes in;
//! the polling loop takes completed frames out. Frames with any other
//! length are dropped and counted.

#[cfg(target_arch = "avr")]
use avr_device::interrupt::{self, Mutex};
#[cfg(target_arch = "avr")]
use core::cell::RefCell;

const FRAME_CAPACITY: usize = 8;

/// One parsed command frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RgbCommand {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Accumulates frame bytes between the RX interrupt and the polling loop.
pub struct FrameBuffer {
    data: [u8; FRAME_CAPACITY],
    len: usize,
    ready: bool,
    dropped: u16,
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            data: [0; FRAME_CAPACITY],
            len: 0,
            ready: false,
            dropped: 0,
        }
    }

    /// Accepts one received byte. A 0 byte completes the frame; further
    /// bytes are ignored until the frame has been taken.
    pub fn push(&mut self, byte: u8) {
        if self.ready {
            return;
        }
        if byte == 0 {
            self.ready = true;
        } else if self.len < FRAME_CAPACITY {
            self.data[self.len] = byte;
            self.len += 1;
        }
        // Bytes past capacity are discarded; the terminator still sees a
        // wrong length and the frame is dropped.
    }

    /// Takes a completed frame, if any. Wrong-length frames are consumed,
    /// dropped and counted.
    pub fn take(&mut self) -> Option<RgbCommand> {
        if !self.ready {
            return None;
        }
        let len = self.len;
        self.len = 0;
        self.ready = false;
        if len == 3 {
            Some(RgbCommand {
                red: self.data[0],
                green: self.data[1],
                blue: self.data[2],
            })
        } else {
            self.dropped = self.dropped.wrapping_add(1);
            None
        }
    }

    /// Number of wrong-length frames seen so far.
    pub fn dropped(&self) -> u16 {
        self.dropped
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "avr")]
static FRAME: Mutex<RefCell<FrameBuffer>> = Mutex::new(RefCell::new(FrameBuffer::new()));

/// USART_RX hook: push one received byte. Interrupt context.
#[cfg(target_arch = "avr")]
pub fn on_rx(byte: u8) {
    interrupt::free(|cs| FRAME.borrow(cs).borrow_mut().push(byte));
}

/// Polling-loop side: take a completed command frame, if any.
#[cfg(target_arch = "avr")]
pub fn take() -> Option<RgbCommand> {
    interrupt::free(|cs| FRAME.borrow(cs).borrow_mut().take())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_byte_frame_parses() {
        let mut buf = FrameBuffer::new();
        for byte in [10, 128, 255, 0] {
            buf.push(byte);
        }
        assert_eq!(
            buf.take(),
            Some(RgbCommand {
                red: 10,
                green: 128,
                blue: 255,
            })
        );
        assert_eq!(buf.dropped(), 0);
    }

    #[test]
    fn no_frame_until_terminator() {
        let mut buf = FrameBuffer::new();
        buf.push(1);
        buf.push(2);
        buf.push(3);
        assert_eq!(buf.take(), None);
        buf.push(0);
        assert!(buf.take().is_some());
    }

    #[test]
    fn wrong_length_frame_is_dropped_and_counted() {
        let mut buf = FrameBuffer::new();
        buf.push(1);
        buf.push(0);
        assert_eq!(buf.take(), None);
        assert_eq!(buf.dropped(), 1);

        // The buffer recovers for the next frame.
        for byte in [4, 5, 6, 0] {
            buf.push(byte);
        }
        assert_eq!(
            buf.take(),
            Some(RgbCommand {
                red: 4,
                green: 5,
                blue: 6,
            })
        );
    }

    #[test]
    fn bytes_after_terminator_wait_for_take() {
        let mut buf = FrameBuffer::new();
        for byte in [7, 8, 9, 0, 42] {
            buf.push(byte);
        }
        assert_eq!(
            buf.take(),
            Some(RgbCommand {
                red: 7,
                green: 8,
                blue: 9,
            })
        );
        // The stray byte between terminator and take was discarded.
        assert_eq!(buf.take(), None);
    }

    #[test]
    fn oversized_payload_is_dropped() {
        let mut buf = FrameBuffer::new();
        for byte in 1..=12u8 {
            buf.push(byte);
        }
        buf.push(0);
        assert_eq!(buf.take(), None);
        assert_eq!(buf.dropped(), 1);
    }
}
