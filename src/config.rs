//! Configuration constants for the ATmega328 RGB node firmware.

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 8_000_000;

/// Timer1 prescale factor (clkI/O divided by 1024)
pub const TIMER1_PRESCALE: u32 = 1024;

/// Extended tick rate in ticks per second.
///
/// The hardware rate is `CPU_FREQ_HZ / TIMER1_PRESCALE` = 7812.5 ticks/s.
/// Whole-tick arithmetic truncates the half tick, which runs deadlines
/// 0.0064% slow (about 5.5 s per day), well inside crystal tolerance.
pub const TICKS_PER_SECOND: u64 = 7_812;

/// Re-read threshold for the extended clock's counter read.
///
/// If the low 16 bits read below this value, the counter may have wrapped
/// between the overflow-count read and the counter read, so the overflow
/// count is read again. The threshold must exceed the number of ticks that
/// can elapse while interrupts are masked: one tick is
/// `TIMER1_PRESCALE / CPU_FREQ_HZ` = 128 us, and the longest masked window
/// here (the USART RX handler followed back to back by a timer overflow
/// handler) stays under 20 us. Four ticks (512 us) leaves a wide margin.
pub const WRAP_GUARD: u16 = 4;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Period of the report job in seconds
pub const REPORT_PERIOD_SECS: u16 = 60;

/// Length of the radio listen window opened by the report job, in seconds
pub const LISTEN_WINDOW_SECS: u16 = 10;
