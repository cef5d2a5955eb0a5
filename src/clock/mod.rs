//! Clock Module
//!
//! Shared wall-clock time for consumers that render it. A [`SharedClock`]
//! ticks only while it has subscribers, every subscription observes the
//! same timestamp, and [`format_time`] renders timestamps as `HH:MM:SS` in
//! an IANA zone or host local time.

use std::time::Duration;

mod format;
mod shared;

pub use format::format_time;
pub use shared::{ClockSubscription, SharedClock};

/// Interval between timestamp refreshes while subscribed.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
