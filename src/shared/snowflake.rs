//! Snowflake ID Generator
//!
//! Allocates Discord-style IDs for resources created through the in-memory
//! session, so offline snapshots carry IDs that look and sort like remote ones.

use chrono::Utc;
use parking_lot::Mutex;

/// Discord epoch (2015-01-01T00:00:00.000Z)
pub const DISCORD_EPOCH: u64 = 1420070400000;

/// Snowflake ID generator
pub struct SnowflakeGenerator {
    worker_id: u64,
    // (last timestamp, sequence within that millisecond)
    state: Mutex<(u64, u64)>,
}

impl SnowflakeGenerator {
    /// Create a new generator for the given worker (only the low 10 bits are used).
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: (worker_id as u64) & 0x3FF,
            state: Mutex::new((0, 0)),
        }
    }

    /// Generate a new snowflake ID, strictly greater than any previously
    /// generated by this instance.
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();
        let mut timestamp = current_millis().max(state.0);

        if timestamp == state.0 {
            state.1 += 1;
            if state.1 > 0xFFF {
                // Sequence exhausted for this millisecond; borrow the next one.
                timestamp += 1;
                state.1 = 0;
            }
        } else {
            state.1 = 0;
        }
        state.0 = timestamp;

        (((timestamp - DISCORD_EPOCH) << 22) | (self.worker_id << 12) | state.1) as i64
    }
}

fn current_millis() -> u64 {
    Utc::now().timestamp_millis().max(DISCORD_EPOCH as i64) as u64
}
