//! Per-member conversation state.
//!
//! Keyed store of each member's conversation thread handle and daily request
//! count. Entries are updated through DashMap's entry API, so concurrent
//! events for the same member serialize on that member's shard lock.

use chrono::NaiveDate;
use dashmap::DashMap;

/// Default number of requests a member may make per day.
pub const DEFAULT_DAILY_LIMIT: u32 = 25;

/// State kept for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRecord {
    /// Handle of the member's conversation thread, once one exists
    pub thread: Option<String>,
    pub requests_today: u32,
    pub day: NaiveDate,
}

impl ConversationRecord {
    fn new(day: NaiveDate) -> Self {
        Self {
            thread: None,
            requests_today: 0,
            day,
        }
    }

    fn roll_to(&mut self, today: NaiveDate) {
        if self.day != today {
            self.day = today;
            self.requests_today = 0;
        }
    }
}

/// Conversation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Member {member_id} reached the daily limit of {limit} requests")]
    QuotaExceeded { member_id: i64, limit: u32 },
}

/// Member ID → conversation record.
#[derive(Debug)]
pub struct ConversationStore {
    records: DashMap<i64, ConversationRecord>,
    daily_limit: u32,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT)
    }
}

impl ConversationStore {
    pub fn new(daily_limit: u32) -> Self {
        Self {
            records: DashMap::new(),
            daily_limit,
        }
    }

    /// Whether an incoming message should get a reply: never to the bot's
    /// own messages, and only when the bot is mentioned.
    pub fn should_respond(author_id: i64, bot_id: i64, mentions: &[i64]) -> bool {
        author_id != bot_id && mentions.contains(&bot_id)
    }

    /// Count one request for `member_id` on `today`.
    ///
    /// The counter resets when the day changes. Returns the remaining
    /// allowance after this request.
    pub fn record_request(&self, member_id: i64, today: NaiveDate) -> Result<u32, ConversationError> {
        let mut record = self
            .records
            .entry(member_id)
            .or_insert_with(|| ConversationRecord::new(today));
        record.roll_to(today);

        if record.requests_today >= self.daily_limit {
            tracing::warn!(member_id, limit = self.daily_limit, "Daily request limit reached");
            return Err(ConversationError::QuotaExceeded {
                member_id,
                limit: self.daily_limit,
            });
        }

        record.requests_today += 1;
        Ok(self.daily_limit - record.requests_today)
    }

    /// The member's thread handle, creating one with `create` on first use.
    pub fn thread_for<F>(&self, member_id: i64, today: NaiveDate, create: F) -> String
    where
        F: FnOnce() -> String,
    {
        let mut record = self
            .records
            .entry(member_id)
            .or_insert_with(|| ConversationRecord::new(today));
        record.thread.get_or_insert_with(create).clone()
    }

    pub fn get(&self, member_id: i64) -> Option<ConversationRecord> {
        self.records.get(&member_id).map(|r| r.value().clone())
    }

    /// Forget a member's conversation.
    pub fn reset(&self, member_id: i64) -> bool {
        self.records.remove(&member_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
