//! Token-bucket rate limiting for noisy call sites
//!
//! Every message costs [`MSG_TOKENS`] tokens and a bucket gains `rate` tokens
//! per elapsed whole second, so `rate` reads as messages per minute:
//!
//! ```rust
//! use vlog::RateLimit;
//!
//! // At most 5 messages per second, bursts of up to 5.
//! static RL: RateLimit = RateLimit::new(300, 5);
//! # let _ = &RL;
//! ```
//!
//! Refill happens only on whole-second boundaries. A clock that moves
//! backwards is treated like the first use and refills the bucket completely.

use parking_lot::Mutex;

use crate::utils::{clamp_u32, sat_add, sat_mul};

/// Token cost of one message
pub const MSG_TOKENS: u32 = 60;

/// Messages dropped since the last emitted one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSummary {
    /// How many messages were suppressed
    pub count: u32,
    /// Seconds between the first suppressed message and now
    pub elapsed_secs: u64,
}

/// Outcome of asking a bucket for one message's worth of tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Emit the message; report `dropped` right after it when present
    Allowed {
        /// Drop run that ended with this message
        dropped: Option<DropSummary>,
    },
    /// Drop the message
    Suppressed,
}

/// Raw token bucket state for one call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBucket {
    rate: u32,
    burst: u32,
    tokens: u32,
    last_fill: u64,
    first_dropped: u64,
    n_dropped: u32,
}

impl TokenBucket {
    /// Bucket allowing `rate_per_minute` messages per minute in bursts of
    /// `burst` messages
    pub const fn new(rate_per_minute: u32, burst: u32) -> Self {
        Self {
            rate: rate_per_minute,
            burst: sat_mul(burst, MSG_TOKENS),
            tokens: 0,
            last_fill: u64::MAX,
            first_dropped: 0,
            n_dropped: 0,
        }
    }

    /// Try to spend one message's worth of tokens at time `now` (seconds)
    pub fn withdraw(&mut self, now: u64) -> Admission {
        if self.tokens < MSG_TOKENS {
            if self.last_fill > now {
                self.tokens = self.burst;
                self.last_fill = now;
            } else if self.last_fill < now {
                let elapsed = clamp_u32(now - self.last_fill);
                let added = sat_mul(self.rate, elapsed);
                self.tokens = sat_add(self.tokens, added).min(self.burst);
                self.last_fill = now;
            }
        }

        if self.tokens < MSG_TOKENS {
            if self.n_dropped == 0 {
                self.first_dropped = now;
            }
            self.n_dropped = sat_add(self.n_dropped, 1);
            return Admission::Suppressed;
        }

        self.tokens -= MSG_TOKENS;
        let dropped = (self.n_dropped > 0).then(|| DropSummary {
            count: self.n_dropped,
            elapsed_secs: now.saturating_sub(self.first_dropped),
        });
        self.n_dropped = 0;
        Admission::Allowed { dropped }
    }

    /// Current token balance
    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    /// Capacity in tokens
    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Messages suppressed since the last emitted one
    pub fn dropped(&self) -> u32 {
        self.n_dropped
    }
}

/// Shareable rate-limit state for one call site
///
/// `const`-constructible so it can sit in a `static` next to the call site.
#[derive(Debug)]
pub struct RateLimit {
    bucket: Mutex<TokenBucket>,
}

impl RateLimit {
    /// See [`TokenBucket::new`]
    pub const fn new(rate_per_minute: u32, burst: u32) -> Self {
        Self {
            bucket: parking_lot::const_mutex(TokenBucket::new(rate_per_minute, burst)),
        }
    }

    /// Withdraw one message at time `now`
    pub fn withdraw(&self, now: u64) -> Admission {
        self.bucket.lock().withdraw(now)
    }

    /// Messages suppressed since the last emitted one
    pub fn dropped(&self) -> u32 {
        self.bucket.lock().dropped()
    }

    /// Copy of the bucket state
    pub fn snapshot(&self) -> TokenBucket {
        self.bucket.lock().clone()
    }
}

/// Text of the summary line emitted after a drop run
pub fn summary_message(summary: DropSummary) -> String {
    format!(
        "Dropped {} messages in last {} seconds due to excessive rate",
        summary.count, summary.elapsed_secs
    )
}
