#![forbid(unsafe_code)]

//! Latest-wins debouncing of query parameters.
//!
//! Search boxes change on every keystroke, but each distinct search text is
//! a distinct query identity. [`Debounced`] holds the newest input and only
//! releases it once it has been left alone for the quiet period, so a burst
//! of typing produces one query instead of one per character.
//!
//! The caller drives time: `set` on input, `poll` on every tick or pass.
//!
//! ```
//! use inflist_query::debounce::Debounced;
//! use web_time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut search = Debounced::new(String::new(), Duration::from_millis(250));
//!
//! search.set("fl".into(), start);
//! search.set("flux".into(), start + Duration::from_millis(100));
//! assert!(search.poll(start + Duration::from_millis(200)).is_none());
//! assert_eq!(
//!     search.poll(start + Duration::from_millis(350)).map(String::as_str),
//!     Some("flux")
//! );
//! ```

use web_time::{Duration, Instant};

/// Default quiet period for search inputs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// A value that settles after a quiet period.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    delay: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
}

impl<T: PartialEq> Debounced<T> {
    /// Start settled on `initial`.
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    /// Record new input at `now`; replaces any earlier unsettled input.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Settle the pending input if it has been quiet for the delay.
    ///
    /// Returns the newly settled value when it differs from the previous
    /// one; `None` otherwise.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.delay);
        if !ready {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value;
        Some(&self.settled)
    }

    /// The last settled value.
    pub fn settled(&self) -> &T {
        &self.settled
    }

    /// Whether input is waiting to settle.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}
