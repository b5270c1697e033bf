//! Typing Animator
//!
//! Reveals a bot reply one grapheme cluster per tick into the
//! [`MessageStore`].
//!
//! # Timing
//!
//! ```text
//! t=0      append_pending (empty)
//! t=d      "H"
//! t=2d     "He"
//! ...
//! t=N·d    full text → complete()
//! ```
//!
//! `d` defaults to 30 ms. An empty reply completes immediately with zero ticks.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use unicode_segmentation::{GraphemeIndices, UnicodeSegmentation};

use crate::messages::MessageId;
use crate::store::MessageStore;

/// Default delay between two revealed characters
pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(30);

/// Successive prefixes of a string, one grapheme cluster longer each step
///
/// Slicing happens only at cluster boundaries, so combining marks, emoji
/// sequences and multi-byte characters are never split.
pub struct Reveal<'a> {
    text: &'a str,
    graphemes: GraphemeIndices<'a>,
}

impl<'a> Reveal<'a> {
    /// Start revealing `text`
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            graphemes: text.grapheme_indices(true),
        }
    }
}

impl<'a> Iterator for Reveal<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, grapheme) = self.graphemes.next()?;
        Some(&self.text[..start + grapheme.len()])
    }
}

/// Number of ticks needed to reveal `text`
#[must_use]
pub fn reveal_steps(text: &str) -> usize {
    text.graphemes(true).count()
}

/// How an animation ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The full text was revealed and the message frozen
    Completed {
        /// Incremental updates performed
        ticks: usize,
    },
    /// The target message disappeared or was frozen by someone else
    Abandoned {
        /// Incremental updates performed before stopping
        ticks: usize,
    },
}

impl AnimationOutcome {
    /// Incremental updates performed
    #[must_use]
    pub fn ticks(self) -> usize {
        match self {
            Self::Completed { ticks } | Self::Abandoned { ticks } => ticks,
        }
    }
}

/// Fixed-delay typing animation
#[derive(Clone, Copy, Debug)]
pub struct TypingAnimator {
    delay: Duration,
}

impl Default for TypingAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_DELAY)
    }
}

impl TypingAnimator {
    /// Create an animator; delays below 1 ms are raised to 1 ms
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.max(Duration::from_millis(1)),
        }
    }

    /// Delay between two ticks
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Reveal `target` into message `id`
    ///
    /// Resolves exactly once, after the last tick (or immediately for an
    /// empty target).
    pub async fn reveal(&self, store: &MessageStore, id: MessageId, target: &str) -> AnimationOutcome {
        let mut ticks = 0;

        if target.is_empty() {
            return if store.complete(id) {
                AnimationOutcome::Completed { ticks }
            } else {
                AnimationOutcome::Abandoned { ticks }
            };
        }

        let mut timer = interval(self.delay);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval fires immediately.
        timer.tick().await;

        for prefix in Reveal::new(target) {
            timer.tick().await;
            if !store.update_text(id, prefix) {
                tracing::debug!(%id, ticks, "Animation target gone, stopping");
                return AnimationOutcome::Abandoned { ticks };
            }
            ticks += 1;
        }

        if store.complete(id) {
            tracing::debug!(%id, ticks, "Animation complete");
            AnimationOutcome::Completed { ticks }
        } else {
            AnimationOutcome::Abandoned { ticks }
        }
    }
}
