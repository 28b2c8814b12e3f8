//! Typing indicator with a resettable fade deadline.

use std::time::Duration;

use tokio::time::Instant;

/// Default delay before the typing indicator fades out.
pub const DEFAULT_TYPING_FADE: Duration = Duration::from_millis(3000);

/// What a typing notification did to the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingTransition {
    /// The indicator was hidden and is now shown
    Appeared,
    /// The indicator was already shown; its fade deadline moved forward
    Extended,
}

/// Tracks whether someone is typing in the open room.
///
/// Each notification pushes the fade deadline to `now + fade`, so a steady
/// stream of notifications keeps the indicator visible without gaps.
#[derive(Debug, Clone)]
pub struct TypingIndicator {
    fade: Duration,
    visible_until: Option<Instant>,
}

impl TypingIndicator {
    pub fn new(fade: Duration) -> Self {
        Self {
            fade,
            visible_until: None,
        }
    }

    /// Register a typing notification received at `now`.
    pub fn show(&mut self, now: Instant) -> TypingTransition {
        let transition = if self.is_visible(now) {
            TypingTransition::Extended
        } else {
            TypingTransition::Appeared
        };
        self.visible_until = Some(now + self.fade);
        transition
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.visible_until.is_some_and(|deadline| now < deadline)
    }

    /// When the indicator should be hidden, if it is showing.
    pub fn deadline(&self) -> Option<Instant> {
        self.visible_until
    }

    /// Hide the indicator if its deadline has passed.
    ///
    /// Returns `true` when this call hid it.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.visible_until {
            Some(deadline) if deadline <= now => {
                self.visible_until = None;
                true
            }
            _ => false,
        }
    }

    /// Hide immediately, e.g. when the room is closed.
    pub fn reset(&mut self) {
        self.visible_until = None;
    }
}

impl Default for TypingIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_FADE)
    }
}
