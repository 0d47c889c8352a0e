// Copyright (c) 2024 Mike Tsao

use core::time::Duration;
use std::time::Instant;

/// The result of re-checking a knob after it moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleCheck {
    /// The knob stopped moving since the last check. Its display needs a
    /// refresh.
    Settled,
    /// A value arrived within the settle window. Check again later.
    StillMoving,
    /// The knob wasn't moving. Nothing to do.
    Idle,
}

/// Remembers when each knob last reported a value, so that the display doesn't
/// fight a hand that is still turning it.
#[derive(Clone, Debug, Default)]
pub struct KnobSettle {
    last_moved: Vec<Option<Instant>>,
}
impl KnobSettle {
    #[allow(missing_docs)]
    pub fn new_with(knob_count: usize) -> Self {
        Self {
            last_moved: vec![None; knob_count],
        }
    }

    /// Records a value at `now`. Returns true if the knob had been idle, which
    /// means nobody is re-checking it yet.
    pub fn moved(&mut self, index: usize, now: Instant) -> bool {
        match self.last_moved.get_mut(index) {
            Some(last) => last.replace(now).is_none(),
            None => false,
        }
    }

    /// Whether the knob reported a value less than `window` ago.
    pub fn is_moving(&self, index: usize, now: Instant, window: Duration) -> bool {
        matches!(
            self.last_moved.get(index),
            Some(Some(last)) if now.saturating_duration_since(*last) < window
        )
    }

    /// Decides whether a knob has settled, forgetting its last movement if so.
    pub fn check(&mut self, index: usize, now: Instant, window: Duration) -> SettleCheck {
        if self.is_moving(index, now, window) {
            return SettleCheck::StillMoving;
        }
        match self.last_moved.get_mut(index).and_then(Option::take) {
            Some(_) => SettleCheck::Settled,
            None => SettleCheck::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_only_after_a_quiet_window() {
        let window = Duration::from_millis(200);
        let t0 = Instant::now();
        let ms = |n| t0 + Duration::from_millis(n);
        let mut settle = KnobSettle::new_with(2);

        assert!(settle.moved(0, t0), "first movement starts a re-check chain");
        assert!(!settle.moved(0, ms(150)), "later movement joins the chain");
        assert!(settle.is_moving(0, ms(300), window));
        assert!(!settle.is_moving(1, ms(300), window));

        assert_eq!(settle.check(0, ms(300), window), SettleCheck::StillMoving);
        assert_eq!(settle.check(0, ms(350), window), SettleCheck::Settled);
        assert_eq!(
            settle.check(0, ms(450), window),
            SettleCheck::Idle,
            "a settled knob settles only once"
        );
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut settle = KnobSettle::new_with(1);
        let now = Instant::now();
        assert!(!settle.moved(5, now));
        assert_eq!(
            settle.check(5, now, Duration::from_millis(1)),
            SettleCheck::Idle
        );
    }
}
