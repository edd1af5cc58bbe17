//! Content-identity keyed transition state machine
//!
//! Each animated visual element (the tile itself, the album art, the
//! title/artist text) owns one `ContentTransition`. Feeding it the
//! element's current content key advances a small phase machine
//! (hidden → entering → visible → exiting) and reports whether an
//! enter/swap animation fired. Identical successive keys never retrigger.

/// Visual phase of one animated element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Not shown
    Hidden,
    /// Entrance animation running
    Entering,
    /// Settled on screen
    Visible,
    /// Exit animation running
    Exiting,
}

/// Outcome of observing a content key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No animation fired
    None,
    /// Element appeared
    Enter,
    /// Content identity changed while visible
    Swap,
    /// Element is leaving
    Exit,
}

/// Transition tracker for one visual element
#[derive(Debug)]
pub struct ContentTransition {
    key: Option<String>,
    phase: TransitionPhase,
    fired: u64,
}

impl ContentTransition {
    pub fn new() -> Self {
        Self {
            key: None,
            phase: TransitionPhase::Hidden,
            fired: 0,
        }
    }

    /// Observe the element's current content key.
    ///
    /// `Some(key)` means the element should be shown with that identity;
    /// `None` means it should not be shown. Returns the transition that
    /// fired, if any. Only `Enter` and `Swap` count as fired animations;
    /// an unchanged key settles the entrance and fires nothing.
    pub fn observe(&mut self, key: Option<&str>) -> Transition {
        match (self.key.as_deref(), key) {
            (None, Some(new_key)) => {
                self.key = Some(new_key.to_string());
                self.phase = TransitionPhase::Entering;
                self.fired += 1;
                Transition::Enter
            }
            (Some(current), Some(new_key)) if current == new_key => {
                // Same identity: settle, never retrigger
                if self.phase == TransitionPhase::Entering {
                    self.phase = TransitionPhase::Visible;
                }
                Transition::None
            }
            (Some(_), Some(new_key)) => {
                self.key = Some(new_key.to_string());
                self.phase = TransitionPhase::Entering;
                self.fired += 1;
                Transition::Swap
            }
            (Some(_), None) => {
                self.key = None;
                self.phase = TransitionPhase::Exiting;
                Transition::Exit
            }
            (None, None) => {
                if self.phase == TransitionPhase::Exiting {
                    self.phase = TransitionPhase::Hidden;
                }
                Transition::None
            }
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Number of enter/swap animations fired so far
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl Default for ContentTransition {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_then_settle() {
        let mut transition = ContentTransition::new();
        assert_eq!(transition.observe(Some("a")), Transition::Enter);
        assert_eq!(transition.phase(), TransitionPhase::Entering);
        assert_eq!(transition.observe(Some("a")), Transition::None);
        assert_eq!(transition.phase(), TransitionPhase::Visible);
        assert_eq!(transition.fired(), 1);
    }

    #[test]
    fn identical_keys_never_retrigger() {
        let mut transition = ContentTransition::new();
        transition.observe(Some("a"));
        for _ in 0..5 {
            assert_eq!(transition.observe(Some("a")), Transition::None);
        }
        assert_eq!(transition.fired(), 1);
    }

    #[test]
    fn changed_key_swaps() {
        let mut transition = ContentTransition::new();
        transition.observe(Some("a"));
        transition.observe(Some("a"));
        assert_eq!(transition.observe(Some("b")), Transition::Swap);
        assert_eq!(transition.phase(), TransitionPhase::Entering);
        assert_eq!(transition.fired(), 2);
    }

    #[test]
    fn exit_then_hidden() {
        let mut transition = ContentTransition::new();
        transition.observe(Some("a"));
        assert_eq!(transition.observe(None), Transition::Exit);
        assert_eq!(transition.phase(), TransitionPhase::Exiting);
        assert_eq!(transition.observe(None), Transition::None);
        assert_eq!(transition.phase(), TransitionPhase::Hidden);
        // Exits are not fired animations
        assert_eq!(transition.fired(), 1);
    }

    #[test]
    fn reenter_after_exit_fires_again() {
        let mut transition = ContentTransition::new();
        transition.observe(Some("a"));
        transition.observe(None);
        assert_eq!(transition.observe(Some("a")), Transition::Enter);
        assert_eq!(transition.fired(), 2);
    }
}
