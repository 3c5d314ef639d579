//! Platform abstraction layer
//!
//! Translates browser signals into game inputs:
//! - Touch/pointer events into a single primary contact stream
//! - Visibility/focus transitions into lifecycle signals

pub mod input;

pub use input::{InputAdapter, PointerKind, RawContact, RawPhase, RawSource};

/// Page lifecycle transitions the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleSignal {
    /// `visibilitychange` to hidden
    Hidden,
    /// `visibilitychange` to visible
    Visible,
    /// `pagehide`
    PageHide,
    /// Window lost focus
    Blur,
    /// Window regained focus
    Focus,
}

impl LifecycleSignal {
    /// Whether the browser may have revoked audio playback
    pub fn invalidates_audio(&self) -> bool {
        !matches!(self, LifecycleSignal::Visible)
    }

    /// Whether an in-progress touch can no longer be trusted to end normally
    pub fn interrupts_contact(&self) -> bool {
        matches!(
            self,
            LifecycleSignal::Hidden | LifecycleSignal::PageHide | LifecycleSignal::Blur
        )
    }
}
