//! Touch/pointer to contact translation
//!
//! Browsers deliver a touch as both touch events and touch-kind pointer
//! events. Touch events win; touch-kind pointers are dropped. Mouse and pen
//! go through pointer events. Only one contact (the primary one) is tracked
//! at a time: a touch by its identifier, a pointer by its id.

use glam::Vec2;

use crate::game::Contact;

/// `PointerEvent.pointerType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    pub fn from_str(s: &str) -> Self {
        match s {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

/// Event family a raw contact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSource {
    /// `touch*` event, one per entry in `changedTouches`
    Touch { id: i32 },
    /// `pointer*` event
    Pointer {
        id: i32,
        primary: bool,
        kind: PointerKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPhase {
    Down,
    Move,
    Up,
    Cancel,
    /// `pointerleave`
    Leave,
}

/// A browser input event reduced to what the game needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawContact {
    pub source: RawSource,
    pub phase: RawPhase,
    pub point: Vec2,
}

/// Which contact is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Touch(i32),
    Pointer(i32),
}

/// Turns raw browser events into the `Contact` stream
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    active: Option<Active>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn translate(&mut self, raw: RawContact) -> Option<Contact> {
        let who = match raw.source {
            RawSource::Touch { id } => Active::Touch(id),
            RawSource::Pointer { kind: PointerKind::Touch, .. } => return None,
            RawSource::Pointer { primary: false, .. } => return None,
            RawSource::Pointer { id, .. } => Active::Pointer(id),
        };

        match raw.phase {
            RawPhase::Down => {
                if self.active.is_some() {
                    // Already tracking a contact; the controller ignores restarts too
                    return None;
                }
                self.active = Some(who);
                Some(Contact::Start(raw.point))
            }
            RawPhase::Move => (self.active == Some(who)).then_some(Contact::Move(raw.point)),
            RawPhase::Up => self.release(who, Contact::End),
            RawPhase::Cancel | RawPhase::Leave => self.release(who, Contact::Cancel),
        }
    }

    fn release(&mut self, who: Active, contact: Contact) -> Option<Contact> {
        if self.active != Some(who) {
            return None;
        }
        self.active = None;
        Some(contact)
    }

    /// Forget the held contact (page hidden mid-press)
    pub fn reset(&mut self) {
        self.active = None;
    }
}
