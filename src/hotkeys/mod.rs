//! Keyboard shortcuts for the timeline.
//!
//! The host UI turns its key events into a [`Key`] and calls [`handle_hotkey`]; the
//! resulting [`HotkeyAction`] is applied with `EditorSession::apply_hotkey`. A new
//! binding needs a variant here, a match arm in `handle_hotkey`, and a case in
//! `apply_hotkey`.

/// A pressed key, reduced to what the bindings look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(String),
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Other,
}

impl Key {
    pub fn character(c: impl Into<String>) -> Self {
        Key::Character(c.into())
    }
}

/// Editor actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    // ═══════════════════════════════════════════════════════════════
    // Timeline Zoom
    // ═══════════════════════════════════════════════════════════════
    /// Zoom in on the timeline (fewer seconds per grid)
    TimelineZoomIn,
    /// Zoom out on the timeline (more seconds per grid)
    TimelineZoomOut,

    // ═══════════════════════════════════════════════════════════════
    // Playback
    // ═══════════════════════════════════════════════════════════════
    PlayPause,
    SkipBackward,
    SkipForward,
    /// Jump to the track window start
    SeekStart,
    /// Jump to the track window end
    SeekEnd,
}

/// Editor state that decides whether bindings apply.
#[derive(Debug, Clone, Default)]
pub struct HotkeyContext {
    /// Whether an input field has focus (should suppress most hotkeys)
    pub input_focused: bool,
}

/// Result of processing a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyResult {
    /// A hotkey action was matched and should be executed
    Action(HotkeyAction),
    /// No matching hotkey for this key/context combination
    NoMatch,
    /// Hotkey would match but is suppressed (e.g., input field focused)
    Suppressed,
}

/// Maps a key event to an action, considering the current context.
///
/// Modifier chords are left to the host UI; none of the bindings use them.
pub fn handle_hotkey(key: &Key, ctrl: bool, meta: bool, context: &HotkeyContext) -> HotkeyResult {
    // Suppress hotkeys when typing in an input field
    if context.input_focused {
        return HotkeyResult::Suppressed;
    }
    if ctrl || meta {
        return HotkeyResult::NoMatch;
    }

    let action = match key {
        Key::Character(c) if c == "+" || c == "=" => HotkeyAction::TimelineZoomIn,
        Key::Character(c) if c == "-" => HotkeyAction::TimelineZoomOut,
        Key::Character(c) if c == " " => HotkeyAction::PlayPause,
        Key::ArrowLeft => HotkeyAction::SkipBackward,
        Key::ArrowRight => HotkeyAction::SkipForward,
        Key::Home => HotkeyAction::SeekStart,
        Key::End => HotkeyAction::SeekEnd,
        _ => return HotkeyResult::NoMatch,
    };
    HotkeyResult::Action(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_zooms_in() {
        let ctx = HotkeyContext::default();
        let result = handle_hotkey(&Key::character("+"), false, false, &ctx);
        assert_eq!(result, HotkeyResult::Action(HotkeyAction::TimelineZoomIn));
    }

    #[test]
    fn test_space_toggles_playback() {
        let ctx = HotkeyContext::default();
        let result = handle_hotkey(&Key::character(" "), false, false, &ctx);
        assert_eq!(result, HotkeyResult::Action(HotkeyAction::PlayPause));
    }

    #[test]
    fn test_arrows_and_home_end() {
        let ctx = HotkeyContext::default();
        assert_eq!(
            handle_hotkey(&Key::ArrowLeft, false, false, &ctx),
            HotkeyResult::Action(HotkeyAction::SkipBackward)
        );
        assert_eq!(
            handle_hotkey(&Key::End, false, false, &ctx),
            HotkeyResult::Action(HotkeyAction::SeekEnd)
        );
    }

    #[test]
    fn test_input_focus_suppresses() {
        let ctx = HotkeyContext {
            input_focused: true,
        };
        let result = handle_hotkey(&Key::character(" "), false, false, &ctx);
        assert_eq!(result, HotkeyResult::Suppressed);
    }

    #[test]
    fn test_chords_do_not_match() {
        let ctx = HotkeyContext::default();
        assert_eq!(handle_hotkey(&Key::character("-"), true, false, &ctx), HotkeyResult::NoMatch);
        assert_eq!(handle_hotkey(&Key::Other, false, false, &ctx), HotkeyResult::NoMatch);
    }
}
