//! Keyboard input mapping
//!
//! Translates key presses into viewer actions. Digit keys double as filter
//! selection and zoom request: pressing `n` selects the filter slot `n - 1`
//! and, unless Shift is held, asks for the window to be resized to `n` times
//! the source image. The selected filter index and the requested zoom factor
//! are distinct concepts that happen to share this one update rule — holding
//! Shift overrides the zoom half, letting a filter be previewed at the
//! current window size.

use winit::keyboard::KeyCode;

/// The zoom factor (and matching filter slot) active at startup.
pub const DEFAULT_ZOOM: u32 = 2;

/// An action requested through the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    /// Close the window and end the session
    Close,
    /// Switch the active filter, optionally resizing the window
    SetFilter {
        /// Registry slot to select (0 = passthrough)
        index: usize,
        /// Zoom factor to resize the window to, or `None` to keep its size
        zoom: Option<u32>,
    },
}

/// Maps a pressed key to a viewer action.
///
/// Escape closes the viewer; digits 1 through 4 select a filter slot. Digit 1
/// is the passthrough slot shown at native size, digits 2 to 4 the matching
/// upscale variants. Returns `None` for keys the viewer does not handle.
pub fn map_key(key: KeyCode, shift_held: bool) -> Option<ViewerAction> {
    let digit = match key {
        KeyCode::Escape => return Some(ViewerAction::Close),
        KeyCode::Digit1 => 1,
        KeyCode::Digit2 => 2,
        KeyCode::Digit3 => 3,
        KeyCode::Digit4 => 4,
        _ => return None,
    };

    Some(ViewerAction::SetFilter {
        index: (digit - 1) as usize,
        zoom: if shift_held { None } else { Some(digit) },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_closes() {
        assert_eq!(map_key(KeyCode::Escape, false), Some(ViewerAction::Close));
        assert_eq!(map_key(KeyCode::Escape, true), Some(ViewerAction::Close));
    }

    #[test]
    fn test_digits_select_filter_and_zoom() {
        assert_eq!(
            map_key(KeyCode::Digit1, false),
            Some(ViewerAction::SetFilter { index: 0, zoom: Some(1) })
        );
        assert_eq!(
            map_key(KeyCode::Digit3, false),
            Some(ViewerAction::SetFilter { index: 2, zoom: Some(3) })
        );
        assert_eq!(
            map_key(KeyCode::Digit4, false),
            Some(ViewerAction::SetFilter { index: 3, zoom: Some(4) })
        );
    }

    #[test]
    fn test_shift_suppresses_zoom() {
        assert_eq!(
            map_key(KeyCode::Digit3, true),
            Some(ViewerAction::SetFilter { index: 2, zoom: None })
        );
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::Digit5, false), None);
        assert_eq!(map_key(KeyCode::Space, false), None);
        assert_eq!(map_key(KeyCode::KeyQ, false), None);
    }
}
