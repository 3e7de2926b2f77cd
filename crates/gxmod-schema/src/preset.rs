use crate::payload::Section;

/// Browser events a `browser_sounds` pack can map.
pub const BROWSER_EVENT_PRESETS: &[&str] = &[
    "CLICK",
    "HOVER",
    "HOVER_UP",
    "TAB_INSERT",
    "TAB_CLOSE",
    "TAB_SLASH",
    "SWITCH_TAB",
    "WINDOW_OPEN",
    "WINDOW_CLOSE",
    "LIMITER_ON",
    "LIMITER_OFF",
    "FEATURE_SWITCH_ON",
    "FEATURE_SWITCH_OFF",
    "DOWNLOAD_START",
    "DOWNLOAD_FINISH",
    "IMPORTANT_CLICK",
];

pub const KEYBOARD_EVENT_PRESETS: &[&str] = &[
    "TYPING_LETTER",
    "TYPING_SPACE",
    "TYPING_ENTER",
    "TYPING_BACKSPACE",
    "TYPING_DELETE",
    "TYPING_TAB",
];

/// Cursor kinds, used as the `type` of a cursor item.
pub const CURSOR_PRESETS: &[&str] = &[
    "POINTER",
    "HAND",
    "WAIT",
    "PROGRESS",
    "I_BEAM",
    "MOVE",
    "HELP",
    "NORTH_RESIZE",
    "SOUTH_RESIZE",
    "EAST_RESIZE",
    "WEST_RESIZE",
    "NORTH_EAST_SOUTH_WEST_RESIZE",
    "NORTH_WEST_SOUTH_EAST_RESIZE",
    "ALIAS",
    "COPY",
    "NO_DROP",
    "GRAB",
    "GRABBING",
    "ZOOM_IN",
    "ZOOM_OUT",
];

/// Known event or kind names for a section; empty for sections without any.
pub fn presets_for(section: Section) -> &'static [&'static str] {
    match section {
        Section::BrowserSounds => BROWSER_EVENT_PRESETS,
        Section::KeyboardSounds => KEYBOARD_EVENT_PRESETS,
        Section::Cursors => CURSOR_PRESETS,
        _ => &[],
    }
}

pub fn is_known_preset(section: Section, name: &str) -> bool {
    presets_for(section).contains(&name)
}
