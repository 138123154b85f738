/// Keys the player reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    F,
    Escape,
    C,
    Other,
}

impl Key {
    /// Parse a key name as delivered by the input layer (`" "`, `"Space"`, `"f"`, `"Escape"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            " " => Key::Space,
            _ => match name.to_ascii_lowercase().as_str() {
                "space" | "spacebar" => Key::Space,
                "f" => Key::F,
                "escape" | "esc" => Key::Escape,
                "c" => Key::C,
                _ => Key::Other,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TogglePlay,
    ToggleFullscreen,
    ExitFullscreen,
    /// Flip the first subtitle track on/off without opening the menu
    ToggleSubtitles,
}

pub fn action_for(key: Key, is_fullscreen: bool) -> Option<KeyAction> {
    match key {
        Key::Space => Some(KeyAction::TogglePlay),
        Key::F => Some(KeyAction::ToggleFullscreen),
        Key::Escape if is_fullscreen => Some(KeyAction::ExitFullscreen),
        Key::C => Some(KeyAction::ToggleSubtitles),
        Key::Escape | Key::Other => None,
    }
}
