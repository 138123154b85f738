use tracing::debug;

/// Transient panels of the player chrome. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayMenu {
    #[default]
    None,
    SubtitlesAudio,
    /// Quality / source picker
    Sources,
    Settings,
    SettingsSpeedSubmenu,
    PiP,
}

#[derive(Debug, Default)]
pub struct MenuState {
    active: OverlayMenu,
}

impl MenuState {
    pub fn active(&self) -> OverlayMenu {
        self.active
    }

    pub fn is_open(&self, menu: OverlayMenu) -> bool {
        menu != OverlayMenu::None && self.active == menu
    }

    pub fn any_open(&self) -> bool {
        self.active != OverlayMenu::None
    }

    /// Opening a menu replaces whatever was open.
    pub fn open(&mut self, menu: OverlayMenu) {
        if self.active != menu {
            debug!("Menu {:?} -> {:?}", self.active, menu);
            self.active = menu;
        }
    }

    pub fn toggle(&mut self, menu: OverlayMenu) {
        if self.active == menu {
            self.close_all();
        } else {
            self.open(menu);
        }
    }

    /// Click outside, scroll, or source change.
    pub fn close_all(&mut self) {
        self.open(OverlayMenu::None);
    }

    /// Leave a submenu for its parent, or close a top-level menu.
    pub fn back(&mut self) {
        let parent = match self.active {
            OverlayMenu::SettingsSpeedSubmenu => OverlayMenu::Settings,
            _ => OverlayMenu::None,
        };
        self.open(parent);
    }
}
