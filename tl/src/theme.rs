//! Theme controller
//!
//! The toggle reads the theme currently applied to the rendered root rather
//! than a remembered value, so what gets persisted is always the opposite of
//! what the user is looking at.

use tracing::{debug, info};

use crate::domain::Theme;
use crate::storage::Persistence;

/// Toggle glyph while dark mode is applied
pub const DARK_GLYPH: &str = "☀";

/// Toggle glyph while light mode is applied
pub const LIGHT_GLYPH: &str = "🌙";

/// Rendered root element: mode attribute plus the toggle button state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootView {
    /// Mode attribute; absent means light
    pub data_theme: Option<&'static str>,
    pub toggle_glyph: &'static str,
    pub toggle_pressed: bool,
}

impl RootView {
    /// Theme as read back from the mode attribute
    pub fn applied_theme(&self) -> Theme {
        match self.data_theme {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn apply(&mut self, theme: Theme) {
        match theme {
            Theme::Dark => {
                self.data_theme = Some("dark");
                self.toggle_glyph = DARK_GLYPH;
                self.toggle_pressed = true;
            }
            Theme::Light => {
                self.data_theme = None;
                self.toggle_glyph = LIGHT_GLYPH;
                self.toggle_pressed = false;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeController {
    persistence: Persistence,
}

impl ThemeController {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }

    /// Apply the stored preference to the root
    pub fn init(&self, root: &mut RootView) -> Theme {
        let theme = self.persistence.load_theme();
        root.apply(theme);
        info!(%theme, "Theme applied");
        theme
    }

    /// Flip the applied theme, persisting before applying
    pub fn toggle(&self, root: &mut RootView) -> Theme {
        let current = root.applied_theme();
        let next = current.opposite();
        debug!(%current, %next, "ThemeController::toggle: called");
        self.persistence.save_theme(next);
        root.apply(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, THEME_KEY};

    fn controller() -> (ThemeController, MemoryStore) {
        let backend = MemoryStore::new();
        (ThemeController::new(Persistence::new(backend.clone())), backend)
    }

    #[test]
    fn test_init_defaults_light() {
        let (controller, _) = controller();
        let mut root = RootView::default();
        assert_eq!(controller.init(&mut root), Theme::Light);
        assert_eq!(root.data_theme, None);
        assert_eq!(root.toggle_glyph, LIGHT_GLYPH);
        assert!(!root.toggle_pressed);
    }

    #[test]
    fn test_toggle_persists_and_applies() {
        let (controller, backend) = controller();
        let mut root = RootView::default();
        controller.init(&mut root);

        assert_eq!(controller.toggle(&mut root), Theme::Dark);
        assert_eq!(backend.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(root.data_theme, Some("dark"));
        assert_eq!(root.toggle_glyph, DARK_GLYPH);
        assert!(root.toggle_pressed);

        assert_eq!(controller.toggle(&mut root), Theme::Light);
        assert_eq!(backend.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(root.data_theme, None);
    }

    #[test]
    fn test_toggle_reads_applied_attribute() {
        let (controller, backend) = controller();
        backend.set_item(THEME_KEY, "light").unwrap();
        let mut root = RootView::default();
        controller.init(&mut root);

        // Root shows dark even though storage says light
        root.data_theme = Some("dark");
        assert_eq!(controller.toggle(&mut root), Theme::Light);
        assert_eq!(backend.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_init_restores_dark() {
        let (controller, backend) = controller();
        backend.set_item(THEME_KEY, "dark").unwrap();
        let mut root = RootView::default();
        assert_eq!(controller.init(&mut root), Theme::Dark);
        assert_eq!(root.applied_theme(), Theme::Dark);
    }
}
