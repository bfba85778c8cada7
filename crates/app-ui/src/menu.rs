//! Home menu
//!
//! Entries of the welcome screen menu. Entries that are not ready yet stay
//! in the list, disabled, so the home screen keeps its layout.

use crate::navigation::{Navigator, Route};
use serde::{Deserialize, Serialize};

/// One home menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// Stable identifier
    pub id: String,
    /// Title shown on the button
    pub title: String,
    /// One-line description
    pub description: String,
    /// Emoji icon
    pub icon: String,
    /// Screen opened by the entry
    pub route: Route,
    /// Whether the entry can be opened
    pub enabled: bool,
}

impl MenuOption {
    fn new(id: &str, route: Route, description: &str, icon: &str, enabled: bool) -> Self {
        Self {
            id: id.to_string(),
            title: route.title().to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            route,
            enabled,
        }
    }
}

/// Every home menu entry, in display order
pub fn menu_options() -> Vec<MenuOption> {
    vec![
        MenuOption::new(
            "1",
            Route::NasaMissions,
            "Explora las misiones espaciales",
            "🚀",
            false,
        ),
        MenuOption::new(
            "2",
            Route::EventsPeru,
            "Eventos astronómicos visibles",
            "🌟",
            false,
        ),
        MenuOption::new(
            "3",
            Route::SolarSystem,
            "Descubre nuestro sistema",
            "🪐",
            false,
        ),
        MenuOption::new("4", Route::Planets, "Información de planetas", "🪐", true),
    ]
}

/// Entries the user can open
pub fn enabled_menu_options() -> Vec<MenuOption> {
    menu_options().into_iter().filter(|o| o.enabled).collect()
}

/// Open a menu entry
///
/// Returns `false`, without navigating, for a disabled entry.
pub fn open_menu_option(option: &MenuOption, navigator: &mut dyn Navigator) -> bool {
    if !option.enabled {
        return false;
    }
    navigator.navigate_to(option.route.clone());
    true
}
