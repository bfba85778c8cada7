//! User interface layer for Orbita Explorer
//!
//! This crate provides what the screens share besides data: the route
//! table, the navigation capability and the home menu.
//!
//! # Modules
//!
//! - [`navigation`] - Routes, deep links and the [`Navigator`] capability
//! - [`menu`] - Home menu entries
//!
//! # Example
//!
//! ```rust
//! use app_ui::{open_menu_option, enabled_menu_options, Navigator, Route, StackNavigator};
//!
//! let mut nav = StackNavigator::default();
//! let planets = &enabled_menu_options()[0];
//!
//! assert!(open_menu_option(planets, &mut nav));
//! assert_eq!(nav.current(), Route::Planets);
//! assert!(nav.go_back());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod menu;
pub mod navigation;

pub use menu::{enabled_menu_options, menu_options, open_menu_option, MenuOption};
pub use navigation::{Navigator, Route, RouteParams, StackEntry, StackNavigator};
