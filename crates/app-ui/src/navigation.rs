//! Navigation for Orbita Explorer
//!
//! This module provides:
//! - Route definitions with path round-tripping (deep links)
//! - The [`Navigator`] capability screens depend on
//! - An in-memory [`StackNavigator`]

use app_core::Planet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query parameters of a route path
pub type RouteParams = HashMap<String, String>;

/// Planet shown by the mission details screen when none is given
pub const DEFAULT_MISSION_PLANET: Planet = Planet::Venus;

/// Planet shown by the image gallery when none is given
pub const DEFAULT_GALLERY_PLANET: Planet = Planet::Mars;

// =============================================================================
// Route Definitions
// =============================================================================

/// All screens of the application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    /// Home menu
    #[default]
    Home,
    /// Planet list
    Planets,
    /// Solar system overview
    SolarSystem,
    /// NASA missions overview
    NasaMissions,
    /// Paginated list of every mission
    Missions,
    /// Missions of one planet
    MissionDetails {
        /// Planet whose missions are shown
        planet: Planet,
    },
    /// Educational content
    Education,
    /// Image gallery of one planet
    ImageGallery {
        /// Planet whose images are shown
        planet: Planet,
    },
    /// Astronomical events visible from Peru
    EventsPeru,
    /// Unknown path
    NotFound,
}

impl Route {
    /// Get the URL path for this route
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Planets => "/screens/planets".to_string(),
            Route::SolarSystem => "/screens/solar-system".to_string(),
            Route::NasaMissions => "/screens/nasa-missions".to_string(),
            Route::Missions => "/screens/missions".to_string(),
            Route::MissionDetails { planet } => format!(
                "/screens/mission-details?planetName={}&planetNameEs={}&planetCode={}",
                urlencoding::encode(planet.english_name()),
                urlencoding::encode(planet.spanish_name()),
                planet.code()
            ),
            Route::Education => "/screens/education".to_string(),
            Route::ImageGallery { planet } => format!(
                "/screens/image-gallery?planetName={}&planetDisplayName={}",
                planet.gallery_slug(),
                urlencoding::encode(planet.spanish_name())
            ),
            Route::EventsPeru => "/screens/events-peru".to_string(),
            Route::NotFound => "/+not-found".to_string(),
        }
    }

    /// Parse a URL path into a route
    ///
    /// Unknown paths give [`Route::NotFound`]. Screens that take a planet
    /// fall back to their default planet when the query names none.
    pub fn from_path(path: &str) -> Route {
        let (pathname, query) = match path.split_once('?') {
            Some((pathname, query)) => (pathname, Some(query)),
            None => (path, None),
        };
        let params = parse_query(query);

        let segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["(tabs)"] => Route::Home,
            ["screens", "planets"] => Route::Planets,
            ["screens", "solar-system"] => Route::SolarSystem,
            ["screens", "nasa-missions"] => Route::NasaMissions,
            ["screens", "missions"] => Route::Missions,
            ["screens", "mission-details"] => Route::MissionDetails {
                planet: planet_param(&params, &["planetCode", "planetName", "planetNameEs"])
                    .unwrap_or(DEFAULT_MISSION_PLANET),
            },
            ["screens", "education"] => Route::Education,
            ["screens", "image-gallery"] => Route::ImageGallery {
                planet: planet_param(&params, &["planetName", "planetDisplayName"])
                    .unwrap_or(DEFAULT_GALLERY_PLANET),
            },
            ["screens", "events-peru"] => Route::EventsPeru,
            _ => Route::NotFound,
        }
    }

    /// Get a display title for this route
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "SpaceExplorer",
            Route::Planets => "Planetas",
            Route::SolarSystem => "Sistema Solar",
            Route::NasaMissions => "Misiones NASA",
            Route::Missions => "Misiones Espaciales",
            Route::MissionDetails { .. } => "Misiones",
            Route::Education => "Contenido Educativo",
            Route::ImageGallery { .. } => "Galería de Imágenes",
            Route::EventsPeru => "Eventos en Perú",
            Route::NotFound => "No encontrado",
        }
    }
}

/// Parse a query string into params
fn parse_query(query: Option<&str>) -> RouteParams {
    let mut params = RouteParams::new();
    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                if let Ok(decoded) = urlencoding::decode(value) {
                    params.insert(key.to_string(), decoded.into_owned());
                }
            }
        }
    }
    params
}

/// First param among `keys` naming a known planet
fn planet_param(params: &RouteParams, keys: &[&str]) -> Option<Planet> {
    keys.iter()
        .filter_map(|key| params.get(*key))
        .find_map(|value| Planet::from_code(value).or_else(|| Planet::from_name(value)))
}

// =============================================================================
// Navigator
// =============================================================================

/// Navigation capability handed to screens
///
/// Screens only push, pop and replace; how the stack is rendered is up to
/// the host.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    /// Push a route
    fn navigate_to(&mut self, route: Route);

    /// Pop the top route; `false` when already at the root
    fn go_back(&mut self) -> bool;

    /// Replace the top route
    fn replace(&mut self, route: Route);

    /// Drop the whole stack and start over at `route`
    fn reset(&mut self, route: Route);

    /// The route on top of the stack
    fn current(&self) -> Route;
}

// =============================================================================
// Navigation Stack
// =============================================================================

/// A navigation stack entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    /// The route
    pub route: Route,
    /// Unique key for this entry
    pub key: String,
}

impl StackEntry {
    /// Create a new stack entry
    pub fn new(route: Route) -> Self {
        Self {
            route,
            key: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// In-memory [`Navigator`]
///
/// The stack always holds at least its root entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackNavigator {
    /// Bottom entry, never popped
    root: StackEntry,
    /// Entries above the root (bottom to top)
    entries: Vec<StackEntry>,
}

impl Default for StackNavigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl StackNavigator {
    /// Create a stack with a root route
    pub fn new(root: Route) -> Self {
        Self {
            root: StackEntry::new(root),
            entries: Vec::new(),
        }
    }

    /// Current stack entry
    pub fn current_entry(&self) -> &StackEntry {
        self.entries.last().unwrap_or(&self.root)
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Get stack depth
    pub fn depth(&self) -> usize {
        self.entries.len() + 1
    }

    /// Routes from bottom to top
    pub fn routes(&self) -> Vec<&Route> {
        std::iter::once(&self.root)
            .chain(self.entries.iter())
            .map(|entry| &entry.route)
            .collect()
    }

    /// Pop to root
    pub fn pop_to_root(&mut self) {
        self.entries.clear();
    }
}

impl Navigator for StackNavigator {
    fn navigate_to(&mut self, route: Route) {
        self.entries.push(StackEntry::new(route));
    }

    fn go_back(&mut self) -> bool {
        self.entries.pop().is_some()
    }

    fn replace(&mut self, route: Route) {
        match self.entries.last_mut() {
            Some(last) => *last = StackEntry::new(route),
            None => self.root = StackEntry::new(route),
        }
    }

    fn reset(&mut self, route: Route) {
        self.root = StackEntry::new(route);
        self.entries.clear();
    }

    fn current(&self) -> Route {
        self.current_entry().route.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
