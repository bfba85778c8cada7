//! Planets
//!
//! The planet code map (backend body identifiers to display names), planet
//! data records and the planet service.

use orbita_client::{EnvelopeLayout, FetchRequest, HttpFetcher, Result};
use serde::{Deserialize, Serialize};

use crate::client::Resource;

// =============================================================================
// Planet Code Map
// =============================================================================

/// Bodies the backend knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Planet {
    /// Mercury (199)
    Mercury,
    /// Venus (299)
    Venus,
    /// Earth (399)
    Earth,
    /// Mars (499)
    Mars,
    /// Jupiter (599)
    Jupiter,
    /// Saturn (699)
    Saturn,
    /// Uranus (799)
    Uranus,
    /// Neptune (899)
    Neptune,
    /// Pluto (999)
    Pluto,
}

impl Planet {
    /// All bodies in solar order
    pub const ALL: [Planet; 9] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    /// Numeric body identifier used by the backend
    pub fn code(&self) -> &'static str {
        match self {
            Planet::Mercury => "199",
            Planet::Venus => "299",
            Planet::Earth => "399",
            Planet::Mars => "499",
            Planet::Jupiter => "599",
            Planet::Saturn => "699",
            Planet::Uranus => "799",
            Planet::Neptune => "899",
            Planet::Pluto => "999",
        }
    }

    /// English name, as used by the mission endpoints
    pub fn english_name(&self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        }
    }

    /// Display name shown on screen
    pub fn spanish_name(&self) -> &'static str {
        match self {
            Planet::Mercury => "Mercurio",
            Planet::Venus => "Venus",
            Planet::Earth => "Tierra",
            Planet::Mars => "Marte",
            Planet::Jupiter => "Júpiter",
            Planet::Saturn => "Saturno",
            Planet::Uranus => "Urano",
            Planet::Neptune => "Neptuno",
            Planet::Pluto => "Plutón",
        }
    }

    /// Path segment used by the image gallery endpoint
    pub fn gallery_slug(&self) -> &'static str {
        match self {
            Planet::Mercury => "mercurio",
            Planet::Venus => "venus",
            Planet::Earth => "tierra",
            Planet::Mars => "marte",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturno",
            Planet::Uranus => "urano",
            Planet::Neptune => "neptuno",
            Planet::Pluto => "pluton",
        }
    }

    /// Look up a body by its numeric identifier
    pub fn from_code(code: &str) -> Option<Planet> {
        let code = code.trim();
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    /// Look up a body by English name, display name or gallery slug
    ///
    /// Matching ignores case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Planet> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| {
            p.english_name().to_lowercase() == name
                || p.spanish_name().to_lowercase() == name
                || p.gallery_slug() == name
        })
    }
}

impl std::fmt::Display for Planet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spanish_name())
    }
}

/// Display name for a body identifier, `None` for unknown codes
///
/// # Examples
/// ```
/// use app_core::planet_name;
///
/// assert_eq!(planet_name("499"), Some("Marte"));
/// assert_eq!(planet_name("123"), None);
/// ```
pub fn planet_name(code: &str) -> Option<&'static str> {
    Planet::from_code(code).map(|p| p.spanish_name())
}

// =============================================================================
// Planet Data
// =============================================================================

/// Bilingual attribute label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetName {
    /// Spanish label
    pub es: String,
    /// English label
    pub en: String,
}

/// One physical attribute of a planet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetAttribute {
    /// Attribute key (e.g., "mean_radius")
    pub key: String,
    /// Human-readable label
    pub name: PlanetName,
    /// Formatted value
    pub value: String,
}

/// Planet record as served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetData {
    /// Ephemeris command (the body identifier)
    pub command: String,
    /// Body name
    pub target_name: String,
    /// Physical attributes
    #[serde(default)]
    pub attributes: Vec<PlanetAttribute>,
}

impl PlanetData {
    /// Find an attribute by key
    pub fn attribute(&self, key: &str) -> Option<&PlanetAttribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// The known body this record describes, if any
    pub fn planet(&self) -> Option<Planet> {
        Planet::from_code(&self.command).or_else(|| Planet::from_name(&self.target_name))
    }
}

/// Find a planet by name in an already-fetched list
///
/// Case-insensitive on `target_name`.
pub fn find_by_name<'a>(planets: &'a [PlanetData], name: &str) -> Option<&'a PlanetData> {
    let name = name.trim().to_lowercase();
    planets
        .iter()
        .find(|p| p.target_name.to_lowercase() == name)
}

// =============================================================================
// Planet Service
// =============================================================================

/// Planet data service
///
/// The planets endpoint is not paginated: one response carries every record.
#[derive(Debug, Clone)]
pub struct PlanetService {
    fetcher: HttpFetcher,
    resource: Resource,
}

impl PlanetService {
    /// Create a planet service with the default resource layout
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            resource: Resource::new("planets", EnvelopeLayout::nested(2)),
        }
    }

    /// Override the endpoint and envelope layout
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// The endpoint and envelope layout in use
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Fetch every planet
    pub async fn all(&self) -> Result<Vec<PlanetData>> {
        let envelope = self
            .fetcher
            .get_json(&FetchRequest::get(self.resource.endpoint.clone()))
            .await?;
        let planets: Vec<PlanetData> = self.resource.layout.decode(&envelope)?;

        self.fetcher
            .telemetry()
            .info("planets_loaded", &[("count", planets.len().to_string())]);
        Ok(planets)
    }
}
