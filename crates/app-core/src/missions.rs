//! Space missions
//!
//! Mission records, the mission service (paginated listing, full
//! aggregation, per-planet lookup) and the statistics derived from a full
//! mission collection.

use orbita_client::{
    Aggregator, CancellationToken, CursorPager, EnvelopeLayout, FetchRequest, HttpFetcher,
    HttpPager, Page, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::client::Resource;
use crate::filters::{count_by, distinct, filter_by};

/// Status value of a mission still operating
pub const STATUS_ACTIVE: &str = "active";

/// Status values the backend uses for finished missions
pub const STATUS_COMPLETED: [&str; 2] = ["completed", "completado"];

// =============================================================================
// Mission Records
// =============================================================================

/// Year of an achievement; the backend sends either a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AchievementYear {
    /// Numeric year
    Number(i64),
    /// Free-form year ("2004-2010", "c. 1976")
    Text(String),
}

impl std::fmt::Display for AchievementYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AchievementYear::Number(year) => write!(f, "{}", year),
            AchievementYear::Text(year) => f.write_str(year),
        }
    }
}

/// A mission achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// When it happened
    pub year: AchievementYear,
    /// What happened
    pub description: String,
    /// Why it matters
    #[serde(default)]
    pub significance: String,
}

/// Mission duration breakdown, in years
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionDuration {
    /// Length approved at launch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_years: Option<f64>,
    /// Time operating so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_years: Option<f64>,
    /// Time between launch and arrival
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cruise_years: Option<f64>,
    /// Launch to end of mission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_years: Option<f64>,
    /// Time spent in orbit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbital_years: Option<f64>,
}

/// Planetary flyby used for a gravity assist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravityAssist {
    /// Body flown by
    pub planet: String,
    /// Date of closest approach
    pub date: String,
}

/// Mission trajectory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Flybys in flight order
    #[serde(default)]
    pub gravity_assists: Vec<GravityAssist>,
}

/// Where a lander touched down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingSite {
    /// Site name
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Crater, plain or other landmark at the site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notable_feature: Option<String>,
}

/// Rover, orbiter or probe flying with the main spacecraft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionVehicle {
    /// Vehicle name
    pub name: String,
    /// Rover, helicopter, probe, ...
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Status key, same values as the mission status
    #[serde(default)]
    pub status: String,
    /// Summary of what it achieved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<String>,
}

/// Space mission record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionData {
    /// Mission identifier
    pub id: String,
    /// Body identifier of the mission's planet
    pub planet_code: String,
    /// English name
    pub name: String,
    /// Spanish name
    #[serde(default)]
    pub name_es: String,
    /// Full official name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Orbiter, lander, flyby, ...
    #[serde(default)]
    pub mission_type: String,
    /// Main target body
    #[serde(default)]
    pub target_body: String,
    /// Specific target when it differs from the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_target: Option<String>,
    /// Operating agency
    #[serde(default)]
    pub agency: String,
    /// Launch date as sent by the backend
    #[serde(default)]
    pub launch_date: String,
    /// Arrival date as sent by the backend
    #[serde(default)]
    pub arrival_date: String,
    /// End date, `None` while the mission runs
    #[serde(default)]
    pub mission_end_date: Option<String>,
    /// Status key (`active`, `completed`, ...)
    #[serde(default)]
    pub status: String,
    /// Human-readable status
    #[serde(default)]
    pub current_status_description: String,
    /// Landing site for landers and rovers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_site: Option<LandingSite>,
    /// Duration breakdown
    #[serde(default)]
    pub mission_duration: MissionDuration,
    /// Trajectory details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<Trajectory>,
    /// Companion vehicles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion_vehicles: Option<Vec<CompanionVehicle>>,
    /// Milestones in chronological order
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    /// Science goals
    #[serde(default)]
    pub scientific_objectives: Vec<String>,
    /// Main instruments on board
    #[serde(default)]
    pub key_instruments: Vec<String>,
    /// Short highlight lines for the detail screen
    #[serde(default)]
    pub mission_highlights: Vec<String>,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Agency page for the mission
    #[serde(default)]
    pub official_url: String,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Other bodies the mission studied
    #[serde(default)]
    pub related_bodies: Vec<String>,
}

impl MissionData {
    /// Whether the mission is still operating
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    /// Whether the mission has finished
    pub fn is_completed(&self) -> bool {
        STATUS_COMPLETED.contains(&self.status.as_str())
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Missions of one planet, by body identifier
pub fn by_planet_code(missions: &[MissionData], planet_code: &str) -> Vec<MissionData> {
    filter_by(missions, |m| m.planet_code.as_str(), planet_code)
}

/// Missions with the given status key
pub fn by_status(missions: &[MissionData], status: &str) -> Vec<MissionData> {
    filter_by(missions, |m| m.status.as_str(), status)
}

/// Missions operated by the given agency
pub fn by_agency(missions: &[MissionData], agency: &str) -> Vec<MissionData> {
    filter_by(missions, |m| m.agency.as_str(), agency)
}

// =============================================================================
// Statistics
// =============================================================================

/// Statistics over a full mission collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissionStats {
    /// Number of missions, duplicates included
    pub total: usize,
    /// Missions with status `active`
    pub active: usize,
    /// Missions with a completed status
    pub completed: usize,
    /// Count per status key
    pub by_status: HashMap<String, usize>,
    /// Count per agency
    pub by_agency: HashMap<String, usize>,
    /// Count per mission type
    pub by_type: HashMap<String, usize>,
    /// Distinct agencies
    pub agencies: BTreeSet<String>,
    /// Distinct mission types
    pub mission_types: BTreeSet<String>,
}

impl MissionStats {
    /// Derive statistics from a collection
    pub fn from_missions(missions: &[MissionData]) -> Self {
        Self {
            total: missions.len(),
            active: missions.iter().filter(|m| m.is_active()).count(),
            completed: missions.iter().filter(|m| m.is_completed()).count(),
            by_status: count_by(missions, |m| m.status.as_str()),
            by_agency: count_by(missions, |m| m.agency.as_str()),
            by_type: count_by(missions, |m| m.mission_type.as_str()),
            agencies: distinct(missions, |m| m.agency.as_str()),
            mission_types: distinct(missions, |m| m.mission_type.as_str()),
        }
    }
}

// =============================================================================
// Mission Service
// =============================================================================

/// Space mission service
#[derive(Debug, Clone)]
pub struct MissionService {
    fetcher: HttpFetcher,
    resource: Resource,
    by_planet_layout: EnvelopeLayout,
}

impl MissionService {
    /// Create a mission service with the default resource layouts
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            resource: Resource::new("space_missions", EnvelopeLayout::nested(1)),
            by_planet_layout: EnvelopeLayout::nested(2),
        }
    }

    /// Override the paginated endpoint and its envelope layout
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// The paginated endpoint and envelope layout in use
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Pager over the full mission collection
    pub fn pager(&self) -> HttpPager<MissionData> {
        HttpPager::new(
            self.fetcher.clone(),
            self.resource.endpoint.clone(),
            self.resource.layout.clone(),
        )
    }

    /// Fetch one page of missions
    pub async fn page(&self, cursor: u64, limit: u32) -> Result<Page<MissionData>> {
        self.pager().fetch_page(cursor, limit).await
    }

    /// Fetch every mission, `page_size` at a time
    pub async fn all(&self, page_size: u32) -> Result<Vec<MissionData>> {
        let pager = self.pager();
        Aggregator::new(&pager)
            .with_telemetry(self.fetcher.telemetry().clone())
            .fetch_all(page_size)
            .await
    }

    /// Fetch every mission, stopping when `token` is cancelled
    pub async fn all_with_cancel(
        &self,
        page_size: u32,
        token: CancellationToken,
    ) -> Result<Vec<MissionData>> {
        let pager = self.pager();
        Aggregator::new(&pager)
            .with_telemetry(self.fetcher.telemetry().clone())
            .with_cancellation(token)
            .fetch_all(page_size)
            .await
    }

    /// Missions of one planet by English name (e.g., "Mars")
    ///
    /// This endpoint is not paginated: one response carries every mission of
    /// the planet.
    pub async fn by_planet(&self, planet_name: &str) -> Result<Vec<MissionData>> {
        let resource = Resource::new(self.resource.endpoint.clone(), self.by_planet_layout.clone())
            .child(planet_name);
        let envelope = self
            .fetcher
            .get_json(&FetchRequest::get(resource.endpoint))
            .await?;
        resource.layout.decode(&envelope)
    }

    /// A single mission of a planet, `None` when the planet has no such id
    pub async fn by_id(&self, mission_id: &str, planet_name: &str) -> Result<Option<MissionData>> {
        let missions = self.by_planet(planet_name).await?;
        Ok(missions.into_iter().find(|m| m.id == mission_id))
    }

    /// Aggregate every mission and derive statistics
    pub async fn stats(&self, page_size: u32) -> Result<MissionStats> {
        let missions = self.all(page_size).await?;
        let stats = MissionStats::from_missions(&missions);

        self.fetcher.telemetry().info(
            "mission_stats",
            &[
                ("total", stats.total.to_string()),
                ("active", stats.active.to_string()),
                ("completed", stats.completed.to_string()),
                ("agencies", stats.agencies.len().to_string()),
            ],
        );
        Ok(stats)
    }
}
