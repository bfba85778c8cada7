//! Core application logic for Orbita Explorer
//!
//! This crate contains the content models and the per-resource services for
//! planets, space missions, educational content and image galleries, plus
//! the pure filter/derive operations the screens apply to fetched
//! collections.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod education;
pub mod filters;
pub mod gallery;
pub mod missions;
pub mod planets;

pub use client::{ContentClient, Resource};
pub use education::{ContentType, Difficulty, EducationContent, EducationService};
pub use gallery::{GalleryQuery, GalleryService, ImageGallery, ImageItem};
pub use missions::{MissionData, MissionService, MissionStats};
pub use planets::{planet_name, Planet, PlanetData, PlanetService};
