//! Verdance domain core.
//!
//! Pure garden-planning logic with no I/O:
//!
//! - [`garden`]: garden ID validation and record stamping.
//! - [`location`]: site/climate configuration with defaults.
//! - [`crops`]: static crop catalog and the crop status registry.
//! - [`season`]: months, seasons and hemispheres.
//! - [`recommendations`]: month-keyed care recommendations.
//! - [`investment`]: climate-driven infrastructure recommendations.
//! - [`calendar`]: planting calendar generation from crop templates.

pub mod calendar;
pub mod crops;
pub mod error;
pub mod garden;
pub mod investment;
pub mod location;
pub mod recommendations;
pub mod season;
pub mod types;
