//! Common types and utilities shared across the storm-render workspace.

pub mod axes;
pub mod bbox;
pub mod config;
pub mod error;
pub mod molecule;
pub mod params;

pub use axes::ImageAxes;
pub use bbox::BoundingBox;
pub use config::RenderConfig;
pub use error::{StormError, StormResult};
pub use molecule::{MoleculeList, Positions};
pub use params::{Constraint, ParamValue};
