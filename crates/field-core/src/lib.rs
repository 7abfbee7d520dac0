//! Field Sketch Core
//!
//! Data structures and geometry for delineating land parcels:
//! - Point: canonical (longitude, latitude) pair and its map display form
//! - Ring / RingEditor: open vertex sequences with a minimum-vertex invariant
//! - Sketch: outer ring, completed holes and an in-progress hole
//! - Geodesy: spherical-excess area of rings and net field area
//! - Record: server-facing payload and field record types

pub mod geodesy;
pub mod point;
pub mod record;
pub mod ring;
pub mod sketch;

pub use geodesy::*;
pub use point::*;
pub use record::*;
pub use ring::*;
pub use sketch::*;
