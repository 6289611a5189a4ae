pub mod color;
pub mod geometry;
pub mod ingest;
pub mod model;
pub mod spin;

pub use color::{Palette, Rgb};
pub use geometry::Slice;
pub use ingest::{Column, ColumnLayout, DuplicatePolicy, Entry, IngestError};
pub use model::Wheel;
pub use spin::{Deceleration, SpinController, SpinPhase, SpinStep};

pub const FULL_TURN: f64 = 360.0;
