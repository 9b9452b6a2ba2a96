pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod legend;
pub mod path;
pub mod projection;
pub mod region;
pub mod scale;
pub mod state;
pub mod style;
pub mod svg;
pub mod topology;

#[cfg(test)]
mod fixtures;

pub use config::MapConfig;
pub use controller::{CountyShape, MapController, MapEvents, MapScene, Tooltip};
pub use dataset::{CountyRecord, DatasetIndex};
pub use error::LoadError;
pub use region::RegionClassifier;
pub use scale::{ColorScale, PaletteKind};
pub use state::{OutlineState, RenderState};
pub use style::{Paint, Rgb, StyleConfig};
pub use topology::Topology;
