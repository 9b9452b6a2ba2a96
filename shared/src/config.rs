use serde::{Deserialize, Serialize};

use crate::legend::LegendLayout;
use crate::projection::AlbersUsa;
use crate::region::{NEVADA_PREFIX, RegionClassifier};
use crate::style::StyleConfig;

pub const DEFAULT_TOPOLOGY_URL: &str = "/data/us-10m.json";
pub const DEFAULT_TABLE_URL: &str = "/data/Population-Density-By-County.csv";

/// Everything needed to turn the two documents into a drawn map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    pub projection_scale: f64,
    /// Projection translate as fractions of the canvas size.
    pub translate_factor: (f64, f64),
    pub state_prefix: String,
    pub counties_object: String,
    pub states_object: String,
    pub topology_url: String,
    pub table_url: String,
    pub legend: LegendLayout,
    pub style: StyleConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 660.0,
            projection_scale: 4000.0,
            translate_factor: (1.4, 1.0 / 1.5),
            state_prefix: NEVADA_PREFIX.to_string(),
            counties_object: "counties".to_string(),
            states_object: "states".to_string(),
            topology_url: DEFAULT_TOPOLOGY_URL.to_string(),
            table_url: DEFAULT_TABLE_URL.to_string(),
            legend: LegendLayout::default(),
            style: StyleConfig::default(),
        }
    }
}

impl MapConfig {
    pub fn translate(&self) -> (f64, f64) {
        (
            self.width * self.translate_factor.0,
            self.height * self.translate_factor.1,
        )
    }

    pub fn projection(&self) -> AlbersUsa {
        AlbersUsa::new(self.projection_scale, self.translate())
    }

    pub fn classifier(&self) -> RegionClassifier {
        RegionClassifier::new(self.state_prefix.clone())
    }
}
