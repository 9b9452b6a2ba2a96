use std::path::Path;

use choropleth_shared::{DatasetIndex, MapConfig, MapController, Topology};
use tracing::info;

/// Read both data files concurrently and build the styled map. Either file
/// failing aborts the whole load.
pub async fn load_map(
    config: &MapConfig,
    topology_path: &Path,
    table_path: &Path,
) -> Result<MapController, String> {
    let (topology_text, table_text) = tokio::try_join!(
        read(topology_path),
        read(table_path),
    )?;
    build_map(config, &topology_text, &table_text)
}

/// Parse the two documents and build the map.
pub fn build_map(
    config: &MapConfig,
    topology_text: &str,
    table_text: &str,
) -> Result<MapController, String> {
    let topology = Topology::from_json(topology_text).map_err(|e| e.to_string())?;
    let dataset = DatasetIndex::from_csv(table_text).map_err(|e| e.to_string())?;
    let rows = dataset.len();
    let map = MapController::new(config, &topology, dataset).map_err(|e| e.to_string())?;
    info!(
        rows,
        counties = map.scene().counties.len(),
        classified = map.classified_count(),
        "map data loaded"
    );
    Ok(map)
}

async fn read(path: &Path) -> Result<String, String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("failed to read {}: {e}", path.display()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Two counties, one in Nevada, with a single shared state border.
    pub const TOPOLOGY: &str = r#"{
      "type": "Topology",
      "transform": { "scale": [1, 1], "translate": [-120, 34] },
      "objects": {
        "counties": { "type": "GeometryCollection", "geometries": [
          { "type": "Polygon", "id": "06037", "arcs": [[0]] },
          { "type": "Polygon", "id": "32003", "arcs": [[1]] }
        ] },
        "states": { "type": "GeometryCollection", "geometries": [
          { "type": "Polygon", "id": "06", "arcs": [[2, 3]] },
          { "type": "Polygon", "id": "32", "arcs": [[4, -3]] }
        ] }
      },
      "arcs": [
        [[0, 0], [2, 0], [0, 2], [-2, 0], [0, -2]],
        [[2, 0], [2, 0], [0, 2], [-2, 0], [0, -2]],
        [[2, 0], [0, 2]],
        [[2, 2], [-2, 0], [0, -2], [2, 0]],
        [[2, 0], [2, 0], [0, 2], [-2, 0]]
      ]
    }"#;

    pub const TABLE: &str = "id,density,county_name,state_name\n\
        32003,42,Clark,Nevada\n\
        06037,2420.3,Los Angeles,California\n";
}
