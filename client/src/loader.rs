use choropleth_shared::{DatasetIndex, MapConfig, MapController, Topology};
use gloo_net::http::Request;

async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {} for {url}", resp.status()));
    }

    resp.text()
        .await
        .map_err(|e| format!("read error: {e}"))
}

pub async fn fetch_topology(url: &str) -> Result<Topology, String> {
    let text = fetch_text(url).await?;
    Topology::from_json(&text).map_err(|e| format!("parse error: {e}"))
}

pub async fn fetch_table(url: &str) -> Result<DatasetIndex, String> {
    let text = fetch_text(url).await?;
    DatasetIndex::from_csv(&text).map_err(|e| format!("parse error: {e}"))
}

/// Fetch both inputs concurrently and build the map. Nothing is drawn
/// unless both succeed.
pub async fn load_all(config: &MapConfig) -> Result<MapController, String> {
    let (topology, dataset) = futures::future::try_join(
        fetch_topology(&config.topology_url),
        fetch_table(&config.table_url),
    )
    .await?;
    MapController::new(config, &topology, dataset).map_err(|e| e.to_string())
}
