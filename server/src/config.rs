use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "client/dist";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TOPOLOGY_FILE: &str = "us-10m.json";
pub const DEFAULT_TABLE_FILE: &str = "Population-Density-By-County.csv";

/// The data files change rarely; an hour keeps reloads cheap.
pub const DATA_CACHE_CONTROL: &str = "public, max-age=3600";

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn static_dir() -> PathBuf {
    non_empty_var("STATIC_DIR")
        .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
        .into()
}

pub fn data_dir() -> PathBuf {
    non_empty_var("DATA_DIR")
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
        .into()
}

/// File name of the boundary topology inside the data directory.
pub fn topology_file() -> String {
    non_empty_var("TOPOLOGY_FILE").unwrap_or_else(|| DEFAULT_TOPOLOGY_FILE.to_string())
}

/// File name of the density table inside the data directory.
pub fn table_file() -> String {
    non_empty_var("TABLE_FILE").unwrap_or_else(|| DEFAULT_TABLE_FILE.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
