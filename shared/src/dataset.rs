use std::collections::HashMap;

use serde::Deserialize;

use crate::error::LoadError;

/// One raw row of the density table, exactly as read from the CSV.
/// Cells past the end of a short row read as absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountyRow {
    pub id: String,
    #[serde(default)]
    pub density: String,
    #[serde(default)]
    pub county_name: Option<String>,
    #[serde(default)]
    pub state_name: Option<String>,
}

/// A row with its density parsed. Blank or absent names are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyRecord {
    pub id: String,
    pub density: f64,
    pub county_name: Option<String>,
    pub state_name: Option<String>,
}

impl From<CountyRow> for CountyRecord {
    fn from(row: CountyRow) -> Self {
        Self {
            density: parse_density(&row.density),
            id: row.id,
            county_name: row.county_name,
            state_name: row.state_name,
        }
    }
}

/// Numeric coercion of a density cell.
///
/// Surrounding whitespace is ignored and a blank cell reads as zero, the
/// way a browser coerces strings to numbers. Anything else that does not
/// parse becomes NaN; it is not an error.
pub fn parse_density(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

const COLUMNS: [&str; 4] = ["id", "density", "county_name", "state_name"];

/// Read-only lookups from county id to density, county name and state name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetIndex {
    density: HashMap<String, f64>,
    county_name: HashMap<String, String>,
    state_name: HashMap<String, String>,
}

impl DatasetIndex {
    /// Build the three lookups. A later row with a repeated id wins.
    pub fn from_rows(rows: impl IntoIterator<Item = CountyRow>) -> Self {
        rows.into_iter().map(CountyRecord::from).collect()
    }

    /// Parse a CSV document with the header `id,density,county_name,state_name`
    /// (column order free, extra columns ignored). Every column must be in
    /// the header; short rows are still indexed.
    pub fn from_csv(text: &str) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = reader
            .headers()
            .map_err(|e| LoadError::Table(e.to_string()))?;
        if let Some(missing) = COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|header| header == **column))
        {
            return Err(LoadError::Table(format!("missing column {missing:?}")));
        }
        let mut rows = Vec::new();
        for row in reader.deserialize::<CountyRow>() {
            rows.push(row.map_err(|e| LoadError::Table(e.to_string()))?);
        }
        Ok(Self::from_rows(rows))
    }

    pub fn insert(&mut self, record: CountyRecord) {
        self.density.insert(record.id.clone(), record.density);
        match record.county_name {
            Some(name) => self.county_name.insert(record.id.clone(), name),
            None => self.county_name.remove(&record.id),
        };
        match record.state_name {
            Some(name) => self.state_name.insert(record.id, name),
            None => self.state_name.remove(&record.id),
        };
    }

    pub fn density(&self, id: &str) -> Option<f64> {
        self.density.get(id).copied()
    }

    pub fn county_name(&self, id: &str) -> Option<&str> {
        self.county_name.get(id).map(String::as_str)
    }

    pub fn state_name(&self, id: &str) -> Option<&str> {
        self.state_name.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.density.len()
    }

    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }
}

impl FromIterator<CountyRecord> for DatasetIndex {
    fn from_iter<I: IntoIterator<Item = CountyRecord>>(iter: I) -> Self {
        let mut index = DatasetIndex::default();
        for record in iter {
            index.insert(record);
        }
        index
    }
}
