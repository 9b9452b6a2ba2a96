use std::fmt;

/// Failure while turning the two input documents into a map.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The boundary document is not valid TopoJSON.
    Topology(String),
    /// The density table is not valid CSV or lacks a column.
    Table(String),
    /// A named object is absent from the topology.
    MissingObject(String),
    /// A geometry references an arc index outside the arc table.
    InvalidArc(i64),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Topology(msg) => write!(f, "topology error: {msg}"),
            LoadError::Table(msg) => write!(f, "table error: {msg}"),
            LoadError::MissingObject(name) => write!(f, "topology has no object named {name:?}"),
            LoadError::InvalidArc(index) => write!(f, "arc index {index} out of range"),
        }
    }
}

impl std::error::Error for LoadError {}
