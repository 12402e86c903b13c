use std::path::PathBuf;

/// Failures at the crate's edges: decoding input and resolving ids handed in
/// by a caller. The join and traversal engines themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum JoinlabError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Unknown row {row} in table {table}")]
    UnknownRow { table: String, row: String },
    #[error("Unknown join type: {0} (expected inner, left, right, full_outer or cross)")]
    UnknownJoinType(String),
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
