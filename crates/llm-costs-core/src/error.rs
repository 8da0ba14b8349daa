#[derive(Debug, thiserror::Error)]
pub enum CostsError {
    #[cfg(feature = "network")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no pricing tables recognized ({tables_seen} tables seen) — page layout may have drifted")]
    LayoutDrift { tables_seen: usize },

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, CostsError>;
