//! Structured error types for vsheet.
//!
//! Errors only surface at loading boundaries (column definitions, JSON scenes,
//! configuration). The windowing and render path never fails.

/// All errors that can occur while building a grid.
#[derive(Debug, thiserror::Error)]
pub enum VsheetError {
    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A column width that is neither a number nor a `N%` string.
    #[error("Invalid column width: {0}")]
    InvalidWidth(String),

    /// Two leaf columns share the same field.
    #[error("Duplicate column field: {0}")]
    DuplicateField(String),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VsheetError>;

impl From<String> for VsheetError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for VsheetError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<VsheetError> for wasm_bindgen::JsValue {
    fn from(e: VsheetError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
