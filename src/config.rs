//! Grid configuration.
//!
//! Every field has a default, so a scene or host only needs to spell out what
//! it changes: `{"defaultRowHeight": 24, "pinnedLeftColumnIndex": 0}`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VsheetError};

/// Colours used by the default cell style function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellTheme {
    /// Background of cells in the focused row
    pub focus_color: String,
    /// Background of odd rows
    pub stripe_color: String,
    /// Background of even rows
    pub background_color: String,
    /// CSS padding of a cell
    pub padding: String,
}

impl Default for CellTheme {
    fn default() -> Self {
        Self {
            focus_color: "#99D9EA".to_string(),
            stripe_color: "#eee".to_string(),
            background_color: "#fff".to_string(),
            padding: "0 5px".to_string(),
        }
    }
}

/// Layout and behaviour settings for a [`crate::Grid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Height of rows without an override
    pub default_row_height: f32,
    /// Width of columns without a declared width or override
    pub default_col_width: f32,
    /// Height of one header row
    pub header_row_height: f32,
    /// Width of the row handle strip left of the body
    pub row_handle_width: f32,
    /// Thickness of a resize handle
    pub resize_handle_length: f32,
    /// Smallest length a resize gesture can commit
    pub min_length: f32,
    /// Columns `0..=index` stay fixed while the body scrolls horizontally
    pub pinned_left_column_index: Option<usize>,
    /// Hold filter edits until `commit_filter` is called
    pub apply_filter_on_commit: bool,
    pub theme: CellTheme,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_row_height: 30.0,
            default_col_width: 100.0,
            header_row_height: 50.0,
            row_handle_width: 20.0,
            resize_handle_length: 7.0,
            min_length: 4.0,
            pinned_left_column_index: None,
            apply_filter_on_commit: false,
            theme: CellTheme::default(),
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all lengths are positive and finite.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("defaultRowHeight", self.default_row_height),
            ("defaultColWidth", self.default_col_width),
            ("headerRowHeight", self.header_row_height),
            ("rowHandleWidth", self.row_handle_width),
            ("resizeHandleLength", self.resize_handle_length),
            ("minLength", self.min_length),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(VsheetError::InvalidConfig(format!(
                    "{name} must be a positive length, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Half the resize handle, rounded up. The handle is centred on the
    /// trailing edge of the cell it resizes.
    pub fn half_handle(&self) -> f32 {
        (self.resize_handle_length * 0.5).ceil()
    }
}
