use serde::Serialize;

use super::{CellValue, Column, Record};
use crate::config::CellTheme;

/// Visual style attached to a positioned cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

/// Context handed to a column's style function.
pub struct StyleContext<'a> {
    pub row_index: usize,
    pub col_index: usize,
    pub row: &'a Record,
    pub column: &'a Column,
    pub value: &'a CellValue,
    pub focused: bool,
    pub theme: &'a CellTheme,
}

/// Focused rows get the focus colour, odd rows the stripe colour.
pub fn default_cell_style(ctx: &StyleContext<'_>) -> CellStyle {
    let background = if ctx.focused {
        &ctx.theme.focus_color
    } else if ctx.row_index % 2 == 1 {
        &ctx.theme.stripe_color
    } else {
        &ctx.theme.background_color
    };
    CellStyle {
        background: Some(background.clone()),
        color: None,
        padding: Some(ctx.theme.padding.clone()),
    }
}
