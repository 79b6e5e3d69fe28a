use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use super::{merge_equal_rows, CellStyle, CellValue, Record, SpanContext, SpanResult, StyleContext};
use crate::error::{Result, VsheetError};

/// Context handed to a column's value extractor.
pub struct ValueContext<'a> {
    pub row: &'a Record,
    pub column: &'a Column,
    pub row_index: usize,
    pub col_index: usize,
    pub data: &'a [Rc<Record>],
}

/// Extracts the value shown (and sorted/filtered on) for a cell.
pub type ValueFn = Rc<dyn Fn(&ValueContext<'_>) -> CellValue>;
/// Decides how many rows/columns a cell spans.
pub type SpanFn = Rc<dyn Fn(&SpanContext<'_>) -> SpanResult>;
/// Computes the visual style of a cell.
pub type StyleFn = Rc<dyn Fn(&StyleContext<'_>) -> CellStyle>;

/// Declared width of a column: fixed length or a share of the remaining
/// viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    Fixed(f32),
    Percent(f32),
}

impl FromStr for ColumnWidth {
    type Err = VsheetError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = if let Some(pct) = trimmed.strip_suffix('%') {
            pct.trim().parse::<f32>().map(ColumnWidth::Percent)
        } else {
            trimmed
                .strip_suffix("px")
                .unwrap_or(trimmed)
                .trim()
                .parse::<f32>()
                .map(ColumnWidth::Fixed)
        };
        match parsed {
            Ok(ColumnWidth::Fixed(w) | ColumnWidth::Percent(w)) if !w.is_finite() || w < 0.0 => {
                Err(VsheetError::InvalidWidth(s.to_string()))
            }
            Ok(width) => Ok(width),
            Err(_) => Err(VsheetError::InvalidWidth(s.to_string())),
        }
    }
}

impl fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(w) => write!(f, "{w}"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

impl Serialize for ColumnWidth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(w) => serializer.serialize_f32(*w),
            Self::Percent(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnWidth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f32),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(w) if w.is_finite() && w >= 0.0 => Ok(Self::Fixed(w)),
            Raw::Number(w) => Err(serde::de::Error::custom(format!("invalid column width {w}"))),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A leaf column definition.
#[derive(Clone)]
pub struct Column {
    /// Unique key into a data row
    pub field: String,
    /// Header label
    pub title: String,
    /// Declared width (`None` = default column width)
    pub width: Option<ColumnWidth>,
    pub value_fn: Option<ValueFn>,
    pub span_fn: Option<SpanFn>,
    pub style_fn: Option<StyleFn>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("value_fn", &self.value_fn.is_some())
            .field("span_fn", &self.span_fn.is_some())
            .field("style_fn", &self.style_fn.is_some())
            .finish()
    }
}

impl Column {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            title: field.to_string(),
            width: None,
            value_fn: None,
            span_fn: None,
            style_fn: None,
        }
    }

    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(ColumnWidth::Fixed(width));
        self
    }

    #[must_use]
    pub fn percent(mut self, pct: f32) -> Self {
        self.width = Some(ColumnWidth::Percent(pct));
        self
    }

    #[must_use]
    pub fn value_fn(mut self, f: impl Fn(&ValueContext<'_>) -> CellValue + 'static) -> Self {
        self.value_fn = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn span_fn(mut self, f: impl Fn(&SpanContext<'_>) -> SpanResult + 'static) -> Self {
        self.span_fn = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn style_fn(mut self, f: impl Fn(&StyleContext<'_>) -> CellStyle + 'static) -> Self {
        self.style_fn = Some(Rc::new(f));
        self
    }

    /// Extract this column's value for a row. Without a value extractor the
    /// raw field value is returned (missing fields read as empty).
    pub fn value(&self, ctx: &ValueContext<'_>) -> CellValue {
        match &self.value_fn {
            Some(f) => f(ctx),
            None => ctx.row.get(&self.field).cloned().unwrap_or_default(),
        }
    }

    /// Convenience wrapper around [`Column::value`] for a row of `data`.
    pub fn value_at(&self, data: &[Rc<Record>], row_index: usize, col_index: usize) -> CellValue {
        let Some(row) = data.get(row_index) else {
            return CellValue::Empty;
        };
        self.value(&ValueContext {
            row,
            column: self,
            row_index,
            col_index,
            data,
        })
    }
}

/// Serde-facing column definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ColumnWidth>,
    /// Merge consecutive rows holding equal values into one cell
    #[serde(default)]
    pub merge_equal_rows: bool,
}

impl From<ColumnDef> for Column {
    fn from(def: ColumnDef) -> Self {
        let mut column = Column::new(&def.field);
        if let Some(title) = def.title {
            column.title = title;
        }
        column.width = def.width;
        if def.merge_equal_rows {
            column.span_fn = Some(merge_equal_rows());
        }
        column
    }
}

/// A titled group of columns (or nested groups).
#[derive(Debug, Clone)]
pub struct ColumnGroup {
    pub title: String,
    pub columns: Vec<ColumnNode>,
}

/// Node of the column tree.
#[derive(Debug, Clone)]
pub enum ColumnNode {
    Leaf(Column),
    Group(ColumnGroup),
}

impl ColumnNode {
    pub fn group(title: &str, columns: Vec<ColumnNode>) -> Self {
        Self::Group(ColumnGroup {
            title: title.to_string(),
            columns,
        })
    }

    fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Group(g) => g.columns.iter().map(Self::leaf_count).sum(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Group(g) => 1 + g.columns.iter().map(Self::depth).max().unwrap_or(0),
        }
    }
}

impl From<Column> for ColumnNode {
    fn from(column: Column) -> Self {
        Self::Leaf(column)
    }
}

/// Serde-facing column tree node: `{title, columns}` is a group, anything
/// else a leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnNodeDef {
    Group {
        title: String,
        columns: Vec<ColumnNodeDef>,
    },
    Leaf(ColumnDef),
}

impl From<ColumnNodeDef> for ColumnNode {
    fn from(def: ColumnNodeDef) -> Self {
        match def {
            ColumnNodeDef::Group { title, columns } => Self::Group(ColumnGroup {
                title,
                columns: columns.into_iter().map(Self::from).collect(),
            }),
            ColumnNodeDef::Leaf(def) => Self::Leaf(def.into()),
        }
    }
}

/// One cell of the multi-row header matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub title: String,
    /// Leaf field (`None` for group titles)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

/// Flattened, validated column set plus its derived header matrix.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    leaves: Vec<Column>,
    header: Vec<HeaderCell>,
    header_rows: usize,
}

impl ColumnSet {
    /// Build from a flat list of leaf columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        Self::from_nodes(columns.into_iter().map(ColumnNode::Leaf).collect())
    }

    /// Build from a column tree. Fails when two leaves share a field.
    pub fn from_nodes(nodes: Vec<ColumnNode>) -> Result<Self> {
        let header_rows = nodes.iter().map(ColumnNode::depth).max().unwrap_or(0);
        let mut header = Vec::new();
        let mut col = 0;
        for node in &nodes {
            col += push_header_cells(node, 0, col, header_rows, &mut header);
        }

        let mut leaves = Vec::with_capacity(col);
        for node in nodes {
            flatten_into(node, &mut leaves);
        }

        let mut seen = HashSet::new();
        for column in &leaves {
            if !seen.insert(column.field.as_str()) {
                return Err(VsheetError::DuplicateField(column.field.clone()));
            }
        }

        Ok(Self {
            leaves,
            header,
            header_rows,
        })
    }

    /// Build from serde definitions.
    pub fn from_defs(defs: Vec<ColumnNodeDef>) -> Result<Self> {
        Self::from_nodes(defs.into_iter().map(ColumnNode::from).collect())
    }

    /// Leaf columns in layout order.
    pub fn leaves(&self) -> &[Column] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.leaves.get(index)
    }

    /// Mutable access to the leaf column with `field`.
    pub fn column_mut(&mut self, field: &str) -> Option<&mut Column> {
        self.leaves.iter_mut().find(|c| c.field == field)
    }

    /// Position of the leaf column with `field`.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.leaves.iter().position(|c| c.field == field)
    }

    /// Header matrix cells (group titles and leaf titles).
    pub fn header(&self) -> &[HeaderCell] {
        &self.header
    }

    /// Number of header rows (tree depth).
    pub fn header_rows(&self) -> usize {
        self.header_rows
    }
}

fn push_header_cells(
    node: &ColumnNode,
    row: usize,
    col: usize,
    depth: usize,
    out: &mut Vec<HeaderCell>,
) -> usize {
    match node {
        ColumnNode::Leaf(column) => {
            out.push(HeaderCell {
                title: column.title.clone(),
                field: Some(column.field.clone()),
                row,
                col,
                row_span: depth.saturating_sub(row).max(1),
                col_span: 1,
            });
            1
        }
        ColumnNode::Group(group) => {
            let leaves = node.leaf_count();
            if leaves == 0 {
                return 0;
            }
            out.push(HeaderCell {
                title: group.title.clone(),
                field: None,
                row,
                col,
                row_span: 1,
                col_span: leaves,
            });
            let mut offset = col;
            for child in &group.columns {
                offset += push_header_cells(child, row + 1, offset, depth, out);
            }
            leaves
        }
    }
}

fn flatten_into(node: ColumnNode, out: &mut Vec<Column>) {
    match node {
        ColumnNode::Leaf(column) => out.push(column),
        ColumnNode::Group(group) => {
            for child in group.columns {
                flatten_into(child, out);
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_widths() {
        assert_eq!("25%".parse::<ColumnWidth>().unwrap(), ColumnWidth::Percent(25.0));
        assert_eq!("120".parse::<ColumnWidth>().unwrap(), ColumnWidth::Fixed(120.0));
        assert_eq!("80px".parse::<ColumnWidth>().unwrap(), ColumnWidth::Fixed(80.0));
        assert!("abc%".parse::<ColumnWidth>().is_err());
        assert!("-5".parse::<ColumnWidth>().is_err());
    }

    #[test]
    fn test_column_def_from_json() {
        let defs: Vec<ColumnNodeDef> = serde_json::from_str(
            r#"[{"field":"a","width":120},{"field":"b","width":"30%","title":"B"}]"#,
        )
        .unwrap();
        let set = ColumnSet::from_defs(defs).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().width, Some(ColumnWidth::Fixed(120.0)));
        assert_eq!(set.get(1).unwrap().width, Some(ColumnWidth::Percent(30.0)));
        assert_eq!(set.get(1).unwrap().title, "B");
        assert_eq!(set.index_of("b"), Some(1));
    }

    #[test]
    fn test_duplicate_fields_rejected() {
        let err = ColumnSet::new(vec![Column::new("a"), Column::new("a")]).unwrap_err();
        assert!(matches!(err, VsheetError::DuplicateField(f) if f == "a"));
    }

    #[test]
    fn test_header_matrix_for_groups() {
        let nodes = vec![
            Column::new("id").into(),
            ColumnNode::group(
                "Person",
                vec![
                    Column::new("first").into(),
                    ColumnNode::group(
                        "Contact",
                        vec![Column::new("mail").into(), Column::new("phone").into()],
                    ),
                ],
            ),
        ];
        let set = ColumnSet::from_nodes(nodes).unwrap();
        assert_eq!(set.header_rows(), 3);
        let fields: Vec<_> = set.leaves().iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, ["id", "first", "mail", "phone"]);

        let header = set.header();
        // "id" is shallow and spans all header rows
        assert_eq!((header[0].row, header[0].row_span), (0, 3));
        let person = header.iter().find(|h| h.title == "Person").unwrap();
        assert_eq!((person.col, person.col_span, person.row_span), (1, 3, 1));
        let first = header.iter().find(|h| h.title == "first").unwrap();
        assert_eq!((first.row, first.row_span), (1, 2));
        let contact = header.iter().find(|h| h.title == "Contact").unwrap();
        assert_eq!((contact.row, contact.col, contact.col_span), (1, 2, 2));
        let phone = header.iter().find(|h| h.title == "phone").unwrap();
        assert_eq!((phone.row, phone.col, phone.row_span), (2, 3, 1));
    }

    #[test]
    fn test_default_value_extraction() {
        let data = vec![Rc::new(Record::new().with("a", 3.0))];
        let column = Column::new("a");
        assert_eq!(column.value_at(&data, 0, 0), CellValue::Number(3.0));
        assert_eq!(column.value_at(&data, 5, 0), CellValue::Empty);
        let shouting = Column::new("a").value_fn(|ctx| CellValue::from(format!("#{}", ctx.row_index)));
        assert_eq!(shouting.value_at(&data, 0, 0), CellValue::from("#0"));
    }
}
