//! Grid - declarative column schema, row actions, sorting and column filters.
//!
//! The grid consumes the catalog's filtered view and never touches the store.
//! Gestures on a row cell are resolved through [`RowActions`], a table keyed
//! by column id, into [`Command`]s handed back to the session.

mod render;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::book::{value_text, BookRecord};
use crate::session::Command;

pub use render::{render_table, truncate};

/// Column id of the per-row delete affordance.
pub const ACTIONS_COLUMN: &str = "actions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    UnknownColumn(String),
    NotSortable(String),
    NotFilterable(String),
    NoSuchRow(usize),
    NoAction(String),
    InvalidFilter(String),
    InvalidDirection(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::UnknownColumn(column) => write!(f, "unknown column: {}", column),
            GridError::NotSortable(column) => write!(f, "column {} is not sortable", column),
            GridError::NotFilterable(column) => write!(f, "column {} is not filterable", column),
            GridError::NoSuchRow(row) => write!(f, "no row {}", row),
            GridError::NoAction(column) => write!(f, "column {} has no row action", column),
            GridError::InvalidFilter(raw) => {
                write!(f, "invalid column filter {:?}, expected FIELD=TEXT", raw)
            }
            GridError::InvalidDirection(raw) => {
                write!(f, "invalid sort direction {:?}, expected asc or desc", raw)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// One column of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: String,
    /// Record field shown in the column.
    pub field: String,
    pub header: String,
    pub sortable: bool,
    pub filterable: bool,
    /// Fixed width in characters; the grid-wide maximum applies when unset.
    pub width: Option<usize>,
}

impl ColumnDef {
    /// A plain column whose id and header are the field name.
    pub fn field(field: &str) -> Self {
        Self {
            id: field.to_string(),
            field: field.to_string(),
            header: field.to_string(),
            sortable: false,
            filterable: false,
            width: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_header(mut self, header: &str) -> Self {
        self.header = header.to_string();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
}

/// The book grid: five data columns and the delete affordance bound to `id`.
pub fn book_columns() -> Vec<ColumnDef> {
    let mut columns: Vec<ColumnDef> = ["title", "author", "year", "isbn", "price"]
        .into_iter()
        .map(|field| ColumnDef::field(field).sortable().filterable())
        .collect();
    columns.push(
        // Wide enough for a 20-character push key.
        ColumnDef::field("id")
            .with_id(ACTIONS_COLUMN)
            .with_header("")
            .with_width(20),
    );
    columns
}

/// What a gesture on a row cell does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Delete,
}

/// Row-action dispatch table keyed by column id.
#[derive(Debug, Clone, Default)]
pub struct RowActions {
    actions: HashMap<String, RowAction>,
}

impl RowActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action on a column. Builder style.
    pub fn on(mut self, column_id: &str, action: RowAction) -> Self {
        self.actions.insert(column_id.to_string(), action);
        self
    }

    pub fn action(&self, column_id: &str) -> Option<RowAction> {
        self.actions.get(column_id).copied()
    }

    /// Turn a gesture on `row`'s cell in `column_id` into a command.
    pub fn resolve(&self, column_id: &str, row: &BookRecord) -> Option<Command> {
        self.action(column_id).map(|action| match action {
            RowAction::Delete => Command::Delete(row.id.clone()),
        })
    }
}

/// The default table: delete from the actions column.
pub fn book_actions() -> RowActions {
    RowActions::new().on(ACTIONS_COLUMN, RowAction::Delete)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(GridError::InvalidDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Order two cell values: nulls first, numbers (including numeric strings)
/// numerically, everything else by text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => value_text(a).cmp(&value_text(b)),
        },
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Stable sort of `rows` by one field.
pub fn sort_rows(rows: &mut [BookRecord], spec: &SortSpec) {
    rows.sort_by(|a, b| {
        let a = a.field(&spec.field).unwrap_or(Value::Null);
        let b = b.field(&spec.field).unwrap_or(Value::Null);
        let ordering = compare_values(&a, &b);
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Case-insensitive "contains" filter on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub field: String,
    pub needle: String,
}

impl ColumnFilter {
    pub fn new(field: &str, needle: &str) -> Self {
        Self {
            field: field.to_string(),
            needle: needle.to_lowercase(),
        }
    }

    pub fn matches(&self, row: &BookRecord) -> bool {
        row.cell_text(&self.field).to_lowercase().contains(&self.needle)
    }
}

impl FromStr for ColumnFilter {
    type Err = GridError;

    /// Parse `FIELD=TEXT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((field, needle)) if !field.trim().is_empty() => {
                Ok(ColumnFilter::new(field.trim(), needle))
            }
            _ => Err(GridError::InvalidFilter(s.to_string())),
        }
    }
}

/// Presentation state of the grid: schema, actions, sort and column filters.
#[derive(Debug, Clone)]
pub struct Grid {
    columns: Vec<ColumnDef>,
    actions: RowActions,
    sort: Option<SortSpec>,
    filters: Vec<ColumnFilter>,
    max_column_width: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(book_columns(), book_actions())
    }
}

impl Grid {
    pub fn new(columns: Vec<ColumnDef>, actions: RowActions) -> Self {
        Self {
            columns,
            actions,
            sort: None,
            filters: Vec::new(),
            max_column_width: 32,
        }
    }

    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    fn column_for_field(&self, field: &str) -> Result<&ColumnDef, GridError> {
        self.columns
            .iter()
            .find(|c| c.field == field || c.id == field)
            .ok_or_else(|| GridError::UnknownColumn(field.to_string()))
    }

    /// Sort by a sortable column. `None` restores view order.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Result<(), GridError> {
        if let Some(spec) = &sort {
            let column = self.column_for_field(&spec.field)?;
            if !column.sortable {
                return Err(GridError::NotSortable(column.id.clone()));
            }
        }
        self.sort = sort;
        Ok(())
    }

    /// Add a filter on a filterable column.
    pub fn add_filter(&mut self, filter: ColumnFilter) -> Result<(), GridError> {
        let column = self.column_for_field(&filter.field)?;
        if !column.filterable {
            return Err(GridError::NotFilterable(column.id.clone()));
        }
        self.filters.push(filter);
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Rows as displayed: `view` narrowed by the column filters, then sorted.
    pub fn rows(&self, view: &[BookRecord]) -> Vec<BookRecord> {
        let mut rows: Vec<BookRecord> = view
            .iter()
            .filter(|row| self.filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect();
        if let Some(spec) = &self.sort {
            sort_rows(&mut rows, spec);
        }
        rows
    }

    /// Resolve a gesture on displayed row `row` (1-based) in `column_id`.
    pub fn press(
        &self,
        view: &[BookRecord],
        row: usize,
        column_id: &str,
    ) -> Result<Command, GridError> {
        let rows = self.rows(view);
        let record = row
            .checked_sub(1)
            .and_then(|i| rows.get(i))
            .ok_or(GridError::NoSuchRow(row))?;
        self.actions
            .resolve(column_id, record)
            .ok_or_else(|| GridError::NoAction(column_id.to_string()))
    }

    pub fn render(&self, view: &[BookRecord]) -> String {
        render_table(&self.columns, &self.rows(view), self.max_column_width)
    }
}
