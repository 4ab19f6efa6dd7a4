//! Table types.

use serde::{Deserialize, Serialize};

use super::{Link, Position, Scope};

/// A table structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Identifier (`table.<n>`)
    pub id: String,

    /// Owning scope
    pub scope: Scope,

    /// Location of the whole table
    pub position: Position,

    /// Table caption
    pub caption: Option<String>,

    /// Cells in row-major order
    pub cells: Vec<Cell>,
}

impl Table {
    /// Create a new empty table.
    pub fn new(position: Position) -> Self {
        Self {
            id: String::new(),
            scope: Scope::Root,
            position,
            caption: None,
            cells: Vec::new(),
        }
    }

    /// Add a cell to the table.
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.cells.iter().map(|c| c.row as usize).max().unwrap_or(0)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.cells.iter().map(|c| c.col as usize).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get the cell at a 1-based row and column.
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for row in 1..=self.row_count() as u32 {
            let line = self
                .cells
                .iter()
                .filter(|c| c.row == row)
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join("\t");
            lines.push(line);
        }
        lines.join("\n")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Row (1-indexed)
    pub row: u32,

    /// Column (1-indexed)
    pub col: u32,

    /// Cell text
    pub text: String,

    /// Location of the cell
    pub position: Position,

    /// Links with their source in the cell text
    pub links: Vec<Link>,
}

impl Cell {
    /// Create a new cell with text content.
    pub fn new(row: u32, col: u32, text: impl Into<String>, position: Position) -> Self {
        Self {
            row,
            col,
            text: text.into(),
            position,
            links: Vec::new(),
        }
    }
}
