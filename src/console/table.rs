//! Column-aligned console tables
//!
//! Listing commands collect rows, sort them by a display column, and print
//! every column padded to its widest cell. Output goes through `println!`
//! like the rest of the console surface.

/// Accumulates rows of equal width and renders them aligned.
pub struct Table {
    columns: usize,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add one row; short rows are padded with empty cells.
    pub fn add_row(&mut self, cells: Vec<String>) {
        let mut row = cells;
        row.resize(self.columns, String::new());
        row.truncate(self.columns);
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Case-insensitive stable sort by one column.
    pub fn sort_by_column(&mut self, column: usize) {
        self.rows
            .sort_by(|a, b| a[column].to_lowercase().cmp(&b[column].to_lowercase()));
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = vec![0usize; self.columns];
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }
        widths
    }

    /// Render each row with single-space separated, left-aligned columns.
    /// The last column is not padded.
    pub fn lines(&self) -> Vec<String> {
        let widths = self.widths();
        self.rows
            .iter()
            .map(|row| {
                let mut line = String::new();
                for (index, cell) in row.iter().enumerate() {
                    if index + 1 == self.columns {
                        line.push_str(cell);
                    } else {
                        line.push_str(&format!("{cell:<width$} ", width = widths[index]));
                    }
                }
                line.trim_end().to_string()
            })
            .collect()
    }

    pub fn print(&self) {
        for line in self.lines() {
            println!("{line}");
        }
    }
}
