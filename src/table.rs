use std::collections::HashMap;

/// One row.  Cells line up with [`Table::columns`]; a cell is `None` when the
/// row came from a file which didn't have that column.
pub type Record = Vec<Option<String>>;

/// Every parsed file, stacked on top of each other.
///
/// The columns are the union of all the headers seen, in order of first
/// appearance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the position of each of `headers` in the unified column list,
    /// adding any which haven't been seen before.  Existing rows get `None`
    /// for the new columns.
    pub fn merge_columns<'a>(&mut self, headers: impl Iterator<Item = &'a str>) -> Vec<usize> {
        let old_width = self.columns.len();
        let positions = headers
            .map(|name| match self.index.get(name) {
                Some(idx) => *idx,
                None => {
                    let idx = self.columns.len();
                    self.index.insert(name.to_string(), idx);
                    self.columns.push(name.to_string());
                    idx
                }
            })
            .collect();
        if self.columns.len() > old_width {
            let width = self.columns.len();
            for row in &mut self.rows {
                row.resize(width, None);
            }
        }
        positions
    }

    /// Appends a row whose cells are at `positions` (as returned by
    /// [`Table::merge_columns`]).
    pub fn push<'a>(&mut self, positions: &[usize], cells: impl Iterator<Item = &'a str>) {
        let mut row = vec![None; self.columns.len()];
        for (&pos, cell) in positions.iter().zip(cells) {
            row[pos] = Some(cell.to_string());
        }
        self.rows.push(row);
    }

    /// Iterates over the cells of one column.
    pub fn cells(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |row| row[col].as_deref())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
