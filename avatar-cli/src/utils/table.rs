//! Table formatting utilities

use prettytable::{Cell, Row, Table};

/// Create a table with bold headers
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    let titles: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).style_spec("b"))
        .collect();
    table.set_titles(Row::new(titles));
    table
}

/// Add a row to a table
///
/// Numeric cells (angles, offsets, indices) are right-aligned so signs and
/// decimal points line up down a column.
pub fn add_table_row(table: &mut Table, cells: Vec<String>) {
    let row_cells: Vec<Cell> = cells
        .into_iter()
        .map(|text| {
            let cell = Cell::new(&text);
            if is_numeric(&text) {
                cell.style_spec("r")
            } else {
                cell
            }
        })
        .collect();
    table.add_row(Row::new(row_cells));
}

fn is_numeric(text: &str) -> bool {
    let digits = text.trim_end_matches(['%', 's']).trim_end_matches('m');
    !digits.is_empty() && digits.parse::<f64>().is_ok()
}
