//! Fixed-width text rendering of grid rows.

use crate::book::BookRecord;

use super::ColumnDef;

/// Truncate to `max_width` characters, ending with "..." when cut.
pub fn truncate(value: &str, max_width: usize) -> String {
    if value.chars().count() <= max_width {
        value.to_string()
    } else if max_width <= 3 {
        value.chars().take(max_width).collect()
    } else {
        let take = max_width - 3;
        format!("{}...", value.chars().take(take).collect::<String>())
    }
}

/// Render `rows` as a table with a leading 1-based row number column.
pub fn render_table(columns: &[ColumnDef], rows: &[BookRecord], max_column_width: usize) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    let limit = column.width.unwrap_or(max_column_width);
                    truncate(&row.cell_text(&column.field), limit)
                })
                .collect()
        })
        .collect();

    let number_width = rows.len().to_string().len().max(1);
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let limit = column.width.unwrap_or(max_column_width);
            let header = column.header.chars().count().min(limit);
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .fold(header, usize::max)
        })
        .collect();

    let mut out = String::new();

    let mut header = format!("{:>w$}", "#", w = number_width);
    for (column, width) in columns.iter().zip(&widths) {
        let limit = column.width.unwrap_or(max_column_width);
        header.push_str(&format!(" | {:<w$}", truncate(&column.header, limit), w = width));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let mut rule = "-".repeat(number_width);
    for width in &widths {
        rule.push_str("-+-");
        rule.push_str(&"-".repeat(*width));
    }
    out.push_str(&rule);
    out.push('\n');

    for (n, row) in cells.iter().enumerate() {
        let mut line = format!("{:>w$}", n + 1, w = number_width);
        for (cell, width) in row.iter().zip(&widths) {
            line.push_str(&format!(" | {:<w$}", cell, w = width));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    match rows.len() {
        0 => out.push_str("(no books)\n"),
        1 => out.push_str("(1 book)\n"),
        n => out.push_str(&format!("({} books)\n", n)),
    }
    out
}
