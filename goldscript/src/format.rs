//! Result-grid formatting: cell normalization, column widths, and row layout.
//!
//! The comparison protocol is whitespace-sensitive, so layout is exact: cells
//! are padded to the column width with a single space between columns, the
//! last column is never padded, and the header separator runs the full width
//! of every column.

/// Normalize one cell for comparison: NULL becomes the literal `null`, line
/// breaks become spaces, runs of spaces collapse to one.
pub(crate) fn format_cell(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "null".to_string();
    };
    let mut s = value.replace("\r\n", "\n").replace('\n', " ");
    while s.contains("  ") {
        s = s.replace("  ", " ");
    }
    s
}

/// Per-column width: the widest formatted cell, header label included.
pub(crate) fn column_widths(labels: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = labels.iter().map(|l| l.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    widths
}

/// Lay out a header or data row: space-joined, each cell padded to its
/// column width except the last.
pub(crate) fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(cell);
        if i < cells.len() - 1 {
            for _ in cell.chars().count()..widths[i] {
                out.push(' ');
            }
        }
    }
    out
}

/// The `-` separator under the header, dashed at full width in every column.
pub(crate) fn separator_row(widths: &[usize]) -> String {
    let mut out = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        for _ in 0..*width {
            out.push('-');
        }
    }
    out
}

/// Digest text for a summarized (`>>`) expectation.
pub(crate) fn summarize(rows: &[Vec<String>], columns: usize) -> String {
    match rows.len() {
        0 => "<no result>".to_string(),
        1 if columns == 1 => rows[0][0].clone(),
        1 => format!("<row with {columns} values>"),
        n => format!("<{n} rows>"),
    }
}

/// Whether the statement orders its own result. Such results are compared in
/// delivered order; everything else is sorted first.
pub(crate) fn is_ordered(sql: &str) -> bool {
    sql.to_lowercase().contains("order by")
}
