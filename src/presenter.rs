// Renderers for a cycle's rows: aligned text table or JSON

use crate::format::format_percent;
use crate::models::MetricRow;
use std::io::Write;

pub const HEADERS: [&str; 7] = [
    "CONTAINER ID",
    "NAME",
    "CPU %",
    "MEM USAGE / LIMIT",
    "MEM %",
    "BLOCK I/O",
    "PIDS",
];

const COLUMN_GAP: &str = "   ";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Consumes the ordered rows of one collection cycle.
pub trait Presenter {
    fn render(&mut self, rows: &[MetricRow]) -> std::io::Result<()>;
}

/// Table cells for one row, in [`HEADERS`] order.
pub fn row_cells(row: &MetricRow) -> [String; 7] {
    [
        row.container_id.clone(),
        row.name.clone(),
        format_percent(row.cpu_percent),
        format!("{} / {}", row.mem_usage, row.mem_limit),
        format_percent(row.mem_percent),
        format!("{} / {}", row.block_input, row.block_output),
        row.pids.to_string(),
    ]
}

/// Header plus one line per row, columns padded to the widest cell.
pub fn render_table(rows: &[MetricRow]) -> String {
    let cells: Vec<[String; 7]> = rows.iter().map(row_cells).collect();
    let mut widths = HEADERS.map(str::len);
    for line in &cells {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS, &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let cell = cell.as_ref();
        if i == last {
            out.push_str(cell);
        } else {
            out.push_str(&format!("{:<width$}", cell, width = *width));
            out.push_str(COLUMN_GAP);
        }
    }
    out.push('\n');
}

/// Writes [`render_table`] output; optionally clears the terminal first
/// (watch mode).
pub struct TablePresenter<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TablePresenter<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TablePresenter<W> {
    fn render(&mut self, rows: &[MetricRow]) -> std::io::Result<()> {
        if self.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(render_table(rows).as_bytes())?;
        self.out.flush()
    }
}

/// One JSON array of rows per cycle, newline-terminated.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn render(&mut self, rows: &[MetricRow]) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, rows)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
