use crate::config::DraftFormat;
use crate::depth_chart::DepthChart;
use crate::ledger::{DraftHistoryEntry, OwnerHistoryEntry};
use crate::player::Player;

/// Wraps text in ANSI bold.
pub fn bold(text: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", text)
}

/// 1 -> "1st", 12 -> "12th", 23 -> "23rd"
pub fn ordinal(num: i32) -> String {
    let suffix = match (num.rem_euclid(10), num.rem_euclid(100)) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", num, suffix)
}

/// A titled grid of text cells handed to a [`Viewer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Column widths wide enough for the header and every cell.
    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }
        widths
    }

    /// Plain-text rendering with left-aligned, space-padded columns.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = format!("\n=== {} ===\n", self.title);
        out.push_str(&line(&self.headers));
        out.push('\n');
        if self.rows.is_empty() {
            out.push_str("  [EMPTY]\n");
        }
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}

/// Where views and draft notices end up.
pub trait Viewer {
    fn show(&mut self, table: &Table);
    fn notice(&mut self, message: &str);
}

/// Prints to stdout.
#[derive(Debug, Default)]
pub struct ConsoleViewer;

impl Viewer for ConsoleViewer {
    fn show(&mut self, table: &Table) {
        print!("{}", table.render());
    }

    fn notice(&mut self, message: &str) {
        println!("{}", message);
    }
}

fn bye_cell(bye: Option<u32>) -> String {
    bye.map(|b| b.to_string()).unwrap_or_default()
}

fn money_cell(salary: Option<f64>) -> String {
    salary.map(|s| format!("${:.0}", s)).unwrap_or_default()
}

/// Second column: the round label in Snake, the listed salary in Salary Cap.
fn round_or_salary(format: DraftFormat, round: u32, salary: Option<f64>) -> String {
    match format {
        DraftFormat::Snake => round.to_string(),
        DraftFormat::SalaryCap => money_cell(salary),
    }
}

fn second_header(format: DraftFormat) -> &'static str {
    match format {
        DraftFormat::Snake => "Round",
        DraftFormat::SalaryCap => "Salary",
    }
}

/// League-wide history view.
pub fn history_table(title: &str, entries: &[&DraftHistoryEntry], format: DraftFormat) -> Table {
    let mut table = Table::new(
        title,
        &["Pick Overall", second_header(format), "Player", "Position", "Bye", "ESPN Projection", "Owner"],
    );
    for e in entries {
        table.push_row(vec![
            e.pick.to_string(),
            round_or_salary(format, e.round, e.salary),
            e.player.clone(),
            e.position.clone(),
            bye_cell(e.bye),
            format!("{:.1}", e.projection),
            e.owner.clone(),
        ]);
    }
    table
}

/// One owner's picks; the owner column is dropped.
pub fn owner_history_table(owner: &str, entries: &[&OwnerHistoryEntry], format: DraftFormat) -> Table {
    let mut table = Table::new(
        format!("{} Draft History", owner),
        &["Pick Overall", second_header(format), "Player", "Position", "Bye", "ESPN Projection"],
    );
    for e in entries {
        table.push_row(vec![
            e.pick.to_string(),
            round_or_salary(format, e.round, e.salary),
            e.player.clone(),
            e.position.clone(),
            bye_cell(e.bye),
            format!("{:.1}", e.projection),
        ]);
    }
    table
}

pub fn depth_chart_table(owner: &str, chart: &DepthChart) -> Table {
    let mut table = Table::new(
        format!("{} Depth Chart", owner),
        &["Slot", "Player", "Bye", "ESPN Projection"],
    );
    for slot in chart.slots() {
        match &slot.occupant {
            Some(o) => table.push_row(vec![
                slot.name.clone(),
                o.player.clone(),
                bye_cell(o.bye),
                format!("{:.1}", o.projection),
            ]),
            None => table.push_row(vec![slot.name.clone(), String::new(), String::new(), String::new()]),
        }
    }
    table
}

/// Best-available view; Salary Cap adds the listed salary.
pub fn pool_table(title: &str, players: &[Player], format: DraftFormat) -> Table {
    let headers: &[&str] = match format {
        DraftFormat::Snake => &["Player", "Position", "Bye", "ESPN Projection"],
        DraftFormat::SalaryCap => &["Player", "Position", "Bye", "ESPN Projection", "Salary"],
    };
    let mut table = Table::new(title, headers);
    for p in players {
        let mut row = vec![
            p.name.clone(),
            p.position.clone(),
            bye_cell(p.bye),
            format!("{:.1}", p.projection),
        ];
        if format == DraftFormat::SalaryCap {
            row.push(money_cell(p.salary));
        }
        table.push_row(row);
    }
    table
}

/// Collects everything shown, for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingViewer {
    pub tables: Vec<Table>,
    pub notices: Vec<String>,
}

#[cfg(test)]
impl Viewer for RecordingViewer {
    fn show(&mut self, table: &Table) {
        self.tables.push(table.clone());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
