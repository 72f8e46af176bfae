//! Plain-text tables for `--format table`.

use std::borrow::Cow;

const GAP: &str = "  ";
const MIN_COLUMN: usize = 4;
const PLACEHOLDER: &str = "-";

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    /// Terminal width to fit into; `None` renders columns at natural width.
    pub max_width: Option<usize>,
    pub color: bool,
}

/// How a cell reads at a glance: finished, in flight, or a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Settled,
    Moving,
    Alarm,
}

impl Tone {
    fn of(cell: &str) -> Option<Self> {
        match cell {
            "done" | "completed" | "active" => Some(Self::Settled),
            "in_progress" | "in_review" | "planning" | "on_hold" => Some(Self::Moving),
            "cancelled" | "urgent" => Some(Self::Alarm),
            amount if amount.starts_with('-') && is_amount(amount) => Some(Self::Alarm),
            _ => None,
        }
    }

    const fn ansi(self) -> &'static str {
        match self {
            Self::Settled => "32",
            Self::Moving => "33",
            Self::Alarm => "31",
        }
    }
}

struct Column<'a> {
    header: &'a str,
    width: usize,
    right_aligned: bool,
}

impl Column<'_> {
    /// Pad `text` to the column width, wrapping only the visible text in color.
    fn pad(&self, text: &str, tone: Option<Tone>) -> String {
        let fill = " ".repeat(self.width.saturating_sub(text.chars().count()));
        let text = match tone {
            Some(tone) => format!("\u{1b}[{}m{text}\u{1b}[0m", tone.ansi()),
            None => text.to_string(),
        };
        if self.right_aligned {
            fill + &text
        } else {
            text + &fill
        }
    }
}

/// Render string rows under `headers`.
///
/// Columns holding only amounts are right-aligned. Missing cells show `-`.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let cell = |row: &Vec<String>, index: usize| -> String {
        row.get(index).cloned().unwrap_or_else(|| PLACEHOLDER.to_string())
    };

    let mut columns = headers
        .iter()
        .enumerate()
        .map(|(index, &header)| {
            let cells = rows.iter().map(|row| cell(row, index)).collect::<Vec<_>>();
            let width = cells
                .iter()
                .map(|c| c.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            let mut filled = cells.iter().filter(|c| c.as_str() != PLACEHOLDER).peekable();
            let right_aligned = filled.peek().is_some() && filled.all(|c| is_amount(c));
            Column {
                header,
                width,
                right_aligned,
            }
        })
        .collect::<Vec<_>>();

    if let Some(max_width) = options.max_width {
        shrink_to(&mut columns, max_width);
    }

    let join = |cells: Vec<String>| cells.join(GAP).trim_end().to_string();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join(
        columns
            .iter()
            .map(|column| column.pad(&clip(column.header, column.width), None))
            .collect(),
    ));
    let total = columns.iter().map(|c| c.width).sum::<usize>()
        + GAP.len() * columns.len().saturating_sub(1);
    lines.push("-".repeat(total));

    for row in rows {
        lines.push(join(
            columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    let value = cell(row, index);
                    let text = clip(&value, column.width);
                    let tone = options.color.then(|| Tone::of(&text)).flatten();
                    column.pad(&text, tone)
                })
                .collect(),
        ));
    }

    lines.join("\n")
}

/// Lower a shared width cap until the row fits, never squeezing a column
/// below its header (or `MIN_COLUMN`).
fn shrink_to(columns: &mut [Column<'_>], max_width: usize) {
    let budget = max_width.saturating_sub(GAP.len() * columns.len().saturating_sub(1));
    let floor = |column: &Column<'_>| {
        column
            .width
            .min(column.header.chars().count().max(MIN_COLUMN))
    };
    let capped = |column: &Column<'_>, cap: usize| column.width.min(cap.max(floor(column)));

    let widest = columns.iter().map(|c| c.width).max().unwrap_or(0);
    let cap = (1..=widest)
        .rev()
        .find(|cap| columns.iter().map(|c| capped(c, *cap)).sum::<usize>() <= budget)
        .unwrap_or(1);

    for column in columns.iter_mut() {
        column.width = capped(column, cap);
    }
}

fn clip(text: &str, width: usize) -> Cow<'_, str> {
    if text.chars().count() <= width {
        return Cow::Borrowed(text);
    }
    let kept = text.chars().take(width.saturating_sub(1)).collect::<String>();
    Cow::Owned(kept + "…")
}

/// Money and hour figures as the API serializes them, e.g. `-1,250.50`.
fn is_amount(text: &str) -> bool {
    let digits = text.trim().trim_start_matches(['-', '+']);
    digits.starts_with(|c: char| c.is_ascii_digit()) && digits.replace(',', "").parse::<f64>().is_ok()
}
