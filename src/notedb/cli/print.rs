use chrono::{DateTime, Utc};
use colored::Colorize;
use notedb::api::{CmdMessage, MessageLevel};
use notedb::model::Row;
use notedb::view::{extract, CellValue, Column, Lane, ViewConfig};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_CELL_WIDTH: usize = 32;
const COLUMN_GAP: &str = "  ";
const CARD_MARKER: &str = "▪";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_table(rows: &[Row], columns: &[Column]) {
    print!("{}", render_table(rows, columns));
}

pub(super) fn print_board(lanes: &[Lane]) {
    print!("{}", render_board(lanes));
}

pub(super) fn print_columns(columns: &[Column], suggested: &[Column]) {
    for column in columns {
        let visibility = if column.visible { "" } else { " (hidden)" };
        println!(
            "{:<20} {:<10} {}{}",
            column.id.bold(),
            column.kind().to_string(),
            column.label,
            visibility.dimmed()
        );
    }
    if !suggested.is_empty() {
        println!();
        for column in suggested {
            println!(
                "{:<20} {:<10} {}",
                column.id.dimmed(),
                column.kind().to_string().dimmed(),
                "not shown".dimmed()
            );
        }
    }
}

/// The stored view config, in the same JSON shape the folder note keeps.
pub(super) fn print_config(config: &ViewConfig) {
    match serde_json::to_string_pretty(config) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("{}", format!("Cannot render config: {}", e).red()),
    }
}

/// Plain-text cell for the terminal.
pub(super) fn format_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Checkbox(Some(true)) => "[x]".to_string(),
        CellValue::Checkbox(Some(false)) => "[ ]".to_string(),
        CellValue::Datetime(Some(text)) => match DateTime::parse_from_rfc3339(text) {
            Ok(at) => format_time_ago(at.with_timezone(&Utc)),
            Err(_) => text.clone(),
        },
        CellValue::Tags(items) => items
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" "),
        other => other.display().replace('\n', " "),
    }
}

pub(super) fn render_table(rows: &[Row], columns: &[Column]) -> String {
    let columns: Vec<&Column> = columns.iter().filter(|c| c.visible).collect();
    if rows.is_empty() {
        return "No rows.\n".to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| format_cell(&extract(row, column)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let limit = column.width.map(|w| w as usize).unwrap_or(MAX_CELL_WIDTH);
            cells
                .iter()
                .map(|r| r[i].width())
                .chain(std::iter::once(column.label.width()))
                .max()
                .unwrap_or(0)
                .min(limit)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, &w)| pad_to_width(&truncate_to_width(&column.label, w), w))
        .collect();
    out.push_str(&format!("{}\n", header.join(COLUMN_GAP).trim_end().bold()));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| pad_to_width(&truncate_to_width(cell, w), w))
            .collect();
        out.push_str(line.join(COLUMN_GAP).trim_end());
        out.push('\n');
    }
    out
}

pub(super) fn render_board(lanes: &[Lane]) -> String {
    if lanes.is_empty() {
        return "No lanes.\n".to_string();
    }

    let mut out = String::new();
    for (i, lane) in lanes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let header = format!("{} ({})", lane.label, lane.card_count());
        let header = if lane.id.is_empty_lane() {
            header.dimmed().to_string()
        } else {
            header.bold().to_string()
        };
        out.push_str(&header);
        out.push('\n');

        for row in &lane.rows {
            out.push_str(&format!(
                "  {} {}  {}\n",
                CARD_MARKER,
                truncate_to_width(&row.title, MAX_CELL_WIDTH * 2),
                row.id.dimmed()
            ));
        }
    }
    out
}

fn pad_to_width(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notedb::model::PropertyValue;
    use notedb::view::{LaneId, ValueKind};

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn formats_cells() {
        assert_eq!(format_cell(&CellValue::Checkbox(Some(true))), "[x]");
        assert_eq!(format_cell(&CellValue::Checkbox(None)), "");
        assert_eq!(
            format_cell(&CellValue::Tags(vec!["a".into(), "b".into()])),
            "#a #b"
        );
        assert_eq!(
            format_cell(&CellValue::Datetime(Some("not a date".into()))),
            "not a date"
        );
        let earlier = Utc::now() - chrono::Duration::hours(3);
        assert_eq!(
            format_cell(&CellValue::Datetime(Some(earlier.to_rfc3339()))),
            "3 hours ago"
        );
    }

    #[test]
    fn table_aligns_columns_and_skips_hidden() {
        no_color();
        let rows = vec![
            Row::new("a.md", "Alpha")
                .with_property("status", PropertyValue::from_text(ValueKind::Text, "Doing")),
            Row::new("b.md", "B"),
        ];
        let columns = vec![
            Column::title(),
            Column::property("status", ValueKind::Text).with_label("Status"),
            Column::path().hidden(),
        ];
        let out = render_table(&rows, &columns);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["Title  Status", "Alpha  Doing", "B"]);
    }

    #[test]
    fn empty_table() {
        assert_eq!(render_table(&[], &[Column::title()]), "No rows.\n");
    }

    #[test]
    fn board_lists_lanes_with_counts() {
        no_color();
        let lanes = vec![
            Lane {
                id: LaneId::value("Doing"),
                label: "Doing".into(),
                rows: vec![Row::new("P/a.md", "Alpha")],
            },
            Lane {
                id: LaneId::Empty,
                label: "No value".into(),
                rows: vec![],
            },
        ];
        let out = render_board(&lanes);
        assert!(out.starts_with("Doing (1)\n  ▪ Alpha  P/a.md\n"));
        assert!(out.ends_with("No value (0)\n"));
    }
}
