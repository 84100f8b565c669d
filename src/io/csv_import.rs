use std::path::Path;

use chrono::NaiveDate;

use crate::error::CsvError;
use crate::etp::parse_etp;

/// One task read from an import file, not yet attached to a project id.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub project: String,
    pub text: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub etp: Option<f64>,
    pub color: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub rows: Vec<ImportRow>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Project,
    Text,
    Start,
    End,
    Etp,
    Color,
    Comment,
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn header_to_column(header: &str) -> Option<Column> {
    let key = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match key.as_str() {
        "project" | "projectname" | "workstream" | "stream" => Some(Column::Project),
        "task" | "taskname" | "text" | "name" | "label" | "title" | "activity" => {
            Some(Column::Text)
        }
        "start" | "startdate" | "from" | "begin" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "due" | "duedate" => Some(Column::End),
        "etp" | "effort" | "fte" => Some(Column::Etp),
        "color" | "colour" => Some(Column::Color),
        "comment" | "comments" | "notes" | "note" | "description" => Some(Column::Comment),
        _ => None,
    }
}

/// Import tasks from a CSV file. See [`parse_csv`].
pub fn import_csv(path: &Path) -> Result<ImportReport, CsvError> {
    let content = std::fs::read_to_string(path)?;
    let report = parse_csv(&content)?;
    tracing::info!(
        path = %path.display(),
        rows = report.rows.len(),
        skipped = report.skipped,
        "read task import"
    );
    Ok(report)
}

/// Parse task rows from CSV text.
///
/// The delimiter (comma, semicolon, tab) is detected from the header line and
/// headers are matched loosely ("Start Date", "start_date", "from", ...).
/// Project, task, start and end columns are required; rows with a missing
/// value, an unreadable date or an end before the start are skipped.
pub fn parse_csv(content: &str) -> Result<ImportReport, CsvError> {
    let first_line = content.lines().next().unwrap_or("");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(first_line))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();
    let required = [Column::Project, Column::Text, Column::Start, Column::End];
    if !required.iter().all(|c| columns.contains(&Some(*c))) {
        return Err(CsvError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let field = |wanted: Column| {
            columns
                .iter()
                .position(|c| *c == Some(wanted))
                .and_then(|idx| record.get(idx))
                .filter(|v| !v.is_empty())
        };

        let (Some(project), Some(text)) = (field(Column::Project), field(Column::Text)) else {
            skipped += 1;
            continue;
        };
        let (Some(start), Some(end)) = (
            field(Column::Start).and_then(parse_date),
            field(Column::End).and_then(parse_date),
        ) else {
            tracing::warn!(line, "skipping row with an unreadable date");
            skipped += 1;
            continue;
        };
        if end < start {
            tracing::warn!(line, %start, %end, "skipping row ending before it starts");
            skipped += 1;
            continue;
        }
        let etp = match field(Column::Etp).map(parse_etp).transpose() {
            Ok(etp) => etp,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping row with an invalid ETP");
                skipped += 1;
                continue;
            }
        };

        rows.push(ImportRow {
            project: project.to_string(),
            text: text.to_string(),
            start,
            end,
            etp,
            color: field(Column::Color).map(str::to_string),
            comment: field(Column::Comment).map(str::to_string),
        });
    }

    if rows.is_empty() {
        return Err(CsvError::NoRows { skipped });
    }
    Ok(ImportReport { rows, skipped })
}
