use std::io::Write;
use std::path::Path;

use crate::error::CsvError;
use crate::etp::{format_etp, EtpSheet};

/// Write the ETP sheet as semicolon-delimited CSV.
///
/// Columns: Project ; <period labels> ; Total, followed by one row per
/// project and a closing `Total` row with the period sums and grand total.
/// Returns the number of project rows written.
pub fn write_etp_csv<W: Write>(sheet: &EtpSheet, writer: W) -> Result<usize, CsvError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    let mut header = Vec::with_capacity(sheet.periods.len() + 2);
    header.push("Project".to_string());
    header.extend(sheet.periods.iter().map(|p| p.label.clone()));
    header.push("Total".to_string());
    wtr.write_record(&header)?;

    for row in &sheet.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.name.clone());
        record.extend(row.cells.iter().map(|c| format_etp(c.value)));
        record.push(format_etp(row.total()));
        wtr.write_record(&record)?;
    }

    let mut totals = Vec::with_capacity(header.len());
    totals.push("Total".to_string());
    totals.extend((0..sheet.periods.len()).map(|i| format_etp(sheet.period_total(i))));
    totals.push(format_etp(sheet.grand_total()));
    wtr.write_record(&totals)?;

    wtr.flush()?;
    Ok(sheet.rows.len())
}

/// Export the ETP sheet to a CSV file at `path`.
pub fn export_etp_csv(sheet: &EtpSheet, path: &Path) -> Result<usize, CsvError> {
    let file = std::fs::File::create(path)?;
    let written = write_etp_csv(sheet, file)?;
    tracing::info!(path = %path.display(), rows = written, "exported ETP sheet");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TimeAxis;
    use crate::model::{Granularity, Project, ProjectId, Task, TaskId, VisibleRange, Workspace};
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn sheet() -> EtpSheet {
        let mut alpha = Project::new(ProjectId(1), "Alpha");
        let mut task = Task::new(TaskId(10), ProjectId(1), "build", d(2, 1), d(5, 1));
        task.etp = Some(1.5);
        alpha.tasks.push(task);
        let beta = Project::new(ProjectId(2), "Beta");
        let workspace = Workspace {
            projects: vec![alpha, beta],
            etp_entries: Vec::new(),
        };
        let axis = TimeAxis::build(&VisibleRange::year(2025).unwrap(), Granularity::Quarter).unwrap();
        EtpSheet::build(&workspace, &axis)
    }

    #[test]
    fn writes_header_rows_and_totals() {
        let mut out = Vec::new();
        let rows = write_etp_csv(&sheet(), &mut out).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Project;Q1 2025;Q2 2025;Q3 2025;Q4 2025;Total",
                "Alpha;1.50;1.50;0.00;0.00;1.50",
                "Beta;0.00;0.00;0.00;0.00;0.00",
                "Total;1.50;1.50;0.00;0.00;1.50",
            ]
        );
    }

    #[test]
    fn exports_to_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etp.csv");
        export_etp_csv(&sheet(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Project;"));
    }
}
