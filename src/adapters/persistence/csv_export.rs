//! CSV rendering for lead export. Uses the `csv` crate for quoting.
//!
//! Base columns are always written; `score` and `type` are appended only when at
//! least one exported lead is qualified.

use crate::domain::{Lead, LeadRecord};

/// Columns every export carries.
pub const BASE_COLUMNS: [&str; 5] = ["name", "company", "email", "stage", "created"];

/// Columns appended when the export contains qualified leads.
pub const QUALIFIED_COLUMNS: [&str; 2] = ["score", "type"];

/// Header row for the given leads.
pub fn csv_header(leads: &[Lead]) -> Vec<&'static str> {
    let mut header = BASE_COLUMNS.to_vec();
    if leads.iter().any(Lead::is_qualified) {
        header.extend(QUALIFIED_COLUMNS);
    }
    header
}

/// Render leads as comma-delimited CSV with a header row.
///
/// Regular rows leave the qualified columns blank.
pub fn leads_to_csv(leads: &[Lead]) -> Result<String, csv::Error> {
    let header = csv_header(leads);
    let with_extra = header.len() > BASE_COLUMNS.len();

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(&header)?;

    for lead in leads {
        wtr.write_record(record_row(&LeadRecord::from(lead), with_extra))?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

fn record_row(record: &LeadRecord, with_extra: bool) -> Vec<String> {
    let mut row = vec![
        record.name.clone(),
        record.company.clone(),
        record.email.clone(),
        record.stage.clone().unwrap_or_default(),
        record.created.clone().unwrap_or_default(),
    ];
    if with_extra {
        row.push(record.score.map(|s| s.to_string()).unwrap_or_default());
        row.push(record.kind.clone().unwrap_or_default());
    }
    row
}
