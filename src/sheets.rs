//! Spreadsheet collaborator: reads one tab of a published Google Sheet as
//! CSV. Failures are catchable per tab so one missing optional sheet never
//! takes the rest of the dashboard down.

use anyhow::{Context, Result, anyhow};
use reqwest::header::USER_AGENT;

use crate::http_client::http_client;
use crate::tables::RawTable;

/// Outcome of reading one tab. `Unavailable` collapses to an empty table at
/// the call site; callers treat "empty" and "absent" identically.
#[derive(Debug, Clone)]
pub enum TableFetch {
    Loaded(RawTable),
    Unavailable,
}

impl TableFetch {
    pub fn into_table(self) -> RawTable {
        match self {
            TableFetch::Loaded(table) => table,
            TableFetch::Unavailable => RawTable::empty(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, TableFetch::Loaded(_))
    }
}

pub fn read_table(spreadsheet_key: &str, tab: &str) -> Result<RawTable> {
    let client = http_client()?;
    let url = export_url(spreadsheet_key, tab);

    let resp = client
        .get(&url)
        .header(USER_AGENT, "varsity-terminal/0.1")
        .send()
        .with_context(|| format!("sheet request failed for tab {tab}"))?;
    let status = resp.status();
    let body = resp
        .text()
        .with_context(|| format!("failed reading sheet body for tab {tab}"))?;
    if !status.is_success() {
        return Err(anyhow!("http {status} for tab {tab}"));
    }

    parse_csv_table(&body)
}

pub fn read_table_opt(spreadsheet_key: &str, tab: &str) -> TableFetch {
    match read_table(spreadsheet_key, tab) {
        Ok(table) => TableFetch::Loaded(table),
        Err(_) => TableFetch::Unavailable,
    }
}

/// CSV body to RawTable. Ragged rows are tolerated; a blank body is an
/// empty table, not an error.
pub fn parse_csv_table(raw: &str) -> Result<RawTable> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(RawTable::empty());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(trimmed.as_bytes());

    let headers = reader
        .headers()
        .context("invalid csv header row")?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("invalid csv record")?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(RawTable::new(headers, rows))
}

fn export_url(spreadsheet_key: &str, tab: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{spreadsheet_key}/gviz/tq?tqx=out:csv&sheet={}",
        escape_tab(tab)
    )
}

fn escape_tab(tab: &str) -> String {
    tab.replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::{escape_tab, export_url};

    #[test]
    fn export_url_escapes_tab_names() {
        assert_eq!(escape_tab("goals allowed"), "goals%20allowed");
        let url = export_url("KEY", "matches");
        assert!(url.contains("/d/KEY/"));
        assert!(url.ends_with("sheet=matches"));
    }
}
