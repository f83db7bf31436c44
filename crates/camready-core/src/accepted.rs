use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{CamReadyError, Result};
use crate::models::{AcceptanceTrack, AcceptedRecord, PaperId};

pub const PAPER_ID_COLUMN: &str = "Paper ID";
pub const TITLE_COLUMN: &str = "Title";
pub const ACCEPTED_TO_COLUMN: &str = "Accepted To";

pub type AcceptedSet = BTreeSet<PaperId>;

/// Source-of-truth table of accepted papers, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedTable {
    rows: Vec<AcceptedRecord>,
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    paper_id: usize,
    title: usize,
    accepted_to: usize,
}

impl AcceptedTable {
    pub fn from_rows(rows: Vec<AcceptedRecord>) -> Self {
        Self { rows }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            CamReadyError::DataFormat(format!(
                "cannot open accepted table {}: {err}",
                path.display()
            ))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let columns = resolve_columns(&headers)?;

        let mut rows = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map_or(idx as u64 + 2, csv::Position::line);
            let cell = |col: usize| record.get(col).unwrap_or("");

            let paper_id = cell(columns.paper_id).parse::<PaperId>().map_err(|err| {
                CamReadyError::DataFormat(format!("line {line}: {err}"))
            })?;
            let acceptance_track = cell(columns.accepted_to)
                .parse::<AcceptanceTrack>()
                .unwrap_or_else(|never| match never {});
            rows.push(AcceptedRecord {
                paper_id,
                title: cell(columns.title).trim().to_string(),
                acceptance_track,
            });
        }
        debug!(rows = rows.len(), "accepted table parsed");
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[AcceptedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row carrying `paper_id`, if any.
    pub fn find(&self, paper_id: &PaperId) -> Option<&AcceptedRecord> {
        self.rows.iter().find(|row| &row.paper_id == paper_id)
    }
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndex> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
    };
    let mut missing = Vec::new();
    let mut lookup = |name: &'static str| {
        let found = position(name);
        if found.is_none() {
            missing.push(name);
        }
        found.unwrap_or_default()
    };
    let columns = ColumnIndex {
        paper_id: lookup(PAPER_ID_COLUMN),
        title: lookup(TITLE_COLUMN),
        accepted_to: lookup(ACCEPTED_TO_COLUMN),
    };
    if !missing.is_empty() {
        return Err(CamReadyError::DataFormat(format!(
            "accepted table is missing required column(s): {}",
            missing.join(", ")
        )));
    }
    Ok(columns)
}

/// Ids of rows whose acceptance track is in `tracks`. Duplicate ids collapse.
#[must_use]
pub fn load_accepted(table: &AcceptedTable, tracks: &BTreeSet<AcceptanceTrack>) -> AcceptedSet {
    table
        .rows()
        .iter()
        .filter(|row| tracks.contains(&row.acceptance_track))
        .map(|row| row.paper_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::default_accepted_tracks;

    fn table(raw: &str) -> AcceptedTable {
        AcceptedTable::from_reader(raw.as_bytes()).expect("parse table")
    }

    #[test]
    fn load_accepted_keeps_only_accepted_tracks() {
        let table = table(
            "Paper ID,Title,Accepted To\n\
             101,Alpha,Find\n\
             102,Beta,Main\n\
             103,Gamma,Reject\n",
        );
        let accepted = load_accepted(&table, &default_accepted_tracks());
        assert_eq!(
            accepted.into_iter().collect::<Vec<_>>(),
            vec![PaperId::Numeric(101), PaperId::Numeric(102)]
        );
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn load_accepted_collapses_duplicate_ids() {
        let table = table(
            "Paper ID,Title,Accepted To\n\
             7,First,Main\n\
             7,First (dup),Find\n\
             8,Other,Main\n",
        );
        let accepted = load_accepted(&table, &default_accepted_tracks());
        assert_eq!(accepted.len(), 2);
        assert!(accepted.contains(&PaperId::Numeric(7)));
    }

    #[test]
    fn load_accepted_honors_custom_tracks() {
        let table = table(
            "Paper ID,Title,Accepted To\n\
             1,A,Find\n\
             2,B,Industry\n",
        );
        let tracks = BTreeSet::from([AcceptanceTrack::Other("Industry".to_string())]);
        let accepted = load_accepted(&table, &tracks);
        assert_eq!(
            accepted.into_iter().collect::<Vec<_>>(),
            vec![PaperId::Numeric(2)]
        );
    }

    #[test]
    fn missing_required_columns_is_data_format_error() {
        let err = AcceptedTable::from_reader("Paper ID,Name\n1,x\n".as_bytes())
            .expect_err("must reject");
        match err {
            CamReadyError::DataFormat(message) => {
                assert!(message.contains("Title"));
                assert!(message.contains("Accepted To"));
                assert!(!message.contains("Paper ID"));
            }
            other => panic!("expected data format error, got {other:?}"),
        }
    }

    #[test]
    fn header_matching_ignores_bom_whitespace_and_extra_columns() {
        let table = table(
            "\u{feff}Paper ID , Decision Notes,Title,Accepted To\n\
             55,late,  Spaced Title  , Main \n",
        );
        let row = &table.rows()[0];
        assert_eq!(row.paper_id, PaperId::Numeric(55));
        assert_eq!(row.title, "Spaced Title");
        assert_eq!(row.acceptance_track, AcceptanceTrack::Main);
    }

    #[test]
    fn empty_paper_id_names_the_line() {
        let err = AcceptedTable::from_reader(
            "Paper ID,Title,Accepted To\n1,A,Main\n,B,Main\n".as_bytes(),
        )
        .expect_err("must reject");
        match err {
            CamReadyError::DataFormat(message) => assert!(message.contains("line 3")),
            other => panic!("expected data format error, got {other:?}"),
        }
    }

    #[test]
    fn from_path_reads_file_and_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("accepted-papers.csv");
        let mut file = File::create(&path).expect("create");
        writeln!(file, "Paper ID,Title,Accepted To").expect("write");
        writeln!(file, "9,\"Quoted, Title\",Find").expect("write");
        drop(file);

        let table = AcceptedTable::from_path(&path).expect("load");
        assert_eq!(table.rows()[0].title, "Quoted, Title");
        assert!(table.find(&PaperId::Numeric(9)).is_some());

        let err = AcceptedTable::from_path(dir.path().join("absent.csv")).expect_err("absent");
        assert!(matches!(err, CamReadyError::DataFormat(_)));
    }
}
