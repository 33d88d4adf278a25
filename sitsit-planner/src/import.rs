//! Registration export ingestion
//!
//! Reads the CSV export of the sign-up form and turns each row into a
//! [`Person`]. Column headers are detected from small Finnish/English/French
//! keyword sets: a header matches when any of its whitespace-separated words,
//! lower-cased, is a keyword. The first matching header wins.
//!
//! Headers and name cells are trimmed, so stray spaces around a name do not
//! change who the person is. Group cells are passed on exactly as written and
//! only an empty cell counts as no preference. A row with only one name part
//! is named by that part; rows where both are blank are skipped with a warning.

use sitsit_common::{Error, Person, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Header words identifying the first-name column
pub const FIRSTNAME_KEYWORDS: &[&str] = &["etunimi", "firstname", "first", "given"];

/// Header words identifying the surname column
pub const SURNAME_KEYWORDS: &[&str] = &["sukunimi", "surname", "last", "family"];

/// Header words identifying the group-preference column
pub const GROUP_KEYWORDS: &[&str] = &[
    "pöytäseuratoive",
    "pöytäseuruetoive",
    "pöytäseura",
    "group",
    "sit",
    "avec",
];

/// Positions of the columns the planner needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub firstname: usize,
    pub surname: usize,
    pub group: usize,
}

impl ColumnLayout {
    /// Detect columns from a header row
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        Ok(Self {
            firstname: select_column(headers, FIRSTNAME_KEYWORDS, "first name")?,
            surname: select_column(headers, SURNAME_KEYWORDS, "surname")?,
            group: select_column(headers, GROUP_KEYWORDS, "group preference")?,
        })
    }
}

/// True when any word of `header` is one of `keywords`
pub fn header_matches(header: &str, keywords: &[&str]) -> bool {
    header
        .to_lowercase()
        .split_whitespace()
        .any(|word| keywords.contains(&word))
}

fn select_column<S: AsRef<str>>(headers: &[S], keywords: &[&str], what: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| header_matches(h.as_ref(), keywords))
        .ok_or_else(|| {
            Error::Import(format!(
                "no {} column found (looked for header words: {})",
                what,
                keywords.join(", ")
            ))
        })
}

/// Read attendees from a CSV file
pub fn read_csv(path: &Path) -> Result<Vec<Person>> {
    let file = File::open(path)?;
    let people = read_people(file)?;
    info!("Read {} attendees from {}", people.len(), path.display());
    Ok(people)
}

/// Read attendees from any CSV source with a header row
pub fn read_people<R: Read>(reader: R) -> Result<Vec<Person>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| Error::Import(format!("cannot read header row: {}", e)))?
        .iter()
        // Exports from spreadsheet tools may start with a byte order mark
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    debug!(?headers, "CSV headers");

    let layout = ColumnLayout::detect(&headers)?;
    debug!(
        firstname = %headers[layout.firstname],
        surname = %headers[layout.surname],
        group = %headers[layout.group],
        "Detected columns"
    );

    let mut people = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| Error::Import(format!("row {}: {}", row + 2, e)))?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let firstname = field(layout.firstname).trim();
        let surname = field(layout.surname).trim();
        if firstname.is_empty() && surname.is_empty() {
            warn!("Skipping row {}: no first name or surname", row + 2);
            continue;
        }

        let name = match (firstname.is_empty(), surname.is_empty()) {
            (false, false) => format!("{} {}", firstname, surname),
            (true, _) => surname.to_string(),
            (_, true) => firstname.to_string(),
        };
        let group = match field(layout.group) {
            "" => None,
            text => Some(text.to_string()),
        };
        people.push(Person::new(name, group));
    }

    Ok(people)
}
