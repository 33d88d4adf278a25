//! Seat chart rendering
//!
//! Resolves the person IDs of a [`SeatingPlan`] through its [`IdMap`] into a
//! name-based view, printable as plain text or serialized as JSON.

use crate::tables::{IdMap, PersonId, SeatingPlan, EMPTY_SEAT};
use serde::Serialize;
use std::fmt;

/// Name-based view of a seating plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingReport {
    pub tables: Vec<TableReport>,
}

/// One table of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    /// 1-based table number
    pub number: usize,
    pub seats: usize,
    pub seated: usize,
    /// Seat-pair rows, `None` for an empty seat
    pub rows: Vec<[Option<String>; 2]>,
}

impl SeatingReport {
    pub fn new(plan: &SeatingPlan, ids: &IdMap) -> Self {
        let name_of = |id: PersonId| -> Option<String> {
            if id == EMPTY_SEAT {
                return None;
            }
            Some(
                ids.get(id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| format!("#{}", id)),
            )
        };

        let tables = plan
            .tables
            .iter()
            .enumerate()
            .map(|(i, table)| TableReport {
                number: i + 1,
                seats: table.seats(),
                seated: table.occupied().count(),
                rows: table
                    .rows
                    .iter()
                    .map(|row| [name_of(row[0]), name_of(row[1])])
                    .collect(),
            })
            .collect();

        Self { tables }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SeatingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(
                f,
                "Table {} ({} seats, {} seated)",
                table.number, table.seats, table.seated
            )?;

            let width = table
                .rows
                .iter()
                .map(|row| row[0].as_deref().map_or(1, |n| n.chars().count()))
                .max()
                .unwrap_or(1);

            for (r, row) in table.rows.iter().enumerate() {
                let left = row[0].as_deref().unwrap_or("-");
                let right = row[1].as_deref().unwrap_or("-");
                let pad = width.saturating_sub(left.chars().count());
                writeln!(f, "{:>4}. {}{} | {}", r + 1, left, " ".repeat(pad), right)?;
            }
        }
        Ok(())
    }
}
