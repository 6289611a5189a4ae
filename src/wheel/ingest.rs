use crate::source::{Row, Table};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde_with::DeserializeFromStr;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use strum::Display as StrumDisplay;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct EntryName(String);

crate::impl_string_newtype!(EntryName);

/// One usable row of the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: EntryName,
    pub sub: Option<String>,
    pub extras: Vec<String>,
}

/// An entry plus how many rows it stands for. Only combine mode produces
/// `units > 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub entry: Entry,
    pub units: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum DuplicatePolicy {
    Keep,
    Remove,
    Combine,
}

impl DuplicatePolicy {
    /// Removing wins over combining when both are switched on.
    pub fn from_flags(remove_dupes: bool, combine_dupes: bool) -> Self {
        match (remove_dupes, combine_dupes) {
            (true, _) => Self::Remove,
            (false, true) => Self::Combine,
            (false, false) => Self::Keep,
        }
    }
}

/// Zero-based column index, written as spreadsheet letters (`A`, `B`, ..., `AA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr)]
pub struct Column(usize);

impl Column {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    fn cell<'a>(&self, row: &'a Row) -> Option<&'a str> {
        row.get(self.0).map(String::as_str)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid column '{0}', expected letters such as A or AB")]
pub struct ColumnParseError(String);

impl FromStr for Column {
    type Err = ColumnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters = s.trim();
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ColumnParseError(s.to_string()));
        }

        // bijective base 26: A=1 .. Z=26, AA=27
        letters
            .chars()
            .try_fold(0usize, |acc, c| {
                let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
                acc.checked_mul(26)?.checked_add(digit)
            })
            .map(|n| Self(n - 1))
            .ok_or_else(|| ColumnParseError(s.to_string()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut n = self.0 + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().try_for_each(|c| write!(f, "{}", c))
    }
}

/// Where to find things in a row. `first_row` is 1-based, rows above it are headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: Column,
    pub sub: Option<Column>,
    pub extras: Vec<Column>,
    pub first_row: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: Column(0),
            sub: None,
            extras: Vec::new(),
            first_row: 1,
        }
    }
}

impl ColumnLayout {
    fn read(&self, row: &Row) -> Option<Entry> {
        let name = self.name.cell(row).map(str::trim).filter(|n| !n.is_empty())?;

        let sub = self
            .sub
            .and_then(|c| c.cell(row))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let extras = self
            .extras
            .iter()
            .map(|c| c.cell(row).unwrap_or_default().to_string())
            .collect();

        Some(Entry {
            name: EntryName::new(name),
            sub,
            extras,
        })
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IngestError {
    #[error("No usable rows in the table")]
    NoData,
}

pub fn ingest(
    table: &Table,
    layout: &ColumnLayout,
    policy: DuplicatePolicy,
) -> Result<Vec<Candidate>, IngestError> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seen: HashMap<EntryName, usize> = HashMap::new();

    let rows = table.iter().skip(layout.first_row.saturating_sub(1));

    for entry in rows.filter_map(|row| layout.read(row)) {
        let first = seen.get(&entry.name).copied();
        match (policy, first) {
            (DuplicatePolicy::Remove, Some(_)) => {}
            (DuplicatePolicy::Combine, Some(idx)) => candidates[idx].units += 1,
            _ => {
                seen.entry(entry.name.clone()).or_insert(candidates.len());
                candidates.push(Candidate { entry, units: 1 });
            }
        }
    }

    if candidates.is_empty() {
        return Err(IngestError::NoData);
    }

    log::debug!(
        "Ingested {} candidates ({} rows, policy {})",
        candidates.len(),
        candidates.iter().map(|c| c.units).sum::<u32>(),
        policy
    );

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(candidates: &[Candidate]) -> Vec<(&str, u32)> {
        candidates
            .iter()
            .map(|c| (c.entry.name.as_str(), c.units))
            .collect()
    }

    #[test]
    fn test_column_letters() {
        let cases = vec![("A", 0), ("b", 1), ("Z", 25), ("AA", 26), ("AZ", 51), ("BA", 52)];
        for (letters, index) in cases {
            let column: Column = letters.parse().unwrap();
            assert_eq!(column.index(), index);
            assert_eq!(column.to_string(), letters.to_uppercase());
        }
        assert!("".parse::<Column>().is_err());
        assert!("A1".parse::<Column>().is_err());
    }

    #[test]
    fn test_column_deserialization() {
        let column: Column = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(column, Column::from_index(2));
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let table = Table::from_strs(&[&["Cat", "first"], &["Dog"], &["Cat", "second"], &["Fish"]]);
        let layout = ColumnLayout {
            sub: Some(Column::from_index(1)),
            ..Default::default()
        };
        let out = ingest(&table, &layout, DuplicatePolicy::Remove).unwrap();
        assert_eq!(names(&out), vec![("Cat", 1), ("Dog", 1), ("Fish", 1)]);
        assert_eq!(out[0].entry.sub.as_deref(), Some("first"));
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let table = Table::from_column(&["Cat", "Dog", "Cat", "Fish", "Dog"]);
        let layout = ColumnLayout::default();
        let first = ingest(&table, &layout, DuplicatePolicy::Remove).unwrap();
        let second = ingest(&table, &layout, DuplicatePolicy::Remove).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_combine_counts_at_first_position() {
        let table = Table::from_column(&["A", "B", "A", "C"]);
        let out = ingest(&table, &ColumnLayout::default(), DuplicatePolicy::Combine).unwrap();
        assert_eq!(names(&out), vec![("A", 2), ("B", 1), ("C", 1)]);
    }

    #[test]
    fn test_keep_leaves_duplicates_in_order() {
        let table = Table::from_column(&["A", "B", "A"]);
        let out = ingest(&table, &ColumnLayout::default(), DuplicatePolicy::Keep).unwrap();
        assert_eq!(names(&out), vec![("A", 1), ("B", 1), ("A", 1)]);
    }

    #[test]
    fn test_policy_from_flags() {
        assert_eq!(DuplicatePolicy::from_flags(true, true), DuplicatePolicy::Remove);
        assert_eq!(DuplicatePolicy::from_flags(false, true), DuplicatePolicy::Combine);
        assert_eq!(DuplicatePolicy::from_flags(false, false), DuplicatePolicy::Keep);
    }

    #[test]
    fn test_skips_headers_blank_and_short_rows() {
        let table = Table::from_strs(&[
            &["", "Header"],
            &["Cat", "meow", "x"],
            &[],
            &["   "],
            &["Dog"],
        ]);
        let layout = ColumnLayout {
            name: Column::from_index(0),
            sub: Some(Column::from_index(1)),
            extras: vec![Column::from_index(2), Column::from_index(5)],
            first_row: 2,
        };
        let out = ingest(&table, &layout, DuplicatePolicy::Keep).unwrap();
        assert_eq!(names(&out), vec![("Cat", 1), ("Dog", 1)]);
        assert_eq!(out[0].entry.extras, vec!["x", ""]);
        assert_eq!(out[1].entry.sub, None);
        assert_eq!(out[1].entry.extras, vec!["", ""]);
    }

    #[test]
    fn test_name_column_out_of_range() {
        let table = Table::from_column(&["Cat", "Dog"]);
        let layout = ColumnLayout {
            name: Column::from_index(3),
            ..Default::default()
        };
        assert_eq!(
            ingest(&table, &layout, DuplicatePolicy::Keep),
            Err(IngestError::NoData)
        );
    }

    #[test]
    fn test_empty_table_is_no_data() {
        assert_eq!(
            ingest(&Table::default(), &ColumnLayout::default(), DuplicatePolicy::Remove),
            Err(IngestError::NoData)
        );
    }
}
