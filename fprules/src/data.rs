//! Record loading, name normalization and rule export.

use crate::error::LoadError;
use crate::fp::Item;
use crate::rules::Rule;
use ndarray::ArrayView2;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

const DISTRICT_PREFIXES: &[&str] = &["Quận ", "Huyện ", "Thị xã ", "Thành phố "];

// First match wins, so "Cầu Vượt X" loses only "Cầu ".
const ROAD_PREFIXES: &[&str] = &[
    "Phố ",
    "Đường ",
    "Cầu ",
    "Hầm Chui ",
    "Cầu Vượt ",
    "Ngõ ",
    "Đại lộ ",
    "Quốc lộ ",
    "Quốc Lộ ",
    "Tuyến ",
    "Tuyến Số ",
    "Đường Cao Tốc ",
    "Cao Tốc ",
];

fn strip_first_prefix<'a>(value: &'a str, prefixes: &[&str]) -> &'a str {
    let value = value.trim();
    prefixes
        .iter()
        .find_map(|prefix| value.strip_prefix(prefix))
        .unwrap_or(value)
}

/// Drops the administrative prefix so "Quận Ba Đình" and "Ba Đình" group.
pub fn normalize_district_name(district: &str) -> String {
    strip_first_prefix(district, DISTRICT_PREFIXES).to_string()
}

pub fn normalize_road_name(road: &str) -> String {
    strip_first_prefix(road, ROAD_PREFIXES).to_string()
}

/// Which CSV column becomes the transaction items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemColumn {
    District,
    Road,
    Other(String),
}

impl ItemColumn {
    pub fn parse(name: &str) -> Self {
        match name {
            "district" => ItemColumn::District,
            "road" | "road_name" => ItemColumn::Road,
            other => ItemColumn::Other(other.to_string()),
        }
    }

    pub fn header(&self) -> &str {
        match self {
            ItemColumn::District => "district",
            ItemColumn::Road => "road_name",
            ItemColumn::Other(name) => name.as_str(),
        }
    }

    pub fn normalize(&self, value: &str) -> String {
        match self {
            ItemColumn::District => normalize_district_name(value),
            ItemColumn::Road => normalize_road_name(value),
            ItemColumn::Other(_) => value.trim().to_string(),
        }
    }
}

const TRIP_ID: &str = "trip_id";

/// Reads CSV records and groups them into one transaction per `trip_id`.
///
/// Trips keep first-seen order; each trip holds the distinct normalized
/// values of `column` in first-seen order. Rows with an empty trip id or item
/// are skipped.
pub fn load_transactions<R: Read>(
    reader: R,
    column: &ItemColumn,
) -> Result<Vec<Vec<String>>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    debug!(?headers, "csv columns");

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let trip_idx = position(TRIP_ID)?;
    let item_idx = position(column.header())?;

    let mut trips: HashMap<String, usize> = HashMap::new();
    let mut transactions: Vec<Vec<String>> = Vec::new();
    let mut seen: HashSet<(usize, String)> = HashSet::new();
    let mut row_count = 0usize;

    for record in csv_reader.records() {
        let record = record?;
        let trip_id = record.get(trip_idx).unwrap_or("").trim();
        let raw = record.get(item_idx).unwrap_or("").trim();
        if trip_id.is_empty() || raw.is_empty() {
            continue;
        }

        let item = column.normalize(raw);
        let slot = *trips.entry(trip_id.to_string()).or_insert_with(|| {
            transactions.push(Vec::new());
            transactions.len() - 1
        });
        if seen.insert((slot, item.clone())) {
            transactions[slot].push(item);
        }
        row_count += 1;
    }

    info!(
        rows = row_count,
        transactions = transactions.len(),
        column = column.header(),
        "transactions loaded"
    );
    Ok(transactions)
}

pub fn load_transactions_from_path(
    path: impl AsRef<Path>,
    column: &ItemColumn,
) -> Result<Vec<Vec<String>>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_transactions(file, column)
}

/// Convert a one-hot transaction matrix to lists of column indices.
pub fn transactions_from_matrix(transactions: ArrayView2<i32>) -> Vec<Vec<usize>> {
    transactions
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|&(_, &value)| value != 0)
                .map(|(item, _)| item)
                .collect()
        })
        .collect()
}

/// Writes ranked rules as CSV with four-decimal metrics.
pub fn write_rules_csv<W: Write, T: Item + Display>(
    writer: W,
    rules: &[Rule<T>],
) -> Result<(), LoadError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "antecedents",
        "consequents",
        "support",
        "confidence",
        "lift",
        "quality_score",
    ])?;

    for rule in rules {
        csv_writer.write_record([
            rule.antecedent.to_string(),
            rule.consequent.to_string(),
            format!("{:.4}", rule.support),
            format!("{:.4}", rule.confidence),
            format!("{:.4}", rule.lift),
            format!("{:.4}", rule.quality_score),
        ])?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_rules_to_path<T: Item + Display>(
    path: impl AsRef<Path>,
    rules: &[Rule<T>],
) -> Result<(), LoadError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_rules_csv(file, rules)?;
    info!(rules = rules.len(), path = %path.display(), "rules saved");
    Ok(())
}
