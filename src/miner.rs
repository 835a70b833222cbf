use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::error::StrainError;

/// Section title -> (row label -> row value).
pub type MinedTables = BTreeMap<String, BTreeMap<String, String>>;

const NBSP_ENTITY: &str = "&nbsp;";

/// Why a table or row was left out of the mined result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MineIssue {
    #[error("table has no header cell inside a thead")]
    MissingTitle,
    #[error("row has no label cell")]
    MissingLabel,
    #[error("row has no value cell")]
    MissingValue,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MineReport {
    pub tables: MinedTables,
    pub skipped_tables: usize,
    pub skipped_rows: usize,
}

/// Extracts the statistics tables of a genome-catalog organism page.
pub struct TableMiner {
    table: Selector,
    thead: Selector,
    tr: Selector,
    th: Selector,
    td: Selector,
}

impl TableMiner {
    pub fn new() -> Result<Self, StrainError> {
        Ok(Self {
            table: selector("table")?,
            thead: selector("thead")?,
            tr: selector("tr")?,
            th: selector("th")?,
            td: selector("td")?,
        })
    }

    pub fn mine(&self, html: &str) -> MinedTables {
        self.mine_with_report(html).tables
    }

    pub fn mine_with_report(&self, html: &str) -> MineReport {
        let document = Html::parse_document(html);
        let mut report = MineReport::default();

        for (index, table) in document.select(&self.table).enumerate() {
            let title = match self.title(table) {
                Ok(title) => title,
                Err(issue) => {
                    debug!(table = index, "skipping table: {issue}");
                    report.skipped_tables += 1;
                    continue;
                }
            };

            let mut section = BTreeMap::new();
            for row in table.select(&self.tr).skip(1) {
                match self.row(row) {
                    Ok((label, value)) => {
                        section.insert(label, value);
                    }
                    Err(issue) => {
                        debug!(row = %row.html(), "could not parse table row: {issue}");
                        report.skipped_rows += 1;
                    }
                }
            }
            report.tables.insert(title, section);
        }

        report
    }

    fn title(&self, table: ElementRef<'_>) -> Result<String, MineIssue> {
        table
            .select(&self.thead)
            .next()
            .and_then(|thead| thead.select(&self.th).next())
            .map(cell_text)
            .ok_or(MineIssue::MissingTitle)
    }

    fn row(&self, row: ElementRef<'_>) -> Result<(String, String), MineIssue> {
        let label = row
            .select(&self.th)
            .nth(1)
            .map(cell_text)
            .ok_or(MineIssue::MissingLabel)?;
        let value = row
            .select(&self.td)
            .next()
            .map(cell_text)
            .ok_or(MineIssue::MissingValue)?;
        Ok((label, value))
    }
}

pub fn mine_tables(html: &str) -> Result<MinedTables, StrainError> {
    Ok(TableMiner::new()?.mine(html))
}

fn selector(css: &str) -> Result<Selector, StrainError> {
    Selector::parse(css).map_err(|err| StrainError::Selector(format!("{css}: {err}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let text = cell.text().collect::<String>();
    clean_value(text.trim_matches(|ch: char| ch.is_ascii_whitespace()))
}

/// A cell holding nothing but a non-breaking space is empty.
pub fn clean_value(value: &str) -> String {
    if value == NBSP_ENTITY || value == "\u{a0}" {
        String::new()
    } else {
        value.to_string()
    }
}
