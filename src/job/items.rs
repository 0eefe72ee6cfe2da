//! Invoice line items (`TGFITE`) filtered by last-change date

use crate::core::{Granularity, Window};

use super::{Job, window_predicate};

const COLUMNS: &[&str] = &[
    "NUNOTA",
    "CODEMP",
    "CODPROD",
    "USOPROD",
    "QTDNEG",
    "QTDENTREGUE",
    "VLRUNIT",
    "VLRTOT",
    "VLRCUS",
    "VLRIPI",
    "ALIQIPI",
    "PRECOBASE",
    "CODVEND",
    "CUSTO",
    "CODVOL",
    "STATUSNOTA",
    "DTALTER",
];

/// `TGFITE` line items, one file per day
pub struct ItemsJob;

impl ItemsJob {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ItemsJob {
    fn default() -> Self {
        Self::new()
    }
}

impl Job for ItemsJob {
    fn name(&self) -> &'static str {
        "items"
    }

    fn description(&self) -> &'static str {
        "TGFITE invoice line items by DTALTER (daily windows)"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ite", "tgfite"]
    }

    fn granularity(&self) -> Granularity {
        // A busy day already approaches the 10k row cap
        Granularity::Day
    }

    fn date_column(&self) -> Option<&'static str> {
        Some("DTALTER")
    }

    fn file_prefix(&self) -> &'static str {
        "Sankhya-Extract"
    }

    fn build_sql(&self, window: &Window) -> String {
        format!(
            "SELECT\n  {}\nFROM TGFITE\nWHERE {}",
            COLUMNS.join(",\n  "),
            window_predicate("DTALTER", window)
        )
    }
}
