//! Sales invoices (`TGFCAB`) joined with partner, salesman and product data

use crate::core::{Granularity, Window};

use super::{Job, window_predicate};

const SELECT: &str = r#"SELECT
  CAB.NUMNOTA AS "nota",
  CAB.DTFATUR AS "date",
  PRO.CODPROD AS "cod_product",
  PRO.DESCRPROD AS "product",
  PAR.CODPARC AS "cod_client",
  VEN.APELIDO AS "salesman",
  ITE.QTDNEG AS "net_quantity"
FROM TGFCAB CAB
LEFT JOIN TGFPAR PAR ON CAB.CODPARC = PAR.CODPARC
LEFT JOIN TGFVEN VEN ON PAR.CODVEND = VEN.CODVEND
LEFT JOIN TGFITE ITE ON CAB.NUNOTA = ITE.NUNOTA
LEFT JOIN TGFPRO PRO ON ITE.CODPROD = PRO.CODPROD
LEFT JOIN TGFGRU GRU ON PRO.CODGRUPOPROD = GRU.CODGRUPOPROD"#;

/// Billed sales (`TIPMOV = 'V'`), one file per month
pub struct SalesJob;

impl SalesJob {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SalesJob {
    fn default() -> Self {
        Self::new()
    }
}

impl Job for SalesJob {
    fn name(&self) -> &'static str {
        "sales"
    }

    fn description(&self) -> &'static str {
        "TGFCAB sales invoices by DTFATUR (monthly windows)"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cab", "fatur"]
    }

    fn granularity(&self) -> Granularity {
        Granularity::Month
    }

    fn date_column(&self) -> Option<&'static str> {
        Some("date")
    }

    fn file_prefix(&self) -> &'static str {
        "Sankhya-Sales"
    }

    fn build_sql(&self, window: &Window) -> String {
        format!(
            "{SELECT}\nWHERE CAB.TIPMOV = 'V'\n  AND {}",
            window_predicate("CAB.DTFATUR", window)
        )
    }
}
