//! SQL execution through `DbExplorerSP.executeQuery`

use serde_json::{Value, json};

use crate::consts::QUERY_SERVICE;
use crate::core::QueryResult;
use crate::error::QueryError;

use super::{SankhyaClient, Session, Transport};

/// The service answers in Latin-1; every byte maps to the same code point.
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn decode_query_response(bytes: &[u8]) -> Result<QueryResult, QueryError> {
    let value: Value = serde_json::from_str(&latin1_to_string(bytes))?;

    // "0" is an error outright; other non-"1" statuses (e.g. "3" for an
    // expired session) are errors when they carry no result
    if let Some(status) = value.get("status").and_then(Value::as_str)
        && (status == "0" || (status != "1" && value.get("responseBody").is_none()))
    {
        return Err(QueryError::Service {
            status: status.to_string(),
            message: value
                .get("statusMessage")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    }

    let body = value
        .get("responseBody")
        .ok_or(QueryError::MissingField {
            field: "responseBody",
        })?;

    let columns = body
        .get("fieldsMetadata")
        .and_then(Value::as_array)
        .ok_or(QueryError::MissingField {
            field: "responseBody.fieldsMetadata",
        })?
        .iter()
        .map(|field| {
            field
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(QueryError::MissingField {
                    field: "fieldsMetadata[].name",
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = body
        .get("rows")
        .and_then(Value::as_array)
        .ok_or(QueryError::MissingField {
            field: "responseBody.rows",
        })?
        .iter()
        .map(|row| {
            row.as_array()
                .filter(|cells| cells.len() == columns.len())
                .map(|cells| cells.iter().map(cell_text).collect::<Vec<_>>())
                .ok_or(QueryError::MissingField {
                    field: "rows[] matching fieldsMetadata",
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QueryResult { columns, rows })
}

impl<T: Transport> SankhyaClient<T> {
    /// Run one SQL statement. Without a session token the request still goes
    /// out, just without the cookie and `mgeSession` parameter.
    pub(crate) fn execute_query(
        &self,
        session: &Session,
        sql: &str,
    ) -> Result<QueryResult, QueryError> {
        let url = self.endpoint.service_url(QUERY_SERVICE);
        let params: Vec<(&str, &str)> = session
            .token()
            .map(|token| ("mgeSession", token))
            .into_iter()
            .collect();
        let body = json!({
            "serviceName": QUERY_SERVICE,
            "MAXRESULTSIZE": self.options.max_result_size,
            "requestBody": { "sql": sql },
        });
        let bytes = self.transport.post_json(
            &url,
            session.cookie().as_deref(),
            &params,
            &body,
            self.options.query_timeout,
        )?;
        decode_query_response(&bytes)
    }
}
