// ── Data export ──
//
// CSV per table plus the combined JSON report. CSV columns come from the
// record fields themselves (alphabetical), values are rendered bare, and
// only strings containing a comma are quoted.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::report::SummaryStats;

/// Render records as CSV: a header row from the first record's fields,
/// then one line per record. Nulls render as empty cells.
pub fn to_csv<T: Serialize>(items: &[T]) -> Result<String, CoreError> {
    let records: Vec<Value> = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|e| CoreError::Internal(format!("serialization failed: {e}")))?;
    records_to_csv(&records)
}

/// CSV over pre-serialized JSON records. Every record must be an object.
pub fn records_to_csv(records: &[Value]) -> Result<String, CoreError> {
    let Some(first) = records.first() else {
        return Err(CoreError::ValidationFailed {
            message: "no records to export".into(),
        });
    };
    let Some(header) = first.as_object() else {
        return Err(CoreError::ValidationFailed {
            message: "records must be objects".into(),
        });
    };

    let columns: Vec<&String> = header.keys().collect();
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|col| csv_cell(record.get(col.as_str()).unwrap_or(&Value::Null)))
            .collect();
        lines.push(row.join(","));
    }

    Ok(lines.join("\n"))
}

/// Render one cell. Strings are quoted only when they contain a comma;
/// nested objects/arrays render as compact JSON under the same rule.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => quote_if_comma(s),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Object(_) | Value::Array(_) => quote_if_comma(&value.to_string()),
    }
}

fn quote_if_comma(s: &str) -> String {
    if s.contains(',') {
        format!("\"{s}\"")
    } else {
        s.to_owned()
    }
}

/// Build the combined JSON report: generation timestamp, summary counters,
/// and the four entity collections verbatim.
pub fn full_report<S, E, I, A>(
    summary: SummaryStats,
    sites: &[S],
    equipment: &[E],
    interventions: &[I],
    alerts: &[A],
    generated_at: DateTime<Utc>,
) -> Result<Value, CoreError>
where
    S: Serialize,
    E: Serialize,
    I: Serialize,
    A: Serialize,
{
    serde_json::to_value(serde_json::json!({
        "generatedAt": generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "summary": summary,
        "sites": sites,
        "equipment": equipment,
        "interventions": interventions,
        "alerts": alerts,
    }))
    .map_err(|e| CoreError::Internal(format!("report serialization failed: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_renders_header_and_rows() {
        let records = vec![
            json!({ "code": "ALG-001", "name": "Alger Centre", "status": "active" }),
            json!({ "code": "ORN-002", "name": "Oran Est", "status": "fault" }),
        ];
        let csv = records_to_csv(&records).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "code,name,status");
        assert_eq!(lines[1], "ALG-001,Alger Centre,active");
        assert_eq!(lines[2], "ORN-002,Oran Est,fault");
    }

    #[test]
    fn csv_quotes_only_strings_with_commas() {
        let records = vec![json!({
            "address": "12 Rue Didouche, Alger",
            "name": "Alger Centre",
        })];
        let csv = records_to_csv(&records).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines[1], "\"12 Rue Didouche, Alger\",Alger Centre");
    }

    #[test]
    fn csv_renders_null_as_empty_cell() {
        let records = vec![json!({ "brand": null, "name": "Main Antenna", "ports": 4 })];
        let csv = records_to_csv(&records).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines[0], "brand,name,ports");
        assert_eq!(lines[1], ",Main Antenna,4");
    }

    #[test]
    fn csv_rejects_empty_input() {
        let err = records_to_csv(&[]).unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }

    #[test]
    fn full_report_has_expected_shape() {
        let summary = SummaryStats {
            total_sites: 1,
            active_sites: 1,
            total_equipment: 0,
            operational_equipment: 0,
            total_interventions: 0,
            completed_interventions: 0,
            total_alerts: 0,
            active_alerts: 0,
        };
        let generated_at: DateTime<Utc> = "2025-06-15T12:00:00Z".parse().unwrap();
        let sites = vec![json!({ "code": "ALG-001" })];

        let report = full_report::<_, Value, Value, Value>(
            summary,
            &sites,
            &[],
            &[],
            &[],
            generated_at,
        )
        .unwrap();

        assert_eq!(report["generatedAt"], "2025-06-15T12:00:00.000Z");
        assert_eq!(report["summary"]["totalSites"], 1);
        assert_eq!(report["sites"].as_array().unwrap().len(), 1);
        assert!(report["equipment"].as_array().unwrap().is_empty());
        assert!(report["interventions"].as_array().unwrap().is_empty());
        assert!(report["alerts"].as_array().unwrap().is_empty());
    }
}
