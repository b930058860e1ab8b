use serde::Serialize;
use serde_json::Value;

use crate::model::Collection;
use crate::ops::record_ops::RecordRow;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RecordListJson {
    pub collection: String,
    pub records: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One list line: padded id, then summary
pub fn format_row(row: &RecordRow) -> String {
    format!("{:<8} {}", row.id, row.summary)
}

/// A record as "Label: value" lines in form order. Empty fields are skipped.
pub fn format_record(collection: Collection, doc: &Value) -> String {
    let id = doc.get("id").and_then(Value::as_str).unwrap_or("?");
    let mut lines = vec![format!("{} {}", collection.noun(), id)];
    for spec in collection.fields() {
        let value = doc.get(spec.key).and_then(Value::as_str).unwrap_or("");
        if !value.is_empty() {
            lines.push(format!("  {}: {}", spec.label, value));
        }
    }
    if let Some(updated) = doc.get("updated").and_then(Value::as_str) {
        lines.push(format!("  Updated: {}", updated));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn row_is_padded() {
        let row = RecordRow {
            id: "USR-12".into(),
            summary: "Ada [nurse]".into(),
        };
        assert_eq!(format_row(&row), "USR-12   Ada [nurse]");
    }

    #[test]
    fn record_lines_follow_field_order() {
        let doc = json!({
            "id": "MED-2",
            "notes": "",
            "schedule": "twice daily",
            "name": "Metformin",
            "dosage": "500mg",
            "updated": "2025-05-14T08:00:00Z"
        });
        assert_snapshot!(format_record(Collection::Medications, &doc), @r"
        medication MED-2
          Name: Metformin
          Dosage: 500mg
          Schedule: twice daily
          Updated: 2025-05-14T08:00:00Z
        ");
    }
}
