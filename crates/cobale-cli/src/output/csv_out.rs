use serde_json::Value;
use std::io;

use super::render_scalar;

/// Write output as two-column field/value CSV to stdout, flattening the
/// envelope down to its result fields.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let fields = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let _ = wtr.write_record(["field", "value"]);
    if let Value::Object(map) = fields {
        write_rows(&mut wtr, "", map);
    } else {
        let _ = wtr.write_record(["value", &render_scalar(fields)]);
    }

    let _ = wtr.flush();
}

fn write_rows(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    prefix: &str,
    map: &serde_json::Map<String, Value>,
) {
    for (key, val) in map {
        let label = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => write_rows(wtr, &label, inner),
            other => {
                let _ = wtr.write_record([label.as_str(), &render_scalar(other)]);
            }
        }
    }
}
