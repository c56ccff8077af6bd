use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::render_scalar;

/// Format output as a field/value table. Envelope results get their
/// warnings and methodology appended after the table; nested objects
/// (the installment plan) are flattened with dotted keys.
pub fn print_table(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", value);
        return;
    };

    if let Some(result) = map.get("result") {
        print_fields(result);

        if let Some(Value::Array(warnings)) = map.get("warnings") {
            if !warnings.is_empty() {
                println!("\nWarnings:");
                for w in warnings {
                    if let Value::String(s) = w {
                        println!("  - {}", s);
                    }
                }
            }
        }
        if let Some(Value::String(methodology)) = map.get("methodology") {
            println!("\nMethodology: {}", methodology);
        }
    } else {
        print_fields(value);
    }
}

fn print_fields(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    push_rows(&mut builder, "", value);
    println!("{}", Table::from(builder));
}

fn push_rows(builder: &mut Builder, prefix: &str, value: &Value) {
    if let Value::Object(map) = value {
        for (key, val) in map {
            let label = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match val {
                Value::Object(_) => push_rows(builder, &label, val),
                other => builder.push_record([label.as_str(), &render_scalar(other)]),
            }
        }
    } else {
        builder.push_record([prefix, &render_scalar(value)]);
    }
}
