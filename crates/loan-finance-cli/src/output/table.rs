use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::currency::{format_money_str, is_money_field};

/// Format output as tables: a field/value summary, then any row arrays
/// (such as an amortization schedule) as their own table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_summary(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_summary(res_map),
        other => println!("{}", format_value("", other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_summary(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut arrays: Vec<(&str, &Vec<Value>)> = Vec::new();
    push_fields(&mut builder, "", map, &mut arrays);
    println!("{}", Table::from(builder));

    for (key, arr) in arrays {
        println!("\n{}:", key);
        print_array_table(arr);
    }
}

/// Nested objects are flattened to `parent.child` rows; arrays of rows are
/// collected for separate tables.
fn push_fields<'a>(
    builder: &mut Builder,
    prefix: &str,
    map: &'a Map<String, Value>,
    arrays: &mut Vec<(&'a str, &'a Vec<Value>)>,
) {
    for (key, val) in map {
        let label = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => push_fields(builder, &label, inner, arrays),
            Value::Array(arr) if arr.first().is_some_and(Value::is_object) => {
                arrays.push((key.as_str(), arr));
            }
            _ => builder.push_record([label.clone(), format_value(key, val)]),
        }
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        // Union of keys, so optional columns (e.g. prepayment) still show.
        let mut headers: Vec<String> = first.keys().cloned().collect();
        for item in arr.iter().filter_map(Value::as_object) {
            for key in item.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let mut builder = Builder::default();
        builder.push_record(&headers);
        for map in arr.iter().filter_map(Value::as_object) {
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| format_value(h, v))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value("", item));
        }
    }
}

fn format_value(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) if is_money_field(key) => format_money_str(s),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value(key, v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
