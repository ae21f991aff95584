use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data_value) = data {
                response["data"] = data_value;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(data_value) = data {
                print_text(&data_value, 1);
            }
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });
            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a page of rows with its meta block
pub fn output_page(output_format: &OutputFormat, entity: &str, body: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(body)?);
        }
        OutputFormat::Text => {
            let rows = body["data"].as_array().map(Vec::as_slice).unwrap_or_default();
            if rows.is_empty() {
                println!("No {} found", entity);
            }
            for row in rows {
                let id = row["id"].as_str().unwrap_or("-");
                let name = row["name"].as_str().unwrap_or("-");
                match row["code"].as_str() {
                    Some(code) => println!("{}  {}  {}", id, code, name),
                    None => println!("{}  {}", id, name),
                }
            }
            let meta = &body["meta"];
            println!(
                "page {}/{} ({} total, limit {})",
                meta["current_page"], meta["total_pages"], meta["total_rows"], meta["limit"]
            );
        }
    }
    Ok(())
}

fn print_text(value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                match v {
                    Value::Object(_) | Value::Array(_) => {
                        println!("{}{}:", indent, key);
                        print_text(v, depth + 1);
                    }
                    Value::String(s) => println!("{}{}: {}", indent, key, s),
                    other => println!("{}{}: {}", indent, key, other),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                print_text(item, depth);
            }
        }
        Value::String(s) => println!("{}{}", indent, s),
        other => println!("{}{}", indent, other),
    }
}
