use std::io::{self, Write};

use rotagraph_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(&mut out, envelope)?,
    }

    Ok(())
}

fn render_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    match envelope.data.get("sectors").and_then(Value::as_array) {
        Some(sectors) => {
            for key in ["date", "target_date", "latest_available_date"] {
                if let Some(value) = envelope.data.get(key).and_then(Value::as_str) {
                    writeln!(out, "{key:<12}: {value}")?;
                }
            }
            writeln!(out, "sectors:")?;
            for line in sector_table(sectors) {
                writeln!(out, "  {line}")?;
            }
        }
        None => {
            writeln!(out, "data:")?;
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

fn sector_table(sectors: &[Value]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<10} {:<30} {:>10} {:>8} {:>9} {:>9} {:<10}",
        "ticker", "name", "price", "chg%", "rs_ratio", "rs_mom", "quadrant"
    )];

    for sector in sectors {
        let text = |key: &str| sector.get(key).and_then(Value::as_str).unwrap_or("-").to_owned();
        let number = |key: &str| sector.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN);
        lines.push(format!(
            "{:<10} {:<30} {:>10.2} {:>8.2} {:>9.2} {:>9.2} {:<10}",
            text("ticker"),
            text("name"),
            number("price"),
            number("change_pct"),
            number("rs_ratio"),
            number("rs_momentum"),
            text("quadrant"),
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use rotagraph_core::{EnvelopeMeta, SCHEMA_VERSION};
    use serde_json::json;

    use super::*;

    fn envelope(data: Value) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("request-12345", SCHEMA_VERSION, 3).expect("valid meta");
        Envelope::success(meta, data)
    }

    #[test]
    fn table_lists_one_row_per_sector() {
        let envelope = envelope(json!({
            "date": "2025-08-29",
            "sectors": [
                {"ticker": "1631.T", "name": "Banks", "price": 31.5, "change_pct": 1.25,
                 "rs_ratio": 101.5, "rs_momentum": 100.25, "quadrant": "Leading"},
                {"ticker": "1633.T", "name": "Real Estate", "price": 380.0, "change_pct": -0.5,
                 "rs_ratio": 98.0, "rs_momentum": 99.0, "quadrant": "Lagging"}
            ]
        }));

        let mut sink = Vec::new();
        render_table(&mut sink, &envelope).expect("render");
        let text = String::from_utf8(sink).expect("utf8");

        assert!(text.contains("date        : 2025-08-29"));
        let banks = text.lines().find(|line| line.contains("1631.T")).expect("banks row");
        assert!(banks.contains("Banks"));
        assert!(banks.contains("101.50"));
        assert!(banks.trim_end().ends_with("Leading"));
        assert!(text.contains("Real Estate"));
    }

    #[test]
    fn table_falls_back_to_pretty_data() {
        let envelope = envelope(json!({"benchmarks": []}));

        let mut sink = Vec::new();
        render_table(&mut sink, &envelope).expect("render");
        let text = String::from_utf8(sink).expect("utf8");

        assert!(text.contains("data:"));
        assert!(text.contains("\"benchmarks\": []"));
    }
}
