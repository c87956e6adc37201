use crate::OutputFormat;
use crate::commands::money;
use crate::stay::{StayQuote, quote_stay};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct QuoteOutput {
    pub fecha_ingreso: String,
    pub hora_ingreso: String,
    pub tolerance_minutes: Option<u32>,
    pub hourly_rate: Decimal,
    #[serde(flatten)]
    pub quote: StayQuote,
}

/// Quote a stay without touching the backend
pub fn quote(
    fecha: &str,
    hora: &str,
    tolerance_minutes: Option<u32>,
    hourly_rate: Decimal,
    now: &DateTime<Local>,
    format: OutputFormat,
) -> Result<()> {
    let output = QuoteOutput {
        fecha_ingreso: fecha.to_string(),
        hora_ingreso: hora.to_string(),
        tolerance_minutes,
        hourly_rate,
        quote: quote_stay(Some(fecha), Some(hora), tolerance_minutes, hourly_rate, now),
    };

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialize quote")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let tolerance = tolerance_minutes
                .map(|m| format!("{} min", m))
                .unwrap_or_else(|| "none".to_string());
            println!("Entry:      {} {}", fecha, hora);
            println!("As of:      {}", now.format("%Y-%m-%d %H:%M:%S"));
            println!("Elapsed:    {} ({})", output.quote.human, output.quote.clock);
            println!("Tolerance:  {}", tolerance);
            println!("Fractions:  {}", output.quote.fractions);
            println!(
                "Total:      {} ({} x {})",
                money(output.quote.total),
                output.quote.fractions,
                money(hourly_rate)
            );
        }
    }

    Ok(())
}
