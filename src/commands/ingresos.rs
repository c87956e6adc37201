use crate::OutputFormat;
use crate::api::client::CocheraClient;
use crate::api::models::Ingreso;
use crate::api::retry::RetryPolicy;
use crate::commands::{money, truncate};
use crate::config::Config;
use crate::stay::{StayQuote, quote_stay};
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::{debug, info};

/// One row of the open-entries listing
#[derive(Debug, Serialize)]
pub struct IngresoRow {
    pub id: u32,
    pub patente: Option<String>,
    pub tipo_vehiculo: Option<String>,
    pub fecha_ingreso: Option<String>,
    pub hora_ingreso: Option<String>,
    #[serde(flatten)]
    pub quote: StayQuote,
}

/// Price every open entry against the same clock and tolerance.
pub fn build_rows<Tz: TimeZone>(
    ingresos: &[Ingreso],
    tolerance_minutes: Option<u32>,
    now: &DateTime<Tz>,
) -> Vec<IngresoRow> {
    ingresos
        .iter()
        .map(|ingreso| IngresoRow {
            id: ingreso.id,
            patente: ingreso.patente().map(str::to_string),
            tipo_vehiculo: ingreso.tipo_nombre().map(str::to_string),
            fecha_ingreso: ingreso.fecha_ingreso.clone(),
            hora_ingreso: ingreso.hora_ingreso.clone(),
            quote: quote_stay(
                ingreso.fecha_ingreso.as_deref(),
                ingreso.hora_ingreso.as_deref(),
                tolerance_minutes,
                ingreso.hourly_rate(),
                now,
            ),
        })
        .collect()
}

/// Tolerance for the company, falling back to the configured default.
pub fn resolve_tolerance(
    client: &CocheraClient,
    config: &Config,
    company_id: Option<u32>,
) -> Result<Option<u32>> {
    let from_backend = match company_id {
        Some(id) => RetryPolicy::default()
            .run("tolerancias", || client.get_tolerance(id))?
            .and_then(|t| t.minutos),
        None => None,
    };

    if from_backend.is_none() {
        debug!(?company_id, "no backend tolerance, using configured default");
    }
    Ok(from_backend.or(config.billing.default_tolerance_minutes))
}

pub fn list<Tz: TimeZone>(
    config: &Config,
    company: Option<u32>,
    now: &DateTime<Tz>,
    format: OutputFormat,
) -> Result<()> {
    let client = CocheraClient::from_config(config)?;
    let company_id = company.or(config.api.company_id);

    let tolerance = resolve_tolerance(&client, config, company_id)?;
    let ingresos = RetryPolicy::default().run("ingresos", || client.list_ingresos(company_id))?;
    info!(count = ingresos.len(), ?tolerance, "fetched open entries");

    let rows = build_rows(&ingresos, tolerance, now);

    if let OutputFormat::Json = format {
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize entries")?;
        println!("{}", json);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No open entries.");
        return Ok(());
    }

    println!(
        "{:<6} {:<10} {:<12} {:<20} {:<10} {:<10} {:<6} {:>10}",
        "ID", "Plate", "Type", "Entry", "Elapsed", "Clock", "Frac", "Total"
    );
    println!("{}", "-".repeat(91));

    for row in &rows {
        let entry = format!(
            "{} {}",
            row.fecha_ingreso.as_deref().unwrap_or("-"),
            row.hora_ingreso.as_deref().unwrap_or("-")
        );
        println!(
            "{:<6} {:<10} {:<12} {:<20} {:<10} {:<10} {:<6} {:>10}",
            row.id,
            truncate(row.patente.as_deref().unwrap_or("-"), 10),
            truncate(row.tipo_vehiculo.as_deref().unwrap_or("-"), 12),
            truncate(&entry, 20),
            row.quote.human,
            row.quote.clock,
            row.quote.fractions,
            money(row.quote.total)
        );
    }

    let tolerance = tolerance
        .map(|m| format!("{} min", m))
        .unwrap_or_else(|| "none".to_string());
    println!("\n{} open entries (tolerance: {})", rows.len(), tolerance);

    Ok(())
}
