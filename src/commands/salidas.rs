use crate::OutputFormat;
use crate::api::client::CocheraClient;
use crate::api::models::Salida;
use crate::api::retry::RetryPolicy;
use crate::commands::{money, truncate};
use crate::config::Config;
use crate::stay::{Elapsed, compute_closed_stay};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SalidaRow {
    pub id: u32,
    pub patente: Option<String>,
    pub fecha_ingreso: Option<String>,
    pub hora_ingreso: Option<String>,
    pub fecha_salida: Option<String>,
    pub hora_salida: Option<String>,
    pub elapsed: Elapsed,
    pub human: String,
    pub total: Option<Decimal>,
}

pub fn build_rows(salidas: &[Salida]) -> Vec<SalidaRow> {
    salidas
        .iter()
        .map(|salida| {
            let ingreso = salida.ingreso.as_ref();
            let fecha_ingreso = ingreso.and_then(|i| i.fecha_ingreso.clone());
            let hora_ingreso = ingreso.and_then(|i| i.hora_ingreso.clone());
            let elapsed = compute_closed_stay(
                fecha_ingreso.as_deref(),
                hora_ingreso.as_deref(),
                salida.fecha_salida.as_deref(),
                salida.hora_salida.as_deref(),
            );

            SalidaRow {
                id: salida.id,
                patente: ingreso.and_then(|i| i.patente()).map(str::to_string),
                fecha_ingreso,
                hora_ingreso,
                fecha_salida: salida.fecha_salida.clone(),
                hora_salida: salida.hora_salida.clone(),
                elapsed,
                human: elapsed.to_string(),
                total: salida.total,
            }
        })
        .collect()
}

pub fn list(config: &Config, company: Option<u32>, format: OutputFormat) -> Result<()> {
    let client = CocheraClient::from_config(config)?;
    let company_id = company.or(config.api.company_id);

    let salidas = RetryPolicy::default().run("salidas", || client.list_salidas(company_id))?;
    let rows = build_rows(&salidas);

    if let OutputFormat::Json = format {
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize exits")?;
        println!("{}", json);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No exits recorded.");
        return Ok(());
    }

    println!(
        "{:<6} {:<10} {:<20} {:<20} {:<10} {:>10}",
        "ID", "Plate", "Entry", "Exit", "Stay", "Total"
    );
    println!("{}", "-".repeat(81));

    for row in &rows {
        let moment = |date: &Option<String>, time: &Option<String>| {
            format!(
                "{} {}",
                date.as_deref().unwrap_or("-"),
                time.as_deref().unwrap_or("-")
            )
        };
        println!(
            "{:<6} {:<10} {:<20} {:<20} {:<10} {:>10}",
            row.id,
            truncate(row.patente.as_deref().unwrap_or("-"), 10),
            truncate(&moment(&row.fecha_ingreso, &row.hora_ingreso), 20),
            truncate(&moment(&row.fecha_salida, &row.hora_salida), 20),
            row.human,
            row.total.map(money).unwrap_or_else(|| "-".to_string())
        );
    }

    let collected: Decimal = rows.iter().filter_map(|r| r.total).sum();
    println!("\nCollected: {} ({} exits)", money(collected), rows.len());

    Ok(())
}
