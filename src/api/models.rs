use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Vehicle category with its hourly rate (`valor`)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TipoVehiculo {
    pub id: u32,
    #[serde(default)]
    pub nombre: String,
    /// Backend sends either a number or a decimal string such as "5.00"
    #[serde(default)]
    pub valor: Option<Decimal>,
}

impl TipoVehiculo {
    /// Unconfigured rates bill nothing.
    pub fn hourly_rate(&self) -> Decimal {
        self.valor.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Vehiculo {
    pub id: u32,
    #[serde(default)]
    pub patente: Option<String>,
    #[serde(default)]
    pub tipo_vehiculo: Option<TipoVehiculo>,
}

/// Open parking entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingreso {
    pub id: u32,
    #[serde(default)]
    pub fecha_ingreso: Option<String>,
    #[serde(default)]
    pub hora_ingreso: Option<String>,
    #[serde(default)]
    pub vehiculo: Option<Vehiculo>,
    #[serde(default)]
    pub tipo_vehiculo: Option<TipoVehiculo>,
    #[serde(default)]
    pub company_id: Option<u32>,
}

impl Ingreso {
    fn tipo(&self) -> Option<&TipoVehiculo> {
        self.tipo_vehiculo
            .as_ref()
            .or_else(|| self.vehiculo.as_ref()?.tipo_vehiculo.as_ref())
    }

    pub fn hourly_rate(&self) -> Decimal {
        self.tipo()
            .map(TipoVehiculo::hourly_rate)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn patente(&self) -> Option<&str> {
        self.vehiculo.as_ref()?.patente.as_deref()
    }

    pub fn tipo_nombre(&self) -> Option<&str> {
        self.tipo().map(|t| t.nombre.as_str())
    }
}

/// Closed exit record; the fee was settled when it was created
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Salida {
    pub id: u32,
    #[serde(default)]
    pub fecha_salida: Option<String>,
    #[serde(default)]
    pub hora_salida: Option<String>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub ingreso: Option<Ingreso>,
}

/// Grace period for a company, in minutes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tolerancia {
    pub id: u32,
    #[serde(default)]
    pub minutos: Option<u32>,
    #[serde(default)]
    pub company_id: Option<u32>,
    #[serde(default)]
    pub tipo_vehiculo_id: Option<u32>,
}

/// List endpoints answer either a bare array or a `{ "data": [...] }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) => items,
            ListResponse::Wrapped { data } => data,
        }
    }
}
