use crate::api::models::{Ingreso, ListResponse, Salida, Tolerancia};
use crate::config::Config;
use crate::error::ApiError;
use anyhow::Result;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Blocking client for the parking back-office REST API.
pub struct CocheraClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl CocheraClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        if config.api.base_url.is_empty() {
            anyhow::bail!(
                "API base URL not set. Run 'cochera config set api.base_url <URL>' to configure"
            );
        }
        let token = config.get_api_token().ok();
        Ok(Self::new(&config.api.base_url, token.as_deref()))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let request = self
            .client
            .get(&url)
            .header("Accept", "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn fetch_list<T: DeserializeOwned>(
        &self,
        resource: &str,
        company_id: Option<u32>,
    ) -> Result<Vec<T>> {
        let mut request = self.get(&format!("/{}", resource));
        if let Some(id) = company_id {
            request = request.query(&[("company_id", id)]);
        }

        let response = request.send().map_err(|source| ApiError::Transport {
            resource: resource.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                resource: resource.to_string(),
                status,
            }
            .into());
        }

        let items = response
            .json::<ListResponse<T>>()
            .map_err(|source| ApiError::Decode {
                resource: resource.to_string(),
                source,
            })?;

        Ok(items.into_vec())
    }

    /// Entries still parked, optionally for one company
    pub fn list_ingresos(&self, company_id: Option<u32>) -> Result<Vec<Ingreso>> {
        self.fetch_list("ingresos", company_id)
    }

    /// Settled exits, optionally for one company
    pub fn list_salidas(&self, company_id: Option<u32>) -> Result<Vec<Salida>> {
        self.fetch_list("salidas", company_id)
    }

    /// The company's active tolerance policy, if it has one
    pub fn get_tolerance(&self, company_id: u32) -> Result<Option<Tolerancia>> {
        let tolerancias: Vec<Tolerancia> = self.fetch_list("tolerancias", Some(company_id))?;

        Ok(tolerancias
            .into_iter()
            .find(|t| t.company_id.is_none_or(|id| id == company_id)))
    }
}
