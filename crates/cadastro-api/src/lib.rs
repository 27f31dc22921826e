// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use cadastro_app::{Client, ClientId, Company, CompanyId, Partner};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Failure taxonomy for every call against the external store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transport or server failure; nothing can be said about the record.
    Fetch(String),
    /// The record was rejected by remote business rules.
    Validation(String),
    /// The target record no longer exists.
    NotFound(String),
    /// The operation is blocked by dependent records.
    Conflict(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(message) => write!(f, "store unreachable: {message}"),
            Self::Validation(message) => write!(f, "record rejected: {message}"),
            Self::NotFound(message) => write!(f, "record not found: {message}"),
            Self::Conflict(message) => write!(f, "operation blocked: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Draft company record, built from a validated form input. The store
/// assigns the id and defaults `ativo` to true on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub razao_social: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome_fantasia: Option<String>,
    pub cnpj: String,
}

/// Draft client record. `empresa_id` must resolve to an existing company;
/// the engine checks this before dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub empresa_id: CompanyId,
    pub codigo: String,
    pub razao_social: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome_fantasia: Option<String>,
    pub cnpj: String,
}

/// The narrow contract the engine consumes. Implemented by [`HttpStore`] in
/// production and by the testkit's in-memory store in tests.
pub trait CadastroStore {
    fn fetch_companies(&self) -> StoreResult<Vec<Company>>;
    fn fetch_clients(&self) -> StoreResult<Vec<Client>>;
    fn fetch_partners(&self, company: &CompanyId) -> StoreResult<Vec<Partner>>;

    fn create_company(&self, draft: &NewCompany) -> StoreResult<Company>;
    fn update_company(&self, id: &CompanyId, draft: &NewCompany) -> StoreResult<Company>;
    fn delete_company(&self, id: &CompanyId) -> StoreResult<()>;
    fn set_company_active(&self, id: &CompanyId, ativo: bool) -> StoreResult<()>;

    fn create_client(&self, draft: &NewClient) -> StoreResult<Client>;
    fn update_client(&self, id: &ClientId, draft: &NewClient) -> StoreResult<Client>;
    fn delete_client(&self, id: &ClientId) -> StoreResult<()>;
    fn set_client_active(&self, id: &ClientId, ativo: bool) -> StoreResult<()>;
}

#[derive(Debug, Serialize)]
struct ActiveBody {
    ativo: bool,
}

/// JSON client for the remote registration API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    http: HttpClient,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> StoreResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url)
            .map_err(|error| StoreError::Fetch(format!("invalid base url {base_url:?}: {error}")))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| StoreError::Fetch(format!("build HTTP client: {error}")))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        log::debug!("GET {path}");
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_json(check_status(response)?)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> StoreResult<T> {
        log::debug!("POST {path}");
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_json(check_status(response)?)
    }

    fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> StoreResult<T> {
        log::debug!("PUT {path}");
        let response = self
            .http
            .put(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_json(check_status(response)?)
    }

    fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> StoreResult<()> {
        log::debug!("PUT {path}");
        let response = self
            .http
            .put(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        check_status(response).map(|_| ())
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        log::debug!("DELETE {path}");
        let response = self
            .http
            .delete(format!("{}{path}", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        check_status(response).map(|_| ())
    }
}

impl CadastroStore for HttpStore {
    fn fetch_companies(&self) -> StoreResult<Vec<Company>> {
        self.get_json("/empresas")
    }

    fn fetch_clients(&self) -> StoreResult<Vec<Client>> {
        self.get_json("/clientes")
    }

    fn fetch_partners(&self, company: &CompanyId) -> StoreResult<Vec<Partner>> {
        self.get_json(&format!("/empresas/{company}/socios"))
    }

    fn create_company(&self, draft: &NewCompany) -> StoreResult<Company> {
        self.post_json("/empresas", draft)
    }

    fn update_company(&self, id: &CompanyId, draft: &NewCompany) -> StoreResult<Company> {
        self.put_json(&format!("/empresas/{id}"), draft)
    }

    fn delete_company(&self, id: &CompanyId) -> StoreResult<()> {
        self.delete(&format!("/empresas/{id}"))
    }

    fn set_company_active(&self, id: &CompanyId, ativo: bool) -> StoreResult<()> {
        self.put_unit(&format!("/empresas/{id}/ativo"), &ActiveBody { ativo })
    }

    fn create_client(&self, draft: &NewClient) -> StoreResult<Client> {
        self.post_json("/clientes", draft)
    }

    fn update_client(&self, id: &ClientId, draft: &NewClient) -> StoreResult<Client> {
        self.put_json(&format!("/clientes/{id}"), draft)
    }

    fn delete_client(&self, id: &ClientId) -> StoreResult<()> {
        self.delete(&format!("/clientes/{id}"))
    }

    fn set_client_active(&self, id: &ClientId, ativo: bool) -> StoreResult<()> {
        self.put_unit(&format!("/clientes/{id}/ativo"), &ActiveBody { ativo })
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> StoreError {
    StoreError::Fetch(format!("cannot reach {base_url} ({error})"))
}

fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(error_for_status(status, &body))
}

fn decode_json<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    response
        .json()
        .map_err(|error| StoreError::Fetch(format!("decode response: {error}")))
}

fn error_for_status(status: StatusCode, body: &str) -> StoreError {
    let message = extract_message(body)
        .unwrap_or_else(|| format!("server returned {}", status.as_u16()));
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        StatusCode::CONFLICT => StoreError::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Validation(message)
        }
        _ => StoreError::Fetch(message),
    }
}

fn extract_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return Some(error);
    }

    if !body.is_empty() && body.len() < 200 && !body.contains('{') {
        return Some(body.to_owned());
    }

    None
}
