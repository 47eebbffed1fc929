//! HTTP client for the product service.
//!
//! [`ProductClient`] speaks the `/products` contract; [`report`] turns results
//! into the one-line messages the command-line tool prints.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub mod report;

/// A product as seen by the client: a flat JSON object.
pub type Record = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Body for create/update requests built from the tool's arguments.
pub fn product_payload(name: &str, price: f64) -> Record {
    let mut record = Record::new();
    record.insert("name".into(), Value::from(name));
    record.insert("price".into(), Value::from(price));
    record
}

/// `ProductClient` issues requests against a running product server.
#[derive(Clone, Debug)]
pub struct ProductClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    /// Client for `base_url` (e.g. `http://localhost:5000`) with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /products`
    pub async fn list(&self) -> Result<Vec<Record>> {
        let resp = self.http.get(self.url("/products")).send().await?;
        let resp = expect_status(resp, StatusCode::OK).await?;
        Ok(resp.json().await?)
    }

    /// `GET /products/{id}`; `Ok(None)` on 404.
    pub async fn get(&self, id: u64) -> Result<Option<Record>> {
        let resp = self.http.get(self.url(&format!("/products/{id}"))).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            debug!(id, "product not found");
            return Ok(None);
        }
        let resp = expect_status(resp, StatusCode::OK).await?;
        Ok(Some(resp.json().await?))
    }

    /// `POST /products`; returns the record with its assigned id.
    pub async fn create(&self, fields: &Record) -> Result<Record> {
        let resp = self.http.post(self.url("/products")).json(fields).send().await?;
        let resp = expect_status(resp, StatusCode::OK).await?;
        Ok(resp.json().await?)
    }

    /// `PUT /products/{id}`; `Ok(None)` on 404.
    pub async fn update(&self, id: u64, fields: &Record) -> Result<Option<Record>> {
        let resp = self
            .http
            .put(self.url(&format!("/products/{id}")))
            .json(fields)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = expect_status(resp, StatusCode::OK).await?;
        Ok(Some(resp.json().await?))
    }

    /// `DELETE /products/{id}`; `Ok(false)` on 404.
    pub async fn delete(&self, id: u64) -> Result<bool> {
        let resp = self.http.delete(self.url(&format!("/products/{id}"))).send().await?;
        match resp.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(unexpected(resp).await),
        }
    }
}

async fn expect_status(resp: reqwest::Response, want: StatusCode) -> Result<reqwest::Response> {
    if resp.status() == want {
        Ok(resp)
    } else {
        Err(unexpected(resp).await)
    }
}

async fn unexpected(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    ClientError::Status { status, body }
}
