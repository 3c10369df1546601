use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::Value;

use crate::error::LookupError;

pub const DEFAULT_API_BASE: &str = "https://pcsupport.lenovo.com/us/en";

const PRODUCTS_PATH: &str = "/api/v4/mse/getproducts";
const WARRANTY_PATH: &str = "/api/v4/upsell/redport/getIbaseInfo";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";
const ACCEPT: &str = "application/json, text/plain, */*";

/// The two vendor lookups a scan needs.
#[async_trait]
pub trait WarrantyApi: Send + Sync {
    /// Look a serial up in the product catalogue.
    async fn product_lookup(&self, serial: &str) -> Result<Value, LookupError>;

    /// Fetch warranty entitlement for a known serial and machine type.
    async fn warranty_lookup(&self, serial: &str, machine_type: &str)
        -> Result<Value, LookupError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WarrantyRequest<'a> {
    serial_number: &'a str,
    machine_type: &'a str,
    country: &'a str,
    language: &'a str,
}

/// HTTP client for the vendor's support site.
#[derive(Clone)]
pub struct VendorClient {
    client: Client,
    base: String,
}

impl VendorClient {
    pub fn new(base: impl Into<String>) -> Result<Self, LookupError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

async fn json_body(resp: Response) -> Result<Value, LookupError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }
    Ok(resp.json().await?)
}

#[async_trait]
impl WarrantyApi for VendorClient {
    async fn product_lookup(&self, serial: &str) -> Result<Value, LookupError> {
        let resp = self
            .client
            .get(self.url(PRODUCTS_PATH))
            .query(&[("productId", serial)])
            .send()
            .await?;
        json_body(resp).await
    }

    async fn warranty_lookup(
        &self,
        serial: &str,
        machine_type: &str,
    ) -> Result<Value, LookupError> {
        let body = WarrantyRequest {
            serial_number: serial,
            machine_type,
            country: "us",
            language: "en",
        };
        // `.json()` sets the Content-Type header.
        let resp = self
            .client
            .post(self.url(WARRANTY_PATH))
            .json(&body)
            .send()
            .await?;
        json_body(resp).await
    }
}
