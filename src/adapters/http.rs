use crate::config::toml_config::ServiceConfig;
use crate::domain::model::ServiceResponse;
use crate::domain::ports::RemoteService;
use crate::utils::error::{OrderError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// 以 HTTP GET {endpoint}/{order_id} 呼叫遠端服務
pub struct HttpRemoteService {
    client: Client,
    endpoint: String,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl HttpRemoteService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        let mut service = Self::new(config.endpoint.clone());
        if let Some(headers) = &config.headers {
            service.headers = headers.clone();
        }
        service.timeout = config.timeout_seconds.map(Duration::from_secs);
        service
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    fn order_url(&self, order_id: u64) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), order_id)
    }
}

#[async_trait::async_trait]
impl RemoteService for HttpRemoteService {
    async fn invoke(&self, order_id: u64) -> Result<ServiceResponse> {
        let url = self.order_url(order_id);
        tracing::debug!("Calling remote service: {}", url);

        let mut request = self.client.get(&url);

        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Remote service response status: {}", status);

        if !status.is_success() {
            return Err(OrderError::service(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        let body: ServiceResponse = response.json().await?;
        Ok(body)
    }
}
