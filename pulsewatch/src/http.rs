// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::devices::HttpClient;
use async_trait::async_trait;
use core::time::Duration;
use pulsewatch_core::DeviceError;

const DEVICE: &str = "http";

/// [`HttpClient`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// # Errors
    /// Returns a [`DeviceError`] if the TLS backend cannot be initialised.
    pub fn new(request_timeout: Duration) -> Result<Self, DeviceError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DeviceError::new(DEVICE, e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<u16, DeviceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DeviceError::new(DEVICE, e.to_string()))?;
        Ok(response.status().as_u16())
    }
}
