use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{Client, Response};

use crate::{config::SETTINGS, declare::QuoteError, logging::Logger};

#[cfg(test)]
pub(crate) mod stub;

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

/// 取得遠端資料的傳輸層，每次呼叫只送出一個 GET
#[async_trait]
pub trait Fetch: Send + Sync {
    /// 回傳回應本文的原始位元組，非 2xx 或連線失敗時回傳 Transport 錯誤
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, QuoteError>;
}

/// 以 reqwest 實作的 Fetch
#[derive(Default, Debug, Clone, Copy)]
pub struct HttpFetcher;

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, QuoteError> {
        get_bytes(url)
            .await
            .map_err(|why| QuoteError::transport(format!("API請求失敗: {:?}", why)))
    }
}

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // reqwest 使用 rustls-no-provider，需先安裝加密模組，已安裝時忽略錯誤
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            .brotli(true)
            .gzip(true)
            .zstd(true)
            .connect_timeout(Duration::from_secs(SETTINGS.http.connect_timeout_secs))
            .timeout(Duration::from_secs(SETTINGS.http.timeout_secs))
            .tcp_nodelay(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .referer(true)
            .user_agent(SETTINGS.http.user_agent.as_str())
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Performs a single HTTP GET request and fails on a non-success status.
pub async fn get_response(url: &str) -> Result<Response> {
    let client = get_client()?;
    let start = Instant::now();
    let res = client.get(url).send().await;
    let elapsed = start.elapsed().as_millis();

    match res {
        Ok(response) => {
            let status = response.status();
            LOGGER.info(format!("GET:{} {} {} ms", url, status, elapsed));
            response
                .error_for_status()
                .map_err(|why| anyhow!("Unexpected status {} from {}: {:?}", status, url, why))
        }
        Err(why) => {
            LOGGER.error(format!("GET:{} failed because {:?}. {} ms", url, why, elapsed));
            Err(anyhow!("Failed to send request to {}: {:?}", url, why))
        }
    }
}

/// Performs an HTTP GET request and returns the raw body.
pub async fn get_bytes(url: &str) -> Result<Vec<u8>> {
    Ok(get_response(url)
        .await?
        .bytes()
        .await
        .map_err(|e| anyhow!("Error reading response body: {:?}", e))?
        .to_vec())
}
