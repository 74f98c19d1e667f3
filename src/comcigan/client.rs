use crate::config::Config;
use crate::error::ComciganError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use encoding_rs::Encoding;
use log::{debug, warn};

/// GET a url and hand back the body as text.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// The body is decoded with `charset` (an encoding label such as
    /// `euc-kr`), whatever the server says in its headers.
    async fn get_text(&self, url: &str, charset: &str) -> Result<String>;
}

/// The real thing, on top of reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, ComciganError> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(config.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ComciganError::Fetch(format!("Building http client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &str, charset: &str) -> Result<String> {
        let encoding = Encoding::for_label(charset.as_bytes())
            .ok_or(anyhow!("Unknown charset {}", charset))?;

        debug!("GET {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let (text, _, had_errors) = encoding.decode(&body);
        if had_errors {
            warn!("Response of {} isn't valid {}", url, charset);
        }

        Ok(text.into_owned())
    }
}
