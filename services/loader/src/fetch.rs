//! Source fetcher: one reqwest client, per-region URLs from the environment.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::record::Region;

const USER_AGENT: &str = "itv-loader/0.1 (respectful data collection)";

pub struct SourceFetcher {
    client: reqwest::Client,
    cv_url: String,
    cat_url: String,
    gal_url: String,
    rate_limit_ms: u64,
}

impl SourceFetcher {
    /// Builds the fetcher from the environment, with the local wrapper
    /// endpoints as defaults.
    pub fn from_env() -> Result<SourceFetcher> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(120))
            .build()
            .context("failed to build the HTTP client")?;

        Ok(SourceFetcher {
            client,
            cv_url: env_or("CV_SOURCE_URL", "http://localhost:9003/valencia"),
            cat_url: env_or("CAT_SOURCE_URL", "http://localhost:9004/catalunya"),
            gal_url: env_or("GAL_SOURCE_URL", "http://localhost:9005/galicia"),
            rate_limit_ms: env_or("RATE_LIMIT_MS", "500")
                .parse()
                .context("RATE_LIMIT_MS must be an integer (milliseconds)")?,
        })
    }

    fn url_for(&self, region: Region) -> &str {
        match region {
            Region::Cv => &self.cv_url,
            Region::Cat => &self.cat_url,
            Region::Gal => &self.gal_url,
        }
    }

    /// Downloads one region's payload. Waits the politeness delay first and
    /// logs the content hash of what arrived.
    pub async fn fetch(&self, region: Region) -> Result<Vec<u8>> {
        tokio::time::sleep(Duration::from_millis(self.rate_limit_ms)).await;

        let url = self.url_for(region);
        println!("  {region}: GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;

        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read the body from {url}"))?;
        println!(
            "  {region}: {} bytes, sha256:{}",
            body.len(),
            hex_digest(&body)
        );
        Ok(body.to_vec())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// =============================================================================
// TESTS
// =============================================================================
