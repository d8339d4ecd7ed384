//! Profile lookup: resolve an author handle to an avatar URI

use crate::descriptor::Patch;
use crate::{Error, PreviewConfig, Result};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

pub trait ProfileLookup: Send + Sync {
    /// Avatar URI for `handle`, `None` when the profile has none
    fn avatar_url(&self, handle: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}

#[derive(Debug, Deserialize)]
struct Profile {
    avatar_url: Option<String>,
}

/// Looks profiles up through the GitHub users API (or anything shaped like it)
#[derive(Debug, Clone)]
pub struct GithubProfileLookup {
    client: reqwest::Client,
    api_base: Url,
}

impl GithubProfileLookup {
    pub fn new(config: &PreviewConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let api_base = Url::parse(&config.api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!(
                "{} cannot hold a path",
                config.api_base
            )));
        }
        Ok(Self { client, api_base })
    }

    /// `{api_base}/users/{handle}`, with the handle as a single path segment
    pub fn profile_url(&self, handle: &str) -> Result<Url> {
        let handle = handle.trim();
        if matches!(handle, "" | "." | "..") {
            return Err(Error::InvalidUrl(format!("invalid handle {:?}", handle)));
        }
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.api_base.to_string()))?
            .pop_if_empty()
            .push("users")
            .push(handle);
        Ok(url)
    }
}

impl ProfileLookup for GithubProfileLookup {
    async fn avatar_url(&self, handle: &str) -> Result<Option<String>> {
        let url = self.profile_url(handle)?;
        log::debug!("looking up profile at {}", url);

        let resp = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::NetworkError(format!("{} returned {}", url, status)));
        }

        let body = resp.text().await?;
        let profile: Profile = serde_json::from_str(&body)?;
        Ok(profile.avatar_url.filter(|u| !u.is_empty()))
    }
}

/// Lookup that never finds anything; for offline use and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProfileLookup;

impl ProfileLookup for NoopProfileLookup {
    async fn avatar_url(&self, _handle: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Run a lookup and fold the outcome into a single patch.
///
/// Failures are logged and otherwise swallowed: the patch only clears the
/// loading flag.
pub async fn resolve_profile<P: ProfileLookup>(lookup: &P, handle: &str) -> Patch {
    match lookup.avatar_url(handle).await {
        Ok(Some(avatar)) => {
            log::info!("resolved avatar for {}", handle);
            Patch::ProfileResolved {
                avatar: Some(avatar),
            }
        }
        Ok(None) => {
            log::warn!("profile {} has no avatar", handle);
            Patch::ProfileResolved { avatar: None }
        }
        Err(e) => {
            log::warn!("profile lookup for {} failed: {}", handle, e);
            Patch::ProfileResolved { avatar: None }
        }
    }
}
