//! Stable-release discovery via the GitHub releases API.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{APP_NAME, MAX_RELEASES};

/// Errors that can occur while fetching the release list.
#[derive(Debug, Error)]
pub enum ReleaseError {
  /// The request could not be built or sent, or returned a failure status.
  #[error("failed to fetch releases from '{url}': {source}")]
  Http {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The response body was not the expected JSON shape.
  #[error("unexpected release payload from '{url}': {source}")]
  Decode {
    url: String,
    #[source]
    source: reqwest::Error,
  },
}

/// One entry of the GitHub releases payload; only the fields we read.
#[derive(Debug, Deserialize)]
pub(crate) struct Release {
  pub tag_name: String,
  #[serde(default)]
  pub prerelease: bool,
}

/// Fetch up to [`MAX_RELEASES`] stable release tags, newest first.
///
/// Release candidates (tag containing "rc", case-insensitive) and
/// API-flagged prereleases are skipped. The first page the API returns is
/// enough; ten stable tags cover years of either project's history.
pub async fn fetch_release_tags(api_url: &str) -> Result<Vec<String>, ReleaseError> {
  let http_err = |source| ReleaseError::Http { url: api_url.to_string(), source };

  let client = reqwest::Client::builder()
    .timeout(Duration::from_secs(10))
    .user_agent(APP_NAME)
    .build()
    .map_err(http_err)?;

  debug!(url = %api_url, "fetching release list");
  let response = client.get(api_url).send().await.map_err(http_err)?;
  let releases: Vec<Release> = response
    .error_for_status()
    .map_err(http_err)?
    .json()
    .await
    .map_err(|source| ReleaseError::Decode { url: api_url.to_string(), source })?;

  let tags = filter_stable(releases, MAX_RELEASES);
  info!(url = %api_url, count = tags.len(), "release tags fetched");
  Ok(tags)
}

/// Keep stable tags in payload order, capped at `limit`.
pub(crate) fn filter_stable(releases: impl IntoIterator<Item = Release>, limit: usize) -> Vec<String> {
  let mut tags = Vec::new();
  for release in releases {
    if release.prerelease || release.tag_name.to_lowercase().contains("rc") {
      continue;
    }
    tags.push(release.tag_name);
    if tags.len() == limit {
      break;
    }
  }
  tags
}
