//! Implementation of the `nodeforge versions` command.
//!
//! Fetches the latest stable release tags per project. A fetch failure is
//! reported but does not abort the other project's list; mirrors how the
//! version selectors populate independently.

use anyhow::{Context, Result};

use nodeforge_lib::orchestrate::BuildTarget;
use nodeforge_lib::settings::Settings;
use nodeforge_lib::version::fetch_release_tags;

use crate::output::{print_error, symbols};

pub fn cmd_versions(target: BuildTarget, json: bool) -> Result<()> {
  let settings = Settings::load().context("Failed to load settings")?;
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

  rt.block_on(async {
    let mut listing = serde_json::Map::new();

    if target.includes_bitcoin() {
      let tags = fetch_project("Bitcoin Core", &settings.bitcoin_api, json).await;
      listing.insert("bitcoin".to_string(), tags.into());
    }
    if target.includes_electrs() {
      let tags = fetch_project("electrs", &settings.electrs_api, json).await;
      listing.insert("electrs".to_string(), tags.into());
    }

    if json {
      println!("{}", serde_json::Value::Object(listing));
    }
    Ok(())
  })
}

async fn fetch_project(label: &str, api_url: &str, json: bool) -> Vec<String> {
  match fetch_release_tags(api_url).await {
    Ok(tags) => {
      if !json {
        println!("{label}:");
        for tag in &tags {
          println!("  {} {tag}", symbols::INFO);
        }
      }
      tags
    }
    Err(err) => {
      print_error(&format!("Failed to fetch {label} versions: {err}"));
      Vec::new()
    }
  }
}
