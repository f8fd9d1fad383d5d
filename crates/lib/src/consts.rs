//! Application-wide constants.

/// Application name, used for config directory and HTTP user agent.
pub const APP_NAME: &str = "nodeforge";

/// Sentinel a version selector shows while release tags are still loading.
///
/// A build request carrying this value (or an empty tag) is rejected before
/// any subprocess runs.
pub const LOADING_SENTINEL: &str = "Loading...";

/// Maximum number of release tags returned per project.
pub const MAX_RELEASES: usize = 10;
