//! Release-tag policy and stable-release discovery.

pub mod policy;
pub mod releases;

pub use policy::{CMAKE_SWITCH_MAJOR, parse_version, uses_cmake};
pub use releases::fetch_release_tags;
