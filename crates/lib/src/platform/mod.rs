//! Host platform probing: Homebrew detection and user paths.

pub mod brew;
pub mod paths;

pub use brew::Brew;
