//! Release-tag parsing and build-system selection.

/// Bitcoin Core switched from autotools to CMake with this major version.
///
/// A project-history fact, not something derivable at runtime.
pub const CMAKE_SWITCH_MAJOR: u32 = 25;

/// Parse `(major, minor)` from a release tag like `"v26.1"`.
///
/// Strips one optional leading `v`, then prefix-matches `major.minor`;
/// trailing suffixes (`.1`, `-rc3`) are ignored. Anything unparsable maps to
/// `(0, 0)`, deliberately below every policy threshold, so an odd tag selects
/// the legacy build path instead of failing.
pub fn parse_version(tag: &str) -> (u32, u32) {
  leading_major_minor(tag.strip_prefix('v').unwrap_or(tag)).unwrap_or((0, 0))
}

/// True for releases built with CMake (the modern build system).
pub fn uses_cmake(tag: &str) -> bool {
  parse_version(tag).0 >= CMAKE_SWITCH_MAJOR
}

fn leading_major_minor(s: &str) -> Option<(u32, u32)> {
  let (major, rest) = leading_number(s)?;
  let (minor, _) = leading_number(rest.strip_prefix('.')?)?;
  Some((major, minor))
}

fn leading_number(s: &str) -> Option<(u32, &str)> {
  let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
  let value = s[..end].parse().ok()?;
  Some((value, &s[end..]))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_plain_major_minor() {
    assert_eq!(parse_version("v27.0"), (27, 0));
    assert_eq!(parse_version("26.1"), (26, 1));
  }

  #[test]
  fn suffixes_are_ignored() {
    assert_eq!(parse_version("v24.0.1-rc3"), (24, 0));
    assert_eq!(parse_version("v0.10.5"), (0, 10));
    assert_eq!(parse_version("v1.2rc"), (1, 2));
  }

  #[test]
  fn unparsable_tags_map_to_zero() {
    assert_eq!(parse_version(""), (0, 0));
    assert_eq!(parse_version("master"), (0, 0));
    assert_eq!(parse_version("v27"), (0, 0));
    assert_eq!(parse_version("v.5"), (0, 0));
    assert_eq!(parse_version("x27.0"), (0, 0));
    // Numbers past u32 are not a crash either.
    assert_eq!(parse_version("v99999999999.0"), (0, 0));
  }

  #[test]
  fn cmake_threshold_boundary() {
    assert!(!uses_cmake("v24.99"));
    assert!(uses_cmake("v25.0"));
    assert!(uses_cmake("v27.0"));
  }

  #[test]
  fn unparsable_tag_selects_legacy_path() {
    assert!(!uses_cmake("nightly"));
  }
}
