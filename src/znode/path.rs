use std::str::FromStr;

use derive_more::Display;
use snafu::{Snafu, ensure};

const SEPARATOR: char = '/';
const ROOT: &str = "/";
/// The server's own subtree (quotas, dynamic config). It is never dumped or loaded.
pub const RESERVED: &str = "/zookeeper";

/// An absolute, validated znode path such as `/` or `/config/service`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct ZnodePath(String);

impl ZnodePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ZnodePath {
    type Err = InvalidPathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        validate(path)?;
        Ok(ZnodePath(path.to_string()))
    }
}

/// Checks that `path` is an absolute znode path.
pub fn validate(path: &str) -> Result<(), InvalidPathError> {
    ensure!(
        path.starts_with(SEPARATOR),
        InvalidPathSnafu {
            path,
            reason: "must start with '/'",
        }
    );
    if path == ROOT {
        return Ok(());
    }
    ensure!(
        !path.ends_with(SEPARATOR),
        InvalidPathSnafu {
            path,
            reason: "must not end with '/'",
        }
    );
    ensure!(
        !path.contains('\0'),
        InvalidPathSnafu {
            path,
            reason: "must not contain NUL characters",
        }
    );

    for segment in path[1..].split(SEPARATOR) {
        ensure!(
            !segment.is_empty(),
            InvalidPathSnafu {
                path,
                reason: "must not contain empty segments",
            }
        );
        ensure!(
            segment != "." && segment != "..",
            InvalidPathSnafu {
                path,
                reason: "must not contain relative segments",
            }
        );
    }

    Ok(())
}

/// Appends one segment to `parent`. The root never produces a double slash.
pub fn join(parent: &str, name: &str) -> String {
    if parent.ends_with(SEPARATOR) {
        format!("{parent}{name}")
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

/// Returns the last segment of `path`, or `None` for the root.
pub fn final_segment(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR)
        .map(|(_, name)| name)
        .filter(|name| !name.is_empty())
}

#[derive(Debug, Snafu)]
#[snafu(display("Invalid znode path '{path}': {reason}"))]
pub struct InvalidPathError {
    path: String,
    reason: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("/")]
    #[case("/a")]
    #[case("/a/b/c")]
    #[case("/with spaces/and-dashes_and.dots")]
    fn accepts_valid_paths(#[case] path: &str) {
        assert!(validate(path).is_ok(), "expected '{path}' to be valid");
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    #[case("/a/")]
    #[case("//a")]
    #[case("/a//b")]
    #[case("/a/./b")]
    #[case("/a/..")]
    #[case("/a\0b")]
    fn rejects_invalid_paths(#[case] path: &str) {
        assert!(validate(path).is_err(), "expected '{path}' to be invalid");
    }

    #[test]
    fn join_does_not_double_the_root_separator() {
        assert_eq!(join("/", "b"), "/b");
        assert_eq!(join("/a", "b"), "/a/b");
    }

    #[test]
    fn final_segment_of_nested_and_root_paths() {
        assert_eq!(final_segment("/a/b"), Some("b"));
        assert_eq!(final_segment("/a"), Some("a"));
        assert_eq!(final_segment("/"), None);
    }

    #[test]
    fn parses_from_str() {
        let path: ZnodePath = "/config/service".parse().unwrap();
        assert_eq!(path.as_str(), "/config/service");
        assert_eq!(path.to_string(), "/config/service");
        assert!("relative".parse::<ZnodePath>().is_err());
    }

    #[test]
    fn error_message_names_the_path() {
        let message = validate("/a//b").unwrap_err().to_string();
        assert!(message.contains("/a//b"));
        assert!(message.contains("empty segments"));
    }
}
