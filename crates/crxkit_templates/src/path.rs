//! OS-neutral relative paths for rendered files.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A relative, forward-slash separated file path inside a template tree.
///
/// Construction normalises backslashes, drops empty and `.` segments, so two
/// paths that name the same file always compare equal regardless of host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TemplatePath(String);

impl TemplatePath {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw
            .as_ref()
            .replace('\\', "/")
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self(normalized)
    }

    /// Build from a host path that is already relative to a template root.
    pub fn from_relative(path: &Path) -> Self {
        let segments: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Self::new(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment of the path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Everything before the final segment, if any.
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// True when the file sits directly in the tree root.
    pub fn is_root_level(&self) -> bool {
        !self.0.contains('/')
    }

    /// Same directory, different file name.
    pub fn with_file_name(&self, name: &str) -> Self {
        match self.parent() {
            Some(parent) => Self::new(format!("{}/{}", parent, name)),
            None => Self::new(name),
        }
    }

    /// Host path for writing below `root`.
    pub fn to_path_buf(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, s| acc.join(s))
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TemplatePath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for TemplatePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<TemplatePath> for String {
    fn from(value: TemplatePath) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_separators() {
        let path = TemplatePath::new(r"src\popup\./index.html");
        assert_eq!(path.as_str(), "src/popup/index.html");
        assert_eq!(path, TemplatePath::new("src//popup/index.html"));
    }

    #[test]
    fn test_segments() {
        let path = TemplatePath::new("src/popup/index.html");
        assert_eq!(path.file_name(), "index.html");
        assert_eq!(path.parent(), Some("src/popup"));
        assert!(!path.is_root_level());

        let root = TemplatePath::new(".gitignore.template");
        assert_eq!(root.file_name(), ".gitignore.template");
        assert_eq!(root.parent(), None);
        assert!(root.is_root_level());
    }

    #[test]
    fn test_with_file_name() {
        let path = TemplatePath::new("docs/README.partial.md");
        assert_eq!(path.with_file_name("README.md").as_str(), "docs/README.md");
        assert_eq!(
            TemplatePath::new("a.txt").with_file_name("b.txt").as_str(),
            "b.txt"
        );
    }

    #[test]
    fn test_from_relative() {
        let relative = Path::new("src").join("content").join("main.ts");
        assert_eq!(
            TemplatePath::from_relative(&relative).as_str(),
            "src/content/main.ts"
        );
    }
}
