//! Template loading functionality.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};
use crate::manifest::{TemplateDescriptor, TemplateRegistry};

/// Metadata file at the root of every template directory.
pub const MANIFEST_FILE: &str = "template.yaml";
const ALT_MANIFEST_FILE: &str = "template.yml";

/// Subdirectory holding the files that get rendered.
pub const CONTENT_DIR: &str = "template";

/// Template loader.
///
/// Expects one directory per template:
///
/// ```text
/// templates/
///   base/
///     template.yaml
///     template/...
///   react/
///     template.yaml
///     template/...
/// ```
pub struct TemplateLoader {
    templates_path: PathBuf,
}

impl TemplateLoader {
    /// Create a new template loader.
    pub fn new(templates_path: impl Into<PathBuf>) -> Self {
        Self {
            templates_path: templates_path.into(),
        }
    }

    pub fn templates_path(&self) -> &Path {
        &self.templates_path
    }

    /// Load all templates from the templates directory.
    ///
    /// Directories without a readable manifest are skipped with a warning.
    pub fn load_all(&self) -> TemplateResult<TemplateRegistry> {
        let mut registry = TemplateRegistry::new();

        if !self.templates_path.exists() {
            warn!("Templates directory does not exist: {:?}", self.templates_path);
            return Ok(registry);
        }

        for entry in WalkDir::new(&self.templates_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            match self.load_template(entry.path()) {
                Ok(descriptor) => {
                    info!("Loaded template: {} ({})", descriptor.name, descriptor.id);
                    registry.register(descriptor);
                }
                Err(e) => {
                    warn!("Failed to load template from {:?}: {}", entry.path(), e);
                }
            }
        }

        Ok(registry)
    }

    /// Load a single template from a directory.
    pub fn load_template(&self, path: &Path) -> TemplateResult<TemplateDescriptor> {
        let manifest_path = find_manifest(path).ok_or_else(|| {
            TemplateError::NotFound(format!("No {} found in {:?}", MANIFEST_FILE, path))
        })?;

        debug!("Loading manifest from {:?}", manifest_path);
        let content = fs::read_to_string(&manifest_path)?;
        let mut descriptor: TemplateDescriptor = serde_yaml::from_str(&content)?;

        if descriptor.id.trim().is_empty() {
            return Err(TemplateError::InvalidManifest {
                template: path.display().to_string(),
                message: "id must not be empty".to_string(),
            });
        }
        if descriptor.extends.as_deref() == Some(descriptor.id.as_str()) {
            return Err(TemplateError::InvalidManifest {
                template: descriptor.id.clone(),
                message: "a template cannot extend itself".to_string(),
            });
        }

        descriptor.files_root = path.join(CONTENT_DIR);
        Ok(descriptor)
    }

    /// Validate a template directory structure against the loaded registry.
    pub fn validate_template(
        &self,
        path: &Path,
        registry: &TemplateRegistry,
    ) -> TemplateResult<Vec<String>> {
        let mut issues = Vec::new();

        match self.load_template(path) {
            Ok(descriptor) => {
                if !descriptor.files_root.is_dir() {
                    issues.push(format!("Missing '{}' content directory", CONTENT_DIR));
                }
                if let Some(base) = &descriptor.extends {
                    if !registry.has(base) {
                        issues.push(format!("Extends unknown template '{}'", base));
                    }
                }
                for spec in descriptor
                    .dependencies
                    .iter()
                    .chain(&descriptor.dev_dependencies)
                {
                    if spec.trim().is_empty() {
                        issues.push("Empty dependency entry".to_string());
                    }
                }
            }
            Err(TemplateError::NotFound(_)) => {
                issues.push(format!("Missing {} manifest", MANIFEST_FILE));
            }
            Err(e) => {
                issues.push(format!("Invalid manifest: {}", e));
            }
        }

        Ok(issues)
    }
}

fn find_manifest(dir: &Path) -> Option<PathBuf> {
    [MANIFEST_FILE, ALT_MANIFEST_FILE]
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_template(root: &Path, dir: &str, manifest: &str) {
        let path = root.join(dir);
        fs::create_dir_all(path.join(CONTENT_DIR)).unwrap();
        fs::write(path.join(MANIFEST_FILE), manifest).unwrap();
    }

    #[test]
    fn test_loader_empty_dir() {
        let temp = tempdir().unwrap();
        let loader = TemplateLoader::new(temp.path());
        let registry = loader.load_all().unwrap();
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_loader_missing_dir() {
        let temp = tempdir().unwrap();
        let loader = TemplateLoader::new(temp.path().join("missing"));
        assert!(loader.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_loader_skips_broken_templates() {
        let temp = tempdir().unwrap();
        write_template(temp.path(), "base", "id: base\nname: Base\n");
        write_template(temp.path(), "broken", "id: [not, a, string\n");
        write_template(temp.path(), "selfish", "id: selfish\nname: S\nextends: selfish\n");
        fs::create_dir_all(temp.path().join("no-manifest")).unwrap();
        fs::write(temp.path().join("README.md"), "not a template").unwrap();

        let registry = TemplateLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.files_root("base"),
            Some(temp.path().join("base").join(CONTENT_DIR).as_path())
        );
    }

    #[test]
    fn test_validate_template() {
        let temp = tempdir().unwrap();
        write_template(temp.path(), "react", "id: react\nname: React\nextends: base\n");
        fs::create_dir_all(temp.path().join("empty")).unwrap();

        let loader = TemplateLoader::new(temp.path());
        let registry = loader.load_all().unwrap();

        let issues = loader
            .validate_template(&temp.path().join("react"), &registry)
            .unwrap();
        assert_eq!(issues, vec!["Extends unknown template 'base'"]);

        let issues = loader
            .validate_template(&temp.path().join("empty"), &registry)
            .unwrap();
        assert_eq!(issues, vec!["Missing template.yaml manifest"]);
    }

    #[test]
    fn test_alt_manifest_name() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("vanilla");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("template.yml"), "id: vanilla\nname: Vanilla\n").unwrap();

        let descriptor = TemplateLoader::new(temp.path()).load_template(&dir).unwrap();
        assert_eq!(descriptor.id, "vanilla");
    }
}
