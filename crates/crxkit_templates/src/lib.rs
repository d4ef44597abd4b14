//! # crxkit_templates
//!
//! Template inheritance and merging engine for crxkit.
//!
//! A template is a file tree plus a `template.yaml` descriptor. A template can
//! `extends` a base template to inherit shared tooling; rendering then:
//!
//! - substitutes `{{var}}` tokens and `{{#if var}}…{{/if}}` blocks in every
//!   file's content and path
//! - merges the base and template `package.json` (scripts and dependency maps)
//! - folds base partial files (`README.partial.md`, `.gitignore.partial.template`)
//!   into the template's matching files
//! - resolves path conflicts so the template side wins
//!
//! ## Example
//!
//! ```rust,no_run
//! use crxkit_templates::{RenderContext, TemplateLoader, TemplateRenderer};
//!
//! let registry = TemplateLoader::new("templates").load_all().unwrap();
//! let template = registry.get_with_base("react").unwrap();
//!
//! let context = RenderContext::for_project("tab-saver").with_author("Ada");
//! let files = TemplateRenderer::new()
//!     .render_with_inheritance(
//!         &template.files_root,
//!         registry.base_files_root("react"),
//!         &context,
//!     )
//!     .unwrap();
//!
//! for file in &files {
//!     println!("{}", file.path);
//! }
//! ```

pub mod classify;
pub mod context;
pub mod error;
pub mod inheritance;
pub mod loader;
pub mod manifest;
pub mod package;
pub mod partials;
pub mod path;
pub mod renderer;

pub use classify::{classify, FileKind, DESCRIPTOR_FILE_NAMES, PARTIAL_MARKER};
pub use context::RenderContext;
pub use error::{TemplateError, TemplateResult};
pub use loader::TemplateLoader;
pub use manifest::{DependencySpec, TemplateDescriptor, TemplateRegistry};
pub use package::{merge_package_json, PackageDescriptor};
pub use partials::{merge_partial_files, README_PLACEHOLDER};
pub use path::TemplatePath;
pub use renderer::{render_file, Encoding, FileContent, RenderedFile, TemplateRenderer};
