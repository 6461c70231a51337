//! Stencil storage
//!
//! Fetches templates into working folders and persists the manifest that
//! records what generated a target directory.
//!
//! ```ignore
//! use stencil_storage::{LocalFolderSource, ManifestStore, TemplateSource};
//!
//! let fetched = LocalFolderSource::new().get_template("./templates/service", None)?;
//! println!("{} v{}", fetched.descriptor.name, fetched.descriptor.version);
//!
//! let store = ManifestStore::new();
//! let manifest = store.load(std::path::Path::new("./my-service"))?;
//! ```

pub mod error;
pub mod manifest;
pub mod source;

pub use error::{IoOperation, StorageError, StorageResult};
pub use manifest::ManifestStore;
pub use source::{
    FetchedTemplate, LocalFolderSource, TemplateSource, DEFAULT_IGNORE_PATTERNS,
    LOCAL_FOLDER_SOURCE,
};
