//! Artifact naming and packaging for crossplat.
//!
//! Each built binary is renamed through a user template and wrapped in a
//! single-entry zip archive whose file name comes from a second template.

pub mod archive;
pub mod error;
pub mod template;

pub use archive::{clean_archives, find_archives, write_single_entry};
pub use error::{BundleError, Result};
pub use template::{
    Placeholder, RenderedNames, Renderer, Template, TemplateVars, ARCHIVE_EXT,
    DEFAULT_ARCHIVE_TEMPLATE, DEFAULT_BINARY_TEMPLATE, DEFAULT_CLEAN_GLOB, WINDOWS_EXE_EXT,
};
