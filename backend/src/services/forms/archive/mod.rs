//! # Form Archive
//!
//! A form archive is a directory holding, per form:
//!
//! - `<formId>.xml`: a feed document whose channel-level scoped elements carry
//!   the form definition and whose entries carry the submitted records;
//! - `<formId>/`: the form's field styles, written by the style archive;
//!
//! plus a `version.txt` marker naming the plugin version that wrote it. An
//! archive without the marker was written by the historic generation of the
//! module and uses a few different element names.

pub mod cipher;
pub mod codec;
pub mod export;
pub mod feed;
pub mod import;

use crate::error::Result;
use log::debug;
use std::fs;
use std::path::Path;

/// Prepended to every attribute name to form its element name.
pub const PREFIX: &str = "SiteServer_";

pub const VERSION_FILE_NAME: &str = "version.txt";

/// Record elements only historic archives carry.
pub const HISTORIC_REPLY: &str = "Reply";
pub const HISTORIC_ADD_DATE: &str = "adddate";

/// Generation of the archive being imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Current,
    Historic,
}

/// Element names that differ between archive generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNames {
    /// Element holding the form title.
    pub title: &'static str,
    /// Element naming the style sub-directory.
    pub style_directory: &'static str,
}

impl ArchiveFormat {
    /// Sniffs the generation of the archive in `directory`. The version marker
    /// is consumed: after detection it no longer exists.
    pub fn detect(directory: &Path) -> Result<Self> {
        let marker = directory.join(VERSION_FILE_NAME);
        if !marker.is_file() {
            return Ok(ArchiveFormat::Historic);
        }
        debug!("Consuming archive marker {}", marker.display());
        fs::remove_file(marker)?;
        Ok(ArchiveFormat::Current)
    }

    pub fn field_names(&self) -> FieldNames {
        match self {
            ArchiveFormat::Current => FieldNames {
                title: "Title",
                style_directory: "Id",
            },
            ArchiveFormat::Historic => FieldNames {
                title: "InputName",
                style_directory: "InputID",
            },
        }
    }

    pub fn is_historic(&self) -> bool {
        matches!(self, ArchiveFormat::Historic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_consumed_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(VERSION_FILE_NAME), "1.0.0").unwrap();

        assert_eq!(ArchiveFormat::detect(dir.path()).unwrap(), ArchiveFormat::Current);
        assert!(!dir.path().join(VERSION_FILE_NAME).exists());
        assert_eq!(ArchiveFormat::detect(dir.path()).unwrap(), ArchiveFormat::Historic);
    }

    #[test]
    fn historic_archives_use_legacy_names() {
        let names = ArchiveFormat::Historic.field_names();
        assert_eq!(names.title, "InputName");
        assert_eq!(names.style_directory, "InputID");
        assert_eq!(ArchiveFormat::Current.field_names().style_directory, "Id");
    }
}
