//! # Style Archive
//!
//! Moves a scope's field styles between the style table and a directory of
//! JSON files, one file per style. The form archive codec uses it for the
//! per-form style sub-directory of an export.

use crate::error::Result;
use crate::repository::TableStyleRepository;
use common::model::style::TableStyle;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub trait StyleArchive {
    /// Writes every style of the scope into `directory` and returns it.
    fn export_styles(
        &self,
        table_name: &str,
        related_identities: &[i64],
        directory: &Path,
    ) -> Result<PathBuf>;

    /// Replaces the styles of the scope with the ones stored in `directory`.
    /// Returns the imported styles ordered by taxis.
    fn import_styles(
        &self,
        table_name: &str,
        related_identities: &[i64],
        directory: &Path,
    ) -> Result<Vec<TableStyle>>;
}

pub struct DirectoryStyleArchive<'a> {
    styles: &'a dyn TableStyleRepository,
}

impl<'a> DirectoryStyleArchive<'a> {
    pub fn new(styles: &'a dyn TableStyleRepository) -> Self {
        Self { styles }
    }
}

impl StyleArchive for DirectoryStyleArchive<'_> {
    fn export_styles(
        &self,
        table_name: &str,
        related_identities: &[i64],
        directory: &Path,
    ) -> Result<PathBuf> {
        fs::create_dir_all(directory)?;
        let styles = self
            .styles
            .get_table_styles(table_name, related_identities, &[])?;

        for (idx, style) in styles.iter().enumerate() {
            let path = directory.join(format!("{:04}.json", idx));
            fs::write(&path, serde_json::to_string_pretty(style)?)?;
        }
        info!(
            "Exported {} styles of {} {:?} to {}",
            styles.len(),
            table_name,
            related_identities,
            directory.display()
        );
        Ok(directory.to_path_buf())
    }

    fn import_styles(
        &self,
        table_name: &str,
        related_identities: &[i64],
        directory: &Path,
    ) -> Result<Vec<TableStyle>> {
        let mut files: Vec<PathBuf> = fs::read_dir(directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        let mut styles = Vec::new();
        for path in files {
            debug!("Reading style {}", path.display());
            let mut style: TableStyle = serde_json::from_str(&fs::read_to_string(&path)?)?;
            style.id = 0;
            style.table_name = table_name.to_string();
            style.related_identity = related_identities.first().copied().unwrap_or_default();
            styles.push(style);
        }
        styles.sort_by_key(|s| s.taxis);

        self.styles.delete_all_styles(table_name, related_identities)?;
        for style in styles.iter_mut() {
            style.id = self.styles.insert_style(related_identities, style)?;
        }
        info!(
            "Imported {} styles into {} {:?}",
            styles.len(),
            table_name,
            related_identities
        );
        Ok(styles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::sqlite::SqliteRepository;
    use crate::repository::TABLE_NAME_DATA;
    use common::model::style::{InputStyleItem, InputType};

    #[test]
    fn styles_move_between_scopes() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let archive = DirectoryStyleArchive::new(&repo);
        let dir = tempfile::tempdir().unwrap();

        for (taxis, name) in [(2, "Color"), (1, "Name")] {
            let style = TableStyle {
                table_name: TABLE_NAME_DATA.to_string(),
                related_identity: 1,
                attribute_name: name.to_string(),
                display_name: name.to_string(),
                taxis,
                input_type: if name == "Color" {
                    InputType::CheckBox
                } else {
                    InputType::Text
                },
                items: (name == "Color").then(|| {
                    vec![
                        InputStyleItem {
                            label: "Red".to_string(),
                            value: "red".to_string(),
                            selected: true,
                        },
                        InputStyleItem {
                            label: "Blue".to_string(),
                            value: "blue".to_string(),
                            selected: false,
                        },
                    ]
                }),
                ..Default::default()
            };
            repo.insert_style(&[1], &style).unwrap();
        }

        let out = archive
            .export_styles(TABLE_NAME_DATA, &[1], &dir.path().join("1"))
            .unwrap();
        let imported = archive.import_styles(TABLE_NAME_DATA, &[2], &out).unwrap();

        let names: Vec<&str> = imported.iter().map(|s| s.attribute_name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Color"]);
        assert!(imported.iter().all(|s| s.related_identity == 2 && s.id > 0));

        let stored = repo.get_table_styles(TABLE_NAME_DATA, &[2], &[]).unwrap();
        let items: Vec<&str> = stored[1].items().iter().map(|i| i.value.as_str()).collect();
        assert_eq!(items, vec!["red", "blue"]);
    }
}
