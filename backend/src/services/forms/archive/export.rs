use super::codec::ValueCodec;
use super::feed::{FeedDocument, FeedEntry};
use super::VERSION_FILE_NAME;
use crate::error::Result;
use crate::repository::{related_identities, TABLE_NAME_DATA};
use crate::services::forms::manager::FormManager;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

impl FormManager<'_> {
    /// Writes the form, its styles and all of its records into `directory`
    /// and returns the path of the feed document.
    ///
    /// Records are loaded in storage order (newest first) and each entry is
    /// tagged with its position in submission order.
    pub fn export_form(&self, site_id: i64, form_id: i64, directory: &Path) -> Result<PathBuf> {
        let form = self.get_form_info(site_id, form_id)?;
        fs::create_dir_all(directory)?;

        let codec = ValueCodec::new(self.cipher);
        let mut document = FeedDocument::default();
        codec.write_columns(&form, &mut document.elements)?;

        self.style_archive.export_styles(
            TABLE_NAME_DATA,
            &related_identities(form.id()),
            &directory.join(form.id().to_string()),
        )?;

        let records = self.data.get_all_data_info_list(form.id())?;
        let total = records.len();
        for (idx, data) in records.iter().enumerate() {
            let mut entry = FeedEntry {
                sequence: Some((total - 1 - idx) as u64),
                ..Default::default()
            };
            codec.write_columns(data, &mut entry.elements)?;
            for (name, value) in data.dynamic_attributes() {
                entry.elements.push(name, value.to_string());
            }
            debug!("Exported record {} of form {}", data.id(), form.id());
            document.entries.push(entry);
        }

        let path = directory.join(format!("{}.xml", form.id()));
        fs::write(&path, document.to_xml())?;
        fs::write(
            directory.join(VERSION_FILE_NAME),
            self.environment.version(),
        )?;

        info!(
            "Exported form {} ({}) with {} records to {}",
            form.id(),
            form.title(),
            total,
            path.display()
        );
        Ok(path)
    }
}
