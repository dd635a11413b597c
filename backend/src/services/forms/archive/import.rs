use super::codec::ValueCodec;
use super::feed::{FeedDocument, FeedEntry};
use super::{ArchiveFormat, HISTORIC_ADD_DATE, HISTORIC_REPLY};
use crate::error::Result;
use crate::repository::{related_identities, TABLE_NAME_DATA};
use crate::services::forms::manager::FormManager;
use common::model::column::Record;
use common::model::convert;
use common::model::data::DataInfo;
use common::model::entity::Value;
use common::model::form::FormInfo;
use common::model::style::TableStyle;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

impl FormManager<'_> {
    /// Imports every form document found in `directory` into the site and
    /// returns the new form ids.
    ///
    /// A missing directory imports nothing. A title already used on the site
    /// is either replaced (`overwrite`) or the incoming form is renamed.
    /// Writes are not transactional: a failure leaves what was imported
    /// before it in place.
    pub fn import_form(
        &self,
        site_id: i64,
        directory: &Path,
        overwrite: bool,
    ) -> Result<Vec<i64>> {
        if !directory.is_dir() {
            debug!("Nothing to import, {} is not a directory", directory.display());
            return Ok(Vec::new());
        }
        let format = ArchiveFormat::detect(directory)?;

        let mut files: Vec<PathBuf> = fs::read_dir(directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let mut form_ids = Vec::new();
        for path in files {
            form_ids.push(self.import_document(site_id, directory, &path, format, overwrite)?);
        }
        info!(
            "Imported {} forms ({:?} archive) from {}",
            form_ids.len(),
            format,
            directory.display()
        );
        Ok(form_ids)
    }

    fn import_document(
        &self,
        site_id: i64,
        directory: &Path,
        path: &Path,
        format: ArchiveFormat,
        overwrite: bool,
    ) -> Result<i64> {
        let document = FeedDocument::parse(&fs::read_to_string(path)?)?;
        let names = format.field_names();
        let codec = ValueCodec::new(self.cipher);

        let mut form = FormInfo::default();
        codec.read_columns(&document.elements, &mut form);
        form.set_site_id(site_id);
        form.set_title(document.elements.content(names.title));

        if let Some(existing) = self.forms.get_form_info_by_title(site_id, &form.title())? {
            if overwrite {
                self.delete(site_id, existing.id())?;
            } else {
                let title = self.forms.get_import_title(site_id, &form.title())?;
                form.set_title(&title);
            }
        }

        form.set_id(0);
        let form_id = self.forms.insert_form(&form)?;
        form.set_id(form_id);

        let styles = self.import_document_styles(
            directory,
            document.elements.content(names.style_directory),
            form_id,
        )?;

        // display title -> attribute name, for historic record elements
        let titles: Vec<(&str, &str)> = if format.is_historic() {
            styles
                .iter()
                .filter(|s| !s.display_name.is_empty())
                .map(|s| (s.display_name.as_str(), s.attribute_name.as_str()))
                .collect()
        } else {
            Vec::new()
        };

        let mut entries: Vec<&FeedEntry> = document.entries.iter().collect();
        if entries.iter().all(|e| e.sequence.is_some()) {
            entries.sort_by_key(|e| e.sequence);
        } else {
            entries.reverse();
        }

        for entry in &entries {
            let data = self.decode_entry(&codec, entry, format, &titles, &styles);
            let id = self.data.insert_data(&form, &data)?;
            debug!("Imported record {} into form {}", id, form_id);
        }

        info!(
            "Imported form {} as {} ({}) with {} records",
            path.display(),
            form_id,
            form.title(),
            entries.len()
        );
        Ok(form_id)
    }

    fn import_document_styles(
        &self,
        directory: &Path,
        directory_name: &str,
        form_id: i64,
    ) -> Result<Vec<TableStyle>> {
        if directory_name.is_empty() {
            return Ok(Vec::new());
        }
        if Path::new(directory_name).file_name().and_then(|n| n.to_str()) != Some(directory_name) {
            warn!("Ignoring style directory name {:?}", directory_name);
            return Ok(Vec::new());
        }

        let style_directory = directory.join(directory_name);
        if !style_directory.is_dir() {
            return Ok(Vec::new());
        }
        self.style_archive
            .import_styles(TABLE_NAME_DATA, &related_identities(form_id), &style_directory)
    }

    fn decode_entry(
        &self,
        codec: &ValueCodec,
        entry: &FeedEntry,
        format: ArchiveFormat,
        titles: &[(&str, &str)],
        styles: &[TableStyle],
    ) -> DataInfo {
        let mut data = DataInfo::default();
        codec.read_columns(&entry.elements, &mut data);

        for (name, value) in entry.elements.iter() {
            if !DataInfo::is_table_column(name) {
                data.set(name, value);
            }
        }

        if format.is_historic() {
            for (title, attribute_name) in titles {
                if let Some(value) = data.remove(title) {
                    data.set(attribute_name, value);
                }
            }

            let reply = data.remove(HISTORIC_REPLY).map(|v| v.to_string()).unwrap_or_default();
            data.set_reply_content(&reply);
            data.set_is_replied(!reply.is_empty());

            let added = data.remove(HISTORIC_ADD_DATE).map(|v| v.to_string()).unwrap_or_default();
            data.set_created_date(convert::to_date_time(&added));
        }

        for style in styles.iter().filter(|s| s.input_type.is_multiple()) {
            if let Some(Value::String(raw)) = data.get(&style.attribute_name) {
                if let Ok(items) = serde_json::from_str::<Vec<String>>(raw) {
                    data.set(&style.attribute_name, items);
                }
            }
        }

        data
    }
}
