#![allow(dead_code)]

use backend::config::Settings;
use backend::repository::sqlite::SqliteRepository;
use backend::services::forms::archive::cipher::ArchiveCipher;
use backend::services::forms::manager::FormManager;
use backend::services::styles::DirectoryStyleArchive;
use common::model::form::FormInfo;
use common::model::style::{InputStyleItem, InputType, TableStyle};
use backend::repository::{FormRepository, TABLE_NAME_DATA};

pub const SECRET: &str = "integration-secret";

/// One installation: a store, its settings and the archive key.
pub struct Installation {
    pub repository: SqliteRepository,
    pub settings: Settings,
    pub cipher: ArchiveCipher,
}

impl Installation {
    pub fn new() -> Self {
        Self {
            repository: SqliteRepository::open_in_memory().unwrap(),
            settings: Settings {
                plugin_version: "2.1.0".to_string(),
                ..Default::default()
            },
            cipher: ArchiveCipher::new(SECRET).unwrap(),
        }
    }

    pub fn run<T>(&self, f: impl FnOnce(&FormManager<'_>) -> T) -> T {
        let archive = DirectoryStyleArchive::new(&self.repository);
        let manager = FormManager::new(
            &self.repository,
            &self.repository,
            &self.repository,
            &archive,
            &self.settings,
            &self.cipher,
        );
        f(&manager)
    }

    /// Inserts a form and returns it with its id set.
    pub fn create_form(&self, site_id: i64, title: &str) -> FormInfo {
        let mut form = FormInfo::new(site_id, title);
        form.set_id(self.repository.insert_form(&form).unwrap());
        self.repository
            .get_form_info(site_id, form.id())
            .unwrap()
            .unwrap()
    }
}

pub fn colors_style(form_id: i64) -> TableStyle {
    TableStyle {
        table_name: TABLE_NAME_DATA.to_string(),
        related_identity: form_id,
        attribute_name: "Colors".to_string(),
        display_name: "Favourite colors".to_string(),
        taxis: 10,
        input_type: InputType::CheckBox,
        items: Some(vec![
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
        ]),
        ..Default::default()
    }
}

pub fn values(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
