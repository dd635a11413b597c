//! # Template Asset Manager
//!
//! Template bundles are directories below the templates directory of the web
//! root. Each holds a `config.json` describing the bundle and the main HTML
//! file it names. A bundle published by the platform itself is protected: the
//! editor receives its HTML but not its metadata.

use super::cache::TemplateCache;
use crate::config::PluginEnvironment;
use crate::error::{FormError, Result};
use common::model::template::{TemplateInfo, TemplateView};
use log::info;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
const MAIL_TEMPLATE_FILE_NAME: &str = "template.html";
const MAIL_LIST_FILE_NAME: &str = "list.html";

pub struct TemplateManager<'a> {
    environment: &'a dyn PluginEnvironment,
    cache: &'a TemplateCache,
    system_publisher: &'a str,
}

impl<'a> TemplateManager<'a> {
    pub fn new(
        environment: &'a dyn PluginEnvironment,
        cache: &'a TemplateCache,
        system_publisher: &'a str,
    ) -> Self {
        Self {
            environment,
            cache,
            system_publisher,
        }
    }

    fn directory(&self, name: &str) -> PathBuf {
        self.environment.templates_directory().join(name)
    }

    /// Bundles whose type matches `template_type` (case-insensitive), by name.
    pub fn list(&self, template_type: &str) -> Result<Vec<TemplateInfo>> {
        let root = self.environment.templates_directory();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        let mut templates = Vec::new();
        for name in names {
            let Some(info) = self.read_info(&name)? else {
                continue;
            };
            if info.template_type.eq_ignore_ascii_case(template_type) {
                templates.push(info);
            }
        }
        Ok(templates)
    }

    pub fn get(&self, name: &str) -> Result<TemplateInfo> {
        validate_name(name)?;
        self.read_info(name)?
            .ok_or_else(|| FormError::NotFound(format!("Template {}", name)))
    }

    /// What the editor shows for `name`.
    pub fn get_for_edit(&self, name: &str) -> Result<TemplateView> {
        let info = self.get(name)?;
        let template_html = self.get_template_html(&info)?;
        let is_system = self.is_system(&info);

        Ok(TemplateView {
            template_info: if is_system {
                TemplateInfo::default()
            } else {
                info
            },
            template_html,
            is_system,
        })
    }

    pub fn is_system(&self, info: &TemplateInfo) -> bool {
        info.publisher == self.system_publisher
    }

    pub fn get_template_html(&self, info: &TemplateInfo) -> Result<String> {
        let path = self.html_path(info)?;
        if !path.is_file() {
            return Err(FormError::NotFound(format!(
                "Main file of template {}",
                info.name
            )));
        }
        self.cache.read(&path)
    }

    pub fn set_template_html(&self, info: &TemplateInfo, html: &str) -> Result<()> {
        let path = self.html_path(info)?;
        fs::write(&path, html)?;
        self.cache.invalidate(&path);
        Ok(())
    }

    /// Copies bundle `original_name` to `info.name` and writes `info` as the
    /// copy's config. The copy keeps the original's main file unless `info`
    /// names one, and is never a system bundle.
    pub fn clone_template(
        &self,
        original_name: &str,
        mut info: TemplateInfo,
        template_html: Option<&str>,
    ) -> Result<TemplateInfo> {
        let original = self.get(original_name)?;
        validate_name(&info.name)?;

        let target = self.directory(&info.name);
        if target.exists() {
            return Err(FormError::Validation(format!(
                "Template {} already exists",
                info.name
            )));
        }

        fs::create_dir_all(&target)?;
        let options = fs_extra::dir::CopyOptions::new().content_only(true);
        fs_extra::dir::copy(self.directory(original_name), &target, &options)?;

        if info.main.is_empty() {
            info.main = original.main;
        }
        if info.publisher == self.system_publisher {
            info.publisher = String::new();
        }
        self.write_info(&info)?;

        if let Some(html) = template_html {
            self.set_template_html(&info, html)?;
        }
        info!("Cloned template {} to {}", original_name, info.name);
        Ok(info)
    }

    /// Rewrites the config of bundle `original_name`, renaming the bundle
    /// directory first when the name changes.
    pub fn edit(
        &self,
        original_name: &str,
        name: &str,
        template_type: &str,
        description: &str,
    ) -> Result<TemplateInfo> {
        let mut info = self.get(original_name)?;
        validate_name(name)?;

        if name != original_name {
            let target = self.directory(name);
            if target.exists() {
                return Err(FormError::Validation(format!(
                    "Template {} already exists",
                    name
                )));
            }
            let source = self.directory(original_name);
            fs::rename(&source, &target)?;
            self.cache.invalidate(&source);
        }

        info.name = name.to_string();
        info.template_type = template_type.to_string();
        info.description = description.to_string();
        self.write_info(&info)?;
        info!("Edited template {}", name);
        Ok(info)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }
        validate_name(name)?;

        let directory = self.directory(name);
        if directory.is_dir() {
            fs::remove_dir_all(&directory)?;
            self.cache.invalidate(&directory);
            info!("Deleted template {}", name);
        }
        Ok(())
    }

    /// Frame of the notification mail.
    pub fn get_mail_template_html(&self) -> Result<String> {
        self.cache
            .read(&self.environment.mail_directory().join(MAIL_TEMPLATE_FILE_NAME))
    }

    /// Row layout repeated for each field of the notification mail.
    pub fn get_mail_list_html(&self) -> Result<String> {
        self.cache
            .read(&self.environment.mail_directory().join(MAIL_LIST_FILE_NAME))
    }

    fn read_info(&self, name: &str) -> Result<Option<TemplateInfo>> {
        let path = self.directory(name).join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let mut info: TemplateInfo = serde_json::from_str(&fs::read_to_string(path)?)?;
        info.name = name.to_string();
        Ok(Some(info))
    }

    fn write_info(&self, info: &TemplateInfo) -> Result<()> {
        let path = self.directory(&info.name).join(CONFIG_FILE_NAME);
        fs::write(path, serde_json::to_string_pretty(info)?)?;
        Ok(())
    }

    fn html_path(&self, info: &TemplateInfo) -> Result<PathBuf> {
        let file_name = Path::new(&info.main).file_name().and_then(|n| n.to_str());
        if info.main.is_empty() || file_name != Some(info.main.as_str()) {
            return Err(FormError::Validation(format!(
                "Template {} has no valid main file",
                info.name
            )));
        }
        Ok(self.directory(&info.name).join(&info.main))
    }
}

/// Template names become directory names: letters, digits, `-` and `_` only.
pub fn validate_name(name: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z0-9_-]+$").map_err(|e| FormError::Validation(e.to_string()))?;
    if re.is_match(name) {
        Ok(())
    } else {
        Err(FormError::Validation(format!(
            "Invalid template name: {:?}",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn settings(root: &Path) -> Settings {
        Settings {
            web_root_path: root.to_path_buf(),
            ..Default::default()
        }
    }

    fn write_bundle(settings: &Settings, name: &str, template_type: &str, publisher: &str) {
        let dir = settings.templates_directory().join(name);
        fs::create_dir_all(&dir).unwrap();
        let info = TemplateInfo {
            name: name.to_string(),
            template_type: template_type.to_string(),
            description: format!("{} template", name),
            main: "index.html".to_string(),
            publisher: publisher.to_string(),
            icon: String::new(),
        };
        fs::write(dir.join(CONFIG_FILE_NAME), serde_json::to_string(&info).unwrap()).unwrap();
        fs::write(dir.join("index.html"), format!("<form>{}</form>", name)).unwrap();
        fs::write(dir.join("style.css"), "form {}").unwrap();
    }

    #[test]
    fn names_are_restricted() {
        assert!(validate_name("contact-us_2").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("../etc").is_err());
        assert!(validate_name("a b").is_err());
    }

    #[test]
    fn list_filters_by_type() {
        let root = tempfile::tempdir().unwrap();
        let settings = settings(root.path());
        write_bundle(&settings, "b", "submit", "");
        write_bundle(&settings, "a", "Submit", "sscms");
        write_bundle(&settings, "c", "list", "");
        fs::create_dir_all(settings.templates_directory().join("no-config")).unwrap();

        let cache = TemplateCache::new();
        let manager = TemplateManager::new(&settings, &cache, &settings.system_publisher);
        let names: Vec<String> = manager
            .list("submit")
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn system_bundles_hide_metadata() {
        let root = tempfile::tempdir().unwrap();
        let settings = settings(root.path());
        write_bundle(&settings, "default", "submit", "sscms");
        write_bundle(&settings, "mine", "submit", "me");

        let cache = TemplateCache::new();
        let manager = TemplateManager::new(&settings, &cache, &settings.system_publisher);

        let view = manager.get_for_edit("default").unwrap();
        assert!(view.is_system);
        assert_eq!(view.template_info, TemplateInfo::default());
        assert_eq!(view.template_html, "<form>default</form>");

        let view = manager.get_for_edit("mine").unwrap();
        assert!(!view.is_system);
        assert_eq!(view.template_info.publisher, "me");
    }

    #[test]
    fn clone_edit_and_delete() {
        let root = tempfile::tempdir().unwrap();
        let settings = settings(root.path());
        write_bundle(&settings, "default", "submit", "sscms");

        let cache = TemplateCache::new();
        let manager = TemplateManager::new(&settings, &cache, &settings.system_publisher);

        let info = TemplateInfo {
            name: "custom".to_string(),
            template_type: "submit".to_string(),
            description: "Custom".to_string(),
            publisher: "sscms".to_string(),
            ..Default::default()
        };
        let cloned = manager
            .clone_template("default", info, Some("<form>custom</form>"))
            .unwrap();
        assert_eq!(cloned.main, "index.html");
        assert!(cloned.publisher.is_empty());
        assert!(settings.templates_directory().join("custom/style.css").is_file());
        assert_eq!(
            manager.get_template_html(&cloned).unwrap(),
            "<form>custom</form>"
        );
        assert_eq!(
            manager.get_template_html(&manager.get("default").unwrap()).unwrap(),
            "<form>default</form>"
        );

        let again = TemplateInfo {
            name: "custom".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            manager.clone_template("default", again, None),
            Err(FormError::Validation(_))
        ));

        let edited = manager.edit("custom", "renamed", "list", "Renamed").unwrap();
        assert_eq!(edited.description, "Renamed");
        assert!(manager.get("custom").is_err());
        assert_eq!(manager.list("list").unwrap(), vec![edited.clone()]);
        assert_eq!(
            manager.get_template_html(&edited).unwrap(),
            "<form>custom</form>"
        );

        manager.delete("renamed").unwrap();
        assert!(matches!(manager.get("renamed"), Err(FormError::NotFound(_))));
        manager.delete("").unwrap();
    }

    #[test]
    fn mail_templates_are_read_through_the_cache() {
        let root = tempfile::tempdir().unwrap();
        let settings = settings(root.path());
        let mail = settings.mail_directory();
        fs::create_dir_all(&mail).unwrap();
        fs::write(mail.join("template.html"), "<h1>{{title}}</h1>{{list}}").unwrap();
        fs::write(mail.join("list.html"), "<li>{{key}}: {{value}}</li>").unwrap();

        let cache = TemplateCache::new();
        let manager = TemplateManager::new(&settings, &cache, &settings.system_publisher);
        assert!(manager.get_mail_template_html().unwrap().contains("{{list}}"));
        assert!(manager.get_mail_list_html().unwrap().contains("{{value}}"));
        assert_eq!(cache.len(), 2);
    }
}
