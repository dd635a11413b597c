//! # Feed Document
//!
//! Reads and writes the Atom 0.3 document an archive stores per form. Only the
//! scoped elements (local name starting with [`PREFIX`]) and the per-entry
//! `sequence` element carry data; titles, authors and timestamps are fixed
//! boilerplate and ignored on read.
//!
//! Writing escapes every value. Reading accepts both escaped text and CDATA
//! sections, the latter being what historic archives contain.

use super::PREFIX;
use crate::error::Result;
use chrono::Local;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

const ENTRY: &str = "entry";
const SEQUENCE: &str = "sequence";

/// Scoped elements in document order, keyed by attribute name (prefix removed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopedElements {
    elements: Vec<(String, String)>,
}

impl ScopedElements {
    /// Value of the first element named `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get) but empty when absent.
    pub fn content(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Adds an element. Empty values are never written.
    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.elements.push((name.to_string(), value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.elements.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// One record of the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    /// Position in submission order, 0 being the oldest. Absent in archives
    /// written before sequences were recorded.
    pub sequence: Option<u64>,
    pub elements: ScopedElements,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedDocument {
    pub elements: ScopedElements,
    pub entries: Vec<FeedEntry>,
}

impl FeedDocument {
    pub fn to_xml(&self) -> String {
        let modified = Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string();

        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str(
            "<feed version=\"0.3\" xmlns=\"http://purl.org/atom/ns#\" \
             xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n",
        );
        xml.push_str("  <title>siteserver channel</title>\n");
        xml.push_str("  <author>\n");
        xml.push_str("    <name>siteserver</name>\n");
        xml.push_str("    <url>https://sscms.com</url>\n");
        xml.push_str("  </author>\n");
        xml.push_str(&format!("  <modified>{}</modified>\n", modified));
        write_elements(&mut xml, &self.elements, "  ");

        for entry in &self.entries {
            xml.push_str("  <entry>\n");
            xml.push_str("    <id>https://sscms.com/</id>\n");
            xml.push_str("    <title>title</title>\n");
            xml.push_str(&format!("    <modified>{}</modified>\n", modified));
            xml.push_str(&format!("    <issued>{}</issued>\n", modified));
            if let Some(sequence) = entry.sequence {
                xml.push_str(&format!("    <{0}>{1}</{0}>\n", SEQUENCE, sequence));
            }
            write_elements(&mut xml, &entry.elements, "    ");
            xml.push_str("  </entry>\n");
        }

        xml.push_str("</feed>\n");
        xml
    }

    /// Parses a document. Elements whose local name lacks the prefix are
    /// skipped, whatever namespace prefix they carry.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut document = FeedDocument::default();

        // local names of the currently open elements
        let mut path: Vec<String> = Vec::new();
        let mut entry: Option<FeedEntry> = None;
        let mut text: Option<String> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if path.len() == 1 && name == ENTRY {
                        entry = Some(FeedEntry::default());
                    }
                    path.push(name);
                    text = Some(String::new());
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if path.len() == 1 && name == ENTRY {
                        document.entries.push(FeedEntry::default());
                    }
                }
                Event::Text(e) => {
                    if let Some(buffer) = text.as_mut() {
                        buffer.push_str(&e.unescape().map_err(quick_xml::Error::from)?);
                    }
                }
                Event::CData(e) => {
                    if let Some(buffer) = text.as_mut() {
                        buffer.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(_) => {
                    let name = path.pop().unwrap_or_default();
                    let value = text.take().unwrap_or_default();
                    match path.len() {
                        1 if name == ENTRY => {
                            if let Some(done) = entry.take() {
                                document.entries.push(done);
                            }
                        }
                        1 => collect(&mut document.elements, &name, value),
                        2 if path[1] == ENTRY => {
                            if let Some(current) = entry.as_mut() {
                                if name == SEQUENCE {
                                    current.sequence = value.trim().parse().ok();
                                } else {
                                    collect(&mut current.elements, &name, value);
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(document)
    }
}

fn collect(elements: &mut ScopedElements, local_name: &str, value: String) {
    if let Some(name) = local_name.strip_prefix(PREFIX) {
        elements.push(name, value);
    }
}

fn write_elements(xml: &mut String, elements: &ScopedElements, indent: &str) {
    for (name, value) in elements.iter() {
        xml.push_str(&format!(
            "{indent}<dc:{PREFIX}{name}>{}</dc:{PREFIX}{name}>\n",
            escape(value)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_survives_write_and_read() {
        let mut document = FeedDocument::default();
        document.elements.push("Title", "Contact <us> & \"friends\"");
        document.elements.push("Description", "");

        let mut entry = FeedEntry {
            sequence: Some(3),
            ..Default::default()
        };
        entry.elements.push("Name", "]]> inside");
        document.entries.push(entry);

        let parsed = FeedDocument::parse(&document.to_xml()).unwrap();
        assert_eq!(parsed.elements.get("title"), Some("Contact <us> & \"friends\""));
        assert_eq!(parsed.elements.get("Description"), None);
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].sequence, Some(3));
        assert_eq!(parsed.entries[0].elements.content("Name"), "]]> inside");
    }

    #[test]
    fn historic_cdata_documents_are_read() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed version="0.3" xmlns="http://purl.org/atom/ns#" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <title>siteserver channel</title>
  <dc:SiteServer_InputName><![CDATA[Old form]]></dc:SiteServer_InputName>
  <dc:SiteServer_InputID><![CDATA[12]]></dc:SiteServer_InputID>
  <entry>
    <title>title</title>
    <dc:SiteServer_Reply><![CDATA[Thanks]]></dc:SiteServer_Reply>
    <dc:SiteServer_adddate><![CDATA[2015/6/1 10:00:00]]></dc:SiteServer_adddate>
  </entry>
  <entry>
    <title>title</title>
    <dc:SiteServer_Email><![CDATA[a@b.c]]></dc:SiteServer_Email>
  </entry>
</feed>"#;

        let document = FeedDocument::parse(xml).unwrap();
        assert_eq!(document.elements.content("InputName"), "Old form");
        assert_eq!(document.elements.content("InputID"), "12");
        assert_eq!(document.elements.len(), 2);
        assert_eq!(document.entries.len(), 2);
        assert!(document.entries.iter().all(|e| e.sequence.is_none()));
        assert_eq!(document.entries[0].elements.content("Reply"), "Thanks");
        assert_eq!(document.entries[1].elements.content("email"), "a@b.c");
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(FeedDocument::parse("<feed><entry></feed>").is_err());
    }
}
