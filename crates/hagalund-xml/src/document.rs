#![forbid(unsafe_code)]

//! XML document wrapper over roxmltree with ID attribute registration.

use hagalund_core::ns::DEFAULT_ID_ATTRS;
use hagalund_core::Error;
use std::collections::HashMap;

/// An owned XML document.  Stores the text and pre-computed metadata.
///
/// To work with the parsed tree, call [`XmlDocument::parse_doc`] which
/// returns a temporary `roxmltree::Document` borrowing from the text.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    text: String,
    /// Additional ID attribute names to register (beyond the default `Id`, `ID`, `id`).
    extra_id_attrs: Vec<String>,
}

impl XmlDocument {
    /// Parse and validate XML from a string, taking ownership.
    pub fn parse(text: String) -> Result<Self, Error> {
        // Validate that the XML parses successfully.
        let _doc = roxmltree::Document::parse_with_options(&text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        Ok(Self {
            text,
            extra_id_attrs: Vec::new(),
        })
    }

    /// Parse and validate XML from bytes.
    pub fn parse_bytes(data: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {e}")))?
            .to_owned();
        Self::parse(text)
    }

    /// Get the raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Register additional ID attribute names (e.g., `"AssertionID"`).
    pub fn add_id_attr(&mut self, name: &str) {
        self.extra_id_attrs.push(name.to_owned());
    }

    /// All attribute names treated as IDs, defaults first.
    pub fn id_attrs(&self) -> impl Iterator<Item = &str> {
        DEFAULT_ID_ATTRS
            .iter()
            .copied()
            .chain(self.extra_id_attrs.iter().map(String::as_str))
    }

    /// Parse the document and return a temporary `roxmltree::Document`.
    ///
    /// This re-parses the XML from the stored text.  Call it once per
    /// resolution and pass the resulting document down.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>, Error> {
        roxmltree::Document::parse_with_options(&self.text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))
    }

    /// Build the ID → NodeId mapping for a parsed document.
    ///
    /// When an ID value occurs more than once the first element in document
    /// order wins; use [`XmlDocument::count_id`] to detect that case.
    pub fn build_id_map<'a>(
        &self,
        doc: &'a roxmltree::Document<'a>,
    ) -> HashMap<String, roxmltree::NodeId> {
        let mut map = HashMap::new();
        for node in doc.descendants().filter(|n| n.is_element()) {
            for attr_name in self.id_attrs() {
                if let Some(val) = node.attribute(attr_name) {
                    map.entry(val.to_owned()).or_insert(node.id());
                }
            }
        }
        map
    }

    /// Count the elements carrying `id` in any registered ID attribute.
    pub fn count_id(&self, doc: &roxmltree::Document<'_>, id: &str) -> usize {
        doc.descendants()
            .filter(|n| n.is_element())
            .filter(|n| self.id_attrs().any(|attr| n.attribute(attr) == Some(id)))
            .count()
    }

    /// Find an element by its registered ID value in a parsed document.
    pub fn find_by_id<'a>(
        doc: &'a roxmltree::Document<'a>,
        id_map: &HashMap<String, roxmltree::NodeId>,
        id: &str,
    ) -> Option<roxmltree::Node<'a, 'a>> {
        let node_id = id_map.get(id)?;
        doc.get_node(*node_id)
    }

    /// Find all descendant elements with the given local name and namespace.
    pub fn find_elements<'a>(
        doc: &'a roxmltree::Document<'a>,
        ns: &str,
        local_name: &str,
    ) -> Vec<roxmltree::Node<'a, 'a>> {
        doc.descendants()
            .filter(|n| {
                n.is_element()
                    && n.tag_name().name() == local_name
                    && n.tag_name().namespace().unwrap_or("") == ns
            })
            .collect()
    }
}
