//! Document DIDL-Lite : racine `DIDL-Lite`, déclarations de namespaces et
//! liste d'éléments de premier niveau.

use std::fmt;

use tracing::debug;
use xmltree::Element as XmlElement;

use crate::codec;
use crate::context::{DeserializationContext, NamespaceTable, SerializationContext};
use crate::element::DidlElement;
use crate::errors::{DidlError, Result};
use crate::objects::UpnpObject;
use crate::property::FieldRef;
use crate::registry::ElementRegistry;
use crate::utils::{child_elements, local_part, qualified_name};

pub const ROOT_ELEMENT: &str = "DIDL-Lite";

/// Préfixes réservés par XML, jamais recopiés dans la table.
const RESERVED_PREFIXES: [&str; 2] = ["xml", "xmlns"];

/// Document DIDL-Lite.
#[derive(Debug, Clone, Default)]
pub struct DidlLiteDocument {
    pub namespaces: NamespaceTable,
    pub elements: Vec<Box<dyn DidlElement>>,
}

impl DidlLiteDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<E: DidlElement>(&mut self, element: E) {
        self.elements.push(Box::new(element));
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Objets `item` et `container` du document.
    pub fn objects(&self) -> impl Iterator<Item = &UpnpObject> {
        self.elements
            .iter()
            .filter_map(|e| e.as_any().downcast_ref::<UpnpObject>())
    }

    pub fn get_object_by_id(&self, id: &str) -> Option<&UpnpObject> {
        self.objects().find(|o| o.id == id)
    }

    /// Construit l'arbre XML du document. La table de namespaces du document
    /// est utilisée, ou celle du contexte si elle est vide.
    pub fn serialize_to_node(&self, ctx: &SerializationContext) -> Result<XmlElement> {
        let mut root = XmlElement::new(ROOT_ELEMENT);
        let namespaces = if self.namespaces.is_empty() {
            ctx.namespaces()
        } else {
            &self.namespaces
        };
        for (prefix, uri) in namespaces.iter() {
            root.attributes
                .insert(NamespaceTable::attribute_name(prefix), uri.to_string());
        }

        for element in &self.elements {
            codec::serialize(element.as_ref(), &mut root, ctx)?;
        }
        debug!(elements = self.elements.len(), version = ctx.version(), "DIDL-Lite document serialized");
        Ok(root)
    }

    /// Texte XML complet, avec déclaration.
    pub fn to_xml_string(&self, ctx: &SerializationContext) -> Result<String> {
        let root = self.serialize_to_node(ctx)?;
        codec::write_node(&root, true)
    }

    /// Analyse un document et construit ses éléments à l'aide du registre.
    pub fn parse(xml: &str, registry: &ElementRegistry, ctx: &DeserializationContext) -> Result<Self> {
        let root = XmlElement::parse(xml.as_bytes())?;
        Self::from_node(&root, registry, ctx)
    }

    /// Construit un document depuis sa racine déjà analysée.
    ///
    /// Les enfants dont le type est inconnu du registre sont ignorés ; un
    /// enfant reconnu qui ne se désérialise pas fait échouer le document.
    pub fn from_node(root: &XmlElement, registry: &ElementRegistry, ctx: &DeserializationContext) -> Result<Self> {
        let root_name = qualified_name(root);
        if local_part(&root_name) != ROOT_ELEMENT {
            return Err(DidlError::UnexpectedElement {
                expected: ROOT_ELEMENT.to_string(),
                found: root_name,
            });
        }

        let mut document = Self {
            namespaces: read_namespaces(root),
            elements: Vec::new(),
        };

        for child in child_elements(root) {
            let Some(mut element) = registry.resolve_node(child, ctx.lenient_names()) else {
                debug!(element = %qualified_name(child), "Unknown DIDL-Lite element skipped");
                continue;
            };
            codec::deserialize_into(child, element.as_mut(), ctx)?;
            document.elements.push(element);
        }

        debug!(elements = document.elements.len(), "DIDL-Lite document parsed");
        Ok(document)
    }

    /// Résumé Markdown des propriétés valides de chaque élément.
    pub fn to_markdown(&self) -> String {
        let mut buf = String::new();
        buf.push_str("### DIDL-Lite Document\n\n");
        for element in &self.elements {
            write_markdown(&mut buf, element.as_ref(), 0);
            buf.push('\n');
        }
        buf
    }
}

/// Namespaces déclarés sur la racine analysée.
fn read_namespaces(root: &XmlElement) -> NamespaceTable {
    let mut table = NamespaceTable::empty();
    if let Some(namespaces) = &root.namespaces {
        for (prefix, uri) in &namespaces.0 {
            if uri.is_empty() || RESERVED_PREFIXES.contains(&prefix.as_str()) {
                continue;
            }
            table.insert(prefix.clone(), uri.clone());
        }
    }
    for (name, uri) in &root.attributes {
        if name == "xmlns" {
            table.insert("", uri.clone());
        } else if let Some(prefix) = name.strip_prefix("xmlns:") {
            table.insert(prefix, uri.clone());
        }
    }
    table
}

fn write_markdown(buf: &mut String, element: &dyn DidlElement, depth: usize) {
    let indent = "  ".repeat(depth);
    let title = element
        .property_index("dc:title")
        .and_then(|i| element.read_property(i))
        .and_then(|value| value.text());
    match title {
        Some(title) => buf.push_str(&format!("{}- **{}**: {}\n", indent, element.element_name(), title)),
        None => buf.push_str(&format!("{}- **{}**\n", indent, element.element_name())),
    }

    for index in 0..element.property_count() {
        let Some(binding) = element.binding_at(index) else {
            continue;
        };
        if !binding.is_valid() || binding.key() == "dc:title" {
            continue;
        }
        let label = if binding.is_text() { "text" } else { binding.key() };
        match element.read_property(index) {
            Some(FieldRef::Scalars(values)) => {
                let texts: Vec<String> = values.iter().map(|v| v.to_text()).collect();
                buf.push_str(&format!("{}  - {}: `{}`\n", indent, label, texts.join("`, `")));
            }
            Some(FieldRef::Elements(items)) => {
                for item in items {
                    write_markdown(buf, item, depth + 1);
                }
            }
            None => {}
        }
    }
}

impl fmt::Display for DidlLiteDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::default_registry;
    use crate::objects::ObjectKind;

    #[test]
    fn test_namespaces_on_root() {
        let doc = DidlLiteDocument::new();
        let root = doc.serialize_to_node(&SerializationContext::default()).unwrap();
        assert_eq!(root.name, ROOT_ELEMENT);
        assert_eq!(
            root.attributes.get("xmlns:dc").map(String::as_str),
            Some(crate::config::DC_NAMESPACE)
        );
        assert_eq!(
            root.attributes.get("xmlns").map(String::as_str),
            Some(crate::config::DIDL_LITE_NAMESPACE)
        );
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let registry = default_registry();
        let err = DidlLiteDocument::parse("<root/>", &registry, &DeserializationContext::default()).unwrap_err();
        assert!(matches!(err, DidlError::UnexpectedElement { .. }));
    }

    #[test]
    fn test_markdown_summary() {
        let mut doc = DidlLiteDocument::new();
        doc.push(UpnpObject::create(ObjectKind::MusicAlbum, "10", "0", "Blue Train"));
        let md = doc.to_markdown();
        assert!(md.contains("- **container**: Blue Train"));
        assert!(md.contains("@id: `10`"));
        assert!(md.contains("object.container.album.musicAlbum"));
        assert_eq!(doc.get_object_by_id("10").map(|o| o.title.as_str()), Some("Blue Train"));
    }
}
