//! Sérialisation et désérialisation génériques des éléments.
//!
//! Le codec parcourt les liaisons d'un élément dans l'ordre de déclaration
//! et lit ou écrit l'arbre XML correspondant. Les règles d'extension de
//! l'élément (`serialize_extra` / `deserialize_extra`) sont appliquées après
//! les liaisons.
//!
//! Une propriété obligatoire en échec fait échouer tout l'élément ; un échec
//! d'élément imbriqué sur une propriété optionnelle est ignoré et la
//! propriété reste invalide. Une valeur illisible ou une multiplicité
//! inattendue est toujours fatale.

use tracing::{debug, trace, warn};
use xmltree::{Element as XmlElement, XMLNode};

use crate::context::{DeserializationContext, SerializationContext};
use crate::element::DidlElement;
use crate::errors::{DidlError, Result};
use crate::property::{Cardinality, FieldRef, PropertyBinding};
use crate::registry::ElementRegistry;
use crate::utils::{find_attribute, matching_children, names_match, node_text, qualified_name, text_element};
use crate::value::PropertyKind;

/// Résultat de la sérialisation d'une propriété, appliqué au nœud seulement
/// en cas de succès.
enum PropertyOutput {
    Attribute(String, String),
    Text(String),
    Children(Vec<XmlElement>),
}

impl PropertyOutput {
    fn apply(self, node: &mut XmlElement) {
        match self {
            PropertyOutput::Attribute(name, value) => {
                node.attributes.insert(name, value);
            }
            PropertyOutput::Text(text) => node.children.push(XMLNode::Text(text)),
            PropertyOutput::Children(children) => node
                .children
                .extend(children.into_iter().map(XMLNode::Element)),
        }
    }
}

/// Sérialise `element` et l'ajoute comme enfant de `parent`.
///
/// En cas d'erreur, `parent` n'est pas modifié.
pub fn serialize(element: &dyn DidlElement, parent: &mut XmlElement, ctx: &SerializationContext) -> Result<()> {
    let node = serialize_to_node(element, ctx)?;
    parent.children.push(XMLNode::Element(node));
    Ok(())
}

/// Sérialise `element` dans un nouveau nœud XML.
pub fn serialize_to_node(element: &dyn DidlElement, ctx: &SerializationContext) -> Result<XmlElement> {
    let element_name = element.element_name();
    let mut node = XmlElement::new(element_name);

    for index in 0..element.property_count() {
        let Some(binding) = element.binding_at(index) else {
            continue;
        };
        binding.validate(element_name)?;

        let required = binding.is_required(ctx.version());
        if !binding.is_valid() {
            if required {
                return Err(DidlError::missing(element_name, binding.key()));
            }
            continue;
        }

        if ctx.version() < binding.min_version() {
            trace!(
                element = %element_name,
                property = %binding.key(),
                version = ctx.version(),
                "Property skipped for this protocol version"
            );
            continue;
        }

        if !required && !ctx.filter().allows(element_name, binding) {
            continue;
        }

        let Some(value) = element.read_property(index) else {
            continue;
        };

        match serialize_property(element_name, binding, value, ctx) {
            Ok(output) => output.apply(&mut node),
            Err(err) if required || matches!(err, DidlError::InvalidBinding { .. }) => return Err(err),
            Err(err) => {
                debug!(
                    element = %element_name,
                    property = %binding.key(),
                    error = %err,
                    "Optional property not serialized"
                );
            }
        }
    }

    element.serialize_extra(&mut node, ctx)?;
    Ok(node)
}

fn serialize_property(
    element_name: &str,
    binding: &PropertyBinding,
    value: FieldRef<'_>,
    ctx: &SerializationContext,
) -> Result<PropertyOutput> {
    match value {
        FieldRef::Scalars(values) => {
            let mut texts: Vec<String> = values.iter().map(|v| v.to_text()).collect();
            if binding.is_attribute() || binding.is_text() {
                if texts.len() > 1 {
                    return Err(DidlError::multiplicity(element_name, binding.key(), texts.len()));
                }
                let text = texts.pop().unwrap_or_default();
                return Ok(if binding.is_attribute() {
                    PropertyOutput::Attribute(binding.name().to_string(), text)
                } else {
                    PropertyOutput::Text(text)
                });
            }
            if binding.cardinality() == Cardinality::Single && texts.len() > 1 {
                return Err(DidlError::multiplicity(element_name, binding.key(), texts.len()));
            }
            Ok(PropertyOutput::Children(
                texts
                    .iter()
                    .map(|text| text_element(binding.name(), text))
                    .collect(),
            ))
        }
        FieldRef::Elements(items) => {
            if binding.cardinality() == Cardinality::Single && items.len() > 1 {
                return Err(DidlError::multiplicity(element_name, binding.key(), items.len()));
            }
            let children = items
                .into_iter()
                .map(|item| serialize_to_node(item, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(PropertyOutput::Children(children))
        }
    }
}

/// Résout le type de `node` dans le registre puis le désérialise.
pub fn deserialize(
    node: &XmlElement,
    registry: &ElementRegistry,
    ctx: &DeserializationContext,
) -> Result<Box<dyn DidlElement>> {
    let mut element = registry
        .resolve_node(node, ctx.lenient_names())
        .ok_or_else(|| DidlError::UnknownType(qualified_name(node)))?;
    deserialize_into(node, element.as_mut(), ctx)?;
    Ok(element)
}

/// Désérialise `node` dans un élément existant.
///
/// En cas d'erreur, l'élément retrouve son état d'avant l'appel.
pub fn deserialize_into(node: &XmlElement, element: &mut dyn DidlElement, ctx: &DeserializationContext) -> Result<()> {
    let snapshot = element.clone_element();
    let result = deserialize_bindings(node, element, ctx);
    if result.is_err() && !element.assign_from(snapshot.as_any()) {
        warn!(element = %element.element_name(), "Element state not restored after failure");
    }
    result
}

fn deserialize_bindings(node: &XmlElement, element: &mut dyn DidlElement, ctx: &DeserializationContext) -> Result<()> {
    let element_name = element.element_name().to_string();
    let node_name = qualified_name(node);
    if !element_name.is_empty() && !names_match(&node_name, &element_name, ctx.lenient_names()) {
        return Err(DidlError::UnexpectedElement {
            expected: element_name,
            found: node_name,
        });
    }

    for index in 0..element.property_count() {
        let Some(binding) = element.binding_at(index).cloned() else {
            continue;
        };
        binding.validate(&element_name)?;

        if let Some(b) = element.binding_at_mut(index) {
            b.set_valid(false);
        }

        if ctx.version() < binding.min_version() {
            trace!(
                element = %element_name,
                property = %binding.key(),
                version = ctx.version(),
                "Property ignored for this protocol version"
            );
            continue;
        }

        let required = binding.is_required(ctx.version());
        let present = if binding.is_attribute() {
            read_attribute(node, element, index, &binding, ctx)?
        } else if binding.is_text() {
            read_text(node, element, index)?
        } else if binding.kind() == PropertyKind::Element {
            let children = children_for(node, &binding, &element_name, ctx)?;
            if children.is_empty() {
                false
            } else {
                match element.deserialize_property_elements(index, &children, ctx) {
                    Ok(()) => true,
                    Err(err) if required || matches!(err, DidlError::InvalidBinding { .. }) => {
                        return Err(err);
                    }
                    Err(err) => {
                        debug!(
                            element = %element_name,
                            property = %binding.key(),
                            error = %err,
                            "Optional property not deserialized"
                        );
                        continue;
                    }
                }
            }
        } else {
            read_child_scalars(node, element, index, &binding, &element_name, ctx)?
        };

        if !present {
            if required {
                return Err(DidlError::missing(&element_name, binding.key()));
            }
            continue;
        }

        if let Some(b) = element.binding_at_mut(index) {
            b.set_valid(true);
        }
    }

    element.deserialize_extra(node, ctx)
}

fn read_attribute(
    node: &XmlElement,
    element: &mut dyn DidlElement,
    index: usize,
    binding: &PropertyBinding,
    ctx: &DeserializationContext,
) -> Result<bool> {
    match find_attribute(node, binding.name(), ctx.lenient_names()) {
        Some(raw) => {
            element.write_property_text(index, std::slice::from_ref(raw))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn read_text(node: &XmlElement, element: &mut dyn DidlElement, index: usize) -> Result<bool> {
    match node_text(node) {
        Some(text) if !text.is_empty() => {
            element.write_property_text(index, &[text])?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn children_for<'a>(
    node: &'a XmlElement,
    binding: &PropertyBinding,
    element_name: &str,
    ctx: &DeserializationContext,
) -> Result<Vec<&'a XmlElement>> {
    let children = matching_children(node, binding.name(), ctx.lenient_names());
    if children.len() > 1 && binding.cardinality() == Cardinality::Single {
        return Err(DidlError::multiplicity(element_name, binding.key(), children.len()));
    }
    Ok(children)
}

fn read_child_scalars(
    node: &XmlElement,
    element: &mut dyn DidlElement,
    index: usize,
    binding: &PropertyBinding,
    element_name: &str,
    ctx: &DeserializationContext,
) -> Result<bool> {
    let children = children_for(node, binding, element_name, ctx)?;
    if children.is_empty() {
        return Ok(false);
    }
    let raws: Vec<String> = children
        .iter()
        .map(|child| node_text(child).unwrap_or_default())
        .collect();
    element.write_property_text(index, &raws)?;
    Ok(true)
}

/// Sérialise un élément en texte XML (sans déclaration).
pub fn to_xml_string(element: &dyn DidlElement, ctx: &SerializationContext) -> Result<String> {
    let node = serialize_to_node(element, ctx)?;
    write_node(&node, false)
}

/// Écrit un nœud XML en texte.
pub fn write_node(node: &XmlElement, document: bool) -> Result<String> {
    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new()
        .write_document_declaration(document)
        .perform_indent(document)
        .indent_string("  ");
    node.write_with_config(&mut buf, config)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Analyse un texte XML puis le désérialise dans `element`.
pub fn from_xml_str(xml: &str, element: &mut dyn DidlElement, ctx: &DeserializationContext) -> Result<()> {
    let node = XmlElement::parse(xml.as_bytes())?;
    deserialize_into(&node, element, ctx)
}
