//! Contextes de (dé)sérialisation.
//!
//! Un contexte porte la version de protocole négociée avec le pair, le
//! filtre des champs demandés et la table des namespaces. Il est passé à
//! chaque appel du codec et n'est jamais partagé entre threads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::{DEFAULT_PROTOCOL_VERSION, DidlConfig};
use crate::property::PropertyBinding;

/// Filtre des propriétés optionnelles à produire.
///
/// Construit depuis une liste séparée par des virgules (`"dc:title,res@size"`).
/// `"*"` ou une liste vide laisse tout passer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    fields: Option<BTreeSet<String>>,
}

impl PropertyFilter {
    /// Filtre acceptant toutes les propriétés.
    pub fn all() -> Self {
        Self { fields: None }
    }

    pub fn parse(list: &str) -> Self {
        let fields: BTreeSet<String> = list
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        if fields.is_empty() || fields.contains("*") {
            Self::all()
        } else {
            Self {
                fields: Some(fields),
            }
        }
    }

    pub fn is_all(&self) -> bool {
        self.fields.is_none()
    }

    pub fn contains(&self, field: &str) -> bool {
        if field.is_empty() {
            return false;
        }
        match &self.fields {
            None => true,
            Some(fields) => fields.contains(field),
        }
    }

    /// Indique si une propriété optionnelle de l'élément `element` doit
    /// être produite.
    pub fn allows(&self, element: &str, binding: &PropertyBinding) -> bool {
        if self.is_all() || binding.is_text() {
            return true;
        }
        if binding.is_attribute() {
            self.contains(binding.key()) || self.contains(&format!("{}@{}", element, binding.name()))
        } else {
            self.contains(binding.name())
        }
    }
}

impl fmt::Display for PropertyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fields {
            None => f.write_str("*"),
            Some(fields) => {
                let list: Vec<&str> = fields.iter().map(String::as_str).collect();
                f.write_str(&list.join(","))
            }
        }
    }
}

/// Table préfixe → URI des namespaces déclarés sur la racine du document.
/// Le préfixe vide désigne le namespace par défaut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable(BTreeMap<String, String>);

impl NamespaceTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.0.insert(prefix.into(), uri.into());
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nom de l'attribut de déclaration : `xmlns` ou `xmlns:prefix`.
    pub fn attribute_name(prefix: &str) -> String {
        if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{}", prefix)
        }
    }
}

impl Default for NamespaceTable {
    /// Table DIDL-Lite standard (DIDL-Lite, dc, upnp, dlna).
    fn default() -> Self {
        Self::from(DidlConfig::default().namespaces)
    }
}

impl From<BTreeMap<String, String>> for NamespaceTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Paramètres d'une sérialisation.
#[derive(Debug, Clone)]
pub struct SerializationContext {
    version: u8,
    filter: PropertyFilter,
    namespaces: NamespaceTable,
}

impl SerializationContext {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            filter: PropertyFilter::all(),
            namespaces: NamespaceTable::default(),
        }
    }

    pub fn from_config(config: &DidlConfig) -> Self {
        Self {
            version: config.protocol_version,
            filter: PropertyFilter::parse(&config.requested_fields),
            namespaces: NamespaceTable::from(config.namespaces.clone()),
        }
    }

    pub fn with_filter(mut self, filter: PropertyFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_namespaces(mut self, namespaces: NamespaceTable) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn filter(&self) -> &PropertyFilter {
        &self.filter
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }
}

impl Default for SerializationContext {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL_VERSION)
    }
}

/// Paramètres d'une désérialisation.
#[derive(Debug, Clone)]
pub struct DeserializationContext {
    version: u8,
    lenient_names: bool,
}

impl DeserializationContext {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            lenient_names: true,
        }
    }

    pub fn from_config(config: &DidlConfig) -> Self {
        Self {
            version: config.protocol_version,
            lenient_names: config.lenient_names,
        }
    }

    /// Exige des noms qualifiés identiques à ceux des liaisons.
    pub fn strict(mut self) -> Self {
        self.lenient_names = false;
        self
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn lenient_names(&self) -> bool {
        self.lenient_names
    }
}

impl Default for DeserializationContext {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL_VERSION)
    }
}
