use std::any::Any;

use crate::element::{DidlElement, PropertyHost};
use crate::property::PropertyList;

/// Identifiant commun dont dérivent artistes, acteurs et auteurs.
pub const PERSON: &str = "Person";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonKind {
    Artist,
    Actor,
    Author,
}

impl PersonKind {
    pub fn element_name(&self) -> &'static str {
        match self {
            PersonKind::Artist => "upnp:artist",
            PersonKind::Actor => "upnp:actor",
            PersonKind::Author => "upnp:author",
        }
    }
}

/// Personne associée à un objet, avec son rôle optionnel (`@role`).
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    kind: PersonKind,
    pub name: String,
    pub role: String,
    properties: PropertyList<Self>,
}

crate::impl_schema!(Person);

impl Person {
    pub fn new(kind: PersonKind, name: impl Into<String>) -> Self {
        let mut properties = PropertyList::<Self>::new();
        properties.bind_string("", |p| &p.name, |p| &mut p.name).required();
        properties.bind_string("@role", |p| &p.role, |p| &mut p.role).optional();

        let mut person = Self {
            kind,
            name: name.into(),
            role: String::new(),
            properties,
        };
        let valid = !person.name.is_empty();
        person.set_valid("", valid);
        person
    }

    pub fn artist(name: impl Into<String>) -> Self {
        Self::new(PersonKind::Artist, name)
    }

    pub fn actor(name: impl Into<String>) -> Self {
        Self::new(PersonKind::Actor, name)
    }

    pub fn author(name: impl Into<String>) -> Self {
        Self::new(PersonKind::Author, name)
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        let valid = !self.role.is_empty();
        self.set_valid("@role", valid);
        self
    }

    pub fn kind(&self) -> PersonKind {
        self.kind
    }
}

impl DidlElement for Person {
    fn element_name(&self) -> &str {
        self.kind.element_name()
    }

    fn identifier(&self) -> &str {
        self.kind.element_name()
    }

    fn extends(&self) -> Vec<String> {
        vec![PERSON.to_string()]
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
