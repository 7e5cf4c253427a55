use std::any::Any;

use crate::element::DidlElement;
use crate::property::PropertyList;

pub const CLASS: &str = "upnp:class";
pub const CREATE_CLASS: &str = "upnp:createClass";
pub const SEARCH_CLASS: &str = "upnp:searchClass";

/// Classe UPnP d'un objet (`upnp:class`), ou classe acceptée par un
/// conteneur (`upnp:createClass`, `upnp:searchClass`).
#[derive(Debug, Clone, PartialEq)]
pub struct UpnpClass {
    element_name: &'static str,
    pub class_type: String,
    pub name: String,
    pub include_derived: bool,
    properties: PropertyList<Self>,
}

crate::impl_schema!(UpnpClass);

impl UpnpClass {
    pub fn new(class_type: impl Into<String>) -> Self {
        Self::with_element(CLASS, class_type.into())
    }

    /// Classe que le conteneur accepte à la création.
    pub fn create_class(class_type: impl Into<String>, include_derived: bool) -> Self {
        let mut class = Self::with_element(CREATE_CLASS, class_type.into());
        class.include_derived = include_derived;
        class
    }

    /// Classe que le conteneur expose à la recherche.
    pub fn search_class(class_type: impl Into<String>, include_derived: bool) -> Self {
        let mut class = Self::with_element(SEARCH_CLASS, class_type.into());
        class.include_derived = include_derived;
        class
    }

    fn with_element(element_name: &'static str, class_type: String) -> Self {
        let mut properties = PropertyList::<Self>::new();
        properties
            .bind_string("", |c| &c.class_type, |c| &mut c.class_type)
            .required();
        properties
            .bind_string("@name", |c| &c.name, |c| &mut c.name)
            .optional();
        if element_name != CLASS {
            properties
                .bind_boolean("@includeDerived", |c| &c.include_derived, |c| &mut c.include_derived)
                .required()
                .valid();
        }

        let mut class = Self {
            element_name,
            class_type,
            name: String::new(),
            include_derived: false,
            properties,
        };
        let has_type = !class.class_type.is_empty();
        class.properties.set_valid("", has_type);
        class
    }

    /// Change la classe et met à jour sa validité.
    pub fn set_type(&mut self, class_type: &str) {
        self.class_type = class_type.to_string();
        self.properties.set_valid("", !class_type.is_empty());
    }

    /// Nom lisible de la classe (`@name`).
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.properties.set_valid("@name", !name.is_empty());
    }
}

impl DidlElement for UpnpClass {
    fn element_name(&self) -> &str {
        self.element_name
    }

    fn identifier(&self) -> &str {
        self.element_name
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
