use std::any::Any;

use xmltree::Element as XmlElement;

use crate::context::{DeserializationContext, SerializationContext};
use crate::element::{DidlElement, PropertyHost};
use crate::errors::{DidlError, Result};
use crate::property::PropertyList;

pub const GENRE: &str = "upnp:genre";

const UNKNOWN_GENRE: &str = "Unknown";

/// Genre d'un objet (`upnp:genre`).
///
/// Depuis la version 2, un genre peut porter un identifiant (`@id`) et un
/// nom étendu (`@extended`), ce dernier n'étant admis qu'avec un `@id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub name: String,
    pub id: String,
    pub extended: String,
    properties: PropertyList<Self>,
}

crate::impl_schema!(Genre);

impl Default for Genre {
    fn default() -> Self {
        Self::new("")
    }
}

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        let mut properties = PropertyList::<Self>::new();
        properties.bind_string("", |g| &g.name, |g| &mut g.name).required();
        properties
            .bind_string("@id", |g| &g.id, |g| &mut g.id)
            .optional()
            .minimum_version(2);
        properties
            .bind_string("@extended", |g| &g.extended, |g| &mut g.extended)
            .optional()
            .minimum_version(2);

        let mut genre = Self {
            name: name.into(),
            id: String::new(),
            extended: String::new(),
            properties,
        };
        let valid = is_genre_valid(&genre.name);
        genre.properties.set_valid("", valid);
        genre
    }

    /// Genre étendu : identifiant et chemin (`Rock/Progressive`).
    pub fn extended(name: impl Into<String>, id: impl Into<String>, extended: impl Into<String>) -> Self {
        let mut genre = Self::new(name);
        genre.id = id.into();
        genre.extended = extended.into();
        genre.refresh_validity();
        genre
    }

    fn refresh_validity(&mut self) {
        let id_valid = !self.id.is_empty();
        let extended_valid = !self.extended.is_empty();
        self.set_valid("@id", id_valid);
        self.set_valid("@extended", extended_valid);
    }

    fn check(&self) -> Result<()> {
        if !is_genre_valid(&self.name) {
            return Err(DidlError::validation(GENRE, format!("invalid genre name '{}'", self.name)));
        }
        if !self.extended.is_empty() && self.id.is_empty() {
            return Err(DidlError::validation(GENRE, "@extended requires @id"));
        }
        Ok(())
    }
}

fn is_genre_valid(name: &str) -> bool {
    !name.is_empty() && name != UNKNOWN_GENRE
}

impl DidlElement for Genre {
    fn element_name(&self) -> &str {
        GENRE
    }

    fn identifier(&self) -> &str {
        GENRE
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn serialize_extra(&self, _node: &mut XmlElement, _ctx: &SerializationContext) -> Result<()> {
        self.check()
    }

    fn deserialize_extra(&mut self, _node: &XmlElement, _ctx: &DeserializationContext) -> Result<()> {
        // les attributs absents ou hors version ne gardent pas d'anciennes valeurs
        if !self.is_valid("@id") {
            self.id.clear();
        }
        if !self.is_valid("@extended") {
            self.extended.clear();
        }
        self.check()?;
        self.set_valid("", true);
        Ok(())
    }
}
