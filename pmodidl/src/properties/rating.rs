use std::any::Any;

use crate::element::{DidlElement, PropertyHost};
use crate::property::PropertyList;

pub const RATING: &str = "upnp:rating";

/// Classification d'un contenu (`upnp:rating`), par exemple `PG-13` avec
/// `@type="MPAA.ORG"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub rating: String,
    pub rating_type: String,
    pub advice: String,
    pub equivalent_age: String,
    properties: PropertyList<Self>,
}

crate::impl_schema!(Rating);

impl Default for Rating {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl Rating {
    pub fn new(rating: impl Into<String>, rating_type: impl Into<String>) -> Self {
        let mut properties = PropertyList::<Self>::new();
        properties.bind_string("", |r| &r.rating, |r| &mut r.rating).required();
        properties
            .bind_string("@type", |r| &r.rating_type, |r| &mut r.rating_type)
            .optional();
        properties
            .bind_string("@advice", |r| &r.advice, |r| &mut r.advice)
            .optional();
        properties
            .bind_string("@equivalentAge", |r| &r.equivalent_age, |r| &mut r.equivalent_age)
            .optional();

        let mut rating = Self {
            rating: rating.into(),
            rating_type: rating_type.into(),
            advice: String::new(),
            equivalent_age: String::new(),
            properties,
        };
        let text_valid = !rating.rating.is_empty();
        let type_valid = !rating.rating_type.is_empty();
        rating.set_valid("", text_valid);
        rating.set_valid("@type", type_valid);
        rating
    }
}

impl DidlElement for Rating {
    fn element_name(&self) -> &str {
        RATING
    }

    fn identifier(&self) -> &str {
        RATING
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
