use std::any::Any;

use crate::element::{DidlElement, PropertyHost};
use crate::property::PropertyList;

pub const ALBUM_ART: &str = "upnp:albumArtURI";

/// Pochette d'un objet (`upnp:albumArtURI`) et son profil DLNA.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumArt {
    pub uri: String,
    pub profile_id: String,
    properties: PropertyList<Self>,
}

crate::impl_schema!(AlbumArt);

impl Default for AlbumArt {
    fn default() -> Self {
        Self::new("")
    }
}

impl AlbumArt {
    pub fn new(uri: impl Into<String>) -> Self {
        let mut properties = PropertyList::<Self>::new();
        properties.bind_string("", |a| &a.uri, |a| &mut a.uri).required();
        properties
            .bind_string("@dlna:profileID", |a| &a.profile_id, |a| &mut a.profile_id)
            .optional();

        let mut art = Self {
            uri: uri.into(),
            profile_id: String::new(),
            properties,
        };
        let valid = !art.uri.is_empty();
        art.set_valid("", valid);
        art
    }

    /// Profil DLNA de l'image (`JPEG_TN`, `PNG_LRG`...).
    pub fn with_profile(mut self, profile_id: impl Into<String>) -> Self {
        self.profile_id = profile_id.into();
        let valid = !self.profile_id.is_empty();
        self.set_valid("@dlna:profileID", valid);
        self
    }
}

impl DidlElement for AlbumArt {
    fn element_name(&self) -> &str {
        ALBUM_ART
    }

    fn identifier(&self) -> &str {
        ALBUM_ART
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
