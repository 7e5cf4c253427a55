//! Export JSON des propriétés valides d'un élément.
//!
//! ```json
//! {
//!   "@id": "42",
//!   "upnp:class": { "#text": "object.item.audioItem.musicTrack" },
//!   "upnp:artist": [ { "#text": "Miles Davis" } ]
//! }
//! ```

use serde_json::{Map, Value};

use crate::codec;
use crate::context::SerializationContext;
use crate::element::DidlElement;
use crate::property::FieldRef;
use crate::utils::node_text;
use crate::value::Scalar;

/// Clé utilisée pour le contenu texte d'un élément.
pub const TEXT_KEY: &str = "#text";

/// Convertit les propriétés valides de `element` en objet JSON.
pub fn to_json(element: &dyn DidlElement) -> Value {
    let mut map = Map::new();

    if element.property_count() == 0 {
        // Éléments sans liaison (dates) : on reprend leur texte sérialisé.
        if let Some(text) = codec::serialize_to_node(element, &SerializationContext::default())
            .ok()
            .and_then(|node| node_text(&node))
        {
            map.insert(TEXT_KEY.to_string(), Value::String(text));
        }
        return Value::Object(map);
    }

    for index in 0..element.property_count() {
        let Some(binding) = element.binding_at(index) else {
            continue;
        };
        if !binding.is_valid() {
            continue;
        }
        let Some(value) = element.read_property(index) else {
            continue;
        };
        let key = if binding.is_text() {
            TEXT_KEY.to_string()
        } else {
            binding.key().to_string()
        };

        let json = match value {
            FieldRef::Scalars(values) if binding.is_multi_valued() => {
                Value::Array(values.iter().map(scalar_to_json).collect())
            }
            FieldRef::Scalars(values) => match values.first() {
                Some(value) => scalar_to_json(value),
                None => continue,
            },
            FieldRef::Elements(items) if binding.is_multi_valued() => {
                Value::Array(items.into_iter().map(to_json).collect())
            }
            FieldRef::Elements(items) => match items.into_iter().next() {
                Some(item) => to_json(item),
                None => continue,
            },
        };
        map.insert(key, json);
    }

    Value::Object(map)
}

fn scalar_to_json(value: &Scalar) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::objects::{ObjectKind, UpnpObject};
    use crate::properties::{Genre, Person};

    #[test]
    fn test_object_to_json() {
        let mut track = UpnpObject::create(ObjectKind::MusicTrack, "42", "7", "So What");
        track.add_artist(Person::artist("Miles Davis"));
        track.add_genre(Genre::extended("Jazz", "g1", "Jazz/Modal"));
        track.set_track_number(1);

        let value = to_json(&track);
        assert_eq!(value["@id"], json!("42"));
        assert_eq!(value["@restricted"], json!(true));
        assert_eq!(value["upnp:class"], json!({ "#text": "object.item.audioItem.musicTrack" }));
        assert_eq!(value["upnp:artist"], json!([{ "#text": "Miles Davis" }]));
        assert_eq!(value["upnp:genre"][0]["@extended"], json!("Jazz/Modal"));
        assert_eq!(value["upnp:originalTrackNumber"], json!(1));
        assert!(value.get("dc:creator").is_none());
    }
}
