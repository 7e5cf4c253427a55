//! Règles croisées de `upnp:genre` à travers le codec et l'export JSON.

use pmodidl::codec::{deserialize_into, from_xml_str, to_xml_string};
use pmodidl::json::to_json;
use pmodidl::properties::Genre;
use pmodidl::{DeserializationContext, DidlError, PropertyHost, SerializationContext};
use serde_json::json;

const UPNP: &str = "urn:schemas-upnp-org:metadata-1-0/upnp/";

fn genre_xml(attributes: &str, name: &str) -> String {
    format!(r#"<upnp:genre xmlns:upnp="{}" {}>{}</upnp:genre>"#, UPNP, attributes, name)
}

#[test]
fn test_extended_without_id_is_rejected() {
    let mut genre = Genre::default();
    let err = from_xml_str(&genre_xml(r#"extended="x""#, "Rock"), &mut genre, &DeserializationContext::default())
        .unwrap_err();
    assert!(matches!(err, DidlError::CustomValidationFailed { .. }));
}

#[test]
fn test_extended_with_id() {
    let mut genre = Genre::default();
    from_xml_str(
        &genre_xml(r#"id="7" extended="x""#, "Rock"),
        &mut genre,
        &DeserializationContext::default(),
    )
    .unwrap();

    assert_eq!(genre.name, "Rock");
    assert_eq!(genre.id, "7");
    assert_eq!(genre.extended, "x");
    assert!(genre.is_valid(""));
    assert!(genre.is_valid("@id"));
    assert!(genre.is_valid("@extended"));
}

#[test]
fn test_unknown_genre_is_rejected() {
    let mut genre = Genre::default();
    let err = from_xml_str(&genre_xml("", "Unknown"), &mut genre, &DeserializationContext::default()).unwrap_err();
    assert!(matches!(err, DidlError::CustomValidationFailed { .. }));

    let err = to_xml_string(&Genre::new("Unknown"), &SerializationContext::default()).unwrap_err();
    assert!(matches!(err, DidlError::MissingRequiredProperty { .. }));
}

#[test]
fn test_serialize_rejects_extended_without_id() {
    let genre = Genre::extended("Rock", "", "Rock/Progressive");
    let err = to_xml_string(&genre, &SerializationContext::default()).unwrap_err();
    assert!(matches!(err, DidlError::CustomValidationFailed { .. }));
}

#[test]
fn test_attributes_ignored_before_version_two() {
    let genre = Genre::extended("Rock", "7", "Rock/Progressive");
    let xml = to_xml_string(&genre, &SerializationContext::new(1)).unwrap();
    assert!(!xml.contains("id="));
    assert!(!xml.contains("extended="));
    assert!(xml.contains(">Rock</upnp:genre>"));

    let node = xmltree::Element::parse(genre_xml(r#"id="7" extended="x""#, "Rock").as_bytes()).unwrap();
    let mut parsed = Genre::default();
    deserialize_into(&node, &mut parsed, &DeserializationContext::new(1)).unwrap();
    assert_eq!(parsed.name, "Rock");
    assert!(!parsed.is_valid("@id"));
    assert!(parsed.id.is_empty());
}

#[test]
fn test_genre_to_json() {
    assert_eq!(
        to_json(&Genre::extended("Rock", "7", "")),
        json!({ "#text": "Rock", "@id": "7" })
    );
    assert_eq!(to_json(&Genre::new("Jazz")), json!({ "#text": "Jazz" }));
}

#[test]
fn test_reading_plain_genre_drops_previous_attributes() {
    let mut genre = Genre::extended("Rock", "7", "Rock/Progressive");
    from_xml_str(&genre_xml("", "Jazz"), &mut genre, &DeserializationContext::default()).unwrap();

    assert_eq!(genre.name, "Jazz");
    assert!(genre.id.is_empty());
    assert!(genre.extended.is_empty());
    assert!(!genre.is_valid("@id"));
    assert!(!genre.is_valid("@extended"));

    let xml = to_xml_string(&genre, &SerializationContext::default()).unwrap();
    assert!(!xml.contains("id="));
    assert!(!xml.contains("extended="));
}

#[test]
fn test_attributes_out_of_version_are_cleared_on_read() {
    let mut genre = Genre::extended("Rock", "7", "Rock/Progressive");
    from_xml_str(
        &genre_xml(r#"id="9" extended="Jazz/Modal""#, "Jazz"),
        &mut genre,
        &DeserializationContext::new(1),
    )
    .unwrap();

    assert_eq!(genre.name, "Jazz");
    assert!(genre.id.is_empty());
    assert!(!genre.is_valid("@extended"));
}
