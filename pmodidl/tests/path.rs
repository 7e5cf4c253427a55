//! Accès aux propriétés par chemin sur les objets UPnP.

use pmodidl::properties::{Person, Resource};
use pmodidl::{
    DidlError, FieldRef, ObjectKind, PropertyHost, PropertyKind, Scalar, UpnpObject, get_property, has_property,
    set_property, set_property_values,
};

fn track() -> UpnpObject {
    let mut track = UpnpObject::create(ObjectKind::MusicTrack, "42", "7", "So What");
    track.add_artist(Person::artist("Miles Davis"));
    track.add_artist(Person::artist("John Coltrane"));
    track.add_resource(Resource::new("http://host/42.flac", "http-get:*:audio/flac:*").with_size(2048));
    track
}

fn text(value: FieldRef<'_>) -> String {
    value.text().unwrap()
}

#[test]
fn test_get_attributes_and_children() {
    let track = track();
    assert_eq!(text(get_property(&track, "@id").unwrap()), "42");
    assert_eq!(text(get_property(&track, "dc:title").unwrap()), "So What");
    assert_eq!(text(get_property(&track, "res@protocolInfo").unwrap()), "http-get:*:audio/flac:*");
    assert_eq!(text(get_property(&track, "res.@protocolInfo").unwrap()), "http-get:*:audio/flac:*");
    assert_eq!(get_property(&track, "upnp:artist").unwrap().text(), None);

    match get_property(&track, "res@size").unwrap() {
        FieldRef::Scalars(values) => assert_eq!(values, vec![Scalar::UnsignedLong(2048)]),
        other => panic!("unexpected value {:?}", other),
    }
    match get_property(&track, "upnp:artist").unwrap() {
        FieldRef::Elements(items) => assert_eq!(items.len(), 2),
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn test_has_property() {
    let track = track();
    assert!(has_property(&track, "res@duration"));
    assert!(has_property(&track, "upnp:class"));
    assert!(!has_property(&track, "@childCount"));
    assert!(!has_property(&track, "res@unknown"));
    assert!(!has_property(&track, "upnp:actor@role"));
}

#[test]
fn test_set_marks_property_valid() {
    let mut track = track();
    assert!(!track.is_valid("dc:creator"));

    set_property(&mut track, "dc:creator", "Columbia").unwrap();
    assert_eq!(track.creator, "Columbia");
    assert!(track.is_valid("dc:creator"));

    set_property(&mut track, "res@bitrate", 1411u32).unwrap();
    assert_eq!(track.resources[0].bitrate, 1411);
    assert!(track.resources[0].is_valid("@bitrate"));

    set_property(&mut track, "upnp:artist@role", "Trumpet").unwrap();
    assert_eq!(track.artists[0].role, "Trumpet");
    assert!(track.artists[1].role.is_empty());
}

#[test]
fn test_set_converts_compatible_values() {
    let mut track = track();
    set_property(&mut track, "upnp:originalTrackNumber", "3").unwrap();
    assert_eq!(track.original_track_number, 3);

    set_property(&mut track, "@restricted", false).unwrap();
    assert!(!track.restricted);

    set_property_values(
        &mut track,
        "upnp:album",
        vec![Scalar::from("Kind of Blue"), Scalar::from("Legacy Edition")],
    )
    .unwrap();
    assert_eq!(track.albums, vec!["Kind of Blue".to_string(), "Legacy Edition".to_string()]);
}

#[test]
fn test_type_mismatch() {
    let mut track = track();
    let err = set_property(&mut track, "upnp:originalTrackNumber", true).unwrap_err();
    assert!(matches!(
        err,
        DidlError::TypeMismatch { ref property, expected: PropertyKind::Integer } if property == "upnp:originalTrackNumber"
    ));

    let err = set_property(&mut track, "dc:title@lang", "en").unwrap_err();
    assert!(matches!(err, DidlError::TypeMismatch { .. }));

    let err = get_property(&track, "dc:title.@lang").unwrap_err();
    assert!(matches!(err, DidlError::TypeMismatch { .. }));
}

#[test]
fn test_unknown_paths() {
    let mut track = track();
    assert!(matches!(
        get_property(&track, "upnp:unknown"),
        Err(DidlError::PropertyNotFound(_))
    ));
    assert!(matches!(
        set_property(&mut track, "upnp:actor@role", "Lead"),
        Err(DidlError::PropertyNotFound(_))
    ));
    assert!(matches!(get_property(&track, "res@size.x"), Err(DidlError::InvalidPath(_))));
    assert!(matches!(get_property(&track, ""), Err(DidlError::InvalidPath(_))));
}
