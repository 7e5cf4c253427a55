//! Documents DIDL-Lite complets.

use pmodidl::properties::{AlbumArt, Genre, Person, Resource};
use pmodidl::{
    DeserializationContext, DidlError, DidlLiteDocument, NamespaceTable, ObjectKind, SerializationContext, UpnpObject,
    default_registry, global_registry,
};

const BROWSE_RESULT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"
           xmlns:dc="http://purl.org/dc/elements/1.1/"
           xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/"
           xmlns:dlna="urn:schemas-dlna-org:metadata-1-0/">
  <container id="album-1" parentID="0" restricted="1" childCount="2" searchable="0">
    <dc:title>Kind of Blue</dc:title>
    <upnp:class>object.container.album.musicAlbum</upnp:class>
    <upnp:artist>Miles Davis</upnp:artist>
    <upnp:albumArtURI dlna:profileID="JPEG_TN">http://host/cover.jpg</upnp:albumArtURI>
  </container>
  <desc id="d1" nameSpace="urn:vendor">opaque</desc>
  <item id="track-1" parentID="album-1" restricted="1">
    <dc:title>So What</dc:title>
    <upnp:class>object.item.audioItem.musicTrack.vendorTrack</upnp:class>
    <upnp:genre>Jazz</upnp:genre>
    <upnp:originalTrackNumber>1</upnp:originalTrackNumber>
    <res protocolInfo="http-get:*:audio/flac:*" size="40960" duration="0:09:22">http://host/so-what.flac</res>
  </item>
</DIDL-Lite>"#;

#[test]
fn test_parse_browse_result() {
    let doc = DidlLiteDocument::parse(BROWSE_RESULT, global_registry(), &DeserializationContext::default()).unwrap();

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.namespaces.uri("dc"), Some("http://purl.org/dc/elements/1.1/"));
    assert_eq!(doc.namespaces.uri("dlna"), Some("urn:schemas-dlna-org:metadata-1-0/"));

    let album = doc.get_object_by_id("album-1").unwrap();
    assert_eq!(album.kind(), ObjectKind::MusicAlbum);
    assert_eq!(album.child_count, 2);
    assert!(!album.searchable);
    assert_eq!(album.artists[0].name, "Miles Davis");
    assert_eq!(album.album_arts[0].profile_id, "JPEG_TN");

    let track = doc.get_object_by_id("track-1").unwrap();
    assert_eq!(track.kind(), ObjectKind::MusicTrack);
    assert_eq!(track.class.class_type, "object.item.audioItem.musicTrack.vendorTrack");
    assert_eq!(track.genres[0].name, "Jazz");
    assert_eq!(track.original_track_number, 1);

    let resource = track.primary_resource().unwrap();
    assert_eq!(resource.size, 40960);
    assert_eq!(resource.duration_seconds(), Some(562));
    assert_eq!(resource.mime_type(), Some("audio/flac"));
}

#[test]
fn test_recognized_child_errors_propagate() {
    let xml = r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">
  <item id="1" parentID="0" restricted="1"><upnp:class>object.item</upnp:class></item>
</DIDL-Lite>"#;
    let err = DidlLiteDocument::parse(xml, global_registry(), &DeserializationContext::default()).unwrap_err();
    assert!(matches!(err, DidlError::MissingRequiredProperty { ref property, .. } if property == "dc:title"));
}

#[test]
fn test_malformed_xml() {
    let err = DidlLiteDocument::parse("<DIDL-Lite><item>", global_registry(), &DeserializationContext::default())
        .unwrap_err();
    assert!(matches!(err, DidlError::XmlParse(_)));
}

#[test]
fn test_document_round_trip() {
    let mut album = UpnpObject::create(ObjectKind::MusicAlbum, "a1", "0", "A Love Supreme");
    album.add_artist(Person::artist("John Coltrane"));
    album.add_album_art(AlbumArt::new("http://host/als.jpg").with_profile("JPEG_TN"));
    album.set_child_count(4);

    let mut track = UpnpObject::create(ObjectKind::MusicTrack, "t1", "a1", "Acknowledgement");
    track.add_artist(Person::artist("John Coltrane").with_role("Saxophone"));
    track.add_genre(Genre::extended("Jazz", "g1", "Jazz/Spiritual"));
    track.set_track_number(1);
    track.add_resource(
        Resource::new("http://host/t1.flac", "http-get:*:audio/flac:*")
            .with_size(123456)
            .with_audio_format(44100, 16, 2)
            .with_duration_seconds(467),
    );

    let mut doc = DidlLiteDocument::new();
    doc.push(album.clone());
    doc.push(track.clone());

    let xml = doc.to_xml_string(&SerializationContext::default()).unwrap();
    assert!(xml.starts_with("<?xml"));

    let registry = default_registry();
    let parsed = DidlLiteDocument::parse(&xml, &registry, &DeserializationContext::default()).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.get_object_by_id("a1"), Some(&album));
    assert_eq!(parsed.get_object_by_id("t1"), Some(&track));
    assert_eq!(parsed.namespaces, NamespaceTable::default());
}

#[test]
fn test_custom_namespaces_are_written() {
    let mut namespaces = NamespaceTable::default();
    namespaces.insert("pv", "http://www.pv.com/pvns/");

    let mut doc = DidlLiteDocument::new();
    doc.namespaces = namespaces;
    doc.push(UpnpObject::create(ObjectKind::StorageFolder, "f", "0", "Music"));

    let xml = doc.to_xml_string(&SerializationContext::default()).unwrap();
    assert!(xml.contains(r#"xmlns:pv="http://www.pv.com/pvns/""#));
    assert!(xml.contains("object.container.storageFolder"));
}
