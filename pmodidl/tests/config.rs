use std::fs;

use pmodidl::config::DEFAULT_PROTOCOL_VERSION;
use pmodidl::{DidlConfig, DidlLiteDocument, ObjectKind, PropertyHost, SerializationContext, UpnpObject};
use tempfile::TempDir;

#[test]
fn test_load_external_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pmodidl.yaml");
    fs::write(
        &path,
        "DIDL:\n  protocol_version: 1\n  requested_fields: \"dc:creator\"\n  namespaces:\n    pv: \"http://www.pv.com/pvns/\"\n",
    )
    .unwrap();

    let config = DidlConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.protocol_version, 1);
    assert_eq!(config.requested_fields, "dc:creator");
    assert_eq!(config.namespaces.get("pv").map(String::as_str), Some("http://www.pv.com/pvns/"));
    assert!(config.namespaces.contains_key("upnp"));
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = DidlConfig::load(Some(dir.path().join("absent.yaml").as_path())).unwrap();
    assert_eq!(config.protocol_version, DEFAULT_PROTOCOL_VERSION);
    assert_eq!(config.requested_fields, "*");
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "didl: [unclosed\n").unwrap();
    assert!(DidlConfig::load(Some(path.as_path())).is_err());
}

#[test]
fn test_context_from_config_drives_output() {
    let config = DidlConfig::from_yaml("didl:\n  protocol_version: 2\n  requested_fields: \"dc:creator\"\n").unwrap();
    let ctx = SerializationContext::from_config(&config);

    let mut track = UpnpObject::create(ObjectKind::MusicTrack, "1", "0", "Naima");
    track.set_creator("John Coltrane");
    track.set_description("Giant Steps");
    track.object_update_id = 3;
    track.set_valid("upnp:objectUpdateID", true);

    let mut doc = DidlLiteDocument::new();
    doc.push(track);
    let xml = doc.to_xml_string(&ctx).unwrap();
    assert!(xml.contains("<dc:creator>John Coltrane</dc:creator>"));
    assert!(!xml.contains("dc:description"));
    assert!(!xml.contains("objectUpdateID"));
}
