//! Tests du registre : résolution exacte, par préfixe et par prédicat.

use std::any::Any;

use pmodidl::codec::deserialize;
use pmodidl::properties::Genre;
use pmodidl::property::PropertyList;
use pmodidl::{
    DeserializationContext, DidlElement, DidlError, ElementRegistry, MediaItem, MediaType, ObjectKind, UpnpObject,
    default_registry, global_registry, set_property,
};
use xmltree::Element as XmlElement;

/// Élément de test dont la hiérarchie et le prédicat sont libres.
#[derive(Debug, Clone)]
struct Marker {
    identifier: &'static str,
    parent: Option<&'static str>,
    accepts: fn(&MediaItem) -> bool,
    label: String,
    properties: PropertyList<Self>,
}

pmodidl::impl_schema!(Marker);

impl Marker {
    fn new(identifier: &'static str, parent: Option<&'static str>, accepts: fn(&MediaItem) -> bool) -> Self {
        let mut properties = PropertyList::<Self>::new();
        properties.bind_string("@label", |p| &p.label, |p| &mut p.label);
        Self {
            identifier,
            parent,
            accepts,
            label: String::new(),
            properties,
        }
    }
}

impl DidlElement for Marker {
    fn element_name(&self) -> &str {
        "marker"
    }

    fn identifier(&self) -> &str {
        self.identifier
    }

    fn extends(&self) -> Vec<String> {
        self.parent.map(str::to_string).into_iter().collect()
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn can_handle(&self, item: &MediaItem) -> bool {
        (self.accepts)(item)
    }
}

fn any_item(_: &MediaItem) -> bool {
    true
}

fn songs(item: &MediaItem) -> bool {
    item.media_type == MediaType::Song
}

fn nothing(_: &MediaItem) -> bool {
    false
}

fn object(element: &dyn DidlElement) -> &UpnpObject {
    element.as_any().downcast_ref::<UpnpObject>().unwrap()
}

fn registry_with(kinds: &[ObjectKind]) -> ElementRegistry {
    let registry = ElementRegistry::new();
    for &kind in kinds {
        registry.register(UpnpObject::new(kind)).unwrap();
    }
    registry
}

#[test]
fn test_exact_match_clones_prototype() {
    let registry = ElementRegistry::new();
    registry
        .register(UpnpObject::create(ObjectKind::MusicAlbum, "p", "0", "marker"))
        .unwrap();

    let mut first = registry.resolve_by_class("object.container.album.musicAlbum").unwrap();
    assert_eq!(object(first.as_ref()).title, "marker");

    set_property(first.as_mut(), "dc:title", "changed").unwrap();
    let second = registry.resolve_exact("object.container.album.musicAlbum").unwrap();
    assert_eq!(object(second.as_ref()).title, "marker");
    assert_eq!(object(first.as_ref()).title, "changed");
}

#[test]
fn test_longest_prefix_match() {
    let registry = registry_with(&[ObjectKind::Container, ObjectKind::Album]);

    let element = registry.resolve_by_class("object.container.album.musicAlbum").unwrap();
    let album = object(element.as_ref());
    assert_eq!(album.kind(), ObjectKind::Album);
    assert_eq!(album.class.class_type, "object.container.album.musicAlbum");
    assert_eq!(element.class_type(), Some("object.container.album.musicAlbum"));
}

#[test]
fn test_ancestor_wins_ties() {
    let registry = registry_with(&[ObjectKind::Container, ObjectKind::Album]);
    let element = registry.resolve_by_class("object.container.storageFolder.vendor").unwrap();
    assert_eq!(object(element.as_ref()).kind(), ObjectKind::Container);

    let registry = registry_with(&[ObjectKind::VideoItem, ObjectKind::AudioItem]);
    let element = registry.resolve_by_class("object.item.imageItem").unwrap();
    assert_eq!(object(element.as_ref()).kind(), ObjectKind::AudioItem);

    registry.register(UpnpObject::new(ObjectKind::Item)).unwrap();
    let element = registry.resolve_by_class("object.item.imageItem").unwrap();
    assert_eq!(object(element.as_ref()).kind(), ObjectKind::Item);
}

#[test]
fn test_unknown_class() {
    let registry = registry_with(&[ObjectKind::Item]);
    assert!(registry.resolve_by_class("vendor.thing").is_none());
    assert!(matches!(registry.create("vendor.thing"), Err(DidlError::UnknownType(_))));
    assert!(registry.resolve_exact("object.item.audioItem").is_none());
}

#[test]
fn test_non_class_types_are_not_prefix_candidates() {
    let registry = ElementRegistry::new();
    registry.register(Marker::new("object.item", None, any_item)).unwrap();
    assert!(registry.resolve_by_class("object.item.audioItem").is_none());
    assert!(registry.resolve_exact("object.item").is_some());
}

#[test]
fn test_predicate_order_is_topological() {
    let registry = ElementRegistry::new();
    registry.register(Marker::new("b", Some("a"), songs)).unwrap();
    registry.register(Marker::new("a", None, any_item)).unwrap();
    registry.register(Marker::new("c", Some("b"), nothing)).unwrap();

    let order = registry.predicate_order();
    let position = |id: &str| order.iter().position(|o| o == id).unwrap();
    assert!(position("c") < position("b"));
    assert!(position("b") < position("a"));

    let song = MediaItem::file("1", "Song", MediaType::Song);
    assert_eq!(registry.resolve_by_predicate(&song).unwrap().identifier(), "b");

    let movie = MediaItem::file("2", "Movie", MediaType::Movie);
    assert_eq!(registry.resolve_by_predicate(&movie).unwrap().identifier(), "a");
}

#[test]
fn test_cycle_is_rejected_and_rolled_back() {
    let registry = ElementRegistry::new();
    registry.register(Marker::new("x", Some("y"), nothing)).unwrap();

    let err = registry.register(Marker::new("y", Some("x"), nothing)).unwrap_err();
    assert!(matches!(err, DidlError::CyclicClassHierarchy(_)));
    assert_eq!(registry.len(), 1);
    assert!(!registry.contains("y"));
    assert_eq!(registry.predicate_order(), vec!["x".to_string()]);

    registry.register(Marker::new("y", None, nothing)).unwrap();
    assert_eq!(registry.predicate_order(), vec!["x".to_string(), "y".to_string()]);
}

#[test]
fn test_duplicate_registration() {
    let registry = registry_with(&[ObjectKind::MusicTrack]);
    let err = registry.register(UpnpObject::new(ObjectKind::MusicTrack)).unwrap_err();
    assert!(matches!(err, DidlError::DuplicateType(ref id) if id == "object.item.audioItem.musicTrack"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_default_predicates_prefer_specialized_kinds() {
    let registry = default_registry();
    let ctx = DeserializationContext::default();
    let cases = [
        (MediaItem::file("1", "Track", MediaType::Song), ObjectKind::MusicTrack),
        (MediaItem::file("2", "Podcast", MediaType::Audio), ObjectKind::AudioItem),
        (MediaItem::file("3", "Film", MediaType::Movie), ObjectKind::Movie),
        (MediaItem::file("4", "Episode", MediaType::Episode), ObjectKind::VideoBroadcast),
        (MediaItem::file("5", "Clip", MediaType::MusicVideo), ObjectKind::MusicVideoClip),
        (MediaItem::file("6", "Picture", MediaType::Picture), ObjectKind::Photo),
        (MediaItem::file("7", "Blob", MediaType::Unknown), ObjectKind::Item),
        (MediaItem::folder("8", "Album", MediaType::Album), ObjectKind::MusicAlbum),
        (MediaItem::folder("9", "Artist", MediaType::Artist), ObjectKind::MusicArtist),
        (MediaItem::folder("10", "Jazz", MediaType::Genre), ObjectKind::MusicGenre),
        (MediaItem::folder("11", "Mix", MediaType::Playlist), ObjectKind::PlaylistContainer),
        (MediaItem::folder("12", "Disk", MediaType::Folder), ObjectKind::StorageFolder),
        (MediaItem::folder("13", "Other", MediaType::Unknown), ObjectKind::Container),
    ];

    for (item, expected) in cases {
        let element = registry
            .element_for_media_item(&item, &ctx)
            .unwrap_or_else(|| panic!("no element for {}", item.label));
        let built = object(element.as_ref());
        assert_eq!(built.kind(), expected, "{}", item.label);
        assert_eq!(built.id, item.id);
        assert_eq!(built.title, item.label);
    }
}

#[test]
fn test_media_item_conversion_failure() {
    let registry = default_registry();
    let item = MediaItem::file("", "No id", MediaType::Song);
    assert!(registry.resolve_by_predicate(&item).is_some());
    assert!(registry.element_for_media_item(&item, &DeserializationContext::default()).is_none());
}

#[test]
fn test_resolve_property_element_by_name() {
    let xml = r#"<upnp:genre xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">Rock</upnp:genre>"#;
    let node = XmlElement::parse(xml.as_bytes()).unwrap();
    let element = deserialize(&node, global_registry(), &DeserializationContext::default()).unwrap();
    let genre = element.as_any().downcast_ref::<Genre>().unwrap();
    assert_eq!(genre.name, "Rock");
}

#[test]
fn test_concurrent_resolution() {
    let registry = global_registry();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for kind in ObjectKind::ALL {
                    let element = registry.resolve_by_class(kind.class_type()).unwrap();
                    assert_eq!(object(element.as_ref()).kind(), kind);
                }
            });
        }
    });
}
