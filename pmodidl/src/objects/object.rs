use std::any::Any;

use chrono::NaiveDate;
use tracing::trace;
use xmltree::Element as XmlElement;

use crate::context::{DeserializationContext, SerializationContext};
use crate::element::{DidlElement, PropertyHost};
use crate::errors::{DidlError, Result};
use crate::media::MediaItem;
use crate::property::PropertyList;
use crate::properties::{
    AlbumArt, Date, DateTime, Genre, LAST_PLAYBACK_TIME, Person, Price, RECORDED_END_DATE_TIME,
    RECORDED_START_DATE_TIME, Rating, Resource, SCHEDULED_END_TIME, UpnpClass,
};

use super::kind::ObjectKind;

/// Objet du ContentDirectory : `item` ou `container` selon sa classe.
///
/// Les champs sont publics ; après une écriture directe, la propriété doit
/// être marquée valide avec [`PropertyHost::set_valid`] pour être produite.
/// Les méthodes `set_*` et `add_*` le font elles-mêmes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpnpObject {
    kind: ObjectKind,

    pub id: String,
    pub parent_id: String,
    pub restricted: bool,
    pub class: UpnpClass,
    pub title: String,
    pub creator: String,
    pub write_status: String,
    pub resources: Vec<Resource>,
    pub artists: Vec<Person>,
    pub actors: Vec<Person>,
    pub authors: Vec<Person>,
    pub producers: Vec<String>,
    pub directors: Vec<String>,
    pub publishers: Vec<String>,
    pub contributors: Vec<String>,
    pub genres: Vec<Genre>,
    pub albums: Vec<String>,
    pub playlists: Vec<String>,
    pub album_arts: Vec<AlbumArt>,
    pub artist_discography_uri: String,
    pub lyrics_uri: String,
    pub relations: Vec<String>,
    pub storage_medium: String,
    pub description: String,
    pub long_description: String,
    pub icon: String,
    pub regions: Vec<String>,
    pub rights: Vec<String>,
    pub date: Option<Date>,
    pub languages: Vec<String>,

    // Version 2 et plus
    pub playback_count: i32,
    pub last_playback_time: Option<DateTime>,
    pub last_playback_position: String,
    pub recorded_start: Option<DateTime>,
    pub recorded_end: Option<DateTime>,
    pub program_title: String,
    pub series_title: String,
    pub episode_count: u32,
    pub episode_number: u32,
    pub episode_season: u32,
    pub ratings: Vec<Rating>,
    pub call_sign: String,
    pub price: Option<Price>,
    pub signal_strength: i32,
    pub never_playable: bool,
    pub bookmark_ids: Vec<String>,
    pub scheduled_end_time: Option<DateTime>,

    pub channel_nr: i32,
    pub channel_name: String,
    pub radio_call_sign: String,
    pub radio_station_id: String,
    pub radio_band: String,
    pub dvd_region_code: i32,
    pub original_track_number: i32,
    pub toc: String,
    pub user_annotation: String,
    pub object_update_id: u32,

    // Items
    pub ref_id: String,

    // Conteneurs
    pub child_count: u32,
    pub child_container_count: u32,
    pub searchable: bool,
    pub create_classes: Vec<UpnpClass>,
    pub search_classes: Vec<UpnpClass>,
    pub storage_total: i64,
    pub storage_used: i64,
    pub storage_free: i64,
    pub storage_max_partition: i64,
    pub container_update_id: u32,
    pub total_deleted_child_count: u32,

    properties: PropertyList<Self>,
}

crate::impl_schema!(UpnpObject);

impl UpnpObject {
    /// Objet vide de la classe `kind`. Seuls `@restricted` et `upnp:class`
    /// sont valides.
    pub fn new(kind: ObjectKind) -> Self {
        let mut object = Self {
            kind,
            id: String::new(),
            parent_id: String::new(),
            restricted: true,
            class: UpnpClass::new(kind.class_type()),
            title: String::new(),
            creator: String::new(),
            write_status: String::new(),
            resources: Vec::new(),
            artists: Vec::new(),
            actors: Vec::new(),
            authors: Vec::new(),
            producers: Vec::new(),
            directors: Vec::new(),
            publishers: Vec::new(),
            contributors: Vec::new(),
            genres: Vec::new(),
            albums: Vec::new(),
            playlists: Vec::new(),
            album_arts: Vec::new(),
            artist_discography_uri: String::new(),
            lyrics_uri: String::new(),
            relations: Vec::new(),
            storage_medium: String::new(),
            description: String::new(),
            long_description: String::new(),
            icon: String::new(),
            regions: Vec::new(),
            rights: Vec::new(),
            date: None,
            languages: Vec::new(),
            playback_count: 0,
            last_playback_time: None,
            last_playback_position: String::new(),
            recorded_start: None,
            recorded_end: None,
            program_title: String::new(),
            series_title: String::new(),
            episode_count: 0,
            episode_number: 0,
            episode_season: 0,
            ratings: Vec::new(),
            call_sign: String::new(),
            price: None,
            signal_strength: 0,
            never_playable: false,
            bookmark_ids: Vec::new(),
            scheduled_end_time: None,
            channel_nr: 0,
            channel_name: String::new(),
            radio_call_sign: String::new(),
            radio_station_id: String::new(),
            radio_band: String::new(),
            dvd_region_code: 0,
            original_track_number: 0,
            toc: String::new(),
            user_annotation: String::new(),
            object_update_id: 0,
            ref_id: String::new(),
            child_count: 0,
            child_container_count: 0,
            searchable: false,
            create_classes: Vec::new(),
            search_classes: Vec::new(),
            storage_total: 0,
            storage_used: 0,
            storage_free: 0,
            storage_max_partition: 0,
            container_update_id: 0,
            total_deleted_child_count: 0,
            properties: object_properties(kind),
        };
        object.set_valid("@restricted", true);
        object.set_valid("upnp:class", true);
        object
    }

    /// Objet identifié, prêt à être sérialisé.
    pub fn create(
        kind: ObjectKind,
        id: impl Into<String>,
        parent_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let mut object = Self::new(kind);
        object.set_id(id);
        object.set_parent_id(parent_id);
        object.set_title(title);
        object
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    fn touch(&mut self, key: &str) {
        self.set_valid(key, true);
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        self.touch("@id");
    }

    pub fn set_parent_id(&mut self, parent_id: impl Into<String>) {
        self.parent_id = parent_id.into();
        self.touch("@parentID");
    }

    pub fn set_restricted(&mut self, restricted: bool) {
        self.restricted = restricted;
        self.touch("@restricted");
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch("dc:title");
    }

    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.creator = creator.into();
        self.touch("dc:creator");
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch("dc:description");
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
        self.touch("res");
    }

    pub fn add_artist(&mut self, artist: Person) {
        self.artists.push(artist);
        self.touch("upnp:artist");
    }

    pub fn add_genre(&mut self, genre: Genre) {
        self.genres.push(genre);
        self.touch("upnp:genre");
    }

    pub fn add_album(&mut self, album: impl Into<String>) {
        self.albums.push(album.into());
        self.touch("upnp:album");
    }

    pub fn add_album_art(&mut self, art: AlbumArt) {
        self.album_arts.push(art);
        self.touch("upnp:albumArtURI");
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(Date::new(date));
        self.touch("dc:date");
    }

    pub fn set_track_number(&mut self, track: i32) {
        self.original_track_number = track;
        self.touch("upnp:originalTrackNumber");
    }

    /// Sans effet sur un item.
    pub fn set_child_count(&mut self, count: u32) {
        self.child_count = count;
        self.touch("@childCount");
    }

    pub fn set_searchable(&mut self, searchable: bool) {
        self.searchable = searchable;
        self.touch("@searchable");
    }

    pub fn add_create_class(&mut self, class: UpnpClass) {
        self.create_classes.push(class);
        self.touch("upnp:createClass");
    }

    pub fn add_search_class(&mut self, class: UpnpClass) {
        self.search_classes.push(class);
        self.touch("upnp:searchClass");
    }

    /// Ressource principale (première déclarée).
    pub fn primary_resource(&self) -> Option<&Resource> {
        if !self.is_valid("res") {
            return None;
        }
        self.resources.first()
    }

    fn check_class(&self) -> Result<()> {
        let class = self.class.class_type.as_str();
        let element = self.kind.element_name();
        let consistent = if self.kind.is_container() {
            !class.starts_with("object.item")
        } else {
            !class.starts_with("object.container")
        };
        if consistent {
            Ok(())
        } else {
            Err(DidlError::validation(
                element,
                format!("class '{}' cannot be carried by <{}>", class, element),
            ))
        }
    }
}

fn object_properties(kind: ObjectKind) -> PropertyList<UpnpObject> {
    let mut p = PropertyList::<UpnpObject>::new();

    p.bind_string("@id", |o| &o.id, |o| &mut o.id).required();
    p.bind_string("@parentID", |o| &o.parent_id, |o| &mut o.parent_id)
        .required();
    p.bind_boolean("@restricted", |o| &o.restricted, |o| &mut o.restricted)
        .required();
    if kind.is_container() {
        p.bind_unsigned_integer("@childCount", |o| &o.child_count, |o| &mut o.child_count);
        p.bind_unsigned_integer(
            "@childContainerCount",
            |o| &o.child_container_count,
            |o| &mut o.child_container_count,
        );
        p.bind_boolean("@searchable", |o| &o.searchable, |o| &mut o.searchable);
    } else {
        p.bind_string("@refID", |o| &o.ref_id, |o| &mut o.ref_id);
    }
    p.bind_boolean("@neverPlayable", |o| &o.never_playable, |o| &mut o.never_playable)
        .minimum_version(2);

    p.bind_element("upnp:class", |o| &o.class, |o| &mut o.class)
        .required();
    p.bind_string("dc:title", |o| &o.title, |o| &mut o.title).required();
    p.bind_string("dc:creator", |o| &o.creator, |o| &mut o.creator);
    p.bind_string("upnp:writeStatus", |o| &o.write_status, |o| &mut o.write_status);
    p.bind_elements("res", |o| &o.resources, |o| &mut o.resources)
        .generator(Resource::default());
    p.bind_elements("upnp:artist", |o| &o.artists, |o| &mut o.artists)
        .generator(Person::artist(""));
    p.bind_elements("upnp:actor", |o| &o.actors, |o| &mut o.actors)
        .generator(Person::actor(""));
    p.bind_elements("upnp:author", |o| &o.authors, |o| &mut o.authors)
        .generator(Person::author(""));
    p.bind_strings("upnp:producer", |o| &o.producers, |o| &mut o.producers);
    p.bind_strings("upnp:director", |o| &o.directors, |o| &mut o.directors);
    p.bind_strings("dc:publisher", |o| &o.publishers, |o| &mut o.publishers);
    p.bind_strings("dc:contributor", |o| &o.contributors, |o| &mut o.contributors);
    p.bind_elements("upnp:genre", |o| &o.genres, |o| &mut o.genres)
        .generator(Genre::default());
    p.bind_strings("upnp:album", |o| &o.albums, |o| &mut o.albums);
    p.bind_strings("upnp:playlist", |o| &o.playlists, |o| &mut o.playlists);
    p.bind_elements("upnp:albumArtURI", |o| &o.album_arts, |o| &mut o.album_arts)
        .generator(AlbumArt::default());
    p.bind_string(
        "upnp:artistDiscographyURI",
        |o| &o.artist_discography_uri,
        |o| &mut o.artist_discography_uri,
    );
    p.bind_string("upnp:lyricsURI", |o| &o.lyrics_uri, |o| &mut o.lyrics_uri);
    p.bind_strings("dc:relation", |o| &o.relations, |o| &mut o.relations);
    p.bind_string("upnp:storageMedium", |o| &o.storage_medium, |o| &mut o.storage_medium);
    p.bind_string("dc:description", |o| &o.description, |o| &mut o.description);
    p.bind_string("upnp:longDescription", |o| &o.long_description, |o| &mut o.long_description);
    p.bind_string("upnp:icon", |o| &o.icon, |o| &mut o.icon);
    p.bind_strings("upnp:region", |o| &o.regions, |o| &mut o.regions);
    p.bind_strings("dc:rights", |o| &o.rights, |o| &mut o.rights);
    p.bind_optional_element("dc:date", |o| &o.date, |o| &mut o.date)
        .generator(Date::default());
    p.bind_strings("dc:language", |o| &o.languages, |o| &mut o.languages);

    p.bind_integer("upnp:playbackCount", |o| &o.playback_count, |o| &mut o.playback_count)
        .minimum_version(2);
    p.bind_optional_element("upnp:lastPlaybackTime", |o| &o.last_playback_time, |o| &mut o.last_playback_time)
        .generator(DateTime::empty(LAST_PLAYBACK_TIME))
        .minimum_version(2);
    p.bind_string(
        "upnp:lastPlaybackPosition",
        |o| &o.last_playback_position,
        |o| &mut o.last_playback_position,
    )
    .minimum_version(2);
    p.bind_optional_element("upnp:recordedStartDateTime", |o| &o.recorded_start, |o| &mut o.recorded_start)
        .generator(DateTime::empty(RECORDED_START_DATE_TIME))
        .minimum_version(2);
    p.bind_optional_element("upnp:recordedEndDateTime", |o| &o.recorded_end, |o| &mut o.recorded_end)
        .generator(DateTime::empty(RECORDED_END_DATE_TIME))
        .minimum_version(2);
    p.bind_string("upnp:programTitle", |o| &o.program_title, |o| &mut o.program_title)
        .minimum_version(2);
    p.bind_string("upnp:seriesTitle", |o| &o.series_title, |o| &mut o.series_title)
        .minimum_version(2);
    p.bind_unsigned_integer("upnp:episodeCount", |o| &o.episode_count, |o| &mut o.episode_count)
        .minimum_version(2);
    p.bind_unsigned_integer("upnp:episodeNumber", |o| &o.episode_number, |o| &mut o.episode_number)
        .minimum_version(2);
    p.bind_unsigned_integer("upnp:episodeSeason", |o| &o.episode_season, |o| &mut o.episode_season)
        .minimum_version(4);
    p.bind_elements("upnp:rating", |o| &o.ratings, |o| &mut o.ratings)
        .generator(Rating::default())
        .minimum_version(2);
    p.bind_string("upnp:callSign", |o| &o.call_sign, |o| &mut o.call_sign)
        .minimum_version(2);
    p.bind_optional_element("upnp:price", |o| &o.price, |o| &mut o.price)
        .generator(Price::default())
        .minimum_version(2);
    p.bind_integer("upnp:signalStrength", |o| &o.signal_strength, |o| &mut o.signal_strength)
        .minimum_version(2);
    p.bind_strings("upnp:bookmarkID", |o| &o.bookmark_ids, |o| &mut o.bookmark_ids)
        .minimum_version(2);
    p.bind_optional_element("upnp:scheduledEndTime", |o| &o.scheduled_end_time, |o| &mut o.scheduled_end_time)
        .generator(DateTime::empty(SCHEDULED_END_TIME))
        .minimum_version(3);

    p.bind_integer("upnp:channelNr", |o| &o.channel_nr, |o| &mut o.channel_nr);
    p.bind_string("upnp:channelName", |o| &o.channel_name, |o| &mut o.channel_name);
    p.bind_string("upnp:radioCallSign", |o| &o.radio_call_sign, |o| &mut o.radio_call_sign);
    p.bind_string("upnp:radioStationID", |o| &o.radio_station_id, |o| &mut o.radio_station_id);
    p.bind_string("upnp:radioBand", |o| &o.radio_band, |o| &mut o.radio_band);
    p.bind_integer("upnp:DVDRegionCode", |o| &o.dvd_region_code, |o| &mut o.dvd_region_code);
    p.bind_integer(
        "upnp:originalTrackNumber",
        |o| &o.original_track_number,
        |o| &mut o.original_track_number,
    );
    p.bind_string("upnp:toc", |o| &o.toc, |o| &mut o.toc);
    p.bind_string("upnp:userAnnotation", |o| &o.user_annotation, |o| &mut o.user_annotation);
    p.bind_unsigned_integer("upnp:objectUpdateID", |o| &o.object_update_id, |o| &mut o.object_update_id)
        .minimum_version(3);

    if kind.is_container() {
        p.bind_elements("upnp:createClass", |o| &o.create_classes, |o| &mut o.create_classes)
            .generator(UpnpClass::create_class("", false));
        p.bind_elements("upnp:searchClass", |o| &o.search_classes, |o| &mut o.search_classes)
            .generator(UpnpClass::search_class("", false));
        p.bind_long("upnp:storageTotal", |o| &o.storage_total, |o| &mut o.storage_total);
        p.bind_long("upnp:storageUsed", |o| &o.storage_used, |o| &mut o.storage_used);
        p.bind_long("upnp:storageFree", |o| &o.storage_free, |o| &mut o.storage_free);
        p.bind_long(
            "upnp:storageMaxPartition",
            |o| &o.storage_max_partition,
            |o| &mut o.storage_max_partition,
        );
        p.bind_unsigned_integer(
            "upnp:containerUpdateID",
            |o| &o.container_update_id,
            |o| &mut o.container_update_id,
        )
        .minimum_version(3);
        p.bind_unsigned_integer(
            "upnp:totalDeletedChildCount",
            |o| &o.total_deleted_child_count,
            |o| &mut o.total_deleted_child_count,
        )
        .minimum_version(3);
    }

    p
}

fn protocol_info_for(mime_type: Option<&str>) -> String {
    format!("http-get:*:{}:*", mime_type.unwrap_or("*"))
}

impl DidlElement for UpnpObject {
    fn element_name(&self) -> &str {
        self.kind.element_name()
    }

    fn identifier(&self) -> &str {
        &self.class.class_type
    }

    fn extends(&self) -> Vec<String> {
        vec![self.kind.parent_class().to_string()]
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn serialize_extra(&self, _node: &mut XmlElement, _ctx: &SerializationContext) -> Result<()> {
        self.check_class()
    }

    fn deserialize_extra(&mut self, _node: &XmlElement, _ctx: &DeserializationContext) -> Result<()> {
        self.check_class()
    }

    fn class_type(&self) -> Option<&str> {
        Some(self.class.class_type.as_str())
    }

    fn set_class_type(&mut self, class_type: &str) -> bool {
        self.class.set_type(class_type);
        self.touch("upnp:class");
        true
    }

    fn can_handle(&self, item: &MediaItem) -> bool {
        self.kind.can_handle(item)
    }

    fn to_media_item(&self, _ctx: &SerializationContext) -> Option<MediaItem> {
        if !self.is_valid("@id") {
            return None;
        }
        let valid = |key: &str| self.is_valid(key);
        let resource = self.primary_resource();

        Some(MediaItem {
            id: self.id.clone(),
            parent_id: if valid("@parentID") { self.parent_id.clone() } else { String::new() },
            label: if valid("dc:title") { self.title.clone() } else { String::new() },
            is_folder: self.kind.is_container(),
            media_type: self.kind.media_type(),
            artists: if valid("upnp:artist") {
                self.artists.iter().map(|a| a.name.clone()).collect()
            } else {
                Vec::new()
            },
            album: self.albums.first().filter(|_| valid("upnp:album")).cloned(),
            genres: if valid("upnp:genre") {
                self.genres.iter().map(|g| g.name.clone()).collect()
            } else {
                Vec::new()
            },
            track_number: valid("upnp:originalTrackNumber").then_some(self.original_track_number),
            date: self.date.as_ref().filter(|_| valid("dc:date")).and_then(|d| d.date),
            duration: resource.and_then(Resource::duration_seconds),
            url: resource.map(|r| r.uri.clone()),
            mime_type: resource.and_then(|r| r.mime_type()).map(str::to_string),
            size: resource.filter(|r| r.is_valid("@size")).map(|r| r.size),
            thumbnail: self
                .album_arts
                .first()
                .filter(|_| valid("upnp:albumArtURI"))
                .map(|a| a.uri.clone()),
        })
    }

    fn from_media_item(&mut self, item: &MediaItem, _ctx: &DeserializationContext) -> bool {
        if item.id.is_empty() || item.is_folder != self.kind.is_container() {
            trace!(item = %item.id, class = %self.class.class_type, "Media item rejected");
            return false;
        }

        self.set_id(item.id.clone());
        self.set_parent_id(item.parent_id.clone());
        self.set_title(item.label.clone());

        for artist in &item.artists {
            self.add_artist(Person::artist(artist.clone()));
        }
        if let Some(album) = &item.album {
            self.add_album(album.clone());
        }
        for genre in &item.genres {
            self.add_genre(Genre::new(genre.clone()));
        }
        if let Some(track) = item.track_number {
            self.set_track_number(track);
        }
        if let Some(date) = item.date {
            self.set_date(date);
        }
        if let Some(thumbnail) = &item.thumbnail {
            self.add_album_art(AlbumArt::new(thumbnail.clone()));
        }
        if let Some(url) = &item.url {
            let mut resource = Resource::new(url.clone(), protocol_info_for(item.mime_type.as_deref()));
            if let Some(size) = item.size {
                resource = resource.with_size(size);
            }
            if let Some(duration) = item.duration {
                resource.set_duration_seconds(duration);
            }
            self.add_resource(resource);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_xml_string;
    use crate::media::MediaType;

    fn track() -> UpnpObject {
        let mut track = UpnpObject::create(ObjectKind::MusicTrack, "42", "7", "So What");
        track.add_artist(Person::artist("Miles Davis"));
        track.add_album("Kind of Blue");
        track.set_track_number(1);
        track.add_resource(
            Resource::new("http://host/42.flac", "http-get:*:audio/flac:*")
                .with_size(1024)
                .with_duration_seconds(562),
        );
        track
    }

    #[test]
    fn test_item_and_container_bindings() {
        let item = UpnpObject::new(ObjectKind::MusicTrack);
        assert!(item.property_index("@refID").is_some());
        assert!(item.property_index("@childCount").is_none());

        let container = UpnpObject::new(ObjectKind::MusicAlbum);
        assert!(container.property_index("@childCount").is_some());
        assert!(container.property_index("upnp:createClass").is_some());
        assert!(container.property_index("@refID").is_none());
    }

    #[test]
    fn test_identity() {
        let album = UpnpObject::new(ObjectKind::MusicAlbum);
        assert_eq!(album.element_name(), "container");
        assert_eq!(album.identifier(), "object.container.album.musicAlbum");
        assert_eq!(album.extends(), vec!["object.container.album".to_string()]);
        assert_eq!(album.class_type(), Some("object.container.album.musicAlbum"));
    }

    #[test]
    fn test_serialize_track() {
        let xml = to_xml_string(&track(), &SerializationContext::default()).unwrap();
        assert!(xml.starts_with("<item"));
        assert!(xml.contains("id=\"42\""));
        assert!(xml.contains("restricted=\"1\""));
        assert!(xml.contains("<upnp:class>object.item.audioItem.musicTrack</upnp:class>"));
        assert!(xml.contains("<dc:title>So What</dc:title>"));
        assert!(xml.contains("<upnp:artist>Miles Davis</upnp:artist>"));
        assert!(xml.contains("duration=\"0:09:22\""));
        assert!(!xml.contains("dc:creator"));
    }

    #[test]
    fn test_missing_title_fails() {
        let mut object = UpnpObject::new(ObjectKind::Item);
        object.set_id("1");
        object.set_parent_id("0");
        let err = to_xml_string(&object, &SerializationContext::default()).unwrap_err();
        assert!(matches!(
            err,
            DidlError::MissingRequiredProperty { ref property, .. } if property == "dc:title"
        ));
    }

    #[test]
    fn test_media_item_conversion() {
        let item = track().to_media_item(&SerializationContext::default()).unwrap();
        assert_eq!(item.media_type, MediaType::Song);
        assert_eq!(item.artists, vec!["Miles Davis".to_string()]);
        assert_eq!(item.album.as_deref(), Some("Kind of Blue"));
        assert_eq!(item.track_number, Some(1));
        assert_eq!(item.duration, Some(562));
        assert_eq!(item.mime_type.as_deref(), Some("audio/flac"));
        assert_eq!(item.size, Some(1024));

        let mut copy = UpnpObject::new(ObjectKind::MusicTrack);
        assert!(copy.from_media_item(&item, &DeserializationContext::default()));
        assert_eq!(copy.to_media_item(&SerializationContext::default()), Some(item));
    }

    #[test]
    fn test_folder_rejected_by_item() {
        let folder = MediaItem::folder("3", "Jazz", MediaType::Genre);
        let mut object = UpnpObject::new(ObjectKind::Item);
        assert!(!object.from_media_item(&folder, &DeserializationContext::default()));
    }
}
