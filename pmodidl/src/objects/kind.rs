use std::fmt;

use serde::{Deserialize, Serialize};

use crate::media::{MediaItem, MediaType};

/// Classes d'objets UPnP connues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Item,
    AudioItem,
    MusicTrack,
    AudioBook,
    AudioBroadcast,
    VideoItem,
    Movie,
    MusicVideoClip,
    VideoBroadcast,
    ImageItem,
    Photo,
    PlaylistItem,
    Container,
    Album,
    MusicAlbum,
    PhotoAlbum,
    Genre,
    MusicGenre,
    MovieGenre,
    Person,
    MusicArtist,
    PlaylistContainer,
    StorageFolder,
}

/// Racine commune de toutes les classes.
pub const OBJECT_CLASS: &str = "object";

impl ObjectKind {
    pub const ALL: [ObjectKind; 23] = [
        ObjectKind::Item,
        ObjectKind::AudioItem,
        ObjectKind::MusicTrack,
        ObjectKind::AudioBook,
        ObjectKind::AudioBroadcast,
        ObjectKind::VideoItem,
        ObjectKind::Movie,
        ObjectKind::MusicVideoClip,
        ObjectKind::VideoBroadcast,
        ObjectKind::ImageItem,
        ObjectKind::Photo,
        ObjectKind::PlaylistItem,
        ObjectKind::Container,
        ObjectKind::Album,
        ObjectKind::MusicAlbum,
        ObjectKind::PhotoAlbum,
        ObjectKind::Genre,
        ObjectKind::MusicGenre,
        ObjectKind::MovieGenre,
        ObjectKind::Person,
        ObjectKind::MusicArtist,
        ObjectKind::PlaylistContainer,
        ObjectKind::StorageFolder,
    ];

    /// Classe UPnP par défaut (`object.item.audioItem.musicTrack`...).
    pub fn class_type(&self) -> &'static str {
        match self {
            ObjectKind::Item => "object.item",
            ObjectKind::AudioItem => "object.item.audioItem",
            ObjectKind::MusicTrack => "object.item.audioItem.musicTrack",
            ObjectKind::AudioBook => "object.item.audioItem.audioBook",
            ObjectKind::AudioBroadcast => "object.item.audioItem.audioBroadcast",
            ObjectKind::VideoItem => "object.item.videoItem",
            ObjectKind::Movie => "object.item.videoItem.movie",
            ObjectKind::MusicVideoClip => "object.item.videoItem.musicVideoClip",
            ObjectKind::VideoBroadcast => "object.item.videoItem.videoBroadcast",
            ObjectKind::ImageItem => "object.item.imageItem",
            ObjectKind::Photo => "object.item.imageItem.photo",
            ObjectKind::PlaylistItem => "object.item.playlistItem",
            ObjectKind::Container => "object.container",
            ObjectKind::Album => "object.container.album",
            ObjectKind::MusicAlbum => "object.container.album.musicAlbum",
            ObjectKind::PhotoAlbum => "object.container.album.photoAlbum",
            ObjectKind::Genre => "object.container.genre",
            ObjectKind::MusicGenre => "object.container.genre.musicGenre",
            ObjectKind::MovieGenre => "object.container.genre.movieGenre",
            ObjectKind::Person => "object.container.person",
            ObjectKind::MusicArtist => "object.container.person.musicArtist",
            ObjectKind::PlaylistContainer => "object.container.playlistContainer",
            ObjectKind::StorageFolder => "object.container.storageFolder",
        }
    }

    /// Classe parente, obtenue en retirant le dernier segment.
    pub fn parent_class(&self) -> &'static str {
        let class = self.class_type();
        class.rsplit_once('.').map_or(OBJECT_CLASS, |(parent, _)| parent)
    }

    pub fn from_class(class_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.class_type() == class_type)
    }

    pub fn is_container(&self) -> bool {
        self.class_type().starts_with("object.container")
    }

    /// Nom de l'élément XML : `item` ou `container`.
    pub fn element_name(&self) -> &'static str {
        if self.is_container() { "container" } else { "item" }
    }

    /// Type de média équivalent côté application.
    pub fn media_type(&self) -> MediaType {
        match self {
            ObjectKind::MusicTrack => MediaType::Song,
            ObjectKind::AudioItem | ObjectKind::AudioBook | ObjectKind::AudioBroadcast => MediaType::Audio,
            ObjectKind::Movie => MediaType::Movie,
            ObjectKind::VideoBroadcast => MediaType::Episode,
            ObjectKind::MusicVideoClip => MediaType::MusicVideo,
            ObjectKind::ImageItem | ObjectKind::Photo => MediaType::Picture,
            ObjectKind::Album | ObjectKind::MusicAlbum | ObjectKind::PhotoAlbum => MediaType::Album,
            ObjectKind::Person | ObjectKind::MusicArtist => MediaType::Artist,
            ObjectKind::Genre | ObjectKind::MusicGenre | ObjectKind::MovieGenre => MediaType::Genre,
            ObjectKind::PlaylistItem | ObjectKind::PlaylistContainer => MediaType::Playlist,
            ObjectKind::Container | ObjectKind::StorageFolder => MediaType::Folder,
            ObjectKind::Item | ObjectKind::VideoItem => MediaType::Unknown,
        }
    }

    /// Indique si cette classe peut représenter la valeur. Chaque classe
    /// restreint le prédicat de sa parente.
    pub fn can_handle(&self, item: &MediaItem) -> bool {
        let media = item.media_type;
        match self {
            ObjectKind::Item => !item.is_folder,
            ObjectKind::Container => item.is_folder,
            ObjectKind::AudioItem => {
                ObjectKind::Item.can_handle(item) && matches!(media, MediaType::Song | MediaType::Audio)
            }
            ObjectKind::MusicTrack => ObjectKind::AudioItem.can_handle(item) && media == MediaType::Song,
            ObjectKind::VideoItem => {
                ObjectKind::Item.can_handle(item)
                    && matches!(media, MediaType::Movie | MediaType::Episode | MediaType::MusicVideo)
            }
            ObjectKind::Movie => ObjectKind::VideoItem.can_handle(item) && media == MediaType::Movie,
            ObjectKind::VideoBroadcast => ObjectKind::VideoItem.can_handle(item) && media == MediaType::Episode,
            ObjectKind::MusicVideoClip => {
                ObjectKind::VideoItem.can_handle(item) && media == MediaType::MusicVideo
            }
            ObjectKind::ImageItem => ObjectKind::Item.can_handle(item) && media == MediaType::Picture,
            ObjectKind::Photo => ObjectKind::ImageItem.can_handle(item),
            ObjectKind::MusicAlbum => ObjectKind::Container.can_handle(item) && media == MediaType::Album,
            ObjectKind::MusicArtist => ObjectKind::Container.can_handle(item) && media == MediaType::Artist,
            ObjectKind::MusicGenre => ObjectKind::Container.can_handle(item) && media == MediaType::Genre,
            ObjectKind::PlaylistContainer => {
                ObjectKind::Container.can_handle(item) && media == MediaType::Playlist
            }
            ObjectKind::StorageFolder => ObjectKind::Container.can_handle(item) && media == MediaType::Folder,
            ObjectKind::AudioBook
            | ObjectKind::AudioBroadcast
            | ObjectKind::PlaylistItem
            | ObjectKind::Album
            | ObjectKind::PhotoAlbum
            | ObjectKind::Genre
            | ObjectKind::MovieGenre
            | ObjectKind::Person => false,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_hierarchy() {
        assert_eq!(ObjectKind::MusicTrack.parent_class(), "object.item.audioItem");
        assert_eq!(ObjectKind::Item.parent_class(), OBJECT_CLASS);
        for kind in ObjectKind::ALL {
            assert_eq!(ObjectKind::from_class(kind.class_type()), Some(kind));
            if kind.parent_class() != OBJECT_CLASS {
                assert!(ObjectKind::from_class(kind.parent_class()).is_some(), "{}", kind);
            }
        }
        assert_eq!(ObjectKind::MusicAlbum.element_name(), "container");
        assert_eq!(ObjectKind::Photo.element_name(), "item");
    }

    #[test]
    fn test_predicates_refine_parents() {
        let song = MediaItem::file("1", "Song", MediaType::Song);
        assert!(ObjectKind::MusicTrack.can_handle(&song));
        assert!(ObjectKind::AudioItem.can_handle(&song));
        assert!(ObjectKind::Item.can_handle(&song));
        assert!(!ObjectKind::VideoItem.can_handle(&song));
        assert!(!ObjectKind::Container.can_handle(&song));

        let album = MediaItem::folder("2", "Album", MediaType::Album);
        assert!(ObjectKind::MusicAlbum.can_handle(&album));
        assert!(ObjectKind::Container.can_handle(&album));
        assert!(!ObjectKind::Album.can_handle(&album));
        assert!(!ObjectKind::StorageFolder.can_handle(&album));
    }
}
