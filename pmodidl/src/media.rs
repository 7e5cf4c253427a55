//! Valeur native échangée avec l'application hôte.
//!
//! Le registre choisit le type d'objet UPnP le plus spécifique capable de
//! représenter un [`MediaItem`], puis l'objet se remplit à partir de lui.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nature du média décrit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Unknown,
    Song,
    Audio,
    Movie,
    Episode,
    MusicVideo,
    Picture,
    Album,
    Artist,
    Genre,
    Playlist,
    Folder,
}

impl MediaType {
    pub fn is_audio(&self) -> bool {
        matches!(self, MediaType::Song | MediaType::Audio)
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaType::Movie | MediaType::Episode | MediaType::MusicVideo)
    }
}

/// Élément de bibliothèque (fichier ou dossier) côté application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub parent_id: String,
    pub label: String,
    pub is_folder: bool,
    pub media_type: MediaType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Durée en secondes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl MediaItem {
    /// Crée un fichier média.
    pub fn file(id: impl Into<String>, label: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            media_type,
            ..Default::default()
        }
    }

    /// Crée un dossier.
    pub fn folder(id: impl Into<String>, label: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            is_folder: true,
            media_type,
            ..Default::default()
        }
    }
}
