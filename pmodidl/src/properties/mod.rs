//! Éléments de propriété DIDL-Lite : sous-éléments des objets, chacun avec
//! sa propre liste de liaisons.

mod album_art;
mod class;
mod date;
mod genre;
mod person;
mod price;
mod rating;
mod resource;

pub use album_art::{ALBUM_ART, AlbumArt};
pub use class::{CLASS, CREATE_CLASS, SEARCH_CLASS, UpnpClass};
pub use date::{
    DATE, Date, DateTime, DaylightSaving, LAST_PLAYBACK_TIME, RECORDED_END_DATE_TIME, RECORDED_START_DATE_TIME,
    SCHEDULED_END_TIME,
};
pub use genre::{GENRE, Genre};
pub use person::{PERSON, Person, PersonKind};
pub use price::{PRICE, Price};
pub use rating::{RATING, Rating};
pub use resource::{RESOURCE, Resource};
