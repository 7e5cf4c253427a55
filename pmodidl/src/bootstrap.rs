//! Enregistrement des types DIDL-Lite connus.
//!
//! L'application appelle [`register_defaults`] sur son propre registre, ou
//! utilise [`global_registry`], initialisé au premier accès.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{error, info};

use crate::element::DidlElement;
use crate::errors::Result;
use crate::objects::{ObjectKind, UpnpObject};
use crate::properties::{
    AlbumArt, Date, DateTime, Genre, LAST_PLAYBACK_TIME, Person, Price, RECORDED_END_DATE_TIME,
    RECORDED_START_DATE_TIME, Rating, Resource, SCHEDULED_END_TIME, UpnpClass,
};
use crate::registry::ElementRegistry;

static GLOBAL_REGISTRY: Lazy<ElementRegistry> = Lazy::new(default_registry);

/// Prototypes de tous les types connus, objets puis éléments de propriété.
fn default_prototypes() -> Vec<Arc<dyn DidlElement>> {
    let mut prototypes: Vec<Arc<dyn DidlElement>> = ObjectKind::ALL
        .into_iter()
        .map(|kind| Arc::new(UpnpObject::new(kind)) as Arc<dyn DidlElement>)
        .collect();

    let properties: [Arc<dyn DidlElement>; 16] = [
        Arc::new(UpnpClass::new("")),
        Arc::new(UpnpClass::create_class("", false)),
        Arc::new(UpnpClass::search_class("", false)),
        Arc::new(Genre::default()),
        Arc::new(Person::artist("")),
        Arc::new(Person::actor("")),
        Arc::new(Person::author("")),
        Arc::new(Resource::default()),
        Arc::new(AlbumArt::default()),
        Arc::new(Rating::default()),
        Arc::new(Price::default()),
        Arc::new(Date::default()),
        Arc::new(DateTime::empty(LAST_PLAYBACK_TIME)),
        Arc::new(DateTime::empty(RECORDED_START_DATE_TIME)),
        Arc::new(DateTime::empty(RECORDED_END_DATE_TIME)),
        Arc::new(DateTime::empty(SCHEDULED_END_TIME)),
    ];
    prototypes.extend(properties);
    prototypes
}

/// Enregistre les types connus. Les identifiants déjà présents sont
/// conservés, un second appel est donc sans effet.
pub fn register_defaults(registry: &ElementRegistry) -> Result<()> {
    let mut added = 0;
    for prototype in default_prototypes() {
        if registry.contains(prototype.identifier()) {
            continue;
        }
        registry.register_prototype(prototype)?;
        added += 1;
    }
    info!(added, total = registry.len(), "DIDL-Lite element types registered");
    Ok(())
}

/// Nouveau registre contenant tous les types connus.
pub fn default_registry() -> ElementRegistry {
    let registry = ElementRegistry::new();
    if let Err(err) = register_defaults(&registry) {
        error!(error = %err, "Failed to register default DIDL-Lite element types");
    }
    registry
}

/// Registre partagé par tout le processus.
pub fn global_registry() -> &'static ElementRegistry {
    &GLOBAL_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_is_idempotent() {
        let registry = default_registry();
        let count = registry.len();
        assert_eq!(count, ObjectKind::ALL.len() + 16);
        register_defaults(&registry).unwrap();
        assert_eq!(registry.len(), count);
    }

    #[test]
    fn test_global_registry_is_populated() {
        assert!(global_registry().contains("object.item.audioItem.musicTrack"));
        assert!(global_registry().contains("upnp:genre"));
    }
}
