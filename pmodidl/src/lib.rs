//! # pmodidl - Sérialisation DIDL-Lite
//!
//! Moteur de (dé)sérialisation DIDL-Lite piloté par des schémas : chaque type
//! d'élément déclare ses propriétés (attributs, texte, sous-éléments) sous
//! forme de liaisons, et un codec générique parcourt ces liaisons pour lire
//! ou écrire l'arbre XML.
//!
//! ## Organisation
//!
//! - [`property`] : liaisons de propriétés et listes ordonnées ;
//! - [`element`] : traits [`DidlElement`] et [`PropertyHost`] ;
//! - [`codec`] : parcours générique des liaisons ;
//! - [`registry`] : fabrique de prototypes (classe exacte, plus long
//!   préfixe, prédicats ordonnés) ;
//! - [`path`] : accès aux propriétés par chemin (`res@protocolInfo`) ;
//! - [`document`] : document `DIDL-Lite` complet ;
//! - [`objects`] et [`properties`] : modèle UPnP AV.
//!
//! ## Exemple
//!
//! ```
//! use pmodidl::{DidlLiteDocument, ObjectKind, SerializationContext, UpnpObject};
//! use pmodidl::properties::{Person, Resource};
//!
//! let mut track = UpnpObject::create(ObjectKind::MusicTrack, "42", "7", "So What");
//! track.add_artist(Person::artist("Miles Davis"));
//! track.add_resource(Resource::new("http://host/42.flac", "http-get:*:audio/flac:*"));
//!
//! let mut doc = DidlLiteDocument::new();
//! doc.push(track);
//! let xml = doc.to_xml_string(&SerializationContext::default())?;
//! assert!(xml.contains("<dc:title>So What</dc:title>"));
//! # Ok::<(), pmodidl::DidlError>(())
//! ```

pub mod bootstrap;
pub mod codec;
pub mod config;
pub mod context;
pub mod document;
pub mod element;
pub mod errors;
pub mod json;
pub mod media;
pub mod objects;
pub mod path;
pub mod properties;
pub mod property;
pub mod registry;
pub mod utils;
pub mod value;

pub use bootstrap::{default_registry, global_registry, register_defaults};
pub use config::DidlConfig;
pub use context::{DeserializationContext, NamespaceTable, PropertyFilter, SerializationContext};
pub use document::DidlLiteDocument;
pub use element::{DidlElement, PropertyHost, Schema};
pub use errors::{DidlError, Result};
pub use media::{MediaItem, MediaType};
pub use objects::{ObjectKind, UpnpObject};
pub use path::{PropertyPath, get_property, has_property, set_property, set_property_values};
pub use property::{Cardinality, FieldRef, Placement, PropertyBinding, PropertyList};
pub use registry::ElementRegistry;
pub use value::{PropertyKind, Scalar, ScalarValue};
