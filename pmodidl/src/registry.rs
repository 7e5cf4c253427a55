//! Registre des types d'éléments et fabrique par clonage de prototypes.
//!
//! Trois modes de résolution :
//! - par classe UPnP (`object.container.album.musicAlbum`) : correspondance
//!   exacte, sinon plus long préfixe commun de segments ;
//! - par nœud XML : classe lue dans l'enfant `upnp:class`, sinon nom de
//!   l'élément ;
//! - par valeur native : premier prédicat `can_handle` satisfait, les types
//!   les plus spécialisés étant essayés d'abord.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use xmltree::Element as XmlElement;

use crate::context::DeserializationContext;
use crate::element::DidlElement;
use crate::errors::{DidlError, Result};
use crate::media::MediaItem;
use crate::utils::{matching_children, names_match, node_text, qualified_name};

const CLASS_ELEMENT: &str = "upnp:class";

struct Registration {
    identifier: String,
    extends: Vec<String>,
    prototype: Arc<dyn DidlElement>,
}

#[derive(Default)]
struct RegistryState {
    registrations: Vec<Registration>,
    index: HashMap<String, usize>,
    /// Indices des enregistrements, du plus spécialisé au plus générique.
    order: Vec<usize>,
}

impl RegistryState {
    /// Tri topologique sur la relation `extends` : chaque parent est placé
    /// avant ses descendants, puis l'ordre est inversé.
    fn sorted_order(&self) -> std::result::Result<Vec<usize>, String> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Visiting,
            Done,
        }

        fn visit(
            state: &RegistryState,
            node: usize,
            marks: &mut [Mark],
            out: &mut Vec<usize>,
        ) -> std::result::Result<(), String> {
            match marks[node] {
                Mark::Done => return Ok(()),
                Mark::Visiting => return Err(state.registrations[node].identifier.clone()),
                Mark::New => {}
            }
            marks[node] = Mark::Visiting;
            for parent in &state.registrations[node].extends {
                if let Some(&parent_index) = state.index.get(parent) {
                    visit(state, parent_index, marks, out)?;
                }
            }
            marks[node] = Mark::Done;
            out.push(node);
            Ok(())
        }

        let mut marks = vec![Mark::New; self.registrations.len()];
        let mut out = Vec::with_capacity(self.registrations.len());
        for node in 0..self.registrations.len() {
            visit(self, node, &mut marks, &mut out)?;
        }
        out.reverse();
        Ok(out)
    }
}

/// Registre des prototypes d'éléments.
///
/// Les enregistrements sont protégés par un verrou lecture/écriture : on
/// enregistre au démarrage, puis les résolutions ne prennent que le verrou
/// en lecture.
#[derive(Default)]
pub struct ElementRegistry {
    state: RwLock<RegistryState>,
}

impl ElementRegistry {
    /// Crée un registre vide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre un prototype sous son identifiant.
    ///
    /// # Errors
    ///
    /// - [`DidlError::DuplicateType`] si l'identifiant est déjà enregistré ;
    /// - [`DidlError::CyclicClassHierarchy`] si la relation `extends` forme
    ///   un cycle (l'enregistrement est alors annulé).
    pub fn register<E: DidlElement>(&self, prototype: E) -> Result<()> {
        self.register_prototype(Arc::new(prototype))
    }

    pub fn register_prototype(&self, prototype: Arc<dyn DidlElement>) -> Result<()> {
        let identifier = prototype.identifier().to_string();
        let mut state = self.state.write();

        if state.index.contains_key(&identifier) {
            return Err(DidlError::DuplicateType(identifier));
        }

        let position = state.registrations.len();
        state.registrations.push(Registration {
            identifier: identifier.clone(),
            extends: prototype.extends(),
            prototype,
        });
        state.index.insert(identifier.clone(), position);

        let sorted = state.sorted_order();
        match sorted {
            Ok(order) => {
                state.order = order;
                debug!(identifier = %identifier, count = state.registrations.len(), "Element type registered");
                Ok(())
            }
            Err(culprit) => {
                state.registrations.pop();
                state.index.remove(&identifier);
                Err(DidlError::CyclicClassHierarchy(culprit))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.state.read().index.contains_key(identifier)
    }

    /// Identifiants dans l'ordre d'évaluation des prédicats.
    pub fn predicate_order(&self) -> Vec<String> {
        let state = self.state.read();
        state
            .order
            .iter()
            .map(|&i| state.registrations[i].identifier.clone())
            .collect()
    }

    /// Clone le prototype enregistré sous exactement cet identifiant.
    pub fn resolve_exact(&self, identifier: &str) -> Option<Box<dyn DidlElement>> {
        let state = self.state.read();
        state
            .index
            .get(identifier)
            .map(|&i| state.registrations[i].prototype.clone_element())
    }

    /// Résout une classe UPnP : correspondance exacte, sinon enregistrement
    /// partageant le plus long préfixe de segments avec la requête. Dans ce
    /// second cas, la classe du clone est remplacée par la requête.
    ///
    /// À longueur de préfixe égale, un ancêtre exact de la requête (tous ses
    /// segments correspondent) l'emporte, puis l'identifiant le plus court en
    /// segments, puis le plus petit dans l'ordre lexicographique.
    pub fn resolve_by_class(&self, class_type: &str) -> Option<Box<dyn DidlElement>> {
        if let Some(element) = self.resolve_exact(class_type) {
            return Some(element);
        }

        let query: Vec<&str> = class_type.split('.').collect();
        let state = self.state.read();

        let best = state
            .registrations
            .iter()
            .filter(|r| r.prototype.class_type().is_some())
            .filter_map(|r| {
                let segments: Vec<&str> = r.identifier.split('.').collect();
                let common = segments
                    .iter()
                    .zip(&query)
                    .take_while(|(a, b)| a == b)
                    .count();
                (common > 0).then_some((common, segments.len(), r))
            })
            .min_by(|(ca, la, ra), (cb, lb, rb)| {
                let ancestor_a = ca == la;
                let ancestor_b = cb == lb;
                cb.cmp(ca)
                    .then(ancestor_b.cmp(&ancestor_a))
                    .then(la.cmp(lb))
                    .then(ra.identifier.cmp(&rb.identifier))
            });

        let (common, _, registration) = best?;
        debug!(
            query = %class_type,
            matched = %registration.identifier,
            segments = common,
            "Class resolved by partial match"
        );
        let mut element = registration.prototype.clone_element();
        element.set_class_type(class_type);
        Some(element)
    }

    /// Comme [`resolve_by_class`](Self::resolve_by_class), avec une erreur
    /// [`DidlError::UnknownType`] en cas d'échec.
    pub fn create(&self, class_type: &str) -> Result<Box<dyn DidlElement>> {
        self.resolve_by_class(class_type)
            .ok_or_else(|| DidlError::UnknownType(class_type.to_string()))
    }

    /// Résout le type d'un nœud XML : classe de l'enfant `upnp:class` si
    /// présent, sinon nom qualifié du nœud.
    pub fn resolve_node(&self, node: &XmlElement, lenient: bool) -> Option<Box<dyn DidlElement>> {
        let class_type = matching_children(node, CLASS_ELEMENT, lenient)
            .first()
            .and_then(|child| node_text(child))
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        if let Some(class_type) = class_type {
            if let Some(element) = self.resolve_by_class(&class_type) {
                return Some(element);
            }
        }

        let name = qualified_name(node);
        if let Some(element) = self.resolve_exact(&name) {
            return Some(element);
        }
        if !lenient {
            return None;
        }

        let state = self.state.read();
        state
            .registrations
            .iter()
            .filter(|r| r.prototype.class_type().is_none())
            .find(|r| names_match(&name, r.prototype.element_name(), true))
            .map(|r| r.prototype.clone_element())
    }

    /// Premier type, du plus spécialisé au plus générique, dont le prédicat
    /// accepte la valeur.
    pub fn resolve_by_predicate(&self, item: &MediaItem) -> Option<Box<dyn DidlElement>> {
        let state = self.state.read();
        state
            .order
            .iter()
            .map(|&i| &state.registrations[i])
            .find(|r| r.prototype.can_handle(item))
            .map(|r| r.prototype.clone_element())
    }

    /// Construit l'élément le plus spécifique pour une valeur native et le
    /// remplit à partir d'elle.
    pub fn element_for_media_item(
        &self,
        item: &MediaItem,
        ctx: &DeserializationContext,
    ) -> Option<Box<dyn DidlElement>> {
        let mut element = self.resolve_by_predicate(item)?;
        if element.from_media_item(item, ctx) {
            Some(element)
        } else {
            debug!(item = %item.id, identifier = %element.identifier(), "Media item conversion failed");
            None
        }
    }
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("types", &self.predicate_order())
            .finish()
    }
}
