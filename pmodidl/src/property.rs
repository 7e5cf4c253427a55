//! Liaisons de propriétés : description d'un champ d'élément et accès typé
//! à son stockage.
//!
//! Une liaison ne possède jamais la donnée : elle garde deux fonctions
//! d'accès (`fn(&T) -> &F` et `fn(&mut T) -> &mut F`) appliquées à l'élément
//! propriétaire. Un élément cloné ou déplacé reste donc cohérent avec ses
//! liaisons.

use std::fmt;
use std::sync::Arc;

use tracing::error;
use xmltree::Element as XmlElement;

use crate::codec;
use crate::context::DeserializationContext;
use crate::element::DidlElement;
use crate::errors::{DidlError, Result};
use crate::value::{PropertyKind, Scalar, ScalarValue};

/// Emplacement d'une propriété dans l'arbre XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Attribute,
    ChildElement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multiple,
}

/// Description d'une propriété d'un élément.
#[derive(Clone)]
pub struct PropertyBinding {
    key: String,
    name: String,
    kind: PropertyKind,
    placement: Placement,
    cardinality: Cardinality,
    storage: Cardinality,
    required: bool,
    minimum_version: u8,
    valid: bool,
    generator: Option<Arc<dyn DidlElement>>,
}

impl PropertyBinding {
    /// Crée une liaison. Un nom commençant par `@` désigne un attribut, un
    /// nom vide le contenu texte de l'élément.
    pub fn new(name: &str, kind: PropertyKind, storage: Cardinality) -> Self {
        let (placement, local) = match name.strip_prefix('@') {
            Some(attr) => (Placement::Attribute, attr),
            None => (Placement::ChildElement, name),
        };
        Self {
            key: name.to_string(),
            name: local.to_string(),
            kind,
            placement,
            cardinality: storage,
            storage,
            required: false,
            minimum_version: 1,
            valid: false,
            generator: None,
        }
    }

    /// Clé de recherche : `@id` pour un attribut, `upnp:genre` pour un
    /// sous-élément, chaîne vide pour le texte.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Nom tel qu'écrit dans le document (sans le `@`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_attribute(&self) -> bool {
        self.placement == Placement::Attribute
    }

    pub fn is_text(&self) -> bool {
        self.placement == Placement::ChildElement && self.name.is_empty()
    }

    pub fn is_multi_valued(&self) -> bool {
        self.cardinality == Cardinality::Multiple
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    pub fn min_version(&self) -> u8 {
        self.minimum_version
    }

    /// Indique si la propriété est obligatoire pour une version de protocole.
    /// En dessous de sa version minimale, une propriété obligatoire se
    /// comporte comme optionnelle.
    pub fn is_required(&self, version: u8) -> bool {
        self.required && version >= self.minimum_version
    }

    pub fn generator_prototype(&self) -> Option<&Arc<dyn DidlElement>> {
        self.generator.as_ref()
    }

    // Configuration chaînée

    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    pub fn optional(&mut self) -> &mut Self {
        self.required = false;
        self
    }

    /// Autorise plusieurs occurrences. Le stockage lié doit être un `Vec`.
    pub fn multi_value(&mut self) -> &mut Self {
        debug_assert!(
            self.storage == Cardinality::Multiple,
            "property '{}' is bound to single-valued storage",
            self.key
        );
        self.cardinality = Cardinality::Multiple;
        self
    }

    pub fn minimum_version(&mut self, version: u8) -> &mut Self {
        self.minimum_version = version;
        self
    }

    pub fn as_attribute(&mut self) -> &mut Self {
        if self.placement != Placement::Attribute {
            self.placement = Placement::Attribute;
            self.key = format!("@{}", self.name);
        }
        self
    }

    /// Prototype cloné pour fabriquer les sous-éléments lors de la
    /// désérialisation.
    pub fn generator<E: DidlElement>(&mut self, prototype: E) -> &mut Self {
        self.generator = Some(Arc::new(prototype));
        self
    }

    /// Marque la propriété comme valide dès la construction.
    pub fn valid(&mut self) -> &mut Self {
        self.valid = true;
        self
    }

    /// Vérifie la cohérence de la liaison avant tout traitement.
    pub fn validate(&self, element: &str) -> Result<()> {
        let reason = if self.is_attribute() && self.cardinality == Cardinality::Multiple {
            "an attribute cannot hold several values"
        } else if self.is_attribute() && self.kind == PropertyKind::Element {
            "an attribute cannot hold an element"
        } else if self.is_attribute() && self.name.is_empty() {
            "an attribute needs a name"
        } else if self.is_text() && self.cardinality == Cardinality::Multiple {
            "text content cannot hold several values"
        } else if self.is_text() && self.kind == PropertyKind::Element {
            "text content cannot hold an element"
        } else if self.cardinality == Cardinality::Multiple && self.storage == Cardinality::Single {
            "storage holds a single value"
        } else {
            return Ok(());
        };
        Err(DidlError::invalid_binding(element, &self.key, reason))
    }
}

impl fmt::Debug for PropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("cardinality", &self.cardinality)
            .field("required", &self.required)
            .field("minimum_version", &self.minimum_version)
            .field("valid", &self.valid)
            .finish()
    }
}

impl PartialEq for PropertyBinding {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.kind == other.kind
            && self.cardinality == other.cardinality
            && self.required == other.required
            && self.minimum_version == other.minimum_version
            && self.valid == other.valid
    }
}

/// Vue en lecture sur la valeur d'une propriété.
#[derive(Debug)]
pub enum FieldRef<'a> {
    Scalars(Vec<Scalar>),
    Elements(Vec<&'a dyn DidlElement>),
}

impl FieldRef<'_> {
    /// Première valeur scalaire sous forme texte.
    pub fn text(&self) -> Option<String> {
        match self {
            FieldRef::Scalars(values) => values.first().map(Scalar::to_text),
            FieldRef::Elements(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldRef::Scalars(values) => values.len(),
            FieldRef::Elements(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accès type-effacé au stockage d'une propriété dans son propriétaire.
pub(crate) trait FieldAccess<T>: Send + Sync {
    fn read<'a>(&self, owner: &'a T) -> FieldRef<'a>;

    fn write_text(&self, owner: &mut T, binding: &PropertyBinding, raws: &[String]) -> Result<()>;

    fn write_scalars(&self, owner: &mut T, binding: &PropertyBinding, values: &[Scalar]) -> Result<()>;

    fn elements_mut<'a>(&self, owner: &'a mut T) -> Vec<&'a mut dyn DidlElement>;

    fn deserialize_elements(
        &self,
        owner: &mut T,
        binding: &PropertyBinding,
        nodes: &[&XmlElement],
        ctx: &DeserializationContext,
    ) -> Result<()>;
}

enum ScalarSlot<T, V> {
    Single {
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    },
    Multiple {
        get: fn(&T) -> &Vec<V>,
        get_mut: fn(&mut T) -> &mut Vec<V>,
    },
}

impl<T, V: ScalarValue> ScalarSlot<T, V> {
    fn store(&self, owner: &mut T, mut values: Vec<V>) {
        match self {
            ScalarSlot::Single { get_mut, .. } => {
                if let Some(value) = values.pop() {
                    *get_mut(owner) = value;
                }
            }
            ScalarSlot::Multiple { get_mut, .. } => *get_mut(owner) = values,
        }
    }
}

impl<T, V: ScalarValue> FieldAccess<T> for ScalarSlot<T, V> {
    fn read<'a>(&self, owner: &'a T) -> FieldRef<'a> {
        match self {
            ScalarSlot::Single { get, .. } => FieldRef::Scalars(vec![get(owner).to_scalar()]),
            ScalarSlot::Multiple { get, .. } => {
                FieldRef::Scalars(get(owner).iter().map(ScalarValue::to_scalar).collect())
            }
        }
    }

    fn write_text(&self, owner: &mut T, binding: &PropertyBinding, raws: &[String]) -> Result<()> {
        let values = raws
            .iter()
            .map(|raw| V::parse_text(raw).ok_or_else(|| DidlError::malformed(binding.key(), raw, V::KIND)))
            .collect::<Result<Vec<V>>>()?;
        self.store(owner, values);
        Ok(())
    }

    fn write_scalars(&self, owner: &mut T, binding: &PropertyBinding, values: &[Scalar]) -> Result<()> {
        let values = values
            .iter()
            .map(|value| {
                V::from_scalar(value).ok_or_else(|| DidlError::TypeMismatch {
                    property: binding.key().to_string(),
                    expected: V::KIND,
                })
            })
            .collect::<Result<Vec<V>>>()?;
        self.store(owner, values);
        Ok(())
    }

    fn elements_mut<'a>(&self, _owner: &'a mut T) -> Vec<&'a mut dyn DidlElement> {
        Vec::new()
    }

    fn deserialize_elements(
        &self,
        _owner: &mut T,
        binding: &PropertyBinding,
        _nodes: &[&XmlElement],
        _ctx: &DeserializationContext,
    ) -> Result<()> {
        Err(DidlError::TypeMismatch {
            property: binding.key().to_string(),
            expected: PropertyKind::Element,
        })
    }
}

enum ElementSlot<T, E> {
    Single {
        get: fn(&T) -> &E,
        get_mut: fn(&mut T) -> &mut E,
    },
    Optional {
        get: fn(&T) -> &Option<E>,
        get_mut: fn(&mut T) -> &mut Option<E>,
    },
    Multiple {
        get: fn(&T) -> &Vec<E>,
        get_mut: fn(&mut T) -> &mut Vec<E>,
    },
}

/// Fabrique une nouvelle instance à partir du générateur de la liaison.
fn generate<E: DidlElement + Clone>(binding: &PropertyBinding) -> Result<E> {
    let prototype = binding.generator_prototype().ok_or_else(|| {
        DidlError::invalid_binding("", binding.key(), "no generator for element values")
    })?;
    prototype
        .as_any()
        .downcast_ref::<E>()
        .cloned()
        .ok_or_else(|| {
            DidlError::invalid_binding(
                prototype.element_name(),
                binding.key(),
                "generator does not produce the bound element type",
            )
        })
}

impl<T, E: DidlElement + Clone> FieldAccess<T> for ElementSlot<T, E> {
    fn read<'a>(&self, owner: &'a T) -> FieldRef<'a> {
        let items: Vec<&'a dyn DidlElement> = match self {
            ElementSlot::Single { get, .. } => vec![get(owner) as &dyn DidlElement],
            ElementSlot::Optional { get, .. } => get(owner)
                .iter()
                .map(|e| e as &dyn DidlElement)
                .collect(),
            ElementSlot::Multiple { get, .. } => get(owner)
                .iter()
                .map(|e| e as &dyn DidlElement)
                .collect(),
        };
        FieldRef::Elements(items)
    }

    fn write_text(&self, _owner: &mut T, binding: &PropertyBinding, _raws: &[String]) -> Result<()> {
        Err(DidlError::TypeMismatch {
            property: binding.key().to_string(),
            expected: PropertyKind::String,
        })
    }

    fn write_scalars(&self, _owner: &mut T, binding: &PropertyBinding, values: &[Scalar]) -> Result<()> {
        Err(DidlError::TypeMismatch {
            property: binding.key().to_string(),
            expected: values.first().map(Scalar::kind).unwrap_or(PropertyKind::String),
        })
    }

    fn elements_mut<'a>(&self, owner: &'a mut T) -> Vec<&'a mut dyn DidlElement> {
        match self {
            ElementSlot::Single { get_mut, .. } => vec![get_mut(owner) as &mut dyn DidlElement],
            ElementSlot::Optional { get_mut, .. } => get_mut(owner)
                .iter_mut()
                .map(|e| e as &mut dyn DidlElement)
                .collect(),
            ElementSlot::Multiple { get_mut, .. } => get_mut(owner)
                .iter_mut()
                .map(|e| e as &mut dyn DidlElement)
                .collect(),
        }
    }

    fn deserialize_elements(
        &self,
        owner: &mut T,
        binding: &PropertyBinding,
        nodes: &[&XmlElement],
        ctx: &DeserializationContext,
    ) -> Result<()> {
        // Toutes les instances sont construites avant d'écrire dans le
        // stockage : un échec n'en laisse aucune.
        let mut produced: Vec<E> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let mut target = match self {
                ElementSlot::Single { get, .. } => get(owner).clone(),
                ElementSlot::Optional { get, .. } => match get(owner) {
                    Some(existing) => existing.clone(),
                    None => generate::<E>(binding)?,
                },
                ElementSlot::Multiple { .. } => generate::<E>(binding)?,
            };
            codec::deserialize_into(node, &mut target, ctx)?;
            produced.push(target);
        }

        match self {
            ElementSlot::Single { get_mut, .. } => {
                if let Some(item) = produced.pop() {
                    *get_mut(owner) = item;
                }
            }
            ElementSlot::Optional { get_mut, .. } => *get_mut(owner) = produced.pop(),
            ElementSlot::Multiple { get_mut, .. } => *get_mut(owner) = produced,
        }
        Ok(())
    }
}

struct PropertyEntry<T> {
    binding: PropertyBinding,
    access: Arc<dyn FieldAccess<T>>,
}

impl<T> Clone for PropertyEntry<T> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            access: Arc::clone(&self.access),
        }
    }
}

/// Liste ordonnée des liaisons d'un élément. L'ordre de déclaration est
/// l'ordre de sérialisation.
pub struct PropertyList<T> {
    entries: Vec<PropertyEntry<T>>,
}

impl<T: 'static> PropertyList<T> {
    /// Crée une liste vide.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.binding.key == key)
    }

    pub fn binding(&self, index: usize) -> Option<&PropertyBinding> {
        self.entries.get(index).map(|e| &e.binding)
    }

    pub fn binding_mut(&mut self, index: usize) -> Option<&mut PropertyBinding> {
        self.entries.get_mut(index).map(|e| &mut e.binding)
    }

    pub fn get(&self, key: &str) -> Option<&PropertyBinding> {
        self.index_of(key).and_then(|i| self.binding(i))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PropertyBinding> {
        self.index_of(key).and_then(move |i| self.binding_mut(i))
    }

    pub fn bindings(&self) -> impl Iterator<Item = &PropertyBinding> {
        self.entries.iter().map(|e| &e.binding)
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.get(key).is_some_and(PropertyBinding::is_valid)
    }

    /// Change la validité d'une propriété. Sans effet si la clé est inconnue.
    pub fn set_valid(&mut self, key: &str, valid: bool) {
        if let Some(binding) = self.get_mut(key) {
            binding.set_valid(valid);
        }
    }

    /// Recopie les drapeaux de validité d'une autre liste, clé par clé.
    pub fn copy_validity<U: 'static>(&mut self, other: &PropertyList<U>) {
        for entry in &mut self.entries {
            if let Some(source) = other.get(&entry.binding.key) {
                entry.binding.valid = source.valid;
            }
        }
    }

    pub(crate) fn access(&self, index: usize) -> Option<Arc<dyn FieldAccess<T>>> {
        self.entries.get(index).map(|e| Arc::clone(&e.access))
    }

    fn push(
        &mut self,
        name: &str,
        kind: PropertyKind,
        storage: Cardinality,
        access: Arc<dyn FieldAccess<T>>,
    ) -> &mut PropertyBinding {
        let binding = PropertyBinding::new(name, kind, storage);
        let index = match self.index_of(binding.key()) {
            Some(existing) => {
                debug_assert!(false, "property '{}' is bound twice", binding.key());
                error!(property = %binding.key(), "Property bound twice, keeping the first binding");
                existing
            }
            None => {
                self.entries.push(PropertyEntry { binding, access });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].binding
    }

    /// Lie un champ scalaire à valeur unique.
    pub fn bind_scalar<V: ScalarValue>(
        &mut self,
        name: &str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> &mut PropertyBinding {
        self.push(name, V::KIND, Cardinality::Single, Arc::new(ScalarSlot::Single { get, get_mut }))
    }

    /// Lie un champ scalaire à valeurs multiples.
    pub fn bind_scalars<V: ScalarValue>(
        &mut self,
        name: &str,
        get: fn(&T) -> &Vec<V>,
        get_mut: fn(&mut T) -> &mut Vec<V>,
    ) -> &mut PropertyBinding {
        self.push(
            name,
            V::KIND,
            Cardinality::Multiple,
            Arc::new(ScalarSlot::Multiple { get, get_mut }),
        )
    }

    pub fn bind_string(
        &mut self,
        name: &str,
        get: fn(&T) -> &String,
        get_mut: fn(&mut T) -> &mut String,
    ) -> &mut PropertyBinding {
        self.bind_scalar(name, get, get_mut)
    }

    pub fn bind_strings(
        &mut self,
        name: &str,
        get: fn(&T) -> &Vec<String>,
        get_mut: fn(&mut T) -> &mut Vec<String>,
    ) -> &mut PropertyBinding {
        self.bind_scalars(name, get, get_mut)
    }

    pub fn bind_boolean(
        &mut self,
        name: &str,
        get: fn(&T) -> &bool,
        get_mut: fn(&mut T) -> &mut bool,
    ) -> &mut PropertyBinding {
        self.bind_scalar(name, get, get_mut)
    }

    pub fn bind_integer(
        &mut self,
        name: &str,
        get: fn(&T) -> &i32,
        get_mut: fn(&mut T) -> &mut i32,
    ) -> &mut PropertyBinding {
        self.bind_scalar(name, get, get_mut)
    }

    pub fn bind_unsigned_integer(
        &mut self,
        name: &str,
        get: fn(&T) -> &u32,
        get_mut: fn(&mut T) -> &mut u32,
    ) -> &mut PropertyBinding {
        self.bind_scalar(name, get, get_mut)
    }

    pub fn bind_long(
        &mut self,
        name: &str,
        get: fn(&T) -> &i64,
        get_mut: fn(&mut T) -> &mut i64,
    ) -> &mut PropertyBinding {
        self.bind_scalar(name, get, get_mut)
    }

    pub fn bind_unsigned_long(
        &mut self,
        name: &str,
        get: fn(&T) -> &u64,
        get_mut: fn(&mut T) -> &mut u64,
    ) -> &mut PropertyBinding {
        self.bind_scalar(name, get, get_mut)
    }

    pub fn bind_number(
        &mut self,
        name: &str,
        get: fn(&T) -> &f64,
        get_mut: fn(&mut T) -> &mut f64,
    ) -> &mut PropertyBinding {
        self.bind_scalar(name, get, get_mut)
    }

    /// Lie un sous-élément toujours présent dans le stockage.
    pub fn bind_element<E: DidlElement + Clone>(
        &mut self,
        name: &str,
        get: fn(&T) -> &E,
        get_mut: fn(&mut T) -> &mut E,
    ) -> &mut PropertyBinding {
        self.push(
            name,
            PropertyKind::Element,
            Cardinality::Single,
            Arc::new(ElementSlot::Single { get, get_mut }),
        )
    }

    /// Lie un sous-élément absent par défaut. Nécessite un générateur.
    pub fn bind_optional_element<E: DidlElement + Clone>(
        &mut self,
        name: &str,
        get: fn(&T) -> &Option<E>,
        get_mut: fn(&mut T) -> &mut Option<E>,
    ) -> &mut PropertyBinding {
        self.push(
            name,
            PropertyKind::Element,
            Cardinality::Single,
            Arc::new(ElementSlot::Optional { get, get_mut }),
        )
    }

    /// Lie une liste de sous-éléments. Nécessite un générateur.
    pub fn bind_elements<E: DidlElement + Clone>(
        &mut self,
        name: &str,
        get: fn(&T) -> &Vec<E>,
        get_mut: fn(&mut T) -> &mut Vec<E>,
    ) -> &mut PropertyBinding {
        self.push(
            name,
            PropertyKind::Element,
            Cardinality::Multiple,
            Arc::new(ElementSlot::Multiple { get, get_mut }),
        )
    }
}

impl<T: 'static> Default for PropertyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PropertyList<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> fmt::Debug for PropertyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.binding))
            .finish()
    }
}

impl<T> PartialEq for PropertyList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.binding == b.binding)
    }
}
