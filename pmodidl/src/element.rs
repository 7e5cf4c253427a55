//! Traits des éléments DIDL-Lite.
//!
//! - [`Schema`] : implémenté par chaque type concret, donne accès à sa
//!   [`PropertyList`].
//! - [`PropertyHost`] : accès type-effacé aux propriétés, dérivé
//!   automatiquement de [`Schema`].
//! - [`DidlElement`] : interface polymorphe utilisée par le codec, le
//!   registre et l'adressage par chemin.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use xmltree::Element as XmlElement;

use crate::context::{DeserializationContext, SerializationContext};
use crate::errors::{DidlError, Result};
use crate::media::MediaItem;
use crate::property::{FieldAccess, FieldRef, PropertyBinding, PropertyList};
use crate::value::Scalar;

/// Donne accès à la liste de liaisons d'un type concret.
pub trait Schema: Clone + Sized + 'static {
    fn properties(&self) -> &PropertyList<Self>;

    fn properties_mut(&mut self) -> &mut PropertyList<Self>;
}

/// Accès aux propriétés sans connaître le type concret de l'élément.
pub trait PropertyHost {
    fn property_count(&self) -> usize;

    fn binding_at(&self, index: usize) -> Option<&PropertyBinding>;

    fn binding_at_mut(&mut self, index: usize) -> Option<&mut PropertyBinding>;

    fn property_index(&self, key: &str) -> Option<usize>;

    fn read_property(&self, index: usize) -> Option<FieldRef<'_>>;

    /// Analyse et stocke des valeurs texte. La validité n'est pas modifiée.
    fn write_property_text(&mut self, index: usize, raws: &[String]) -> Result<()>;

    fn write_property_scalars(&mut self, index: usize, values: &[Scalar]) -> Result<()>;

    fn property_elements_mut(&mut self, index: usize) -> Vec<&mut dyn DidlElement>;

    fn deserialize_property_elements(
        &mut self,
        index: usize,
        nodes: &[&XmlElement],
        ctx: &DeserializationContext,
    ) -> Result<()>;

    fn is_valid(&self, key: &str) -> bool {
        self.property_index(key)
            .and_then(|i| self.binding_at(i))
            .is_some_and(PropertyBinding::is_valid)
    }

    fn set_valid(&mut self, key: &str, valid: bool) {
        if let Some(binding) = self
            .property_index(key)
            .and_then(|i| self.binding_at_mut(i))
        {
            binding.set_valid(valid);
        }
    }

    /// Remplace tout le contenu par une copie de `source`, valeurs et
    /// validité comprises. Retourne `false` si `source` n'est pas du même type.
    fn assign_from(&mut self, source: &dyn Any) -> bool;

    /// Recopie la validité des propriétés de même clé d'un autre élément.
    fn copy_validity(&mut self, other: &dyn PropertyHost) {
        for index in 0..self.property_count() {
            let Some(key) = self.binding_at(index).map(|b| b.key().to_string()) else {
                continue;
            };
            let valid = other.is_valid(&key);
            if let Some(binding) = self.binding_at_mut(index) {
                binding.set_valid(valid);
            }
        }
    }
}

fn unknown_index(index: usize) -> DidlError {
    DidlError::PropertyNotFound(format!("#{}", index))
}

impl<T: Schema> PropertyHost for T {
    fn property_count(&self) -> usize {
        self.properties().len()
    }

    fn binding_at(&self, index: usize) -> Option<&PropertyBinding> {
        self.properties().binding(index)
    }

    fn binding_at_mut(&mut self, index: usize) -> Option<&mut PropertyBinding> {
        self.properties_mut().binding_mut(index)
    }

    fn property_index(&self, key: &str) -> Option<usize> {
        self.properties().index_of(key)
    }

    fn read_property(&self, index: usize) -> Option<FieldRef<'_>> {
        let access = self.properties().access(index)?;
        Some(access.read(self))
    }

    fn write_property_text(&mut self, index: usize, raws: &[String]) -> Result<()> {
        let (access, binding) = entry(self, index)?;
        access.write_text(self, &binding, raws)
    }

    fn write_property_scalars(&mut self, index: usize, values: &[Scalar]) -> Result<()> {
        let (access, binding) = entry(self, index)?;
        access.write_scalars(self, &binding, values)
    }

    fn property_elements_mut(&mut self, index: usize) -> Vec<&mut dyn DidlElement> {
        let Some(access) = self.properties().access(index) else {
            return Vec::new();
        };
        access.elements_mut(self)
    }

    fn assign_from(&mut self, source: &dyn Any) -> bool {
        match source.downcast_ref::<T>() {
            Some(source) => {
                *self = source.clone();
                true
            }
            None => false,
        }
    }

    fn deserialize_property_elements(
        &mut self,
        index: usize,
        nodes: &[&XmlElement],
        ctx: &DeserializationContext,
    ) -> Result<()> {
        let (access, binding) = entry(self, index)?;
        access.deserialize_elements(self, &binding, nodes, ctx)
    }
}

type Entry<T> = (Arc<dyn FieldAccess<T>>, PropertyBinding);

fn entry<T: Schema>(owner: &T, index: usize) -> Result<Entry<T>> {
    let props = owner.properties();
    match (props.access(index), props.binding(index)) {
        (Some(access), Some(binding)) => Ok((access, binding.clone())),
        _ => Err(unknown_index(index)),
    }
}

/// Élément DIDL-Lite manipulé de façon polymorphe.
///
/// Les méthodes d'extension (`serialize_extra`, `deserialize_extra`) sont
/// appelées après le traitement des liaisons et portent les règles qui
/// concernent plusieurs champs à la fois.
pub trait DidlElement: PropertyHost + fmt::Debug + Send + Sync + 'static {
    /// Nom qualifié de l'élément XML (`item`, `upnp:genre`, `res`...).
    fn element_name(&self) -> &str;

    /// Identifiant d'enregistrement dans le registre.
    fn identifier(&self) -> &str;

    /// Identifiants des types dont celui-ci est une spécialisation.
    fn extends(&self) -> Vec<String> {
        Vec::new()
    }

    fn clone_element(&self) -> Box<dyn DidlElement>;

    fn as_any(&self) -> &dyn Any;

    fn serialize_extra(&self, _node: &mut XmlElement, _ctx: &SerializationContext) -> Result<()> {
        Ok(())
    }

    fn deserialize_extra(&mut self, _node: &XmlElement, _ctx: &DeserializationContext) -> Result<()> {
        Ok(())
    }

    /// Classe UPnP portée par l'élément, si c'est un objet.
    fn class_type(&self) -> Option<&str> {
        None
    }

    /// Remplace la classe UPnP. Retourne `false` si l'élément n'en porte pas.
    fn set_class_type(&mut self, _class_type: &str) -> bool {
        false
    }

    /// Prédicat utilisé par le registre pour choisir un type à partir d'une
    /// valeur native.
    fn can_handle(&self, _item: &MediaItem) -> bool {
        false
    }

    fn to_media_item(&self, _ctx: &SerializationContext) -> Option<MediaItem> {
        None
    }

    fn from_media_item(&mut self, _item: &MediaItem, _ctx: &DeserializationContext) -> bool {
        false
    }
}

impl Clone for Box<dyn DidlElement> {
    fn clone(&self) -> Self {
        self.clone_element()
    }
}

/// Implémente [`Schema`] pour un type dont la liste de liaisons est rangée
/// dans un champ `properties`.
#[macro_export]
macro_rules! impl_schema {
    ($ty:ty) => {
        impl $crate::element::Schema for $ty {
            fn properties(&self) -> &$crate::property::PropertyList<Self> {
                &self.properties
            }

            fn properties_mut(&mut self) -> &mut $crate::property::PropertyList<Self> {
                &mut self.properties
            }
        }
    };
}
