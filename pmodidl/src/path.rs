//! Adressage des propriétés par chemin.
//!
//! Un chemin est une suite de noms séparés par `.`, le dernier pouvant être
//! un attribut préfixé par `@` : `res.@protocolInfo`, ou sous forme compacte
//! `res@protocolInfo`. Un attribut termine toujours le chemin.

use std::fmt;
use std::str::FromStr;

use crate::element::DidlElement;
use crate::errors::{DidlError, Result};
use crate::property::FieldRef;
use crate::value::{PropertyKind, Scalar};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    name: String,
    attribute: bool,
}

impl PathStep {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_attribute(&self) -> bool {
        self.attribute
    }

    /// Clé de la liaison visée (`@id` pour un attribut).
    pub fn key(&self) -> String {
        if self.attribute {
            format!("@{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    steps: Vec<PathStep>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = || DidlError::InvalidPath(path.to_string());
        let mut steps = Vec::new();

        for segment in path.split('.') {
            if steps.last().is_some_and(|s: &PathStep| s.attribute) {
                return Err(invalid());
            }
            let (element, attribute) = match segment.split_once('@') {
                Some((element, attribute)) => (element, Some(attribute)),
                None => (segment, None),
            };
            if !element.is_empty() {
                steps.push(PathStep {
                    name: element.to_string(),
                    attribute: false,
                });
            } else if attribute.is_none() {
                return Err(invalid());
            }
            if let Some(attribute) = attribute {
                if attribute.is_empty() || attribute.contains('@') {
                    return Err(invalid());
                }
                steps.push(PathStep {
                    name: attribute.to_string(),
                    attribute: true,
                });
            }
        }

        if steps.is_empty() {
            return Err(invalid());
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn first(&self) -> &PathStep {
        &self.steps[0]
    }

    /// Chemin restant après le premier pas.
    pub fn next(&self) -> Option<PropertyPath> {
        (self.steps.len() > 1).then(|| PropertyPath {
            steps: self.steps[1..].to_vec(),
        })
    }
}

impl FromStr for PropertyPath {
    type Err = DidlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if step.attribute {
                write!(f, "@{}", step.name)?;
            } else {
                if i > 0 {
                    f.write_str(".")?;
                }
                f.write_str(&step.name)?;
            }
        }
        Ok(())
    }
}

fn not_found(path: &str) -> DidlError {
    DidlError::PropertyNotFound(path.to_string())
}

/// Lit la propriété désignée par `path`. Les pas intermédiaires doivent
/// désigner des sous-éléments ; le premier sous-élément est suivi.
pub fn get_property<'a>(element: &'a dyn DidlElement, path: &str) -> Result<FieldRef<'a>> {
    let parsed = PropertyPath::parse(path)?;
    walk(element, parsed.steps(), path)
}

fn walk<'a>(element: &'a dyn DidlElement, steps: &[PathStep], path: &str) -> Result<FieldRef<'a>> {
    let Some((step, rest)) = steps.split_first() else {
        return Err(not_found(path));
    };
    let index = element
        .property_index(&step.key())
        .ok_or_else(|| not_found(path))?;
    let value = element.read_property(index).ok_or_else(|| not_found(path))?;
    if rest.is_empty() {
        return Ok(value);
    }
    match value {
        FieldRef::Elements(items) => {
            let child = items.into_iter().next().ok_or_else(|| not_found(path))?;
            walk(child, rest, path)
        }
        FieldRef::Scalars(_) => Err(DidlError::TypeMismatch {
            property: step.key(),
            expected: PropertyKind::Element,
        }),
    }
}

/// Indique si `path` désigne une propriété déclarée.
pub fn has_property(element: &dyn DidlElement, path: &str) -> bool {
    get_property(element, path).is_ok()
}

/// Écrit une valeur scalaire à l'emplacement désigné par `path` et marque
/// la propriété comme valide.
pub fn set_property(element: &mut dyn DidlElement, path: &str, value: impl Into<Scalar>) -> Result<()> {
    set_property_values(element, path, vec![value.into()])
}

/// Variante de [`set_property`] pour les propriétés à valeurs multiples.
pub fn set_property_values(element: &mut dyn DidlElement, path: &str, values: Vec<Scalar>) -> Result<()> {
    let parsed = PropertyPath::parse(path)?;
    walk_mut(element, parsed.steps(), path, &values)
}

fn walk_mut(element: &mut dyn DidlElement, steps: &[PathStep], path: &str, values: &[Scalar]) -> Result<()> {
    let Some((step, rest)) = steps.split_first() else {
        return Err(not_found(path));
    };
    let key = step.key();
    let index = element.property_index(&key).ok_or_else(|| not_found(path))?;

    if rest.is_empty() {
        element.write_property_scalars(index, values)?;
        if let Some(binding) = element.binding_at_mut(index) {
            binding.set_valid(true);
        }
        return Ok(());
    }

    let is_element = element
        .binding_at(index)
        .is_some_and(|b| b.kind() == PropertyKind::Element);
    if !is_element {
        return Err(DidlError::TypeMismatch {
            property: key,
            expected: PropertyKind::Element,
        });
    }
    let child = element
        .property_elements_mut(index)
        .into_iter()
        .next()
        .ok_or_else(|| not_found(path))?;
    walk_mut(child, rest, path, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(path: &str) -> Vec<(String, bool)> {
        PropertyPath::parse(path)
            .unwrap()
            .steps()
            .iter()
            .map(|s| (s.name().to_string(), s.is_attribute()))
            .collect()
    }

    #[test]
    fn test_parse_dotted_path() {
        assert_eq!(
            steps("res.@protocolInfo"),
            vec![("res".to_string(), false), ("protocolInfo".to_string(), true)]
        );
        assert_eq!(steps("res@protocolInfo"), steps("res.@protocolInfo"));
        assert_eq!(steps("upnp:genre"), vec![("upnp:genre".to_string(), false)]);
        assert_eq!(steps("@id"), vec![("id".to_string(), true)]);
    }

    #[test]
    fn test_parse_rejects_invalid_paths() {
        assert!(PropertyPath::parse("").is_err());
        assert!(PropertyPath::parse("res..size").is_err());
        assert!(PropertyPath::parse("res@size.other").is_err());
        assert!(PropertyPath::parse("res@").is_err());
        assert!(PropertyPath::parse("a@b@c").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for path in ["res@protocolInfo", "upnp:genre@id", "dc:title", "@id", "a.b.c"] {
            assert_eq!(PropertyPath::parse(path).unwrap().to_string(), path);
        }
        assert_eq!(
            PropertyPath::parse("res.@size").unwrap().to_string(),
            "res@size"
        );
    }

    #[test]
    fn test_next() {
        let path = PropertyPath::parse("a.b@c").unwrap();
        assert_eq!(path.first().name(), "a");
        let rest = path.next().unwrap();
        assert_eq!(rest.to_string(), "b@c");
        assert!(rest.next().unwrap().next().is_none());
    }
}
