//! Erreurs du moteur de sérialisation DIDL-Lite.

use thiserror::Error;

use crate::value::PropertyKind;

#[derive(Error, Debug)]
pub enum DidlError {
    #[error("{element}: missing required property '{property}'")]
    MissingRequiredProperty { element: String, property: String },

    #[error("property '{property}': cannot parse '{raw}' as {kind}")]
    MalformedValue {
        property: String,
        raw: String,
        kind: PropertyKind,
    },

    #[error("{element}: property '{property}' expects a single value, found {count}")]
    UnexpectedMultiplicity {
        element: String,
        property: String,
        count: usize,
    },

    #[error("{element}: validation failed: {reason}")]
    CustomValidationFailed { element: String, reason: String },

    #[error("Unknown element type: {0}")]
    UnknownType(String),

    #[error("Cyclic class hierarchy involving {0}")]
    CyclicClassHierarchy(String),

    #[error("Element type {0} is already registered")]
    DuplicateType(String),

    #[error("{element}: invalid binding '{property}': {reason}")]
    InvalidBinding {
        element: String,
        property: String,
        reason: String,
    },

    #[error("Expected element <{expected}>, found <{found}>")]
    UnexpectedElement { expected: String, found: String },

    #[error("Invalid property path: {0}")]
    InvalidPath(String),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("property '{property}' is not a {expected} property")]
    TypeMismatch {
        property: String,
        expected: PropertyKind,
    },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] xmltree::ParseError),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] xmltree::Error),
}

pub type Result<T> = std::result::Result<T, DidlError>;

impl DidlError {
    pub fn missing(element: &str, property: &str) -> Self {
        DidlError::MissingRequiredProperty {
            element: element.to_string(),
            property: property.to_string(),
        }
    }

    pub fn malformed(property: &str, raw: &str, kind: PropertyKind) -> Self {
        DidlError::MalformedValue {
            property: property.to_string(),
            raw: raw.to_string(),
            kind,
        }
    }

    pub fn multiplicity(element: &str, property: &str, count: usize) -> Self {
        DidlError::UnexpectedMultiplicity {
            element: element.to_string(),
            property: property.to_string(),
            count,
        }
    }

    pub fn validation(element: &str, reason: impl Into<String>) -> Self {
        DidlError::CustomValidationFailed {
            element: element.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_binding(element: &str, property: &str, reason: impl Into<String>) -> Self {
        DidlError::InvalidBinding {
            element: element.to_string(),
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}
