//! Objets du ContentDirectory (`item` et `container`).

mod kind;
mod object;

pub use kind::{OBJECT_CLASS, ObjectKind};
pub use object::UpnpObject;
