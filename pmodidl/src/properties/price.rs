use std::any::Any;

use crate::element::{DidlElement, PropertyHost};
use crate::property::PropertyList;

pub const PRICE: &str = "upnp:price";

/// Prix d'un contenu et sa devise (`@currency`, code ISO 4217).
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
    properties: PropertyList<Self>,
}

crate::impl_schema!(Price);

impl Default for Price {
    fn default() -> Self {
        let mut price = Self::new(0.0, "");
        price.set_valid("", false);
        price
    }
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        let mut properties = PropertyList::<Self>::new();
        properties.bind_number("", |p| &p.amount, |p| &mut p.amount).required();
        properties
            .bind_string("@currency", |p| &p.currency, |p| &mut p.currency)
            .required();

        let mut price = Self {
            amount,
            currency: currency.into(),
            properties,
        };
        let currency_valid = !price.currency.is_empty();
        price.set_valid("", true);
        price.set_valid("@currency", currency_valid);
        price
    }
}

impl DidlElement for Price {
    fn element_name(&self) -> &str {
        PRICE
    }

    fn identifier(&self) -> &str {
        PRICE
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
