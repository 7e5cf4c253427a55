//! Dates DIDL-Lite (`dc:date` et horodatages `upnp:*`).
//!
//! Ces éléments n'ont aucune liaison : leur contenu est lu et écrit par les
//! méthodes d'extension, avec `chrono` pour l'analyse.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime as ChronoDateTime, NaiveDate, NaiveDateTime};
use xmltree::{Element as XmlElement, XMLNode};

use crate::context::{DeserializationContext, SerializationContext};
use crate::element::DidlElement;
use crate::errors::{DidlError, Result};
use crate::property::PropertyList;
use crate::utils::{find_attribute, node_text};
use crate::value::PropertyKind;

pub const DATE: &str = "dc:date";
pub const LAST_PLAYBACK_TIME: &str = "upnp:lastPlaybackTime";
pub const RECORDED_START_DATE_TIME: &str = "upnp:recordedStartDateTime";
pub const RECORDED_END_DATE_TIME: &str = "upnp:recordedEndDateTime";
pub const SCHEDULED_END_TIME: &str = "upnp:scheduledEndTime";

const DAYLIGHT_SAVING: &str = "upnp:daylightSaving";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DaylightSaving {
    #[default]
    Unknown,
    Standard,
    DaylightSaving,
}

impl fmt::Display for DaylightSaving {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DaylightSaving::Unknown => "UNKNOWN",
            DaylightSaving::Standard => "STANDARD",
            DaylightSaving::DaylightSaving => "DAYLIGHTSAVING",
        })
    }
}

impl FromStr for DaylightSaving {
    type Err = DidlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN" => Ok(DaylightSaving::Unknown),
            "STANDARD" => Ok(DaylightSaving::Standard),
            "DAYLIGHTSAVING" => Ok(DaylightSaving::DaylightSaving),
            _ => Err(DidlError::malformed(&format!("@{}", DAYLIGHT_SAVING), s, PropertyKind::String)),
        }
    }
}

fn write_daylight_saving(node: &mut XmlElement, value: DaylightSaving, ctx: &SerializationContext) {
    if value != DaylightSaving::Unknown && ctx.version() >= 3 {
        node.attributes
            .insert(DAYLIGHT_SAVING.to_string(), value.to_string());
    }
}

fn read_daylight_saving(node: &XmlElement, ctx: &DeserializationContext) -> Result<DaylightSaving> {
    match find_attribute(node, DAYLIGHT_SAVING, ctx.lenient_names()) {
        Some(raw) => raw.parse(),
        None => Ok(DaylightSaving::Unknown),
    }
}

fn read_content(node: &XmlElement) -> Option<String> {
    node_text(node)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Date calendaire `dc:date` (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq)]
pub struct Date {
    pub date: Option<NaiveDate>,
    pub daylight_saving: DaylightSaving,
    properties: PropertyList<Self>,
}

crate::impl_schema!(Date);

impl Default for Date {
    fn default() -> Self {
        Self {
            date: None,
            daylight_saving: DaylightSaving::Unknown,
            properties: PropertyList::new(),
        }
    }
}

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Accepte aussi une date-heure, dont seule la date est conservée.
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .or_else(|| DateTime::parse(raw).map(|dt| dt.date()))
    }
}

impl DidlElement for Date {
    fn element_name(&self) -> &str {
        DATE
    }

    fn identifier(&self) -> &str {
        DATE
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn serialize_extra(&self, node: &mut XmlElement, ctx: &SerializationContext) -> Result<()> {
        let date = self.date.ok_or_else(|| DidlError::missing(DATE, ""))?;
        node.children
            .push(XMLNode::Text(date.format(DATE_FORMAT).to_string()));
        write_daylight_saving(node, self.daylight_saving, ctx);
        Ok(())
    }

    fn deserialize_extra(&mut self, node: &XmlElement, ctx: &DeserializationContext) -> Result<()> {
        let raw = read_content(node).ok_or_else(|| DidlError::missing(DATE, ""))?;
        let date = Self::parse(&raw).ok_or_else(|| DidlError::malformed(DATE, &raw, PropertyKind::String))?;
        self.date = Some(date);
        self.daylight_saving = read_daylight_saving(node, ctx)?;
        Ok(())
    }
}

/// Horodatage `upnp:<nom>` (`YYYY-MM-DDTHH:MM:SS`).
#[derive(Debug, Clone, PartialEq)]
pub struct DateTime {
    element_name: &'static str,
    pub value: Option<NaiveDateTime>,
    pub daylight_saving: DaylightSaving,
    properties: PropertyList<Self>,
}

crate::impl_schema!(DateTime);

impl DateTime {
    /// Horodatage vide pour l'élément `element_name`.
    pub fn empty(element_name: &'static str) -> Self {
        Self {
            element_name,
            value: None,
            daylight_saving: DaylightSaving::Unknown,
            properties: PropertyList::new(),
        }
    }

    pub fn new(element_name: &'static str, value: NaiveDateTime) -> Self {
        Self {
            value: Some(value),
            ..Self::empty(element_name)
        }
    }

    /// Analyse `YYYY-MM-DDTHH:MM:SS` (fraction admise), un horodatage
    /// RFC 3339 ou une date seule (minuit).
    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
            .or_else(|| ChronoDateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
            .or_else(|| {
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

impl DidlElement for DateTime {
    fn element_name(&self) -> &str {
        self.element_name
    }

    fn identifier(&self) -> &str {
        self.element_name
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn serialize_extra(&self, node: &mut XmlElement, ctx: &SerializationContext) -> Result<()> {
        let value = self
            .value
            .ok_or_else(|| DidlError::missing(self.element_name, ""))?;
        node.children
            .push(XMLNode::Text(value.format(DATE_TIME_FORMAT).to_string()));
        write_daylight_saving(node, self.daylight_saving, ctx);
        Ok(())
    }

    fn deserialize_extra(&mut self, node: &XmlElement, ctx: &DeserializationContext) -> Result<()> {
        let raw = read_content(node).ok_or_else(|| DidlError::missing(self.element_name, ""))?;
        let value = Self::parse(&raw)
            .ok_or_else(|| DidlError::malformed(self.element_name, &raw, PropertyKind::String))?;
        self.value = Some(value);
        self.daylight_saving = read_daylight_saving(node, ctx)?;
        Ok(())
    }
}
