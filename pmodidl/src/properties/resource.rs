use std::any::Any;

use crate::element::{DidlElement, PropertyHost};
use crate::property::PropertyList;
use crate::utils::{format_duration, parse_duration};

pub const RESOURCE: &str = "res";

/// Ressource d'un objet (`res`) : URI du flux et ses caractéristiques.
///
/// Seuls l'URI et `@protocolInfo` sont obligatoires. Les attributs sont
/// produits dans l'ordre de déclaration, selon la version négociée.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub uri: String,
    pub protocol_info: String,
    pub id: String,
    pub import_uri: String,
    pub size: u64,
    pub duration: String,
    pub protection: String,
    pub bitrate: u32,
    pub bits_per_sample: u32,
    pub sample_frequency: u32,
    pub nr_audio_channels: u32,
    pub resolution: String,
    pub color_depth: u32,
    pub tspec: String,
    pub allowed_use: String,
    pub validity_start: String,
    pub validity_end: String,
    pub remaining_time: String,
    pub usage_info: String,
    pub rights_info_uri: String,
    pub content_info_uri: String,
    pub record_quality: String,
    pub daylight_saving: String,
    pub framerate: String,
    properties: PropertyList<Self>,
}

crate::impl_schema!(Resource);

impl Default for Resource {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl Resource {
    pub fn new(uri: impl Into<String>, protocol_info: impl Into<String>) -> Self {
        let mut p = PropertyList::<Self>::new();
        p.bind_string("", |r| &r.uri, |r| &mut r.uri).required();
        p.bind_string("@protocolInfo", |r| &r.protocol_info, |r| &mut r.protocol_info)
            .required();
        p.bind_string("@id", |r| &r.id, |r| &mut r.id).minimum_version(4);
        p.bind_string("@importUri", |r| &r.import_uri, |r| &mut r.import_uri);
        p.bind_unsigned_long("@size", |r| &r.size, |r| &mut r.size);
        p.bind_string("@duration", |r| &r.duration, |r| &mut r.duration);
        p.bind_string("@protection", |r| &r.protection, |r| &mut r.protection);
        p.bind_unsigned_integer("@bitrate", |r| &r.bitrate, |r| &mut r.bitrate);
        p.bind_unsigned_integer("@bitsPerSample", |r| &r.bits_per_sample, |r| &mut r.bits_per_sample);
        p.bind_unsigned_integer("@sampleFrequency", |r| &r.sample_frequency, |r| &mut r.sample_frequency);
        p.bind_unsigned_integer("@nrAudioChannels", |r| &r.nr_audio_channels, |r| &mut r.nr_audio_channels);
        p.bind_string("@resolution", |r| &r.resolution, |r| &mut r.resolution);
        p.bind_unsigned_integer("@colorDepth", |r| &r.color_depth, |r| &mut r.color_depth);
        p.bind_string("@tspec", |r| &r.tspec, |r| &mut r.tspec).minimum_version(2);
        p.bind_string("@allowedUse", |r| &r.allowed_use, |r| &mut r.allowed_use)
            .minimum_version(2);
        p.bind_string("@validityStart", |r| &r.validity_start, |r| &mut r.validity_start)
            .minimum_version(2);
        p.bind_string("@validityEnd", |r| &r.validity_end, |r| &mut r.validity_end)
            .minimum_version(2);
        p.bind_string("@remainingTime", |r| &r.remaining_time, |r| &mut r.remaining_time)
            .minimum_version(2);
        p.bind_string("@usageInfo", |r| &r.usage_info, |r| &mut r.usage_info)
            .minimum_version(2);
        p.bind_string("@rightsInfoURI", |r| &r.rights_info_uri, |r| &mut r.rights_info_uri)
            .minimum_version(2);
        p.bind_string("@contentInfoURI", |r| &r.content_info_uri, |r| &mut r.content_info_uri)
            .minimum_version(2);
        p.bind_string("@recordQuality", |r| &r.record_quality, |r| &mut r.record_quality)
            .minimum_version(2);
        p.bind_string("@daylightSaving", |r| &r.daylight_saving, |r| &mut r.daylight_saving)
            .minimum_version(3);
        p.bind_string("@framerate", |r| &r.framerate, |r| &mut r.framerate)
            .minimum_version(4);

        let mut res = Self {
            uri: uri.into(),
            protocol_info: protocol_info.into(),
            id: String::new(),
            import_uri: String::new(),
            size: 0,
            duration: String::new(),
            protection: String::new(),
            bitrate: 0,
            bits_per_sample: 0,
            sample_frequency: 0,
            nr_audio_channels: 0,
            resolution: String::new(),
            color_depth: 0,
            tspec: String::new(),
            allowed_use: String::new(),
            validity_start: String::new(),
            validity_end: String::new(),
            remaining_time: String::new(),
            usage_info: String::new(),
            rights_info_uri: String::new(),
            content_info_uri: String::new(),
            record_quality: String::new(),
            daylight_saving: String::new(),
            framerate: String::new(),
            properties: p,
        };
        let uri_valid = !res.uri.is_empty();
        let info_valid = !res.protocol_info.is_empty();
        res.set_valid("", uri_valid);
        res.set_valid("@protocolInfo", info_valid);
        res
    }

    /// Type MIME extrait du troisième champ de `@protocolInfo`
    /// (`http-get:*:audio/flac:*`).
    pub fn mime_type(&self) -> Option<&str> {
        self.protocol_info
            .split(':')
            .nth(2)
            .filter(|mime| !mime.is_empty() && *mime != "*")
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self.set_valid("@size", true);
        self
    }

    pub fn with_bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = bitrate;
        self.set_valid("@bitrate", true);
        self
    }

    pub fn with_audio_format(mut self, sample_frequency: u32, bits_per_sample: u32, channels: u32) -> Self {
        self.sample_frequency = sample_frequency;
        self.bits_per_sample = bits_per_sample;
        self.nr_audio_channels = channels;
        self.set_valid("@sampleFrequency", true);
        self.set_valid("@bitsPerSample", true);
        self.set_valid("@nrAudioChannels", true);
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = format!("{}x{}", width, height);
        self.set_valid("@resolution", true);
        self
    }

    /// Durée en secondes, lue depuis `@duration`.
    pub fn duration_seconds(&self) -> Option<u64> {
        if !self.is_valid("@duration") {
            return None;
        }
        parse_duration(&self.duration)
    }

    /// Écrit `@duration` au format `H:MM:SS`.
    pub fn set_duration_seconds(&mut self, seconds: u64) {
        self.duration = format_duration(seconds);
        self.set_valid("@duration", true);
    }

    pub fn with_duration_seconds(mut self, seconds: u64) -> Self {
        self.set_duration_seconds(seconds);
        self
    }
}

impl DidlElement for Resource {
    fn element_name(&self) -> &str {
        RESOURCE
    }

    fn identifier(&self) -> &str {
        RESOURCE
    }

    fn clone_element(&self) -> Box<dyn DidlElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
