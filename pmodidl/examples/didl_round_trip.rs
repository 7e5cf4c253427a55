//! Construit un document DIDL-Lite, l'écrit pour deux versions de
//! protocole, puis le relit avec le registre global.
//!
//! ```text
//! RUST_LOG=pmodidl=debug cargo run --example didl_round_trip
//! ```

use chrono::NaiveDate;
use pmodidl::properties::{AlbumArt, Genre, Person, Resource};
use pmodidl::{
    DeserializationContext, DidlConfig, DidlLiteDocument, ObjectKind, PropertyFilter, SerializationContext,
    UpnpObject, get_property, global_registry,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = DidlConfig::load(None)?;

    let mut album = UpnpObject::create(ObjectKind::MusicAlbum, "album-1", "0", "Kind of Blue");
    album.set_child_count(1);
    album.add_artist(Person::artist("Miles Davis"));
    album.add_album_art(AlbumArt::new("http://host/covers/kob.jpg").with_profile("JPEG_TN"));

    let mut track = UpnpObject::create(ObjectKind::MusicTrack, "track-1", "album-1", "So What");
    track.add_artist(Person::artist("Miles Davis").with_role("Performer"));
    track.add_genre(Genre::extended("Jazz", "g-7", "Jazz/Modal"));
    track.add_album("Kind of Blue");
    track.set_track_number(1);
    track.set_date(NaiveDate::from_ymd_opt(1959, 8, 17).unwrap_or_default());
    track.add_resource(
        Resource::new("http://host/tracks/so-what.flac", "http-get:*:audio/flac:*")
            .with_size(58_720_256)
            .with_audio_format(44_100, 16, 2)
            .with_duration_seconds(562),
    );

    let mut doc = DidlLiteDocument::new();
    doc.push(album);
    doc.push(track);

    let full = SerializationContext::from_config(&config);
    println!("=== Version {} ===", full.version());
    println!("{}", doc.to_xml_string(&full)?);

    let minimal = SerializationContext::new(1).with_filter(PropertyFilter::parse("upnp:artist,res@duration"));
    println!("\n=== Version 1, filtered ===");
    println!("{}", doc.to_xml_string(&minimal)?);

    let xml = doc.to_xml_string(&full)?;
    let parsed = DidlLiteDocument::parse(&xml, global_registry(), &DeserializationContext::from_config(&config))?;
    println!("\n{}", parsed.to_markdown());

    if let Some(track) = parsed.get_object_by_id("track-1") {
        let protocol = get_property(track, "res@protocolInfo")?;
        println!("res@protocolInfo = {}", protocol.text().unwrap_or_default());
        println!("{}", serde_json::to_string_pretty(&pmodidl::json::to_json(track))?);
    }

    Ok(())
}
