use crate::types::{ExtractOutcome, KmlError, LatLonBounds, OverlayRecord, SkipReason};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::io::BufReader;
use std::path::Path;

/// Which element's text we are about to read.
#[derive(Clone, Copy, PartialEq)]
enum Capture {
    None,
    DocName,
    Href,
    North,
    South,
    East,
    West,
}

/// Raw field values as they are collected during the streaming parse.
#[derive(Default)]
struct Fields {
    doc_name: Option<String>,
    image_href: Option<String>,
    north: Option<String>,
    south: Option<String>,
    east: Option<String>,
    west: Option<String>,
}

impl Fields {
    fn store(&mut self, capture: Capture, text: String) {
        let slot = match capture {
            Capture::None => return,
            Capture::DocName => &mut self.doc_name,
            Capture::Href => &mut self.image_href,
            Capture::North => &mut self.north,
            Capture::South => &mut self.south,
            Capture::East => &mut self.east,
            Capture::West => &mut self.west,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }
}

/// Pull the display name, image href and bounding box out of a KML file.
///
/// Elements are matched by local name, so documents using a `kml:` prefix
/// parse the same as ones relying on a default namespace. Only the first
/// GroundOverlay is considered. Never mutates the input.
pub fn extract_overlay(kml_path: &Path) -> Result<ExtractOutcome, KmlError> {
    let file = fs::File::open(kml_path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    reader.trim_text(true);

    let mut fields = Fields::default();
    let mut overlay_seen = false;
    let mut in_overlay = false;
    let mut in_icon = false;
    let mut in_box = false;
    let mut capture = Capture::None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"GroundOverlay" if !overlay_seen => {
                    overlay_seen = true;
                    in_overlay = true;
                }
                b"Icon" if in_overlay => in_icon = true,
                b"LatLonBox" if in_overlay => in_box = true,
                b"href" if in_icon => capture = Capture::Href,
                b"north" if in_box => capture = Capture::North,
                b"south" if in_box => capture = Capture::South,
                b"east" if in_box => capture = Capture::East,
                b"west" if in_box => capture = Capture::West,
                // First name element in document order, wherever it sits.
                b"name" if fields.doc_name.is_none() => capture = Capture::DocName,
                _ => {}
            },
            Ok(Event::End(e)) => {
                match e.local_name().as_ref() {
                    b"GroundOverlay" => in_overlay = false,
                    b"Icon" => in_icon = false,
                    b"LatLonBox" => in_box = false,
                    _ => {}
                }
                capture = Capture::None;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| KmlError::Malformed {
                        position: reader.buffer_position(),
                        source: err,
                    })?
                    .into_owned();
                fields.store(capture, text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                fields.store(capture, text);
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(KmlError::Malformed {
                    position: reader.buffer_position(),
                    source: err,
                })
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

    let name = match non_empty(fields.doc_name) {
        Some(n) => n,
        None => return Ok(ExtractOutcome::Skip(SkipReason::NoName)),
    };
    if !overlay_seen {
        return Ok(ExtractOutcome::Skip(SkipReason::NoOverlay));
    }

    let (image_href, north, south, east, west) = match (
        non_empty(fields.image_href),
        non_empty(fields.north),
        non_empty(fields.south),
        non_empty(fields.east),
        non_empty(fields.west),
    ) {
        (Some(h), Some(n), Some(s), Some(e), Some(w)) => (h, n, s, e, w),
        _ => return Ok(ExtractOutcome::Skip(SkipReason::MissingOverlayData)),
    };

    // Hrefs are relative to the KML's own directory.
    let base = kml_path.parent().unwrap_or_else(|| Path::new("."));
    if !base.join(&image_href).exists() {
        return Ok(ExtractOutcome::Skip(SkipReason::MissingImage));
    }

    Ok(ExtractOutcome::Overlay(OverlayRecord {
        name,
        image_href,
        bounds: LatLonBounds {
            north,
            south,
            east,
            west,
        },
    }))
}

#[cfg(test)]
#[path = "tests/extract_tests.rs"]
mod tests;
