use crate::types::{KmlError, OverlayRecord};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Fixed values for the cleaned overlay. drawOrder 100 keeps the image above
/// other layers on mobile; the Lod range disables distance-based culling,
/// which is what breaks these overlays on phones in the first place.
const OVERLAY_NAME: &str = "Map";
const DRAW_ORDER: &str = "100";
const MIN_LOD_PIXELS: &str = "64";
const MAX_LOD_PIXELS: &str = "-1";

/// Render a minimal, mobile-safe KML for the given overlay. Pure function:
/// the same record always yields byte-identical text. Name and href go
/// through the XML writer, so special characters are escaped instead of
/// corrupting the document. No Region or NetworkLink elements, ever.
pub fn synthesize(record: &OverlayRecord) -> Result<String, KmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut kml = BytesStart::new("kml");
    kml.push_attribute(("xmlns", KML_NAMESPACE));
    writer.write_event(Event::Start(kml))?;

    start(&mut writer, "Document")?;
    text_element(&mut writer, "name", &record.name)?;
    text_element(&mut writer, "open", "1")?;

    start(&mut writer, "GroundOverlay")?;
    text_element(&mut writer, "name", OVERLAY_NAME)?;
    text_element(&mut writer, "drawOrder", DRAW_ORDER)?;

    start(&mut writer, "Icon")?;
    text_element(&mut writer, "href", &record.image_href)?;
    end(&mut writer, "Icon")?;

    start(&mut writer, "LatLonBox")?;
    text_element(&mut writer, "north", &record.bounds.north)?;
    text_element(&mut writer, "south", &record.bounds.south)?;
    text_element(&mut writer, "east", &record.bounds.east)?;
    text_element(&mut writer, "west", &record.bounds.west)?;
    end(&mut writer, "LatLonBox")?;

    start(&mut writer, "Lod")?;
    text_element(&mut writer, "minLodPixels", MIN_LOD_PIXELS)?;
    text_element(&mut writer, "maxLodPixels", MAX_LOD_PIXELS)?;
    end(&mut writer, "Lod")?;

    end(&mut writer, "GroundOverlay")?;
    end(&mut writer, "Document")?;
    end(&mut writer, "kml")?;

    // The writer only ever receives UTF-8 strings.
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn start<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<(), KmlError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<(), KmlError> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, tag: &str, value: &str) -> Result<(), KmlError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/synthesize_tests.rs"]
mod tests;
