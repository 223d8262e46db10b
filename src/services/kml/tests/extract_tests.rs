use super::*;
use crate::types::{ExtractOutcome, SkipReason};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_kml(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("doc.kml");
    fs::write(&path, body).unwrap();
    path
}

fn full_doc(name: &str, href: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
<Document>
  <name>{name}</name>
  <GroundOverlay>
    <name>layer</name>
    <Icon><href>{href}</href></Icon>
    <LatLonBox>
      <north>45.0</north>
      <south>44.0</south>
      <east>-120.0</east>
      <west>-121.0</west>
    </LatLonBox>
  </GroundOverlay>
</Document>
</kml>"#
    )
}

#[test]
fn extracts_full_overlay() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("overlay.png"), b"png").unwrap();
    let kml = write_kml(dir.path(), &full_doc("Topo A", "overlay.png"));

    let record = match extract_overlay(&kml).unwrap() {
        ExtractOutcome::Overlay(r) => r,
        other => panic!("expected overlay, got {other:?}"),
    };
    assert_eq!(record.name, "Topo A");
    assert_eq!(record.image_href, "overlay.png");
    assert_eq!(record.bounds.north, "45.0");
    assert_eq!(record.bounds.south, "44.0");
    assert_eq!(record.bounds.east, "-120.0");
    assert_eq!(record.bounds.west, "-121.0");
}

#[test]
fn handles_prefixed_namespace() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("map.png"), b"png").unwrap();
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml:kml xmlns:kml="http://www.opengis.net/kml/2.2">
<kml:Document>
  <kml:name>Prefixed</kml:name>
  <kml:GroundOverlay>
    <kml:Icon><kml:href>map.png</kml:href></kml:Icon>
    <kml:LatLonBox>
      <kml:north>1</kml:north>
      <kml:south>0</kml:south>
      <kml:east>1</kml:east>
      <kml:west>0</kml:west>
    </kml:LatLonBox>
  </kml:GroundOverlay>
</kml:Document>
</kml:kml>"#;
    let kml = write_kml(dir.path(), body);

    let record = match extract_overlay(&kml).unwrap() {
        ExtractOutcome::Overlay(r) => r,
        other => panic!("expected overlay, got {other:?}"),
    };
    assert_eq!(record.name, "Prefixed");
    assert_eq!(record.image_href, "map.png");
}

#[test]
fn unescapes_entities_in_name() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("overlay.png"), b"png").unwrap();
    let kml = write_kml(dir.path(), &full_doc("Hills &amp; Valleys", "overlay.png"));

    let record = match extract_overlay(&kml).unwrap() {
        ExtractOutcome::Overlay(r) => r,
        other => panic!("expected overlay, got {other:?}"),
    };
    assert_eq!(record.name, "Hills & Valleys");
}

#[test]
fn skips_when_no_name() {
    let dir = TempDir::new().unwrap();
    let body = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <GroundOverlay><Icon><href>x.png</href></Icon></GroundOverlay>
</Document></kml>"#;
    let kml = write_kml(dir.path(), body);

    assert!(matches!(
        extract_overlay(&kml).unwrap(),
        ExtractOutcome::Skip(SkipReason::NoName)
    ));
}

#[test]
fn skips_when_no_overlay() {
    let dir = TempDir::new().unwrap();
    let body = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <name>Routes</name>
  <Placemark><name>Trailhead</name></Placemark>
</Document></kml>"#;
    let kml = write_kml(dir.path(), body);

    assert!(matches!(
        extract_overlay(&kml).unwrap(),
        ExtractOutcome::Skip(SkipReason::NoOverlay)
    ));
}

#[test]
fn skips_when_bounds_incomplete() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("overlay.png"), b"png").unwrap();
    let body = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <name>Partial</name>
  <GroundOverlay>
    <Icon><href>overlay.png</href></Icon>
    <LatLonBox><north>45.0</north><south>44.0</south></LatLonBox>
  </GroundOverlay>
</Document></kml>"#;
    let kml = write_kml(dir.path(), body);

    assert!(matches!(
        extract_overlay(&kml).unwrap(),
        ExtractOutcome::Skip(SkipReason::MissingOverlayData)
    ));
}

#[test]
fn skips_when_image_missing_on_disk() {
    let dir = TempDir::new().unwrap();
    let kml = write_kml(dir.path(), &full_doc("No Image", "overlay.png"));

    assert!(matches!(
        extract_overlay(&kml).unwrap(),
        ExtractOutcome::Skip(SkipReason::MissingImage)
    ));
}

#[test]
fn malformed_xml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let kml = write_kml(
        dir.path(),
        "<kml><Document><name>Broken</name></Wrong></kml>",
    );

    assert!(matches!(
        extract_overlay(&kml),
        Err(KmlError::Malformed { .. })
    ));
}

#[test]
fn ignores_second_overlay() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("first.png"), b"png").unwrap();
    let body = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <name>Two Overlays</name>
  <GroundOverlay>
    <Icon><href>first.png</href></Icon>
    <LatLonBox><north>2</north><south>1</south><east>2</east><west>1</west></LatLonBox>
  </GroundOverlay>
  <GroundOverlay>
    <Icon><href>second.png</href></Icon>
    <LatLonBox><north>9</north><south>8</south><east>9</east><west>8</west></LatLonBox>
  </GroundOverlay>
</Document></kml>"#;
    let kml = write_kml(dir.path(), body);

    let record = match extract_overlay(&kml).unwrap() {
        ExtractOutcome::Overlay(r) => r,
        other => panic!("expected overlay, got {other:?}"),
    };
    assert_eq!(record.image_href, "first.png");
    assert_eq!(record.bounds.north, "2");
}
