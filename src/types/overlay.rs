use std::fmt;

/// The four edges of a GroundOverlay bounding box, kept as the exact decimal
/// strings found in the source document. No numeric re-parsing happens
/// anywhere, so whatever precision the source used is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatLonBounds {
    pub north: String,
    pub south: String,
    pub east: String,
    pub west: String,
}

/// Everything we pull out of a source KML: the display name, the overlay
/// image reference (relative to the KML's directory) and its bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRecord {
    pub name: String,
    pub image_href: String,
    pub bounds: LatLonBounds,
}

/// Why an input was excluded from the output. None of these are errors; they
/// are expected outcomes for inputs that are not simple image overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The document has no name element.
    NoName,
    /// The document has no GroundOverlay element.
    NoOverlay,
    /// The overlay is missing its image href or one of the four bounds.
    MissingOverlayData,
    /// The referenced image file does not exist next to the KML.
    MissingImage,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SkipReason::NoName => "no name element",
            SkipReason::NoOverlay => "no GroundOverlay found",
            SkipReason::MissingOverlayData => "missing required overlay data",
            SkipReason::MissingImage => "missing referenced image file",
        };
        f.write_str(msg)
    }
}

/// Result of a successful parse: either a usable overlay or a reason to skip.
#[derive(Debug)]
pub enum ExtractOutcome {
    Overlay(OverlayRecord),
    Skip(SkipReason),
}
