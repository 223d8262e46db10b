pub mod errors;
pub mod overlay;

pub use errors::{ArchiveError, KmlError};
pub use overlay::{ExtractOutcome, LatLonBounds, OverlayRecord, SkipReason};
