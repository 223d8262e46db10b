mod extract;
mod synthesize;

pub use extract::extract_overlay;
pub use synthesize::{synthesize, KML_NAMESPACE};
