pub mod archive;
pub mod kml;
pub mod pipeline;
