mod create;
mod extract;

pub use create::create_archive;
pub use extract::extract_archive;
