//! Utility library for the path tracking simulation software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod params;
pub mod session;
pub mod time;
