//! Track sources.
//!
//! Tracks come either from a directory walk (tags read per file) or from an
//! exported iTunes library. Both end up as a stream of [`TrackDescriptor`].

mod cache;
mod manifest;
mod model;
mod scan;
mod source;
mod tags;

pub use cache::load_library;
pub use model::TrackDescriptor;
pub use source::TrackSource;
pub use tags::LoftyTagReader;
