//! Raw structures that map directly onto the bytes of a las file.
//!
//! These structures are "dumb": they do the least amount of validity checking, so that a broken
//! file can still be inspected field by field. For example:
//!
//! ```
//! let raw_header = las_columns::raw::Header {
//!     point_data_record_format: 200,
//!     ..Default::default()
//! };
//! let header = las_columns::Header::from_raw(&raw_header);
//! assert!(header.format().is_none());
//! ```
//!
//! In general, users should prefer the high-level versions, e.g. `las_columns::Header` over
//! `las_columns::raw::Header`.

pub mod header;
pub mod vlr;

pub use self::{header::Header, vlr::Vlr};

/// The file magic number used for all las files.
pub const LASF: [u8; 4] = *b"LASF";
