//! Read and write [ASPRS LAS](https://www.asprs.org/committee-general/laser-las-file-format-exchange-activities.html)
//! 1.0 through 1.4 point cloud data as typed columns.
//!
//! Every point field lives in its own vector, so a file with a hundred million points is a
//! handful of allocations, and records are decoded and encoded in fixed-size chunks.
//!
//! # Reading
//!
//! Read a whole file with [read_file]:
//!
//! ```no_run
//! use las_columns::ReadMode;
//! let file = las_columns::read_file("points.las", ReadMode::Full).unwrap();
//! if let Some(points) = file.points {
//!     println!("{} points, first x is {}", points.len(), points.x[0]);
//! }
//! ```
//!
//! Or use a [Reader] on anything that implements `Read` and `Seek`, and read only the sections
//! you need:
//!
//! ```no_run
//! use las_columns::Reader;
//! let mut reader = Reader::from_path("points.las").unwrap();
//! for warning in &reader.consistency().warnings {
//!     println!("{}", warning);
//! }
//! let vlrs = reader.read_vlrs().unwrap();
//! let points = reader.read_coordinates().unwrap();
//! ```
//!
//! # Writing
//!
//! A [Writer] takes a [Header] and writes the columns, vlrs, and evlrs in one go. The counts and
//! offsets in the header are taken from what is actually written:
//!
//! ```
//! use std::io::Cursor;
//! use las_columns::{Format, Header, Version, Writer, point::PointColumns};
//!
//! let format = Format::new(6).unwrap();
//! let columns = PointColumns::allocate(&format, 42).unwrap();
//! let mut writer = Writer::new(Cursor::new(Vec::new()), Header::new(Version::new(1, 4), format));
//! writer.write(&columns, &[], &[]).unwrap();
//! assert_eq!(42, writer.header().number_of_points);
//! ```
//!
//! # Inconsistent files
//!
//! A header that does not add up (points past the end of the file, an unknown point format, a
//! point offset inside the header) is reported through [consistency::Consistency] and logged with
//! the [log](https://docs.rs/log) crate rather than returned as an error. Only a bad file
//! signature fails the read.

#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub mod consistency;
pub mod feature;
pub mod header;
pub mod layout;
pub mod point;
pub mod raw;
pub mod reader;
pub mod utils;
pub mod vlr;
pub mod writer;

mod bounds;
mod error;
mod file;
mod format;
mod transform;
mod vector;
mod version;

pub use crate::{
    bounds::Bounds,
    error::Error,
    feature::Feature,
    file::{
        LasFile, ReadMode, read_file, read_file_with_options, write_file, write_file_with_options,
    },
    format::Format,
    header::Header,
    point::PointColumns,
    reader::{Reader, ReaderOptions},
    transform::Transform,
    vector::Vector,
    version::Version,
    vlr::Vlr,
    writer::{Writer, WriterOptions},
};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
