use crate::{Transform, Version};
use std::collections::TryReserveError;
use thiserror::Error;

/// Crate-specific error enum.
///
/// Soft problems found while inspecting a header are not errors, see
/// [Warning](crate::consistency::Warning).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A column buffer could not be allocated.
    #[error("could not allocate {len} elements for {what}: {source}")]
    Allocation {
        /// The column or buffer that failed.
        what: &'static str,
        /// The number of elements requested.
        len: usize,
        /// The underlying reservation error.
        source: TryReserveError,
    },

    /// A column's length does not match the number of points being written.
    #[error("column {column} has {actual} values, expected {expected}")]
    ColumnLength {
        /// The column name.
        column: &'static str,
        /// The number of points.
        expected: usize,
        /// The number of values in the column.
        actual: usize,
    },

    /// The extra bytes block does not match the per-point count of the header.
    #[error("the header requires {expected} extra bytes per point, the columns have {actual}")]
    ExtraBytesMismatch {
        /// Extra bytes implied by the header.
        expected: usize,
        /// Extra bytes per point in the columns.
        actual: usize,
    },

    /// The file signature was not "LASF".
    #[error("file signature must be LASF, found {0:?}")]
    InvalidFileSignature([u8; 4]),

    /// The value cannot be represented as an i32 after applying the inverse transform.
    #[error("the transform {transform} cannot convert {n} to an i32")]
    InverseTransform {
        /// The float.
        n: f64,
        /// The transform.
        transform: Transform,
    },

    /// The string does not name a read mode.
    #[error("unknown read mode: {0}")]
    InvalidReadMode(String),

    /// Wrapper around `std::io::Error`.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A column required by the point format is missing.
    #[error("point format {format} requires the {column} column")]
    MissingColumn {
        /// The column name.
        column: &'static str,
        /// The point data record format.
        format: u8,
    },

    /// This string is not ASCII.
    #[error("this string is not ascii: {0}")]
    NotAscii(String),

    /// The bytes after the string are not all nuls.
    #[error("the bytes are not filled with nuls: {0:?}")]
    NotNulFilled(Vec<u8>),

    /// This string has a character that does not fit in one byte.
    #[error("this string has characters above U+00FF: {0}")]
    NotSingleByte(String),

    /// The point record length cannot hold even the coordinates and intensity.
    #[error("point data record length {0} is too short for coordinates and intensity")]
    RecordTooShort(u16),

    /// The output stream went bad while writing point chunks.
    #[error("the output stream is unhealthy after chunk {chunk}")]
    StreamUnhealthy {
        /// The zero-based index of the last chunk written.
        chunk: u64,
    },

    /// The string does not fit in its fixed-width field.
    #[error("{string} is longer than {len} bytes")]
    StringTooLong {
        /// The string.
        string: String,
        /// The field width.
        len: usize,
    },

    /// The point count does not fit in the header of this version.
    #[error("las {version} cannot hold {count} points")]
    TooManyPoints {
        /// The number of points.
        count: u64,
        /// The las version.
        version: Version,
    },

    /// The extra bytes block would not fit in the address space.
    #[error("{points} points with {per_point} extra bytes each do not fit in memory")]
    TooManyExtraBytes {
        /// Extra bytes per point.
        per_point: usize,
        /// The number of points.
        points: usize,
    },

    /// Too many vlrs for the 32-bit header counter.
    #[error("too many vlrs: {0}")]
    TooManyVlrs(usize),

    /// This version does not support the feature.
    #[error("las {version} does not support {feature}")]
    UnsupportedFeature {
        /// The las version.
        version: Version,
        /// The name of the feature.
        feature: &'static str,
    },

    /// The point data record format has no field layout.
    #[error("unsupported point data record format: {0}")]
    UnsupportedFormat(u8),

    /// Wrapper around `std::str::Utf8Error`.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// The vlr payload is too long for the 16-bit length field.
    #[error("the vlr is too long: {0}")]
    VlrTooLong(usize),
}

impl Error {
    pub(crate) fn allocation(
        what: &'static str,
        len: usize,
    ) -> impl FnOnce(TryReserveError) -> Error {
        move |source| Error::Allocation { what, len, source }
    }
}
