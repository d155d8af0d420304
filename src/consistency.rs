//! Checks a raw header against itself and against the size of its file.
//!
//! Only a bad file signature is an error. Everything else is a [Warning], collected into a
//! [Consistency] report that says whether the header can be trusted for reading points, and
//! whether points can only be read as coordinates and intensity.
//!
//! ```
//! use las_columns::{consistency, raw};
//! let header = raw::Header::default();
//! let consistency = consistency::check(&header, Some(227)).unwrap();
//! assert!(!consistency.is_usable()); // no points
//! ```

use crate::{
    Error, Format, Result,
    layout::{COORDINATES_AND_INTENSITY_LEN, MIN_RECORD_LENGTH},
    raw,
};
use log::warn;
use thiserror::Error;

/// The newest minor version whose layout is known.
const MAX_MINOR_VERSION: u8 = 4;

/// The largest point data record format code that is not compressed.
const MAX_UNCOMPRESSED_FORMAT: u8 = 127;

/// A soft problem with a header.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Warning {
    /// Only las 1.x exists.
    #[error("unsupported major version {0}")]
    MajorVersion(u8),

    /// The minor version is newer than las 1.4, so the header is read as if it were 1.4.
    #[error("minor version {0} is newer than las 1.4")]
    MinorVersion(u8),

    /// The point data starts inside the header.
    #[error("offset to point data {offset} is smaller than the header size {header_size}")]
    OffsetToPointData {
        /// The offset to point data.
        offset: u32,
        /// The header size.
        header_size: u16,
    },

    /// The point data record format code marks laszip-compressed data.
    #[error("point data record format {0} is compressed (laz), which is not supported")]
    Compressed(u8),

    /// There is no layout for this point data record format.
    #[error("point data record format {0} is not supported, only xyz and intensity are read")]
    UnsupportedFormat(u8),

    /// The point data record length is shorter than its format requires.
    #[error("point record length {record_length} is below the {expected} bytes of format {format}")]
    RecordLength {
        /// The point data record format.
        format: u8,
        /// The declared record length.
        record_length: u16,
        /// The shortest acceptable record length.
        expected: u16,
    },

    /// The file holds fewer point records than the header declares.
    #[error("the header declares {declared} points, but the file only holds {available}")]
    TooFewRecords {
        /// The declared number of points.
        declared: u64,
        /// The number of whole records in the file.
        available: u64,
    },

    /// The header declares no points.
    #[error("the header declares no points")]
    NoPoints,
}

/// The outcome of a consistency check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Consistency {
    /// Can the point data be read as the header describes?
    pub usable: bool,

    /// Can only the coordinates and intensity of each record be decoded?
    pub coordinates_only: bool,

    /// The number of whole records between the start of point data and the end of the file, if
    /// the file size is known.
    pub available_points: Option<u64>,

    /// Every warning, in the order the checks ran.
    pub warnings: Vec<Warning>,
}

impl Consistency {
    /// Is the header usable?
    pub fn is_usable(&self) -> bool {
        self.usable
    }

    fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn reject(&mut self, warning: Warning) {
        self.usable = false;
        self.warn(warning);
    }
}

/// Checks a raw header.
///
/// `file_size` is the number of bytes from the start of the header to the end of the file. When
/// it is `None` the declared point count is not checked against the data.
///
/// Returns an error only if the file signature is not "LASF". Each warning is also logged.
///
/// # Examples
///
/// ```
/// use las_columns::{consistency::{self, Warning}, raw};
/// let header = raw::Header {
///     number_of_point_records: 10,
///     ..Default::default()
/// };
/// let consistency = consistency::check(&header, Some(227 + 5 * 20)).unwrap();
/// assert!(!consistency.usable);
/// assert_eq!(
///     vec![Warning::TooFewRecords { declared: 10, available: 5 }],
///     consistency.warnings
/// );
/// ```
pub fn check(header: &raw::Header, file_size: Option<u64>) -> Result<Consistency> {
    if header.file_signature != raw::LASF {
        return Err(Error::InvalidFileSignature(header.file_signature));
    }
    let mut consistency = Consistency {
        usable: true,
        ..Default::default()
    };

    let version = header.version;
    if version.major != 1 {
        consistency.reject(Warning::MajorVersion(version.major));
    }
    if version.minor > MAX_MINOR_VERSION {
        consistency.warn(Warning::MinorVersion(version.minor));
    }

    if header.offset_to_point_data < u32::from(header.header_size) {
        consistency.reject(Warning::OffsetToPointData {
            offset: header.offset_to_point_data,
            header_size: header.header_size,
        });
    }

    let code = header.point_data_record_format;
    let record_length = header.point_data_record_length;
    if code > MAX_UNCOMPRESSED_FORMAT {
        consistency.reject(Warning::Compressed(code));
    }
    match Format::resolve(code, record_length) {
        Some(format) => {
            let expected = format.layout().record_length;
            if record_length < expected {
                consistency.coordinates_only = true;
                let warning = Warning::RecordLength {
                    format: code,
                    record_length,
                    expected,
                };
                if record_length < MIN_RECORD_LENGTH {
                    consistency.reject(warning);
                } else {
                    consistency.warn(warning);
                }
            }
        }
        None => {
            consistency.coordinates_only = true;
            consistency.warn(Warning::UnsupportedFormat(code));
            if usize::from(record_length) < COORDINATES_AND_INTENSITY_LEN {
                consistency.reject(Warning::RecordLength {
                    format: code,
                    record_length,
                    expected: COORDINATES_AND_INTENSITY_LEN as u16,
                });
            }
        }
    }

    let declared = header.number_of_points();
    if let Some(file_size) = file_size {
        if record_length > 0 {
            let available = file_size.saturating_sub(u64::from(header.offset_to_point_data))
                / u64::from(record_length);
            consistency.available_points = Some(available);
            if available < declared {
                consistency.reject(Warning::TooFewRecords {
                    declared,
                    available,
                });
            }
        }
    }
    if declared < 1 {
        consistency.reject(Warning::NoPoints);
    }

    Ok(consistency)
}
