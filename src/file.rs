//! Read and write whole las files.
//!
//! [read_file] decodes a file up to the point that a [ReadMode] asks for, and [write_file] writes
//! one from a header, columns, and record lists:
//!
//! ```
//! use las_columns::{Format, Header, ReadMode, Version, point::PointColumns};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("points.las");
//! let format = Format::new(3).unwrap();
//! let mut columns = PointColumns::allocate(&format, 2).unwrap();
//! columns.x = vec![1., 2.];
//!
//! let header = Header::new(Version::new(1, 2), format);
//! las_columns::write_file(&path, &header, &columns, &[], &[]).unwrap();
//!
//! let file = las_columns::read_file(&path, ReadMode::Full).unwrap();
//! assert!(file.is_usable());
//! assert_eq!(Some(columns), file.points);
//! ```

use crate::{
    Error, Header, Reader, ReaderOptions, Result, Vlr, Writer, WriterOptions,
    consistency::Consistency, point::PointColumns,
};
use log::{info, warn};
use std::{fmt, path::Path, str::FromStr};

/// How much of a file [read_file] decodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReadMode {
    /// The header, the vlrs, every point field, and the evlrs.
    #[default]
    Full,
    /// Only the header.
    HeaderOnly,
    /// The header and the vlrs.
    ThroughVlrs,
    /// The header, the vlrs, the coordinates and intensity of every point, and the evlrs.
    CoordinatesAndIntensityOnly,
}

impl FromStr for ReadMode {
    type Err = Error;

    /// Parses the names that the command line tools use.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::ReadMode;
    /// assert_eq!(ReadMode::ThroughVlrs, "VLR".parse().unwrap());
    /// assert_eq!(ReadMode::CoordinatesAndIntensityOnly, "XYZInt".parse().unwrap());
    /// assert!("Everything".parse::<ReadMode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<ReadMode> {
        match s {
            "LoadAll" => Ok(ReadMode::Full),
            "HeaderOnly" => Ok(ReadMode::HeaderOnly),
            "VLR" => Ok(ReadMode::ThroughVlrs),
            "XYZInt" => Ok(ReadMode::CoordinatesAndIntensityOnly),
            _ => Err(Error::InvalidReadMode(s.to_string())),
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadMode::Full => "LoadAll",
            ReadMode::HeaderOnly => "HeaderOnly",
            ReadMode::ThroughVlrs => "VLR",
            ReadMode::CoordinatesAndIntensityOnly => "XYZInt",
        };
        f.write_str(s)
    }
}

/// The decoded contents of a las file.
///
/// Sections that were not read, because of the read mode or because the header is not usable,
/// are `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct LasFile {
    /// The header, always decoded.
    pub header: Header,
    /// The outcome of the header consistency check.
    pub consistency: Consistency,
    /// The variable length records.
    pub vlrs: Option<Vec<Vlr>>,
    /// The points.
    pub points: Option<PointColumns>,
    /// The extended variable length records.
    pub evlrs: Option<Vec<Vlr>>,
}

impl LasFile {
    /// Was the header usable?
    pub fn is_usable(&self) -> bool {
        self.consistency.usable
    }
}

/// Reads a las file with default options.
///
/// Returns an error for a bad file signature, an io error, or a failed allocation. If the header
/// is not usable, the returned file holds only the header and the consistency report.
pub fn read_file<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<LasFile> {
    read_file_with_options(path, mode, ReaderOptions::default())
}

/// Reads a las file with custom options.
///
/// A permissive (non-strict) read keeps going when the header is not usable, reading as many
/// whole records as the file holds.
pub fn read_file_with_options<P: AsRef<Path>>(
    path: P,
    mode: ReadMode,
    options: ReaderOptions,
) -> Result<LasFile> {
    let path = path.as_ref();
    info!("reading {} ({})", path.display(), mode);
    let mut reader = Reader::from_path_with_options(path, options)?;
    let mut file = LasFile {
        header: reader.header().clone(),
        consistency: reader.consistency().clone(),
        vlrs: None,
        points: None,
        evlrs: None,
    };
    if mode == ReadMode::HeaderOnly {
        return Ok(file);
    }
    if !file.consistency.usable {
        if options.strict() {
            warn!(
                "{} has an unusable header, stopping after the header",
                path.display()
            );
            return Ok(file);
        }
        warn!("{} has an unusable header, reading anyway", path.display());
    }

    file.vlrs = Some(reader.read_vlrs()?);
    if mode == ReadMode::ThroughVlrs {
        return Ok(file);
    }
    let points = if mode == ReadMode::CoordinatesAndIntensityOnly {
        reader.read_coordinates()?
    } else {
        reader.read_points()?
    };
    info!(
        "read {} points of point format {} from {}",
        points.len(),
        file.header.point_data_record_format,
        path.display()
    );
    file.points = Some(points);
    file.evlrs = Some(reader.read_evlrs()?);
    Ok(file)
}

/// Writes a las file with default options, creating or truncating it.
///
/// Returns the header as written, with its counts and offsets set from the data.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    header: &Header,
    columns: &PointColumns,
    vlrs: &[Vlr],
    evlrs: &[Vlr],
) -> Result<Header> {
    write_file_with_options(path, header, columns, vlrs, evlrs, WriterOptions::default())
}

/// Writes a las file with custom options.
pub fn write_file_with_options<P: AsRef<Path>>(
    path: P,
    header: &Header,
    columns: &PointColumns,
    vlrs: &[Vlr],
    evlrs: &[Vlr],
    options: WriterOptions,
) -> Result<Header> {
    let path = path.as_ref();
    info!(
        "writing {} points of point format {} to {}",
        columns.len(),
        header.point_data_record_format,
        path.display()
    );
    let mut writer = Writer::from_path_with_options(path, header.clone(), options)?;
    writer.write(columns, vlrs, evlrs)?;
    Ok(writer.header().clone())
}
