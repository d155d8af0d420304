//! Read las files into columns.
//!
//! A [Reader] reads and checks the header when it is created, then reads each section of the
//! file on request:
//!
//! ```
//! use std::io::Cursor;
//! use las_columns::{Format, Header, Reader, Version, Writer, point::PointColumns};
//!
//! let header = Header::new(Version::new(1, 2), Format::new(1).unwrap());
//! let mut columns = PointColumns::allocate(&Format::new(1).unwrap(), 3).unwrap();
//! columns.x = vec![1., 2., 3.];
//! let mut writer = Writer::new(Cursor::new(Vec::new()), header);
//! writer.write(&columns, &[], &[]).unwrap();
//!
//! let mut cursor = writer.into_inner();
//! cursor.set_position(0);
//! let mut reader = Reader::new(cursor).unwrap();
//! assert!(reader.consistency().is_usable());
//! let vlrs = reader.read_vlrs().unwrap();
//! let points = reader.read_points().unwrap();
//! assert_eq!(vec![1., 2., 3.], points.x);
//! ```
//!
//! If you're reading from a file, use `Reader::from_path`, which wraps the file in a `BufReader`.

mod decode;

use self::decode::Decoder;
use crate::{
    Error, Header, Result, Vlr,
    consistency::{self, Consistency},
    feature::Evlrs,
    layout::{COORDINATES_AND_INTENSITY_LEN, Field},
    point::PointColumns,
    raw, vlr,
};
use log::{debug, warn};
use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

/// The number of records decoded per bulk read.
pub const DEFAULT_CHUNK_POINTS: usize = 4096;

static COORDINATES_AND_INTENSITY: [Field; 1] = [Field::CoordinatesAndIntensity];

/// Options for [Reader].
///
/// # Examples
///
/// ```
/// use las_columns::ReaderOptions;
/// let options = ReaderOptions::default().with_strict(false).with_chunk_points(1024);
/// assert!(!options.strict());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    chunk_points: usize,
    strict: bool,
}

impl ReaderOptions {
    /// Sets the number of records decoded per bulk read.
    ///
    /// Zero is treated as one.
    pub fn with_chunk_points(mut self, chunk_points: usize) -> Self {
        self.chunk_points = chunk_points.max(1);
        self
    }

    /// Sets strict mode.
    ///
    /// In strict mode, an unusable header stops [read_file](crate::read_file) after the header,
    /// and the declared point count is trusted. Otherwise the point count is clamped to the whole
    /// records the file actually holds, and reading goes on.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the number of records decoded per bulk read.
    pub fn chunk_points(&self) -> usize {
        self.chunk_points
    }

    /// Is this reader strict?
    pub fn strict(&self) -> bool {
        self.strict
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            chunk_points: DEFAULT_CHUNK_POINTS,
            strict: true,
        }
    }
}

/// Reads las data.
#[derive(Debug)]
pub struct Reader<R: Read + Seek> {
    read: R,
    start: u64,
    raw_header: raw::Header,
    header: Header,
    consistency: Consistency,
    options: ReaderOptions,
}

impl<R: Read + Seek> Reader<R> {
    /// Creates a new reader with default options.
    ///
    /// The header is read and checked right away. Only a bad file signature, or an io error, is
    /// an error; everything else ends up in the [Consistency] report.
    ///
    /// This does *not* wrap the `Read` in a `BufRead`, so if you're concerned about performance
    /// you should do that wrapping yourself (or use `from_path`).
    pub fn new(read: R) -> Result<Reader<R>> {
        Reader::with_options(read, ReaderOptions::default())
    }

    /// Creates a new reader with custom options.
    pub fn with_options(mut read: R, options: ReaderOptions) -> Result<Reader<R>> {
        let start = read.stream_position()?;
        let raw_header = raw::Header::read_from(&mut read)?;
        let end = read.seek(SeekFrom::End(0))?;
        let consistency = consistency::check(&raw_header, Some(end.saturating_sub(start)))?;
        let header = Header::from_raw(&raw_header);
        debug!(
            "las {}, point format {}, {} points",
            header.version, header.point_data_record_format, header.number_of_points
        );
        Ok(Reader {
            read,
            start,
            raw_header,
            header,
            consistency,
            options,
        })
    }

    /// Returns a reference to this reader's header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the header exactly as it was read.
    pub fn raw_header(&self) -> &raw::Header {
        &self.raw_header
    }

    /// Returns the outcome of the header consistency check.
    pub fn consistency(&self) -> &Consistency {
        &self.consistency
    }

    /// Returns the number of points that the point readers will decode.
    ///
    /// This is the declared count, clamped to the records the file holds if this reader is not
    /// strict.
    pub fn number_of_points(&self) -> u64 {
        let declared = self.header.number_of_points;
        match self.consistency.available_points {
            Some(available) if !self.options.strict && available < declared => available,
            _ => declared,
        }
    }

    /// Reads the variable length records that follow the header.
    ///
    /// Returns an empty vector if the header declares none.
    pub fn read_vlrs(&mut self) -> Result<Vec<Vlr>> {
        if !self.header.has_vlrs() {
            return Ok(Vec::new());
        }
        vlr::read_vlrs(
            &mut self.read,
            self.start + u64::from(self.header.header_size),
            self.header.number_of_variable_length_records,
            false,
        )
    }

    /// Reads every point.
    ///
    /// All the columns of the point format are filled, unless the consistency check limited
    /// this file to coordinates and intensity.
    pub fn read_points(&mut self) -> Result<PointColumns> {
        let coordinates_only = self.consistency.coordinates_only;
        self.decode(coordinates_only)
    }

    /// Reads the coordinates and intensity of every point, skipping the rest of each record.
    pub fn read_coordinates(&mut self) -> Result<PointColumns> {
        self.decode(true)
    }

    /// Reads the extended variable length records that follow the points.
    ///
    /// Returns an empty vector for versions without evlrs, or if the header declares none.
    pub fn read_evlrs(&mut self) -> Result<Vec<Vlr>> {
        if !self.header.version.supports::<Evlrs>() || self.header.number_of_evlrs == 0 {
            return Ok(Vec::new());
        }
        vlr::read_vlrs(
            &mut self.read,
            self.start + self.header.start_of_first_evlr,
            self.header.number_of_evlrs,
            true,
        )
    }

    /// Consumes this reader, returning the underlying `Read`.
    pub fn into_inner(self) -> R {
        self.read
    }

    fn decode(&mut self, coordinates_only: bool) -> Result<PointColumns> {
        let record_length = self.header.point_data_record_length;
        if usize::from(record_length) < COORDINATES_AND_INTENSITY_LEN {
            return Err(Error::RecordTooShort(record_length));
        }
        let number_of_points = self.number_of_points();
        if number_of_points < self.header.number_of_points {
            warn!(
                "reading {} of {} declared points",
                number_of_points, self.header.number_of_points
            );
        }
        let n = usize::try_from(number_of_points).map_err(|_| Error::TooManyPoints {
            count: number_of_points,
            version: self.header.version,
        })?;

        let (mut columns, fields) = if coordinates_only {
            (
                PointColumns::allocate_coordinates(n)?,
                &COORDINATES_AND_INTENSITY[..],
            )
        } else {
            let code = self.header.point_data_record_format;
            let format = self.header.format().ok_or(Error::UnsupportedFormat(code))?;
            if record_length < format.layout().record_length {
                return Err(Error::RecordTooShort(record_length));
            }
            (PointColumns::allocate(&format, n)?, format.layout().fields())
        };

        let record_length = usize::from(record_length);
        let chunk_points = self.options.chunk_points.min(n).max(1);
        let len = record_length * chunk_points;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(Error::allocation("point buffer", len))?;
        buffer.resize(len, 0);

        let decoder = Decoder::new(fields, record_length, self.header.transforms);
        let _ = self.read.seek(SeekFrom::Start(
            self.start + u64::from(self.header.offset_to_point_data),
        ))?;
        let mut first = 0;
        while first < n {
            let count = chunk_points.min(n - first);
            let chunk = &mut buffer[..count * record_length];
            self.read.read_exact(chunk)?;
            decoder.decode(chunk, &mut columns, first)?;
            first += count;
            debug!("decoded {} of {} points", first, n);
        }
        Ok(columns)
    }
}

impl Reader<BufReader<File>> {
    /// Creates a new reader from a path.
    ///
    /// The underlying `File` is wrapped in a `BufReader` for performance reasons.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Reader::from_path_with_options(path, ReaderOptions::default())
    }

    /// Creates a new reader from a path, with custom options.
    pub fn from_path_with_options<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Self> {
        File::open(path)
            .map_err(Error::from)
            .and_then(|file| Reader::with_options(BufReader::new(file), options))
    }
}
