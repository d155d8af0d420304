//! Write las files from columns.
//!
//! A `Writer` uses a [Header] for its configuration, and writes the whole file in one go: the
//! header, the vlrs, the points, then the evlrs.
//!
//! ```
//! use std::io::Cursor;
//! use las_columns::{Format, Header, Version, Vlr, Writer, point::PointColumns};
//!
//! let format = Format::new(1).unwrap();
//! let header = Header::new(Version::new(1, 4), format);
//! let columns = PointColumns::allocate(&format, 10).unwrap();
//! let vlr = Vlr { user_id: "example".to_string(), ..Default::default() };
//!
//! let mut writer = Writer::new(Cursor::new(Vec::new()), header);
//! writer.write(&columns, &[vlr], &[]).unwrap();
//! assert_eq!(10, writer.header().number_of_points);
//! assert_eq!(375 + 54, writer.header().offset_to_point_data);
//! ```
//!
//! The columns must hold everything the point format needs, and nothing is written if they
//! don't:
//!
//! ```
//! use std::io::Cursor;
//! use las_columns::{Format, Header, Version, Writer, point::PointColumns};
//!
//! let header = Header::new(Version::new(1, 2), Format::new(1).unwrap());
//! let mut columns = PointColumns::allocate(&Format::new(1).unwrap(), 10).unwrap();
//! columns.gps_time = None;
//!
//! let mut writer = Writer::new(Cursor::new(Vec::new()), header);
//! assert!(writer.write(&columns, &[], &[]).is_err());
//! assert!(writer.into_inner().into_inner().is_empty());
//! ```

mod encode;

use self::encode::Encoder;
use crate::{
    Error, Format, Header, Result, Vlr,
    feature::{Evlrs, Feature},
    point::PointColumns,
    raw::header::{
        HEADER_SIZE_POSITION, OFFSET_TO_POINT_DATA_POSITION, START_OF_FIRST_EVLR_POSITION,
    },
    vlr,
};
use log::{debug, warn};
use std::{
    fs::File,
    io::{BufWriter, Seek, SeekFrom, Write},
    path::Path,
};

/// The number of records encoded per bulk write.
pub const DEFAULT_CHUNK_POINTS: usize = 4096;

/// The number of chunks between two checks of the output stream.
pub const DEFAULT_HEALTH_CHECK_INTERVAL: u64 = 30;

/// Options for [Writer].
///
/// # Examples
///
/// ```
/// use las_columns::WriterOptions;
/// let options = WriterOptions::default().with_health_check_interval(0);
/// assert_eq!(0, options.health_check_interval());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    chunk_points: usize,
    health_check_interval: u64,
}

impl WriterOptions {
    /// Sets the number of records encoded per bulk write.
    ///
    /// Zero is treated as one.
    pub fn with_chunk_points(mut self, chunk_points: usize) -> Self {
        self.chunk_points = chunk_points.max(1);
        self
    }

    /// Sets how many chunks are written between two checks of the output stream.
    ///
    /// A check flushes the stream and makes sure its position is where the written bytes say it
    /// should be. Zero disables the check.
    pub fn with_health_check_interval(mut self, health_check_interval: u64) -> Self {
        self.health_check_interval = health_check_interval;
        self
    }

    /// Returns the number of records encoded per bulk write.
    pub fn chunk_points(&self) -> usize {
        self.chunk_points
    }

    /// Returns the number of chunks between two checks of the output stream.
    pub fn health_check_interval(&self) -> u64 {
        self.health_check_interval
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            chunk_points: DEFAULT_CHUNK_POINTS,
            health_check_interval: DEFAULT_HEALTH_CHECK_INTERVAL,
        }
    }
}

/// Writes las data.
#[derive(Debug)]
pub struct Writer<W: Write + Seek> {
    write: W,
    header: Header,
    options: WriterOptions,
}

impl<W: Write + Seek> Writer<W> {
    /// Creates a new writer with default options.
    ///
    /// Nothing is written until [Writer::write].
    pub fn new(write: W, header: Header) -> Writer<W> {
        Writer::with_options(write, header, WriterOptions::default())
    }

    /// Creates a new writer with custom options.
    pub fn with_options(write: W, header: Header, options: WriterOptions) -> Writer<W> {
        Writer {
            write,
            header,
            options,
        }
    }

    /// Returns this writer's header.
    ///
    /// After a successful write, the counts and offsets describe what was actually written.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Writes a whole las file at the current position.
    ///
    /// The point count, vlr count, and evlr count are taken from the columns and the lists, with
    /// a warning if the header said otherwise. Every precondition is checked before the first
    /// byte is written. If the header size, the offset to point data, or the start of the first
    /// evlr turn out not to match what was written, that field is patched in place.
    pub fn write(&mut self, columns: &PointColumns, vlrs: &[Vlr], evlrs: &[Vlr]) -> Result<()> {
        let mut header = self.header.clone();
        let code = header.point_data_record_format;
        let format = header.format().ok_or(Error::UnsupportedFormat(code))?;
        if header.point_data_record_length < format.layout().record_length {
            return Err(Error::RecordTooShort(header.point_data_record_length));
        }
        encode::validate(&format, columns)?;
        encode::check_coordinates(columns, &header.transforms)?;
        if !evlrs.is_empty() && !header.version.supports::<Evlrs>() {
            return Err(Error::UnsupportedFeature {
                version: header.version,
                feature: Evlrs::name(),
            });
        }

        let number_of_points = columns.len() as u64;
        if header.number_of_points != number_of_points {
            warn!(
                "header declares {} points, writing {}",
                header.number_of_points, number_of_points
            );
            header.number_of_points = number_of_points;
        }
        let number_of_vlrs = u32::try_from(vlrs.len()).map_err(|_| Error::TooManyVlrs(vlrs.len()))?;
        if header.number_of_variable_length_records != number_of_vlrs {
            warn!(
                "header declares {} vlrs, writing {}",
                header.number_of_variable_length_records, number_of_vlrs
            );
            header.number_of_variable_length_records = number_of_vlrs;
        }
        let number_of_evlrs =
            u32::try_from(evlrs.len()).map_err(|_| Error::TooManyVlrs(evlrs.len()))?;
        if header.number_of_evlrs != number_of_evlrs {
            warn!(
                "header declares {} evlrs, writing {}",
                header.number_of_evlrs, number_of_evlrs
            );
            header.number_of_evlrs = number_of_evlrs;
        }
        if evlrs.is_empty() {
            header.start_of_first_evlr = 0;
        }

        let raw_header = header.to_raw()?;
        let raw_vlrs = vlr::to_raw_vlrs(vlrs, false)?;
        let raw_evlrs = vlr::to_raw_vlrs(evlrs, true)?;

        let start = self.write.stream_position()?;
        raw_header.write_to(&mut self.write)?;
        let header_size = self.write.stream_position()? - start;
        if header_size != u64::from(header.header_size) {
            warn!(
                "header size is {} bytes, not {}, patching",
                header_size, header.header_size
            );
            header.header_size = u16::try_from(header_size).unwrap_or(u16::MAX);
            self.patch(start, HEADER_SIZE_POSITION, &header.header_size.to_le_bytes())?;
        }

        vlr::write_raw_vlrs(&mut self.write, &raw_vlrs)?;
        let offset_to_point_data = self.write.stream_position()? - start;
        if offset_to_point_data != u64::from(header.offset_to_point_data) {
            warn!(
                "point data starts at {}, not {}, patching",
                offset_to_point_data, header.offset_to_point_data
            );
            header.offset_to_point_data = u32::try_from(offset_to_point_data)
                .map_err(|_| Error::TooManyVlrs(vlrs.len()))?;
            self.patch(
                start,
                OFFSET_TO_POINT_DATA_POSITION,
                &header.offset_to_point_data.to_le_bytes(),
            )?;
        }

        self.write_points(&format, &header, columns)?;

        if !raw_evlrs.is_empty() {
            let start_of_first_evlr = self.write.stream_position()? - start;
            if start_of_first_evlr != header.start_of_first_evlr {
                if header.start_of_first_evlr != 0 {
                    warn!(
                        "first evlr starts at {}, not {}, patching",
                        start_of_first_evlr, header.start_of_first_evlr
                    );
                }
                header.start_of_first_evlr = start_of_first_evlr;
                self.patch(
                    start,
                    START_OF_FIRST_EVLR_POSITION,
                    &start_of_first_evlr.to_le_bytes(),
                )?;
            }
            vlr::write_raw_vlrs(&mut self.write, &raw_evlrs)?;
        }
        self.write.flush()?;
        debug!(
            "wrote {} points, {} vlrs, {} evlrs",
            number_of_points, number_of_vlrs, number_of_evlrs
        );
        self.header = header;
        Ok(())
    }

    /// Consumes this writer, returning the underlying `Write`.
    pub fn into_inner(self) -> W {
        self.write
    }

    fn write_points(
        &mut self,
        format: &Format,
        header: &Header,
        columns: &PointColumns,
    ) -> Result<()> {
        let n = columns.len();
        let record_length = usize::from(header.point_data_record_length);
        let chunk_points = self.options.chunk_points.min(n).max(1);
        let len = record_length * chunk_points;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(Error::allocation("point buffer", len))?;
        buffer.resize(len, 0);

        let encoder = Encoder::new(format.layout().fields(), record_length, header.transforms);
        let mut expected_position = self.write.stream_position()?;
        let mut first = 0;
        let mut chunks = 0;
        while first < n {
            let count = chunk_points.min(n - first);
            let chunk = &mut buffer[..count * record_length];
            encoder.encode(columns, first, chunk)?;
            self.write.write_all(chunk)?;
            expected_position += chunk.len() as u64;
            first += count;
            chunks += 1;
            let interval = self.options.health_check_interval;
            if interval > 0 && chunks % interval == 0 {
                self.check_health(expected_position, chunks - 1)?;
                debug!("wrote {} of {} points", first, n);
            }
        }
        Ok(())
    }

    fn check_health(&mut self, expected_position: u64, chunk: u64) -> Result<()> {
        self.write.flush()?;
        if self.write.stream_position()? == expected_position {
            Ok(())
        } else {
            Err(Error::StreamUnhealthy { chunk })
        }
    }

    fn patch(&mut self, start: u64, position: u64, bytes: &[u8]) -> Result<()> {
        let end = self.write.stream_position()?;
        let _ = self.write.seek(SeekFrom::Start(start + position))?;
        self.write.write_all(bytes)?;
        let _ = self.write.seek(SeekFrom::Start(end))?;
        Ok(())
    }
}

impl Writer<BufWriter<File>> {
    /// Creates a new writer for a path, creating or truncating the file.
    ///
    /// The underlying `File` is wrapped in a `BufWriter` for performance reasons.
    pub fn from_path<P: AsRef<Path>>(path: P, header: Header) -> Result<Self> {
        Writer::from_path_with_options(path, header, WriterOptions::default())
    }

    /// Creates a new writer for a path, with custom options.
    pub fn from_path_with_options<P: AsRef<Path>>(
        path: P,
        header: Header,
        options: WriterOptions,
    ) -> Result<Self> {
        File::create(path)
            .map_err(Error::from)
            .map(|file| Writer::with_options(BufWriter::new(file), header, options))
    }
}
