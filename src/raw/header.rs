//! Raw file metadata.

use crate::{
    Result, Version,
    feature::{Evlrs, LargeFiles, Waveforms},
    utils,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// The largest header through las 1.4, read up front in one call.
pub const MAX_HEADER_SIZE: usize = 375;

/// Byte position of the header size field.
pub const HEADER_SIZE_POSITION: u64 = 94;

/// Byte position of the offset to point data field.
pub const OFFSET_TO_POINT_DATA_POSITION: u64 = 96;

/// Byte position of the start of the first extended variable length record.
pub const START_OF_FIRST_EVLR_POSITION: u64 = 235;

const IS_COMPRESSED_MASK: u8 = 0x80;

/// A las header, field by field as it sits on disk.
///
/// The documentation for each member is taken from the las 1.4 standard, with notes about the older
/// versions where the usage differs.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// The file signature must contain the four characters "LASF".
    pub file_signature: [u8; 4],

    /// This field should be set to a value between 1 and 65,535, inclusive.
    ///
    /// A value of zero (0) is interpreted to mean that an ID has not been assigned.
    pub file_source_id: u16,

    /// A bit field used to indicate certain global properties about the file.
    ///
    /// | Bits | Field name | las versions |
    /// | ---- | ---------- | ------------ |
    /// | 0 | GPS time type | 1.2 and above |
    /// | 1 | Waveform data packets internal | 1.3 |
    /// | 2 | Waveform data packets external | 1.3 and above |
    /// | 3 | Return numbers have been synthetically generated | 1.3 and above |
    /// | 4 | WKT | 1.4 |
    pub global_encoding: u16,

    /// The first, 4-byte, part of the project id.
    pub guid_data_1: u32,
    #[allow(missing_docs)]
    pub guid_data_2: u16,
    #[allow(missing_docs)]
    pub guid_data_3: u16,
    #[allow(missing_docs)]
    pub guid_data_4: [u8; 8],

    /// The major and minor version of the file.
    pub version: Version,

    /// Identifies the hardware, or the operation that produced the file, e.g. "MERGE".
    pub system_identifier: [u8; 32],

    /// The generating software package and version, nul filled.
    pub generating_software: [u8; 32],

    /// Day, expressed as an unsigned short, on which this file was created.
    ///
    /// Day is computed as the Greenwich Mean Time (GMT) day. January 1 is considered day 1.
    pub file_creation_day_of_year: u16,

    /// The year, expressed as a four digit number, in which the file was created.
    pub file_creation_year: u16,

    /// The size, in bytes, of the Public Header Block itself.
    pub header_size: u16,

    /// The number of bytes from the beginning of the file to the first point record.
    pub offset_to_point_data: u32,

    /// The number of variable length records after the header.
    pub number_of_variable_length_records: u32,

    /// The point data record format.
    ///
    /// Compressed (LAZ) files set the high bit.
    pub point_data_record_format: u8,

    /// The size, in bytes, of one point data record, extra bytes included.
    pub point_data_record_length: u16,

    /// The legacy 32-bit point count.
    ///
    /// In las 1.4 this is superseded by the large file count.
    pub number_of_point_records: u32,

    /// The legacy per-return counts, for returns one through five.
    pub number_of_points_by_return: [u32; 5],

    /// The scale factor fields contain a double floating point value that is used to scale the
    /// corresponding X, Y, and Z long values within the point records.
    pub x_scale_factor: f64,
    #[allow(missing_docs)]
    pub y_scale_factor: f64,
    #[allow(missing_docs)]
    pub z_scale_factor: f64,

    /// Xcoordinate = (Xrecord * Xscale) + Xoffset
    pub x_offset: f64,
    #[allow(missing_docs)]
    pub y_offset: f64,
    #[allow(missing_docs)]
    pub z_offset: f64,

    /// The max and min data fields are the actual unscaled extents of the LAS point file data.
    pub max_x: f64,
    #[allow(missing_docs)]
    pub min_x: f64,
    #[allow(missing_docs)]
    pub max_y: f64,
    #[allow(missing_docs)]
    pub min_y: f64,
    #[allow(missing_docs)]
    pub max_z: f64,
    #[allow(missing_docs)]
    pub min_z: f64,

    /// **las 1.3 and 1.4**: The offset, in bytes, to the first byte of the waveform data packet
    /// record.
    pub start_of_waveform_data_packet_record: Option<u64>,

    /// **las 1.4**: Location and number of the extended variable length records.
    pub evlr: Option<Evlr>,

    /// **las 1.4**: The 64-bit point counts.
    pub large_file: Option<LargeFile>,
}

/// Where the extended variable length records are.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Evlr {
    /// The offset, in bytes, from the beginning of the LAS file to the first byte of the first
    /// EVLR.
    pub start_of_first_evlr: u64,

    /// The number of EVLRs stored after the point data records.
    pub number_of_evlrs: u32,
}

/// The 64-bit point counts of las 1.4.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LargeFile {
    /// The total number of point records in the file.
    pub number_of_point_records: u64,

    /// The per-return counts, for returns one through fifteen.
    pub number_of_points_by_return: [u64; 15],
}

impl Header {
    /// Reads a raw header from a `Read`.
    ///
    /// The first 375 bytes are read in one go. A stream shorter than that is not an error: the
    /// missing bytes read as zero, which trips the signature check for truncated files.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use las_columns::raw::Header;
    /// let mut cursor = Cursor::new(Vec::new());
    /// Header::default().write_to(&mut cursor).unwrap();
    /// cursor.set_position(0);
    /// let header = Header::read_from(cursor).unwrap();
    /// ```
    pub fn read_from<R: Read>(read: R) -> Result<Header> {
        let mut prefix = Vec::with_capacity(MAX_HEADER_SIZE);
        let _ = read.take(MAX_HEADER_SIZE as u64).read_to_end(&mut prefix)?;
        prefix.resize(MAX_HEADER_SIZE, 0);
        Header::from_prefix(&prefix)
    }

    fn from_prefix(prefix: &[u8]) -> Result<Header> {
        let mut read = Cursor::new(prefix);
        let mut file_signature = [0; 4];
        read.read_exact(&mut file_signature)?;
        let file_source_id = read.read_u16::<LittleEndian>()?;
        let global_encoding = read.read_u16::<LittleEndian>()?;
        let guid_data_1 = read.read_u32::<LittleEndian>()?;
        let guid_data_2 = read.read_u16::<LittleEndian>()?;
        let guid_data_3 = read.read_u16::<LittleEndian>()?;
        let mut guid_data_4 = [0; 8];
        read.read_exact(&mut guid_data_4)?;
        let version_major = read.read_u8()?;
        let version_minor = read.read_u8()?;
        let version = Version::new(version_major, version_minor);
        let mut system_identifier = [0; 32];
        read.read_exact(&mut system_identifier)?;
        let mut generating_software = [0; 32];
        read.read_exact(&mut generating_software)?;
        let file_creation_day_of_year = read.read_u16::<LittleEndian>()?;
        let file_creation_year = read.read_u16::<LittleEndian>()?;
        let header_size = read.read_u16::<LittleEndian>()?;
        let offset_to_point_data = read.read_u32::<LittleEndian>()?;
        let number_of_variable_length_records = read.read_u32::<LittleEndian>()?;
        let point_data_record_format = read.read_u8()?;
        let point_data_record_length = read.read_u16::<LittleEndian>()?;
        let number_of_point_records = read.read_u32::<LittleEndian>()?;
        let mut number_of_points_by_return = [0; 5];
        for n in &mut number_of_points_by_return {
            *n = read.read_u32::<LittleEndian>()?;
        }
        let x_scale_factor = read.read_f64::<LittleEndian>()?;
        let y_scale_factor = read.read_f64::<LittleEndian>()?;
        let z_scale_factor = read.read_f64::<LittleEndian>()?;
        let x_offset = read.read_f64::<LittleEndian>()?;
        let y_offset = read.read_f64::<LittleEndian>()?;
        let z_offset = read.read_f64::<LittleEndian>()?;
        let max_x = read.read_f64::<LittleEndian>()?;
        let min_x = read.read_f64::<LittleEndian>()?;
        let max_y = read.read_f64::<LittleEndian>()?;
        let min_y = read.read_f64::<LittleEndian>()?;
        let max_z = read.read_f64::<LittleEndian>()?;
        let min_z = read.read_f64::<LittleEndian>()?;
        let start_of_waveform_data_packet_record = if version.supports::<Waveforms>() {
            utils::some_or_none_if_zero(read.read_u64::<LittleEndian>()?)
        } else {
            None
        };
        let evlr = if version.supports::<Evlrs>() {
            Evlr::read_from(&mut read)?.into_option()
        } else {
            None
        };
        let large_file = if version.supports::<LargeFiles>() {
            Some(LargeFile::read_from(&mut read)?)
        } else {
            None
        };
        Ok(Header {
            file_signature,
            file_source_id,
            global_encoding,
            guid_data_1,
            guid_data_2,
            guid_data_3,
            guid_data_4,
            version,
            system_identifier,
            generating_software,
            file_creation_day_of_year,
            file_creation_year,
            header_size,
            offset_to_point_data,
            number_of_variable_length_records,
            point_data_record_format,
            point_data_record_length,
            number_of_point_records,
            number_of_points_by_return,
            x_scale_factor,
            y_scale_factor,
            z_scale_factor,
            x_offset,
            y_offset,
            z_offset,
            max_x,
            min_x,
            max_y,
            min_y,
            max_z,
            min_z,
            start_of_waveform_data_packet_record,
            evlr,
            large_file,
        })
    }

    /// Returns the number of points that the point data actually holds.
    ///
    /// This is the 64-bit count for las 1.4 and later, even if the legacy count disagrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::raw::{Header, header::LargeFile};
    /// let mut header = Header { number_of_point_records: 7, ..Default::default() };
    /// assert_eq!(7, header.number_of_points());
    ///
    /// header.version = (1, 4).into();
    /// header.large_file = Some(LargeFile { number_of_point_records: 42, ..Default::default() });
    /// assert_eq!(42, header.number_of_points());
    /// ```
    pub fn number_of_points(&self) -> u64 {
        match self.large_file {
            Some(large_file) if self.version.supports::<LargeFiles>() => {
                large_file.number_of_point_records
            }
            _ => u64::from(self.number_of_point_records),
        }
    }

    /// Returns true if this raw header is for compressed las data.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::raw::Header;
    /// let mut header = Header::default();
    /// assert!(!header.is_compressed());
    /// header.point_data_record_format = 131;
    /// assert!(header.is_compressed());
    /// ```
    pub fn is_compressed(&self) -> bool {
        (self.point_data_record_format & IS_COMPRESSED_MASK) == IS_COMPRESSED_MASK
    }

    /// Returns true if there are variable length records after the header.
    pub fn has_vlrs(&self) -> bool {
        self.number_of_variable_length_records > 0
    }

    /// Returns true if there are extended variable length records after the points.
    pub fn has_evlrs(&self) -> bool {
        self.version.supports::<Evlrs>()
            && self.evlr.is_some_and(|evlr| evlr.number_of_evlrs > 0)
    }

    /// Writes a raw header to a `Write`.
    ///
    /// Writes exactly the bytes of this version's header layout, regardless of `header_size`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use las_columns::raw::Header;
    /// let mut cursor = Cursor::new(Vec::new());
    /// let header = Header::default();
    /// header.write_to(&mut cursor).unwrap();
    /// assert_eq!(227, cursor.into_inner().len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_all(&self.file_signature)?;
        write.write_u16::<LittleEndian>(self.file_source_id)?;
        write.write_u16::<LittleEndian>(self.global_encoding)?;
        write.write_u32::<LittleEndian>(self.guid_data_1)?;
        write.write_u16::<LittleEndian>(self.guid_data_2)?;
        write.write_u16::<LittleEndian>(self.guid_data_3)?;
        write.write_all(&self.guid_data_4)?;
        write.write_u8(self.version.major)?;
        write.write_u8(self.version.minor)?;
        write.write_all(&self.system_identifier)?;
        write.write_all(&self.generating_software)?;
        write.write_u16::<LittleEndian>(self.file_creation_day_of_year)?;
        write.write_u16::<LittleEndian>(self.file_creation_year)?;
        write.write_u16::<LittleEndian>(self.header_size)?;
        write.write_u32::<LittleEndian>(self.offset_to_point_data)?;
        write.write_u32::<LittleEndian>(self.number_of_variable_length_records)?;
        write.write_u8(self.point_data_record_format)?;
        write.write_u16::<LittleEndian>(self.point_data_record_length)?;
        write.write_u32::<LittleEndian>(self.number_of_point_records)?;
        for n in &self.number_of_points_by_return {
            write.write_u32::<LittleEndian>(*n)?;
        }
        write.write_f64::<LittleEndian>(self.x_scale_factor)?;
        write.write_f64::<LittleEndian>(self.y_scale_factor)?;
        write.write_f64::<LittleEndian>(self.z_scale_factor)?;
        write.write_f64::<LittleEndian>(self.x_offset)?;
        write.write_f64::<LittleEndian>(self.y_offset)?;
        write.write_f64::<LittleEndian>(self.z_offset)?;
        write.write_f64::<LittleEndian>(self.max_x)?;
        write.write_f64::<LittleEndian>(self.min_x)?;
        write.write_f64::<LittleEndian>(self.max_y)?;
        write.write_f64::<LittleEndian>(self.min_y)?;
        write.write_f64::<LittleEndian>(self.max_z)?;
        write.write_f64::<LittleEndian>(self.min_z)?;
        if self.version.supports::<Waveforms>() {
            write.write_u64::<LittleEndian>(
                self.start_of_waveform_data_packet_record.unwrap_or(0),
            )?;
        }
        if self.version.supports::<Evlrs>() {
            let evlr = self.evlr.unwrap_or_default();
            write.write_u64::<LittleEndian>(evlr.start_of_first_evlr)?;
            write.write_u32::<LittleEndian>(evlr.number_of_evlrs)?;
        }
        if self.version.supports::<LargeFiles>() {
            let large_file = self.large_file.unwrap_or_default();
            write.write_u64::<LittleEndian>(large_file.number_of_point_records)?;
            for n in &large_file.number_of_points_by_return {
                write.write_u64::<LittleEndian>(*n)?;
            }
        }
        Ok(())
    }
}

impl Default for Header {
    fn default() -> Header {
        let version = Version::new(1, 2);
        Header {
            file_signature: crate::raw::LASF,
            file_source_id: 0,
            global_encoding: 0,
            guid_data_1: 0,
            guid_data_2: 0,
            guid_data_3: 0,
            guid_data_4: [0; 8],
            version,
            system_identifier: [0; 32],
            generating_software: [0; 32],
            file_creation_day_of_year: 0,
            file_creation_year: 0,
            header_size: version.header_size(),
            offset_to_point_data: u32::from(version.header_size()),
            number_of_variable_length_records: 0,
            point_data_record_format: 0,
            point_data_record_length: 20,
            number_of_point_records: 0,
            number_of_points_by_return: [0; 5],
            x_scale_factor: 0.001,
            y_scale_factor: 0.001,
            z_scale_factor: 0.001,
            x_offset: 0.,
            y_offset: 0.,
            z_offset: 0.,
            max_x: 0.,
            min_x: 0.,
            max_y: 0.,
            min_y: 0.,
            max_z: 0.,
            min_z: 0.,
            start_of_waveform_data_packet_record: None,
            evlr: None,
            large_file: None,
        }
    }
}

impl Evlr {
    fn read_from<R: Read>(mut read: R) -> Result<Evlr> {
        Ok(Evlr {
            start_of_first_evlr: read.read_u64::<LittleEndian>()?,
            number_of_evlrs: read.read_u32::<LittleEndian>()?,
        })
    }

    fn into_option(self) -> Option<Evlr> {
        if self.start_of_first_evlr == 0 && self.number_of_evlrs == 0 {
            None
        } else {
            Some(self)
        }
    }
}

impl LargeFile {
    fn read_from<R: Read>(mut read: R) -> Result<LargeFile> {
        let number_of_point_records = read.read_u64::<LittleEndian>()?;
        let mut number_of_points_by_return = [0; 15];
        for n in &mut number_of_points_by_return {
            *n = read.read_u64::<LittleEndian>()?;
        }
        Ok(LargeFile {
            number_of_point_records,
            number_of_points_by_return,
        })
    }
}
