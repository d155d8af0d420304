//! High-level las header.
//!
//! A [Header] is what callers see and hand back when writing: strings instead of nul-padded
//! byte arrays, a [Uuid] project id, per-axis [Transform]s, and one effective point count no
//! matter which version the file is.
//!
//! ```
//! use las_columns::{Format, Header, Version};
//! let header = Header::new(Version::new(1, 4), Format::new(6).unwrap());
//! assert_eq!(375, header.header_size);
//! assert_eq!(30, header.point_data_record_length);
//! ```

use crate::{
    Bounds, Error, Format, Result, Transform, Vector, Version,
    feature::{Evlrs, LargeFiles, Waveforms},
    raw::{
        self,
        header::{Evlr, LargeFile},
    },
    utils::{AsLasStr, FromLasStr},
};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// Number of per-return counts in the legacy header fields.
const LEGACY_RETURNS: usize = 5;

/// Metadata describing the layout and interpretation of the point records.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// The file source id, e.g. the flight line.
    pub file_source_id: u16,

    /// The global encoding bit field.
    pub global_encoding: u16,

    /// The project id.
    pub guid: Uuid,

    /// The las version.
    pub version: Version,

    /// The hardware, or the operation, that produced the file.
    pub system_identifier: String,

    /// The software that produced the file.
    pub generating_software: String,

    /// Day of the year, starting at 1.
    pub file_creation_day_of_year: u16,

    #[allow(missing_docs)]
    pub file_creation_year: u16,

    /// The declared size of the header block.
    ///
    /// A writer patches the file if this turns out not to match the bytes actually written.
    pub header_size: u16,

    /// The declared offset to the first point record.
    ///
    /// A writer patches the file if this turns out not to match the bytes actually written.
    pub offset_to_point_data: u32,

    /// The number of vlrs after the header.
    pub number_of_variable_length_records: u32,

    /// The point data record format code, which may not have a layout.
    pub point_data_record_format: u8,

    /// The size of one point record, extra bytes included.
    pub point_data_record_length: u16,

    /// The effective number of points.
    ///
    /// This is the 64-bit count for las 1.4, and the legacy 32-bit count otherwise.
    pub number_of_points: u64,

    /// Points per return, for returns one through fifteen.
    ///
    /// Versions before las 1.4 only keep the first five.
    pub number_of_points_by_return: [u64; 15],

    /// Scale and offset for each axis.
    pub transforms: Vector<Transform>,

    /// The extents of the points, as declared by the header.
    pub bounds: Bounds,

    /// **las 1.3 and 1.4**: Start of the waveform data packet record, zero if there is none.
    pub start_of_waveform_data_packet_record: u64,

    /// **las 1.4**: Start of the first evlr.
    pub start_of_first_evlr: u64,

    /// **las 1.4**: Number of evlrs after the points.
    pub number_of_evlrs: u32,
}

impl Header {
    /// Creates a header for a version and point format, with the standard sizes and offsets.
    pub fn new(version: Version, format: Format) -> Header {
        Header {
            version,
            header_size: version.header_size(),
            offset_to_point_data: u32::from(version.header_size()),
            point_data_record_format: format.code(),
            point_data_record_length: format.record_length(),
            ..Default::default()
        }
    }

    /// Creates a header from a raw header.
    ///
    /// This never fails, so a header can always be handed back for diagnostics. Each string byte
    /// becomes one character, so [Header::to_raw] writes the same bytes back.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::{Header, raw};
    /// let header = Header::from_raw(&raw::Header::default());
    /// assert_eq!(0, header.number_of_points);
    /// ```
    pub fn from_raw(raw_header: &raw::Header) -> Header {
        let mut number_of_points_by_return = [0; 15];
        match raw_header.large_file {
            Some(large_file) if raw_header.version.supports::<LargeFiles>() => {
                number_of_points_by_return = large_file.number_of_points_by_return;
            }
            _ => {
                for (n, &legacy) in number_of_points_by_return
                    .iter_mut()
                    .zip(&raw_header.number_of_points_by_return)
                {
                    *n = u64::from(legacy);
                }
            }
        }
        let evlr = raw_header.evlr.unwrap_or_default();
        Header {
            file_source_id: raw_header.file_source_id,
            global_encoding: raw_header.global_encoding,
            guid: Uuid::from_fields(
                raw_header.guid_data_1,
                raw_header.guid_data_2,
                raw_header.guid_data_3,
                &raw_header.guid_data_4,
            ),
            version: raw_header.version,
            system_identifier: raw_header
                .system_identifier
                .to_las_string(),
            generating_software: raw_header
                .generating_software
                .to_las_string(),
            file_creation_day_of_year: raw_header.file_creation_day_of_year,
            file_creation_year: raw_header.file_creation_year,
            header_size: raw_header.header_size,
            offset_to_point_data: raw_header.offset_to_point_data,
            number_of_variable_length_records: raw_header.number_of_variable_length_records,
            point_data_record_format: raw_header.point_data_record_format,
            point_data_record_length: raw_header.point_data_record_length,
            number_of_points: raw_header.number_of_points(),
            number_of_points_by_return,
            transforms: Vector {
                x: Transform {
                    scale: raw_header.x_scale_factor,
                    offset: raw_header.x_offset,
                },
                y: Transform {
                    scale: raw_header.y_scale_factor,
                    offset: raw_header.y_offset,
                },
                z: Transform {
                    scale: raw_header.z_scale_factor,
                    offset: raw_header.z_offset,
                },
            },
            bounds: Bounds {
                min: Vector {
                    x: raw_header.min_x,
                    y: raw_header.min_y,
                    z: raw_header.min_z,
                },
                max: Vector {
                    x: raw_header.max_x,
                    y: raw_header.max_y,
                    z: raw_header.max_z,
                },
            },
            start_of_waveform_data_packet_record: raw_header
                .start_of_waveform_data_packet_record
                .unwrap_or(0),
            start_of_first_evlr: evlr.start_of_first_evlr,
            number_of_evlrs: evlr.number_of_evlrs,
        }
    }

    /// Converts this header into a raw header.
    ///
    /// The legacy point count is only filled when it fits in 32 bits; for versions before las
    /// 1.4 a count that doesn't fit is an error. The legacy per-return counts are left at zero
    /// for las 1.4 and later.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::{Header, Version};
    /// let mut header = Header::default();
    /// header.number_of_points = u64::from(u32::MAX) + 1;
    /// assert!(header.to_raw().is_err());
    ///
    /// header.version = Version::new(1, 4);
    /// let raw_header = header.to_raw().unwrap();
    /// assert_eq!(0, raw_header.number_of_point_records);
    /// assert_eq!(header.number_of_points, raw_header.number_of_points());
    /// ```
    pub fn to_raw(&self) -> Result<raw::Header> {
        let large_files = self.version.supports::<LargeFiles>();
        let number_of_point_records = match u32::try_from(self.number_of_points) {
            Ok(n) => n,
            Err(_) if large_files => 0,
            Err(_) => {
                return Err(Error::TooManyPoints {
                    count: self.number_of_points,
                    version: self.version,
                });
            }
        };
        let mut number_of_points_by_return = [0; LEGACY_RETURNS];
        if !large_files {
            for (legacy, &n) in number_of_points_by_return
                .iter_mut()
                .zip(&self.number_of_points_by_return)
            {
                *legacy = u32::try_from(n).map_err(|_| Error::TooManyPoints {
                    count: n,
                    version: self.version,
                })?;
            }
        }
        let mut system_identifier = [0u8; 32];
        system_identifier.from_las_str(&self.system_identifier)?;
        let mut generating_software = [0u8; 32];
        generating_software.from_las_str(&self.generating_software)?;
        let (guid_data_1, guid_data_2, guid_data_3, guid_data_4) = self.guid.as_fields();
        Ok(raw::Header {
            file_signature: raw::LASF,
            file_source_id: self.file_source_id,
            global_encoding: self.global_encoding,
            guid_data_1,
            guid_data_2,
            guid_data_3,
            guid_data_4: *guid_data_4,
            version: self.version,
            system_identifier,
            generating_software,
            file_creation_day_of_year: self.file_creation_day_of_year,
            file_creation_year: self.file_creation_year,
            header_size: self.header_size,
            offset_to_point_data: self.offset_to_point_data,
            number_of_variable_length_records: self.number_of_variable_length_records,
            point_data_record_format: self.point_data_record_format,
            point_data_record_length: self.point_data_record_length,
            number_of_point_records,
            number_of_points_by_return,
            x_scale_factor: self.transforms.x.scale,
            y_scale_factor: self.transforms.y.scale,
            z_scale_factor: self.transforms.z.scale,
            x_offset: self.transforms.x.offset,
            y_offset: self.transforms.y.offset,
            z_offset: self.transforms.z.offset,
            max_x: self.bounds.max.x,
            min_x: self.bounds.min.x,
            max_y: self.bounds.max.y,
            min_y: self.bounds.min.y,
            max_z: self.bounds.max.z,
            min_z: self.bounds.min.z,
            start_of_waveform_data_packet_record: if self.version.supports::<Waveforms>() {
                Some(self.start_of_waveform_data_packet_record)
            } else {
                None
            },
            evlr: if self.version.supports::<Evlrs>() {
                Some(Evlr {
                    start_of_first_evlr: self.start_of_first_evlr,
                    number_of_evlrs: self.number_of_evlrs,
                })
            } else {
                None
            },
            large_file: if large_files {
                Some(LargeFile {
                    number_of_point_records: self.number_of_points,
                    number_of_points_by_return: self.number_of_points_by_return,
                })
            } else {
                None
            },
        })
    }

    /// Resolves the point format.
    ///
    /// Returns `None` if the point data record format has no layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Header;
    /// let mut header = Header::default();
    /// assert!(header.format().is_some());
    /// header.point_data_record_format = 200;
    /// assert!(header.format().is_none());
    /// ```
    pub fn format(&self) -> Option<Format> {
        Format::resolve(self.point_data_record_format, self.point_data_record_length)
    }

    /// Returns the creation date, if the day and year make a valid date.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use las_columns::Header;
    /// let mut header = Header::default();
    /// assert_eq!(None, header.date());
    /// header.file_creation_year = 2024;
    /// header.file_creation_day_of_year = 60;
    /// assert_eq!(NaiveDate::from_ymd_opt(2024, 2, 29), header.date());
    /// ```
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_yo_opt(
            i32::from(self.file_creation_year),
            u32::from(self.file_creation_day_of_year),
        )
    }

    /// Sets the creation day and year from a date.
    ///
    /// Years that don't fit in the header field are clamped.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.file_creation_year = u16::try_from(date.year().max(0)).unwrap_or(u16::MAX);
        // ordinals are at most 366
        self.file_creation_day_of_year = date.ordinal() as u16;
    }

    /// Are there vlrs after the header?
    pub fn has_vlrs(&self) -> bool {
        self.number_of_variable_length_records > 0
    }

    /// Are there evlrs after the points?
    pub fn has_evlrs(&self) -> bool {
        self.version.supports::<Evlrs>() && self.number_of_evlrs > 0
    }
}

impl Default for Header {
    fn default() -> Header {
        let version = Version::default();
        Header {
            file_source_id: 0,
            global_encoding: 0,
            guid: Uuid::nil(),
            version,
            system_identifier: String::new(),
            generating_software: String::new(),
            file_creation_day_of_year: 0,
            file_creation_year: 0,
            header_size: version.header_size(),
            offset_to_point_data: u32::from(version.header_size()),
            number_of_variable_length_records: 0,
            point_data_record_format: 0,
            point_data_record_length: crate::layout::LAYOUTS[0].record_length,
            number_of_points: 0,
            number_of_points_by_return: [0; 15],
            transforms: Vector {
                x: Transform::default(),
                y: Transform::default(),
                z: Transform::default(),
            },
            bounds: Bounds {
                min: Vector::default(),
                max: Vector::default(),
            },
            start_of_waveform_data_packet_record: 0,
            start_of_first_evlr: 0,
            number_of_evlrs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_roundtrip() {
        let guid = Uuid::from_fields(0x01020304, 0x0506, 0x0708, &[9, 10, 11, 12, 13, 14, 15, 16]);
        let header = Header {
            guid,
            ..Default::default()
        };
        let raw_header = header.to_raw().unwrap();
        assert_eq!(0x01020304, raw_header.guid_data_1);
        assert_eq!([9, 10, 11, 12, 13, 14, 15, 16], raw_header.guid_data_4);
        assert_eq!(guid, Header::from_raw(&raw_header).guid);
    }

    #[test]
    fn legacy_returns_for_las_1_2() {
        let mut header = Header {
            number_of_points: 10,
            ..Default::default()
        };
        header.number_of_points_by_return[..5].copy_from_slice(&[5, 2, 1, 1, 1]);
        let raw_header = header.to_raw().unwrap();
        assert_eq!(10, raw_header.number_of_point_records);
        assert_eq!([5, 2, 1, 1, 1], raw_header.number_of_points_by_return);
        assert_eq!(None, raw_header.large_file);
        assert_eq!(header, Header::from_raw(&raw_header));
    }

    #[test]
    fn las_1_4_keeps_fifteen_returns() {
        let mut header = Header::new(Version::new(1, 4), Format::new(6).unwrap());
        header.number_of_points = 42;
        header.number_of_points_by_return[14] = 42;
        let raw_header = header.to_raw().unwrap();
        assert_eq!(42, raw_header.number_of_point_records);
        assert_eq!([0; 5], raw_header.number_of_points_by_return);
        assert_eq!(header, Header::from_raw(&raw_header));
    }

    #[test]
    fn string_too_long() {
        let header = Header {
            system_identifier: "x".repeat(33),
            ..Default::default()
        };
        assert!(matches!(
            header.to_raw(),
            Err(Error::StringTooLong { len: 32, .. })
        ));
    }

    #[test]
    fn strings() {
        let header = Header {
            system_identifier: "MERGE".to_string(),
            generating_software: "las-columns".to_string(),
            ..Default::default()
        };
        let raw_header = header.to_raw().unwrap();
        assert_eq!(
            Ok("MERGE"),
            raw_header.system_identifier.as_las_str().map_err(|_| ())
        );
        assert_eq!(header, Header::from_raw(&raw_header));
    }

    #[test]
    fn non_ascii_system_identifier() {
        let raw_header = raw::Header {
            system_identifier: [0xe9; 32],
            ..Default::default()
        };
        let header = Header::from_raw(&raw_header);
        assert_eq!(32, header.system_identifier.chars().count());
        assert_eq!([0xe9; 32], header.to_raw().unwrap().system_identifier);
    }

    #[test]
    fn set_date() {
        let mut header = Header::default();
        header.set_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(2023, header.file_creation_year);
        assert_eq!(365, header.file_creation_day_of_year);
    }
}
