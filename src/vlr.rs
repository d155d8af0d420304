//! Variable length records are used to store additional metadata not defined in the header.
//!
//! Variable length records (VLRs) can be "regular" or "extended". "Regular" vlrs are stored right
//! after the header, before the point records. "Extended" vlrs (EVLRs) are stored at the end of
//! the file, after the point records. Neither kind is interpreted; the payload is kept as bytes.
//!
//! ```
//! use las_columns::Vlr;
//! let vlr = Vlr {
//!     user_id: "LASF_Projection".to_string(),
//!     record_id: 2112,
//!     description: "OGC WKT".to_string(),
//!     data: b"GEOGCS[]".to_vec(),
//!     ..Default::default()
//! };
//! assert_eq!(62, vlr.len());
//! assert_eq!("GEOGCS[]", vlr.data_as_text());
//! ```

use crate::{
    Error, Result, raw,
    raw::vlr::{EVLR_HEADER_SIZE, RecordLength, VLR_HEADER_SIZE},
    utils::{AsLasStr, FromLasStr},
};
use log::debug;
use std::io::{Read, Seek, SeekFrom, Write};

/// A variable length record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vlr {
    /// Reserved, but kept as read.
    pub reserved: u16,

    /// The user that created this record.
    ///
    /// This value is often an official, "registered" user_id, such as "LASF_Spec" or
    /// "LASF_Projection".
    pub user_id: String,

    /// This value specifies the type of record, and depends on the user id.
    pub record_id: u16,

    /// Textual description of these data.
    pub description: String,

    /// The data themselves.
    pub data: Vec<u8>,

    /// Is this an extended variable length record?
    pub is_extended: bool,
}

impl Vlr {
    /// Creates a vlr from a raw vlr.
    ///
    /// Each string byte becomes one character, so any raw vlr can be represented and written
    /// back unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::{Vlr, raw};
    /// let vlr = Vlr::new(raw::Vlr::default());
    /// assert!(!vlr.is_extended);
    /// ```
    pub fn new(raw_vlr: raw::Vlr) -> Vlr {
        Vlr {
            reserved: raw_vlr.reserved,
            user_id: raw_vlr.user_id.to_las_string(),
            record_id: raw_vlr.record_id,
            description: raw_vlr.description.to_las_string(),
            is_extended: raw_vlr.is_extended(),
            data: raw_vlr.data,
        }
    }

    /// Converts this vlr into a raw vlr, regular or extended.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Vlr;
    /// let vlr = Vlr { data: vec![0; u16::MAX as usize + 1], ..Default::default() };
    /// assert!(vlr.to_raw(false).is_err());
    /// assert!(vlr.to_raw(true).is_ok());
    /// ```
    pub fn to_raw(&self, extended: bool) -> Result<raw::Vlr> {
        let mut user_id = [0u8; 16];
        user_id.from_las_str(&self.user_id)?;
        let mut description = [0u8; 32];
        description.from_las_str(&self.description)?;
        Ok(raw::Vlr {
            reserved: self.reserved,
            user_id,
            record_id: self.record_id,
            record_length_after_header: self.record_length_after_header(extended)?,
            description,
            data: self.data.clone(),
        })
    }

    /// Returns the payload with each byte taken as a character.
    ///
    /// Nothing is decoded, so this never fails.
    pub fn data_as_text(&self) -> String {
        self.data.iter().map(|&b| char::from(b)).collect()
    }

    /// Returns the total length of this vlr as a regular vlr, header and data.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Vlr;
    /// assert_eq!(54, Vlr::default().len());
    /// ```
    pub fn len(&self) -> usize {
        let header = if self.is_extended {
            EVLR_HEADER_SIZE
        } else {
            VLR_HEADER_SIZE
        };
        header + self.data.len()
    }

    /// Returns true if the data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn record_length_after_header(&self, extended: bool) -> Result<RecordLength> {
        if extended {
            Ok(RecordLength::Evlr(self.data.len() as u64))
        } else {
            u16::try_from(self.data.len())
                .map(RecordLength::Vlr)
                .map_err(|_| Error::VlrTooLong(self.data.len()))
        }
    }
}

/// Reads a chain of `count` records starting at `start`.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use las_columns::{Vlr, vlr};
/// let mut cursor = Cursor::new(Vec::new());
/// let records = vec![Vlr::default(), Vlr { record_id: 42, ..Default::default() }];
/// vlr::write_vlrs(&mut cursor, &records, false).unwrap();
/// let read = vlr::read_vlrs(&mut cursor, 0, 2, false).unwrap();
/// assert_eq!(records, read);
/// ```
pub fn read_vlrs<R: Read + Seek>(
    mut read: R,
    start: u64,
    count: u32,
    extended: bool,
) -> Result<Vec<Vlr>> {
    let _ = read.seek(SeekFrom::Start(start))?;
    let mut vlrs = Vec::new();
    vlrs.try_reserve(count as usize)
        .map_err(Error::allocation("vlrs", count as usize))?;
    for _ in 0..count {
        let vlr = Vlr::new(raw::Vlr::read_from(&mut read, extended)?);
        debug!(
            "read {} {}/{} ({} bytes)",
            if extended { "evlr" } else { "vlr" },
            vlr.user_id,
            vlr.record_id,
            vlr.data.len()
        );
        vlrs.push(vlr);
    }
    Ok(vlrs)
}

/// Writes records one after another at the current position.
///
/// Every record is converted first, so nothing is written if any of them is invalid.
pub fn write_vlrs<W: Write>(write: W, vlrs: &[Vlr], extended: bool) -> Result<()> {
    write_raw_vlrs(write, &to_raw_vlrs(vlrs, extended)?)
}

/// Converts every record, failing on the first one that can't be written.
pub(crate) fn to_raw_vlrs(vlrs: &[Vlr], extended: bool) -> Result<Vec<raw::Vlr>> {
    vlrs.iter().map(|vlr| vlr.to_raw(extended)).collect()
}

pub(crate) fn write_raw_vlrs<W: Write>(mut write: W, raw_vlrs: &[raw::Vlr]) -> Result<()> {
    for raw_vlr in raw_vlrs {
        raw_vlr.write_to(&mut write)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn vlr() -> Vlr {
        Vlr {
            reserved: 0xaabb,
            user_id: "LASF_Spec".to_string(),
            record_id: 3,
            description: "Eight bytes".to_string(),
            data: vec![1, 2, 3, 4, 5, 6, 7, 8],
            is_extended: false,
        }
    }

    #[test]
    fn roundtrip_through_raw() {
        let vlr = vlr();
        assert_eq!(vlr, Vlr::new(vlr.to_raw(false).unwrap()));
        let evlr = Vlr {
            is_extended: true,
            ..vlr
        };
        assert_eq!(evlr, Vlr::new(evlr.to_raw(true).unwrap()));
    }

    #[test]
    fn too_long() {
        let vlr = Vlr {
            data: vec![0; u16::MAX as usize + 1],
            ..Default::default()
        };
        assert!(matches!(
            vlr.to_raw(false),
            Err(Error::VlrTooLong(65536))
        ));
    }

    #[test]
    fn user_id_too_long() {
        let vlr = Vlr {
            user_id: "a user id longer than sixteen".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            vlr.to_raw(false),
            Err(Error::StringTooLong { len: 16, .. })
        ));
    }

    #[test]
    fn strings_keep_every_byte() {
        let raw_vlr = raw::Vlr {
            user_id: *b"ab\xffd\0\0\0\0\0\0\0\0\0\0\0\0",
            ..Default::default()
        };
        let vlr = Vlr::new(raw_vlr.clone());
        assert_eq!("ab\u{ff}d", vlr.user_id);
        assert_eq!(raw_vlr.user_id, vlr.to_raw(false).unwrap().user_id);
    }

    #[test]
    fn text_view_keeps_every_byte() {
        let vlr = Vlr {
            data: vec![b'h', b'i', 0, 0xe9],
            ..Default::default()
        };
        assert_eq!("hi\0\u{e9}", vlr.data_as_text());
    }

    #[test]
    fn invalid_record_writes_nothing() {
        let mut cursor = Cursor::new(Vec::new());
        let vlrs = [
            vlr(),
            Vlr {
                description: "x".repeat(33),
                ..Default::default()
            },
        ];
        assert!(write_vlrs(&mut cursor, &vlrs, false).is_err());
        assert!(cursor.into_inner().is_empty());
    }

    #[test]
    fn chain_at_offset() {
        let mut cursor = Cursor::new(vec![0xff; 10]);
        cursor.set_position(10);
        let vlrs = vec![vlr(), Vlr::default()];
        write_vlrs(&mut cursor, &vlrs, true).unwrap();
        assert_eq!(10 + 2 * 60 + 8, cursor.get_ref().len());
        let read = read_vlrs(&mut cursor, 10, 2, true).unwrap();
        assert!(read.iter().all(|vlr| vlr.is_extended));
        assert_eq!(vlrs[0].data, read[0].data);
    }
}
