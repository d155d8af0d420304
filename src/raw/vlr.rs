//! Raw variable length records.

use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Bytes of a vlr header.
pub const VLR_HEADER_SIZE: usize = 54;

/// Bytes of an evlr header.
pub const EVLR_HEADER_SIZE: usize = 60;

/// A raw variable length record, regular or extended.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Vlr {
    pub reserved: u16,
    pub user_id: [u8; 16],
    pub record_id: u16,
    pub record_length_after_header: RecordLength,
    pub description: [u8; 32],
    pub data: Vec<u8>,
}

/// The length of the payload, whose width depends on the kind of record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordLength {
    /// A regular vlr has a 16-bit length.
    Vlr(u16),
    /// An extended vlr has a 64-bit length.
    Evlr(u64),
}

impl Vlr {
    /// Reads a raw vlr or evlr.
    ///
    /// The payload is read in full. A payload cut short by the end of the stream is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use las_columns::raw::Vlr;
    /// let mut cursor = Cursor::new(Vec::new());
    /// Vlr::default().write_to(&mut cursor).unwrap();
    /// cursor.set_position(0);
    /// let vlr = Vlr::read_from(cursor, false).unwrap();
    /// ```
    pub fn read_from<R: Read>(mut read: R, extended: bool) -> Result<Vlr> {
        let reserved = read.read_u16::<LittleEndian>()?;
        let mut user_id = [0; 16];
        read.read_exact(&mut user_id)?;
        let record_id = read.read_u16::<LittleEndian>()?;
        let record_length_after_header = if extended {
            RecordLength::Evlr(read.read_u64::<LittleEndian>()?)
        } else {
            RecordLength::Vlr(read.read_u16::<LittleEndian>()?)
        };
        let mut description = [0; 32];
        read.read_exact(&mut description)?;
        let len = usize::try_from(u64::from(record_length_after_header))
            .map_err(|_| Error::VlrTooLong(usize::MAX))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(Error::allocation("vlr data", len))?;
        data.resize(len, 0);
        read.read_exact(&mut data)?;
        Ok(Vlr {
            reserved,
            user_id,
            record_id,
            record_length_after_header,
            description,
            data,
        })
    }

    /// Writes a raw vlr or evlr.
    ///
    /// The header fields are packed one by one, then the payload follows if it is not empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use las_columns::raw::Vlr;
    /// let mut cursor = Cursor::new(Vec::new());
    /// Vlr::default().write_to(&mut cursor).unwrap();
    /// assert_eq!(54, cursor.into_inner().len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_u16::<LittleEndian>(self.reserved)?;
        write.write_all(&self.user_id)?;
        write.write_u16::<LittleEndian>(self.record_id)?;
        match self.record_length_after_header {
            RecordLength::Vlr(n) => write.write_u16::<LittleEndian>(n)?,
            RecordLength::Evlr(n) => write.write_u64::<LittleEndian>(n)?,
        }
        write.write_all(&self.description)?;
        if !self.data.is_empty() {
            write.write_all(&self.data)?;
        }
        Ok(())
    }

    /// Is this an extended variable length record?
    pub fn is_extended(&self) -> bool {
        matches!(self.record_length_after_header, RecordLength::Evlr(_))
    }

    /// Returns the total number of bytes this record occupies, header included.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::raw::{Vlr, vlr::RecordLength};
    /// let vlr = Vlr { record_length_after_header: RecordLength::Evlr(8), ..Default::default() };
    /// assert_eq!(68, vlr.len());
    /// ```
    pub fn len(&self) -> u64 {
        let header = if self.is_extended() {
            EVLR_HEADER_SIZE
        } else {
            VLR_HEADER_SIZE
        };
        header as u64 + u64::from(self.record_length_after_header)
    }

    /// Returns true if this record has no payload.
    pub fn is_empty(&self) -> bool {
        u64::from(self.record_length_after_header) == 0
    }
}

impl Default for RecordLength {
    fn default() -> RecordLength {
        RecordLength::Vlr(0)
    }
}

impl From<RecordLength> for u64 {
    fn from(record_length: RecordLength) -> u64 {
        match record_length {
            RecordLength::Vlr(n) => u64::from(n),
            RecordLength::Evlr(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn vlr(extended: bool) -> Vlr {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8];
        Vlr {
            reserved: 0xaabb,
            user_id: *b"LASF_Projection\0",
            record_id: 2112,
            record_length_after_header: if extended {
                RecordLength::Evlr(8)
            } else {
                RecordLength::Vlr(8)
            },
            description: [b'd'; 32],
            data,
        }
    }

    #[test]
    fn vlr_header_is_54_bytes() {
        let mut cursor = Cursor::new(Vec::new());
        vlr(false).write_to(&mut cursor).unwrap();
        let bytes = cursor.into_inner();
        assert_eq!(54 + 8, bytes.len());
        assert_eq!(8u16.to_le_bytes(), bytes[20..22]);
        assert_eq!(&[b'd'; 32][..], &bytes[22..54]);
    }

    #[test]
    fn evlr_header_is_60_bytes() {
        let mut cursor = Cursor::new(Vec::new());
        vlr(true).write_to(&mut cursor).unwrap();
        let bytes = cursor.into_inner();
        assert_eq!(60 + 8, bytes.len());
        assert_eq!(8u64.to_le_bytes(), bytes[20..28]);
        assert_eq!(&[b'd'; 32][..], &bytes[28..60]);
    }

    #[test]
    fn roundtrip() {
        for &extended in &[false, true] {
            let vlr = vlr(extended);
            let mut cursor = Cursor::new(Vec::new());
            vlr.write_to(&mut cursor).unwrap();
            cursor.set_position(0);
            assert_eq!(vlr, Vlr::read_from(&mut cursor, extended).unwrap());
        }
    }

    #[test]
    fn truncated_payload() {
        let mut cursor = Cursor::new(Vec::new());
        vlr(false).write_to(&mut cursor).unwrap();
        let mut bytes = cursor.into_inner();
        bytes.truncate(58);
        assert!(matches!(
            Vlr::read_from(&bytes[..], false),
            Err(Error::Io(_))
        ));
    }
}
