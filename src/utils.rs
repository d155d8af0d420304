//! Utility functions and traits for NUL-padded las strings.

use crate::{Error, Result};
use std::str;

/// Converts bytes into a string, following LAS rules.
///
/// LAS specifies that all string fields should be ASCII and nul filled, but not all LAS data in
/// the wild follows these rules. `as_las_str` checks the rules, while `to_las_string` takes each
/// byte as one character, so [FromLasStr::from_las_str] can write the same bytes back.
pub trait AsLasStr {
    /// Interprets the bytes as a `&str`, enforcing the LAS rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::utils::AsLasStr;
    /// assert_eq!("LiDAR", [76u8, 105, 68, 65, 82, 0, 0].as_las_str().unwrap());
    /// assert!([76u8, 105, 68, 65, 82, 0, 33].as_las_str().is_err());
    /// ```
    fn as_las_str(&self) -> Result<&str>;

    /// Maps every byte to the character with the same code point, dropping trailing nuls.
    ///
    /// This never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::utils::AsLasStr;
    /// assert_eq!("LiDAR", [76u8, 105, 68, 65, 82, 0, 0].to_las_string());
    /// assert_eq!("Li\0\u{e9}", [76u8, 105, 0, 0xe9, 0].to_las_string());
    /// ```
    fn to_las_string(&self) -> String;
}

impl AsLasStr for [u8] {
    fn as_las_str(&self) -> Result<&str> {
        let end = self.iter().position(|&n| n == 0).unwrap_or(self.len());
        if self[end..].iter().any(|&n| n != 0) {
            return Err(Error::NotNulFilled(self.to_vec()));
        }
        let s = str::from_utf8(&self[..end])?;
        if s.is_ascii() {
            Ok(s)
        } else {
            Err(Error::NotAscii(s.to_string()))
        }
    }

    fn to_las_string(&self) -> String {
        let end = self.iter().rposition(|&n| n != 0).map_or(0, |i| i + 1);
        self[..end].iter().map(|&n| char::from(n)).collect()
    }
}

/// Converts a string into nul-filled bytes.
pub trait FromLasStr {
    /// Overwrites `self` with one byte per character of `s`, padding with nuls.
    ///
    /// Every character must be below U+0100, which is what [AsLasStr::to_las_string] produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::utils::FromLasStr;
    /// let mut bytes = [1u8; 5];
    /// bytes.from_las_str("Beer").unwrap();
    /// assert_eq!([66, 101, 101, 114, 0], bytes);
    /// assert!(bytes.from_las_str("Lager").is_ok());
    /// assert!(bytes.from_las_str("Porter").is_err());
    /// bytes.from_las_str("Caf\u{e9}").unwrap();
    /// assert_eq!(0xe9, bytes[3]);
    /// assert!(bytes.from_las_str("\u{20ac}").is_err());
    /// ```
    fn from_las_str(&mut self, s: &str) -> Result<()>;
}

impl<T: AsMut<[u8]>> FromLasStr for T {
    fn from_las_str(&mut self, s: &str) -> Result<()> {
        let bytes = self.as_mut();
        if s.chars().count() > bytes.len() {
            return Err(Error::StringTooLong {
                string: s.to_string(),
                len: bytes.len(),
            });
        }
        let encoded = s
            .chars()
            .map(u8::try_from)
            .collect::<std::result::Result<Vec<u8>, _>>()
            .map_err(|_| Error::NotSingleByte(s.to_string()))?;
        bytes.fill(0);
        bytes[..encoded.len()].copy_from_slice(&encoded);
        Ok(())
    }
}

/// Returns `None` for zero, so optional offsets stay absent on roundtrip.
pub(crate) fn some_or_none_if_zero(n: u64) -> Option<u64> {
    if n == 0 { None } else { Some(n) }
}
