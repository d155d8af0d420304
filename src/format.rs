//! Resolves a point data record format code into a layout and its content flags.

use crate::{
    Error, Result,
    layout::{self, LAYOUTS, Layout},
};
use std::fmt;

/// A resolved point data record format.
///
/// Carries the layout from the table plus everything derived from it and from the header's
/// record length.
///
/// # Examples
///
/// ```
/// use las_columns::Format;
/// let format = Format::resolve(3, 34).unwrap();
/// assert!(format.has_gps_time);
/// assert!(format.has_color);
/// assert_eq!(0, format.extra_bytes);
///
/// let format = Format::resolve(3, 40).unwrap();
/// assert_eq!(6, format.extra_bytes);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Format {
    /// Position of this format in the layout table.
    pub index: usize,
    /// Does each point have a gps time?
    pub has_gps_time: bool,
    /// Does each point have red, green, and blue?
    pub has_color: bool,
    /// Does each point have near infrared?
    pub has_nir: bool,
    /// Does each point have a wave packet?
    pub has_waveform: bool,
    /// Trailing bytes per point beyond the standard fields.
    pub extra_bytes: u16,
}

impl Format {
    /// Resolves a point data record format code and record length.
    ///
    /// Returns `None` if the code has no layout. A record length shorter than the standard one
    /// yields zero extra bytes, and is caught by the consistency check.
    pub fn resolve(code: u8, record_length: u16) -> Option<Format> {
        let index = layout::resolve(code)?;
        let layout = &LAYOUTS[index];
        Some(Format {
            index,
            has_gps_time: layout.gps_time != 0,
            has_color: layout.color != 0,
            has_nir: layout.nir != 0,
            has_waveform: layout.waveform != 0,
            extra_bytes: record_length.saturating_sub(layout.record_length),
        })
    }

    /// Creates a format with the standard record length and no extra bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Format;
    /// assert!(Format::new(10).is_ok());
    /// assert!(Format::new(11).is_err());
    /// ```
    pub fn new(code: u8) -> Result<Format> {
        let index = layout::resolve(code).ok_or(Error::UnsupportedFormat(code))?;
        Format::resolve(code, LAYOUTS[index].record_length).ok_or(Error::UnsupportedFormat(code))
    }

    /// Returns this format's layout.
    pub fn layout(&self) -> &'static Layout {
        &LAYOUTS[self.index]
    }

    /// Returns the point data record format code.
    pub fn code(&self) -> u8 {
        self.layout().format
    }

    /// Does each point have extra bytes?
    pub fn has_extra_bytes(&self) -> bool {
        self.extra_bytes > 0
    }

    /// Is this one of the formats introduced with las 1.4 (6 and up)?
    pub fn is_extended(&self) -> bool {
        self.layout().is_extended()
    }

    /// Returns the record length including extra bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Format;
    /// assert_eq!(67, Format::new(10).unwrap().record_length());
    /// ```
    pub fn record_length(&self) -> u16 {
        self.layout().record_length + self.extra_bytes
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point format {}", self.code())?;
        if self.has_extra_bytes() {
            write!(f, " (+{} extra bytes)", self.extra_bytes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! pdrf {
        ($name:ident, $code:expr, $time:expr, $color:expr, $nir:expr, $waveform:expr) => {
            mod $name {
                use super::*;

                #[test]
                fn flags() {
                    let format = Format::new($code).unwrap();
                    assert_eq!($time, format.has_gps_time);
                    assert_eq!($color, format.has_color);
                    assert_eq!($nir, format.has_nir);
                    assert_eq!($waveform, format.has_waveform);
                }

                #[test]
                fn canonical_length_has_no_extra_bytes() {
                    let format = Format::new($code).unwrap();
                    assert_eq!(0, format.extra_bytes);
                    assert!(!format.has_extra_bytes());
                }

                #[test]
                fn longer_records_have_extra_bytes() {
                    let length = Format::new($code).unwrap().record_length();
                    let format = Format::resolve($code, length + 5).unwrap();
                    assert_eq!(5, format.extra_bytes);
                    assert_eq!(length + 5, format.record_length());
                }

                #[test]
                fn resolving_twice_is_the_same() {
                    let length = Format::new($code).unwrap().record_length() + 3;
                    assert_eq!(
                        Format::resolve($code, length),
                        Format::resolve($code, length)
                    );
                }
            }
        };
    }

    pdrf!(pdrf_0, 0, false, false, false, false);
    pdrf!(pdrf_1, 1, true, false, false, false);
    pdrf!(pdrf_2, 2, false, true, false, false);
    pdrf!(pdrf_3, 3, true, true, false, false);
    pdrf!(pdrf_4, 4, true, false, false, true);
    pdrf!(pdrf_5, 5, true, true, false, true);
    pdrf!(pdrf_6, 6, true, false, false, false);
    pdrf!(pdrf_7, 7, true, true, false, false);
    pdrf!(pdrf_8, 8, true, true, true, false);
    pdrf!(pdrf_9, 9, true, false, false, true);
    pdrf!(pdrf_10, 10, true, true, true, true);

    #[test]
    fn unresolved() {
        assert_eq!(None, Format::resolve(11, 100));
        assert_eq!(None, Format::resolve(200, 100));
    }

    #[test]
    fn short_record_has_no_extra_bytes() {
        assert_eq!(0, Format::resolve(1, 20).unwrap().extra_bytes);
    }
}
