//! Static byte layouts of the standard point data record formats.
//!
//! Every supported point data record format (PDRF 0 through 10) has a fixed record length and
//! fixed byte offsets for each of its fields. An offset of zero means the field is absent, which
//! is unambiguous because the coordinates always occupy the first bytes of a record.
//!
//! ```
//! use las_columns::layout::{self, LAYOUTS};
//! let index = layout::resolve(3).unwrap();
//! assert_eq!(34, LAYOUTS[index].record_length);
//! assert_eq!(None, layout::resolve(11));
//! ```

/// The point data record formats with a layout, in table order.
pub const SUPPORTED_FORMATS: [u8; 11] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// The shortest record length that holds every mandatory field.
pub const MIN_RECORD_LENGTH: u16 = 20;

/// Bytes of x, y, z, and intensity at the start of every record.
pub const COORDINATES_AND_INTENSITY_LEN: usize = 14;

/// Bytes of a wave packet block.
pub const WAVEFORM_LEN: usize = 29;

/// The field offsets and record length of one point data record format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// The point data record format code.
    pub format: u8,
    /// The standard record length, without extra bytes.
    pub record_length: u16,
    /// Offset of the second flag byte, formats 6 and up.
    pub bits2: u16,
    #[allow(missing_docs)]
    pub classification: u16,
    #[allow(missing_docs)]
    pub scan_angle: u16,
    #[allow(missing_docs)]
    pub user_data: u16,
    #[allow(missing_docs)]
    pub point_source_id: u16,
    #[allow(missing_docs)]
    pub gps_time: u16,
    #[allow(missing_docs)]
    pub color: u16,
    #[allow(missing_docs)]
    pub nir: u16,
    #[allow(missing_docs)]
    pub waveform: u16,
}

macro_rules! layouts {
    ($(
        $format:expr => [
            $len:expr, $bits2:expr, $classification:expr, $scan_angle:expr, $user_data:expr,
            $point_source_id:expr, $gps_time:expr, $color:expr, $nir:expr, $waveform:expr
        ],
    )+) => {
        /// The layout table, indexed by position in [SUPPORTED_FORMATS].
        pub const LAYOUTS: [Layout; SUPPORTED_FORMATS.len()] = [$(
            Layout {
                format: $format,
                record_length: $len,
                bits2: $bits2,
                classification: $classification,
                scan_angle: $scan_angle,
                user_data: $user_data,
                point_source_id: $point_source_id,
                gps_time: $gps_time,
                color: $color,
                nir: $nir,
                waveform: $waveform,
            },
        )+];
    };
}

// format => [len, bits2, class, scan, user, psid, time, color, nir, wave]
layouts! {
    0 => [20, 0, 15, 16, 17, 18, 0, 0, 0, 0],
    1 => [28, 0, 15, 16, 17, 18, 20, 0, 0, 0],
    2 => [26, 0, 15, 16, 17, 18, 0, 20, 0, 0],
    3 => [34, 0, 15, 16, 17, 18, 20, 28, 0, 0],
    4 => [57, 0, 15, 16, 17, 18, 20, 0, 0, 28],
    5 => [63, 0, 15, 16, 17, 18, 20, 28, 0, 34],
    6 => [30, 15, 16, 18, 17, 20, 22, 0, 0, 0],
    7 => [36, 15, 16, 18, 17, 20, 22, 30, 0, 0],
    8 => [38, 15, 16, 18, 17, 20, 22, 30, 36, 0],
    9 => [59, 15, 16, 18, 17, 20, 22, 0, 0, 30],
    10 => [67, 15, 16, 18, 17, 20, 22, 30, 36, 38],
}

/// One fixed-width field of a point record, in on-disk order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// x, y, z as i32 and intensity as u16.
    CoordinatesAndIntensity,
    /// Return number, number of returns, scan direction, edge of flight line.
    Bits,
    /// Classification flags, scanner channel, scan direction, edge of flight line.
    Bits2,
    #[allow(missing_docs)]
    Classification,
    /// The i8 scan angle rank of formats 0 through 5.
    ScanAngleRank,
    /// The i16 scaled scan angle of formats 6 through 10.
    ScanAngle,
    #[allow(missing_docs)]
    UserData,
    #[allow(missing_docs)]
    PointSourceId,
    #[allow(missing_docs)]
    GpsTime,
    /// Red, green, blue.
    Color,
    /// Near infrared.
    Nir,
    /// Wave packet descriptor, offset, size, return location, and x(t), y(t), z(t).
    Waveform,
}

impl Field {
    /// Returns the number of bytes this field occupies in a record.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::layout::Field;
    /// assert_eq!(14, Field::CoordinatesAndIntensity.width());
    /// assert_eq!(29, Field::Waveform.width());
    /// ```
    pub fn width(&self) -> usize {
        match *self {
            CoordinatesAndIntensity => COORDINATES_AND_INTENSITY_LEN,
            Bits | Bits2 | Classification | ScanAngleRank | UserData => 1,
            ScanAngle | PointSourceId | Nir => 2,
            Color => 6,
            GpsTime => 8,
            Waveform => WAVEFORM_LEN,
        }
    }
}

use Field::*;

const LEGACY: [Field; 6] = [
    CoordinatesAndIntensity,
    Bits,
    Classification,
    ScanAngleRank,
    UserData,
    PointSourceId,
];

const EXTENDED: [Field; 8] = [
    CoordinatesAndIntensity,
    Bits,
    Bits2,
    Classification,
    UserData,
    ScanAngle,
    PointSourceId,
    GpsTime,
];

macro_rules! concat_fields {
    ($base:expr, $n:expr, [$($extra:expr),*]) => {{
        let base = $base;
        let extra = [$($extra),*];
        let mut fields = [CoordinatesAndIntensity; $n];
        let mut i = 0;
        while i < base.len() {
            fields[i] = base[i];
            i += 1;
        }
        let mut j = 0;
        while j < extra.len() {
            fields[i + j] = extra[j];
            j += 1;
        }
        fields
    }};
}

static FIELDS_0: [Field; 6] = LEGACY;
static FIELDS_1: [Field; 7] = concat_fields!(LEGACY, 7, [GpsTime]);
static FIELDS_2: [Field; 7] = concat_fields!(LEGACY, 7, [Color]);
static FIELDS_3: [Field; 8] = concat_fields!(LEGACY, 8, [GpsTime, Color]);
static FIELDS_4: [Field; 8] = concat_fields!(LEGACY, 8, [GpsTime, Waveform]);
static FIELDS_5: [Field; 9] = concat_fields!(LEGACY, 9, [GpsTime, Color, Waveform]);
static FIELDS_6: [Field; 8] = EXTENDED;
static FIELDS_7: [Field; 9] = concat_fields!(EXTENDED, 9, [Color]);
static FIELDS_8: [Field; 10] = concat_fields!(EXTENDED, 10, [Color, Nir]);
static FIELDS_9: [Field; 9] = concat_fields!(EXTENDED, 9, [Waveform]);
static FIELDS_10: [Field; 11] = concat_fields!(EXTENDED, 11, [Color, Nir, Waveform]);

/// The ordered field sequence of each layout, indexed like [LAYOUTS].
pub static FIELDS: [&[Field]; SUPPORTED_FORMATS.len()] = [
    &FIELDS_0, &FIELDS_1, &FIELDS_2, &FIELDS_3, &FIELDS_4, &FIELDS_5, &FIELDS_6, &FIELDS_7,
    &FIELDS_8, &FIELDS_9, &FIELDS_10,
];

/// Finds the position of a point data record format in the layout table.
///
/// Returns `None` for codes without a layout, including compressed (LAZ) codes.
///
/// # Examples
///
/// ```
/// use las_columns::layout;
/// assert_eq!(Some(10), layout::resolve(10));
/// assert_eq!(None, layout::resolve(131));
/// ```
pub fn resolve(format: u8) -> Option<usize> {
    SUPPORTED_FORMATS.iter().position(|&f| f == format)
}

impl Layout {
    /// Returns the field sequence of this layout.
    pub fn fields(&self) -> &'static [Field] {
        // The layout table and the field table share indices.
        FIELDS[usize::from(self.format)]
    }

    /// Are the scan angle and second flag byte in their extended form?
    pub fn is_extended(&self) -> bool {
        self.bits2 != 0
    }

    /// Returns the byte offset of a field.
    ///
    /// Returns `None` for fields this layout does not have.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::layout::{Field, LAYOUTS};
    /// assert_eq!(Some(28), LAYOUTS[3].offset(Field::Color));
    /// assert_eq!(None, LAYOUTS[9].offset(Field::Color));
    /// ```
    pub fn offset(&self, field: Field) -> Option<usize> {
        let offset = match field {
            CoordinatesAndIntensity => return Some(0),
            Bits => return Some(COORDINATES_AND_INTENSITY_LEN),
            Bits2 => self.bits2,
            Classification => self.classification,
            ScanAngleRank if self.is_extended() => 0,
            ScanAngle if !self.is_extended() => 0,
            ScanAngleRank | ScanAngle => self.scan_angle,
            UserData => self.user_data,
            PointSourceId => self.point_source_id,
            GpsTime => self.gps_time,
            Color => self.color,
            Nir => self.nir,
            Waveform => self.waveform,
        };
        if offset == 0 {
            None
        } else {
            Some(usize::from(offset))
        }
    }
}
