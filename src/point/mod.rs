//! Point records held as parallel, typed columns.
//!
//! One point is one row across the columns. The x, y, z, and intensity columns are always
//! present; every other column is `None` when the point format (or the read mode) does not carry
//! it.
//!
//! ```
//! use las_columns::{Format, point::PointColumns};
//!
//! let format = Format::new(3).unwrap();
//! let columns = PointColumns::allocate(&format, 10).unwrap();
//! assert_eq!(10, columns.len());
//! assert_eq!(Some(10), columns.color.as_ref().map(|c| c.len()));
//! assert!(columns.nir.is_none());
//! ```

mod color;
mod extra_bytes;
mod waveform;

pub use self::{color::Color, extra_bytes::ExtraBytes, waveform::Waveform};

use crate::{Bounds, Error, Format, Result};

/// Scan angles are stored as an i8 rank (formats 0 through 5) or an i16 scaled angle (formats 6
/// through 10).
#[derive(Clone, Debug, PartialEq)]
pub enum ScanAngles {
    /// Degrees, rounded to the nearest integer.
    Rank(Vec<i8>),
    /// Units of 0.006 degrees.
    Scaled(Vec<i16>),
}

impl ScanAngles {
    /// Returns the number of scan angles.
    pub fn len(&self) -> usize {
        match self {
            ScanAngles::Rank(v) => v.len(),
            ScanAngles::Scaled(v) => v.len(),
        }
    }

    /// Returns true if there are no scan angles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the scan angle in degrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::point::ScanAngles;
    /// assert_eq!(-90., ScanAngles::Rank(vec![-90]).degrees(0));
    /// assert!((ScanAngles::Scaled(vec![-3000]).degrees(0) + 18.).abs() < 1e-4);
    /// ```
    pub fn degrees(&self, index: usize) -> f32 {
        match self {
            ScanAngles::Rank(v) => f32::from(v[index]),
            ScanAngles::Scaled(v) => f32::from(v[index]) * 0.006,
        }
    }
}

/// Decoded point records, one typed column per field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointColumns {
    /// Scaled and offset x coordinates.
    pub x: Vec<f64>,
    /// Scaled and offset y coordinates.
    pub y: Vec<f64>,
    /// Scaled and offset z coordinates.
    pub z: Vec<f64>,
    /// The pulse return magnitude.
    pub intensity: Vec<u16>,
    /// The first flag byte: return number, number of returns, scan direction, and edge of flight
    /// line.
    pub bits: Option<Vec<u8>>,
    /// The second flag byte of formats 6 through 10.
    pub bits2: Option<Vec<u8>>,
    #[allow(missing_docs)]
    pub classification: Option<Vec<u8>>,
    #[allow(missing_docs)]
    pub scan_angle: Option<ScanAngles>,
    #[allow(missing_docs)]
    pub user_data: Option<Vec<u8>>,
    #[allow(missing_docs)]
    pub point_source_id: Option<Vec<u16>>,
    #[allow(missing_docs)]
    pub gps_time: Option<Vec<f64>>,
    #[allow(missing_docs)]
    pub color: Option<Vec<Color>>,
    /// Near infrared.
    pub nir: Option<Vec<u16>>,
    #[allow(missing_docs)]
    pub waveform: Option<Vec<Waveform>>,
    #[allow(missing_docs)]
    pub extra_bytes: Option<ExtraBytes>,
}

impl PointColumns {
    /// Allocates zeroed columns for every field of a point format.
    ///
    /// Fails with an allocation error, rather than aborting, if the columns don't fit in memory.
    pub fn allocate(format: &Format, n: usize) -> Result<PointColumns> {
        let mut columns = PointColumns::allocate_coordinates(n)?;
        columns.bits = Some(zeroed("bits", n)?);
        if format.is_extended() {
            columns.bits2 = Some(zeroed("bits2", n)?);
            columns.scan_angle = Some(ScanAngles::Scaled(zeroed("scan_angle", n)?));
        } else {
            columns.scan_angle = Some(ScanAngles::Rank(zeroed("scan_angle", n)?));
        }
        columns.classification = Some(zeroed("classification", n)?);
        columns.user_data = Some(zeroed("user_data", n)?);
        columns.point_source_id = Some(zeroed("point_source_id", n)?);
        if format.has_gps_time {
            columns.gps_time = Some(zeroed("gps_time", n)?);
        }
        if format.has_color {
            columns.color = Some(zeroed("color", n)?);
        }
        if format.has_nir {
            columns.nir = Some(zeroed("nir", n)?);
        }
        if format.has_waveform {
            columns.waveform = Some(zeroed("waveform", n)?);
        }
        if format.has_extra_bytes() {
            columns.extra_bytes = Some(ExtraBytes::new(usize::from(format.extra_bytes), n)?);
        }
        Ok(columns)
    }

    /// Allocates zeroed x, y, z, and intensity columns, and nothing else.
    pub fn allocate_coordinates(n: usize) -> Result<PointColumns> {
        Ok(PointColumns {
            x: zeroed("x", n)?,
            y: zeroed("y", n)?,
            z: zeroed("z", n)?,
            intensity: zeroed("intensity", n)?,
            ..Default::default()
        })
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if there are no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Returns true if only the x, y, z, and intensity columns are present.
    pub fn is_coordinates_only(&self) -> bool {
        self.bits.is_none()
    }

    /// Computes the extents of the points.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::point::PointColumns;
    /// let mut columns = PointColumns::allocate_coordinates(2).unwrap();
    /// columns.x = vec![1., -1.];
    /// let bounds = columns.bounds();
    /// assert_eq!(-1., bounds.min.x);
    /// assert_eq!(1., bounds.max.x);
    /// ```
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::default();
        for ((&x, &y), &z) in self.x.iter().zip(&self.y).zip(&self.z) {
            bounds.grow(x, y, z);
        }
        bounds
    }
}

/// Allocates a zeroed column, reporting failure instead of aborting.
pub(crate) fn zeroed<T: Clone + Default>(what: &'static str, n: usize) -> Result<Vec<T>> {
    let mut column = Vec::new();
    column
        .try_reserve_exact(n)
        .map_err(Error::allocation(what, n))?;
    column.resize(n, T::default());
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_extended() {
        let columns = PointColumns::allocate(&Format::new(10).unwrap(), 4).unwrap();
        assert!(matches!(columns.scan_angle, Some(ScanAngles::Scaled(ref v)) if v.len() == 4));
        assert_eq!(Some(4), columns.bits2.as_ref().map(Vec::len));
        assert_eq!(Some(4), columns.nir.as_ref().map(Vec::len));
        assert_eq!(Some(4), columns.waveform.as_ref().map(Vec::len));
        assert!(columns.extra_bytes.is_none());
    }

    #[test]
    fn allocate_legacy() {
        let format = Format::resolve(0, 23).unwrap();
        let columns = PointColumns::allocate(&format, 4).unwrap();
        assert!(matches!(columns.scan_angle, Some(ScanAngles::Rank(_))));
        assert!(columns.bits2.is_none());
        assert!(columns.gps_time.is_none());
        assert_eq!(
            Some(3),
            columns.extra_bytes.as_ref().map(ExtraBytes::per_point)
        );
    }

    #[test]
    fn allocation_failure_is_an_error() {
        assert!(matches!(
            zeroed::<f64>("x", usize::MAX),
            Err(Error::Allocation { what: "x", .. })
        ));
    }
}
