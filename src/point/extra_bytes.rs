use crate::{Error, Result};

/// Opaque trailing bytes of every point record, stored column-major.
///
/// Byte `b` of point `p` lives at `data[b * points + p]`, so each byte position is one
/// contiguous column.
///
/// # Examples
///
/// ```
/// use las_columns::point::ExtraBytes;
/// let mut extra_bytes = ExtraBytes::new(2, 3).unwrap();
/// extra_bytes.set(1, 0, 42);
/// assert_eq!(42, extra_bytes.get(1, 0));
/// assert_eq!(vec![42, 0], extra_bytes.point(1).collect::<Vec<_>>());
/// assert_eq!(42, extra_bytes.as_slice()[1]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtraBytes {
    per_point: usize,
    points: usize,
    data: Vec<u8>,
}

impl ExtraBytes {
    /// Allocates zeroed extra bytes for `points` points.
    pub fn new(per_point: usize, points: usize) -> Result<ExtraBytes> {
        let len = per_point
            .checked_mul(points)
            .ok_or(Error::TooManyExtraBytes { per_point, points })?;
        Ok(ExtraBytes {
            per_point,
            points,
            data: super::zeroed("extra bytes", len)?,
        })
    }

    /// Wraps column-major data.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::point::ExtraBytes;
    /// let extra_bytes = ExtraBytes::from_column_major(2, 2, vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(3, extra_bytes.get(0, 1));
    /// assert!(ExtraBytes::from_column_major(2, 2, vec![1, 2, 3]).is_err());
    /// ```
    pub fn from_column_major(per_point: usize, points: usize, data: Vec<u8>) -> Result<ExtraBytes> {
        if per_point.checked_mul(points) != Some(data.len()) {
            return Err(Error::ColumnLength {
                column: "extra_bytes",
                expected: per_point.saturating_mul(points),
                actual: data.len(),
            });
        }
        Ok(ExtraBytes {
            per_point,
            points,
            data,
        })
    }

    /// Returns the number of extra bytes of each point.
    pub fn per_point(&self) -> usize {
        self.per_point
    }

    /// Returns the number of points.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Returns one byte.
    ///
    /// # Panics
    ///
    /// Panics if the point or byte is out of range.
    pub fn get(&self, point: usize, byte: usize) -> u8 {
        self.data[self.index(point, byte)]
    }

    /// Sets one byte.
    ///
    /// # Panics
    ///
    /// Panics if the point or byte is out of range.
    pub fn set(&mut self, point: usize, byte: usize, value: u8) {
        let index = self.index(point, byte);
        self.data[index] = value;
    }

    /// Iterates over the extra bytes of one point.
    pub fn point(&self, point: usize) -> impl Iterator<Item = u8> + '_ {
        (0..self.per_point).map(move |byte| self.get(point, byte))
    }

    /// Returns the column-major bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Copies the trailing bytes of one record into the columns.
    pub(crate) fn scatter(&mut self, point: usize, bytes: &[u8]) {
        for (byte, &value) in bytes.iter().enumerate().take(self.per_point) {
            self.data[byte * self.points + point] = value;
        }
    }

    /// Copies the extra bytes of one point into the trailing bytes of a record.
    pub(crate) fn gather(&self, point: usize, bytes: &mut [u8]) {
        for (byte, value) in bytes.iter_mut().enumerate().take(self.per_point) {
            *value = self.data[byte * self.points + point];
        }
    }

    fn index(&self, point: usize, byte: usize) -> usize {
        assert!(point < self.points && byte < self.per_point);
        byte * self.points + point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_is_column_major() {
        let mut extra_bytes = ExtraBytes::new(3, 2).unwrap();
        extra_bytes.scatter(0, &[1, 2, 3]);
        extra_bytes.scatter(1, &[4, 5, 6]);
        assert_eq!(&[1, 4, 2, 5, 3, 6], extra_bytes.as_slice());
    }

    #[test]
    fn gather_inverts_scatter() {
        let extra_bytes = ExtraBytes::from_column_major(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let mut record = [0; 2];
        extra_bytes.gather(2, &mut record);
        assert_eq!([3, 6], record);
    }

    #[test]
    fn empty() {
        let extra_bytes = ExtraBytes::new(0, 10).unwrap();
        assert!(extra_bytes.as_slice().is_empty());
        assert_eq!(0, extra_bytes.point(3).count());
    }
}
