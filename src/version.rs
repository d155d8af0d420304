use crate::feature::{Evlrs, Feature, LargeFiles, Waveforms};
use std::fmt;

/// LAS version.
///
/// Defaults to 1.2:
///
/// ```
/// use las_columns::Version;
/// assert_eq!(Version::new(1, 2), Version::default());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// The major version.
    ///
    /// Should always be 1.
    pub major: u8,

    /// The minor version.
    ///
    /// Should be between 0 and 4.
    pub minor: u8,
}

impl Version {
    /// Creates a new version.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Version;
    /// let version = Version::new(1, 2);
    /// ```
    pub fn new(major: u8, minor: u8) -> Version {
        Version { major, minor }
    }

    /// Checks whether this version supports the feature.
    ///
    /// Only the minor number matters, so a newer minor revision keeps every extended field.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::{Version, feature::Waveforms};
    /// assert!(!Version::new(1, 2).supports::<Waveforms>());
    /// assert!(Version::new(1, 3).supports::<Waveforms>());
    /// ```
    pub fn supports<F: Feature>(&self) -> bool {
        F::is_supported_by(*self)
    }

    /// Returns the size of the header block for this version.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Version;
    /// assert_eq!(227, Version::new(1, 2).header_size());
    /// assert_eq!(235, Version::new(1, 3).header_size());
    /// assert_eq!(375, Version::new(1, 4).header_size());
    /// ```
    pub fn header_size(&self) -> u16 {
        let mut size = 227;
        if self.supports::<Waveforms>() {
            size += 8;
        }
        if self.supports::<Evlrs>() {
            size += 12;
        }
        if self.supports::<LargeFiles>() {
            size += 128;
        }
        size
    }
}

impl Default for Version {
    fn default() -> Version {
        Version::new(1, 2)
    }
}

impl From<(u8, u8)> for Version {
    fn from((major, minor): (u8, u8)) -> Version {
        Version { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
