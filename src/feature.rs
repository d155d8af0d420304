//! Programmatically determine whether a las version has a version-dependent header field.
//!
//! Features are structures that implement the [Feature] trait, and are usually queried via
//! [Version::supports]:
//!
//! ```
//! use las_columns::feature::{LargeFiles, Waveforms};
//! use las_columns::Version;
//!
//! let las_1_3 = Version::new(1, 3);
//! assert!(las_1_3.supports::<Waveforms>());
//! assert!(!las_1_3.supports::<LargeFiles>());
//! ```

use crate::Version;

/// A trait implemented by each feature.
pub trait Feature {
    /// Is this feature supported by this version?
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::feature::{Feature, Waveforms};
    /// use las_columns::Version;
    /// assert!(!Waveforms::is_supported_by(Version::new(1, 2)));
    /// assert!(Waveforms::is_supported_by(Version::new(1, 4)));
    /// ```
    fn is_supported_by(version: Version) -> bool;

    /// Returns the name of this feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::feature::{Feature, Waveforms};
    /// assert_eq!("Waveforms", Waveforms::name());
    /// ```
    fn name() -> &'static str;
}

macro_rules! features {
    (   $(
            $(#[$meta:meta])*
            $name:ident (since $minor:expr);
        )+
    ) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug)]
            pub struct $name {}

            impl Feature for $name {
                fn is_supported_by(version: Version) -> bool {
                    version.minor >= $minor
                }

                fn name() -> &'static str {
                    stringify!($name)
                }
            }
        )+
    }
}

features! {
    /// Does the header carry the start of the waveform data packet record?
    Waveforms(since 3);
    /// Does the header carry the 64-bit point count and fifteen per-return counts?
    LargeFiles(since 4);
    /// Does the header locate extended variable length records?
    Evlrs(since 4);
}
