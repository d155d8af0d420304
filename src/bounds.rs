use crate::Vector;

/// Minimum and maximum bounds in three dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// The minimum values.
    pub min: Vector<f64>,

    /// The maximum values.
    pub max: Vector<f64>,
}

impl Bounds {
    /// Grows the bounds to encompass this position.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Bounds;
    /// let mut bounds = Bounds::default();
    /// bounds.grow(1., 2., 3.);
    /// assert_eq!(1., bounds.min.x);
    /// assert_eq!(3., bounds.max.z);
    /// ```
    pub fn grow(&mut self, x: f64, y: f64, z: f64) {
        self.min.x = self.min.x.min(x);
        self.min.y = self.min.y.min(y);
        self.min.z = self.min.z.min(z);
        self.max.x = self.max.x.max(x);
        self.max.y = self.max.y.max(y);
        self.max.z = self.max.z.max(z);
    }

    /// Returns true if nothing has been grown into these bounds.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds {
            min: Vector {
                x: f64::INFINITY,
                y: f64::INFINITY,
                z: f64::INFINITY,
            },
            max: Vector {
                x: f64::NEG_INFINITY,
                y: f64::NEG_INFINITY,
                z: f64::NEG_INFINITY,
            },
        }
    }
}
