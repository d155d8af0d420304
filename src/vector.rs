/// An xyz collection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector<T> {
    /// X
    pub x: T,
    /// Y
    pub y: T,
    /// Z
    pub z: T,
}

impl<T> Vector<T> {
    /// Applies `f` to each axis.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::Vector;
    /// let v = Vector { x: 1, y: 2, z: 3 }.map(|n| n * 2);
    /// assert_eq!(Vector { x: 2, y: 4, z: 6 }, v);
    /// ```
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Vector<U> {
        Vector {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }
}
