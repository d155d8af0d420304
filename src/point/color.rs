use crate::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// A RGB color value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub red: u16,

    /// Green channel.
    pub green: u16,

    /// Blue channel.
    pub blue: u16,
}

impl Color {
    /// Creates a new color.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::point::Color;
    /// let color = Color::new(1, 2, 3);
    /// assert_eq!(2, color.green);
    /// ```
    pub fn new(red: u16, green: u16, blue: u16) -> Color {
        Color { red, green, blue }
    }

    pub(crate) fn read_from<R: Read>(mut read: R) -> Result<Color> {
        let red = read.read_u16::<LittleEndian>()?;
        let green = read.read_u16::<LittleEndian>()?;
        let blue = read.read_u16::<LittleEndian>()?;
        Ok(Color::new(red, green, blue))
    }

    pub(crate) fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_u16::<LittleEndian>(self.red)?;
        write.write_u16::<LittleEndian>(self.green)?;
        write.write_u16::<LittleEndian>(self.blue)?;
        Ok(())
    }
}

impl From<[u16; 3]> for Color {
    fn from([red, green, blue]: [u16; 3]) -> Color {
        Color { red, green, blue }
    }
}
