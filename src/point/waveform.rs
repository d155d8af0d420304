use crate::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// A wave packet, which locates the full waveform of one return.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Waveform {
    /// This value plus 99 is the record id of the waveform packet descriptor vlr.
    ///
    /// Zero means there is no waveform data for this point.
    pub wave_packet_descriptor_index: u8,

    /// Location of this point's waveform packet, relative to the start of the waveform data
    /// packet record (or the start of an auxiliary file).
    pub byte_offset_to_waveform_data: u64,

    /// The size, in bytes, of the waveform packet associated with this return.
    pub waveform_packet_size_in_bytes: u32,

    /// The offset in picoseconds from the first digitized value to the location within the
    /// waveform packet where the return was detected.
    pub return_point_waveform_location: f32,

    /// Parametric line through the anchor point, X = X0 + X(t).
    pub x_t: f32,
    #[allow(missing_docs)]
    pub y_t: f32,
    #[allow(missing_docs)]
    pub z_t: f32,
}

impl Waveform {
    /// Reads the 29 bytes of a wave packet.
    ///
    /// # Examples
    ///
    /// ```
    /// use las_columns::point::Waveform;
    /// let waveform = Waveform::read_from(&[0u8; 29][..]).unwrap();
    /// assert_eq!(Waveform::default(), waveform);
    /// ```
    pub fn read_from<R: Read>(mut read: R) -> Result<Waveform> {
        Ok(Waveform {
            wave_packet_descriptor_index: read.read_u8()?,
            byte_offset_to_waveform_data: read.read_u64::<LittleEndian>()?,
            waveform_packet_size_in_bytes: read.read_u32::<LittleEndian>()?,
            return_point_waveform_location: read.read_f32::<LittleEndian>()?,
            x_t: read.read_f32::<LittleEndian>()?,
            y_t: read.read_f32::<LittleEndian>()?,
            z_t: read.read_f32::<LittleEndian>()?,
        })
    }

    /// Writes the 29 bytes of a wave packet.
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_u8(self.wave_packet_descriptor_index)?;
        write.write_u64::<LittleEndian>(self.byte_offset_to_waveform_data)?;
        write.write_u32::<LittleEndian>(self.waveform_packet_size_in_bytes)?;
        write.write_f32::<LittleEndian>(self.return_point_waveform_location)?;
        write.write_f32::<LittleEndian>(self.x_t)?;
        write.write_f32::<LittleEndian>(self.y_t)?;
        write.write_f32::<LittleEndian>(self.z_t)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::WAVEFORM_LEN;

    #[test]
    fn twenty_nine_bytes() {
        let waveform = Waveform {
            wave_packet_descriptor_index: 1,
            byte_offset_to_waveform_data: 1 << 33,
            waveform_packet_size_in_bytes: 256,
            return_point_waveform_location: 1.5,
            x_t: -0.25,
            y_t: 0.5,
            z_t: 2.,
        };
        let mut bytes = [0u8; WAVEFORM_LEN];
        waveform.write_to(&mut bytes[..]).unwrap();
        assert_eq!(1, bytes[0]);
        assert_eq!((1u64 << 33).to_le_bytes(), bytes[1..9]);
        assert_eq!(waveform, Waveform::read_from(&bytes[..]).unwrap());
    }
}
