use crate::{
    Result, Transform, Vector,
    layout::Field,
    point::{Color, PointColumns, ScanAngles, Waveform},
};
use byteorder::{ByteOrder, LittleEndian};

/// Decodes whole point records into columns by walking a field sequence.
#[derive(Debug)]
pub(crate) struct Decoder {
    fields: &'static [Field],
    record_length: usize,
    transforms: Vector<Transform>,
}

impl Decoder {
    pub(crate) fn new(
        fields: &'static [Field],
        record_length: usize,
        transforms: Vector<Transform>,
    ) -> Decoder {
        Decoder {
            fields,
            record_length,
            transforms,
        }
    }

    /// Decodes a chunk of records, the first of which is point `first`.
    ///
    /// Bytes after the last field of a record are extra bytes, and are only kept if the columns
    /// have an extra bytes block.
    pub(crate) fn decode(
        &self,
        chunk: &[u8],
        columns: &mut PointColumns,
        first: usize,
    ) -> Result<()> {
        for (i, record) in chunk.chunks_exact(self.record_length).enumerate() {
            let index = first + i;
            let mut offset = 0;
            for &field in self.fields {
                let end = offset + field.width();
                self.decode_field(field, &record[offset..end], columns, index)?;
                offset = end;
            }
            if let Some(extra_bytes) = columns.extra_bytes.as_mut() {
                extra_bytes.scatter(index, &record[offset..]);
            }
        }
        Ok(())
    }

    fn decode_field(
        &self,
        field: Field,
        bytes: &[u8],
        columns: &mut PointColumns,
        index: usize,
    ) -> Result<()> {
        match field {
            Field::CoordinatesAndIntensity => {
                columns.x[index] = self.transforms.x.direct(LittleEndian::read_i32(&bytes[0..4]));
                columns.y[index] = self.transforms.y.direct(LittleEndian::read_i32(&bytes[4..8]));
                columns.z[index] = self.transforms.z.direct(LittleEndian::read_i32(&bytes[8..12]));
                columns.intensity[index] = LittleEndian::read_u16(&bytes[12..14]);
            }
            Field::Bits => set(&mut columns.bits, index, bytes[0]),
            Field::Bits2 => set(&mut columns.bits2, index, bytes[0]),
            Field::Classification => set(&mut columns.classification, index, bytes[0]),
            Field::ScanAngleRank => {
                if let Some(ScanAngles::Rank(scan_angle)) = columns.scan_angle.as_mut() {
                    scan_angle[index] = bytes[0] as i8;
                }
            }
            Field::ScanAngle => {
                if let Some(ScanAngles::Scaled(scan_angle)) = columns.scan_angle.as_mut() {
                    scan_angle[index] = LittleEndian::read_i16(bytes);
                }
            }
            Field::UserData => set(&mut columns.user_data, index, bytes[0]),
            Field::PointSourceId => set(
                &mut columns.point_source_id,
                index,
                LittleEndian::read_u16(bytes),
            ),
            Field::GpsTime => set(&mut columns.gps_time, index, LittleEndian::read_f64(bytes)),
            Field::Color => set(&mut columns.color, index, Color::read_from(bytes)?),
            Field::Nir => set(&mut columns.nir, index, LittleEndian::read_u16(bytes)),
            Field::Waveform => set(&mut columns.waveform, index, Waveform::read_from(bytes)?),
        }
        Ok(())
    }
}

fn set<T>(column: &mut Option<Vec<T>>, index: usize, value: T) {
    if let Some(column) = column.as_mut() {
        column[index] = value;
    }
}
