use crate::{
    Error, Format, Result, Transform, Vector,
    layout::Field,
    point::{PointColumns, ScanAngles},
};
use byteorder::{ByteOrder, LittleEndian};

/// Checks that the columns hold everything the point format needs, for every point.
///
/// Columns that the format does not use are ignored.
pub(crate) fn validate(format: &Format, columns: &PointColumns) -> Result<()> {
    let n = columns.len();
    let code = format.code();
    check_len("y", n, columns.y.len())?;
    check_len("z", n, columns.z.len())?;
    check_len("intensity", n, columns.intensity.len())?;
    check("bits", code, n, columns.bits.as_ref().map(Vec::len))?;
    check("classification", code, n, columns.classification.as_ref().map(Vec::len))?;
    check("user_data", code, n, columns.user_data.as_ref().map(Vec::len))?;
    check("point_source_id", code, n, columns.point_source_id.as_ref().map(Vec::len))?;
    if format.is_extended() {
        check("bits2", code, n, columns.bits2.as_ref().map(Vec::len))?;
        let len = match &columns.scan_angle {
            Some(ScanAngles::Scaled(scan_angle)) => Some(scan_angle.len()),
            _ => None,
        };
        check("scan_angle (scaled)", code, n, len)?;
    } else {
        let len = match &columns.scan_angle {
            Some(ScanAngles::Rank(scan_angle)) => Some(scan_angle.len()),
            _ => None,
        };
        check("scan_angle (rank)", code, n, len)?;
    }
    if format.has_gps_time {
        check("gps_time", code, n, columns.gps_time.as_ref().map(Vec::len))?;
    }
    if format.has_color {
        check("color", code, n, columns.color.as_ref().map(Vec::len))?;
    }
    if format.has_nir {
        check("nir", code, n, columns.nir.as_ref().map(Vec::len))?;
    }
    if format.has_waveform {
        check("waveform", code, n, columns.waveform.as_ref().map(Vec::len))?;
    }
    let expected = usize::from(format.extra_bytes);
    match &columns.extra_bytes {
        Some(extra_bytes) => {
            if extra_bytes.per_point() != expected {
                return Err(Error::ExtraBytesMismatch {
                    expected,
                    actual: extra_bytes.per_point(),
                });
            }
            if expected > 0 {
                check_len("extra_bytes", n, extra_bytes.points())?;
            }
        }
        None if expected > 0 => {
            return Err(Error::MissingColumn {
                column: "extra_bytes",
                format: code,
            });
        }
        None => {}
    }
    Ok(())
}

/// Checks that every coordinate can be quantized with the header's transforms.
pub(crate) fn check_coordinates(
    columns: &PointColumns,
    transforms: &Vector<Transform>,
) -> Result<()> {
    for (transform, column) in [
        (&transforms.x, &columns.x),
        (&transforms.y, &columns.y),
        (&transforms.z, &columns.z),
    ] {
        for &n in column {
            let _ = transform.inverse(n)?;
        }
    }
    Ok(())
}

fn check(column: &'static str, format: u8, expected: usize, len: Option<usize>) -> Result<()> {
    let len = len.ok_or(Error::MissingColumn { column, format })?;
    check_len(column, expected, len)
}

fn check_len(column: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        Err(Error::ColumnLength {
            column,
            expected,
            actual,
        })
    } else {
        Ok(())
    }
}

/// Encodes columns into whole point records by walking a field sequence.
#[derive(Debug)]
pub(crate) struct Encoder {
    fields: &'static [Field],
    record_length: usize,
    transforms: Vector<Transform>,
}

impl Encoder {
    pub(crate) fn new(
        fields: &'static [Field],
        record_length: usize,
        transforms: Vector<Transform>,
    ) -> Encoder {
        Encoder {
            fields,
            record_length,
            transforms,
        }
    }

    /// Encodes the points starting at `first` into a zeroed chunk.
    pub(crate) fn encode(
        &self,
        columns: &PointColumns,
        first: usize,
        chunk: &mut [u8],
    ) -> Result<()> {
        chunk.fill(0);
        for (i, record) in chunk.chunks_exact_mut(self.record_length).enumerate() {
            let index = first + i;
            let mut offset = 0;
            for &field in self.fields {
                let end = offset + field.width();
                self.encode_field(field, columns, index, &mut record[offset..end])?;
                offset = end;
            }
            if let Some(extra_bytes) = &columns.extra_bytes {
                extra_bytes.gather(index, &mut record[offset..]);
            }
        }
        Ok(())
    }

    fn encode_field(
        &self,
        field: Field,
        columns: &PointColumns,
        index: usize,
        bytes: &mut [u8],
    ) -> Result<()> {
        match field {
            Field::CoordinatesAndIntensity => {
                let x = self.transforms.x.inverse(columns.x[index])?;
                LittleEndian::write_i32(&mut bytes[0..4], x);
                let y = self.transforms.y.inverse(columns.y[index])?;
                LittleEndian::write_i32(&mut bytes[4..8], y);
                let z = self.transforms.z.inverse(columns.z[index])?;
                LittleEndian::write_i32(&mut bytes[8..12], z);
                LittleEndian::write_u16(&mut bytes[12..14], columns.intensity[index]);
            }
            Field::Bits => bytes[0] = get(&columns.bits, index),
            Field::Bits2 => bytes[0] = get(&columns.bits2, index),
            Field::Classification => bytes[0] = get(&columns.classification, index),
            Field::ScanAngleRank => {
                if let Some(ScanAngles::Rank(scan_angle)) = &columns.scan_angle {
                    bytes[0] = scan_angle[index] as u8;
                }
            }
            Field::ScanAngle => {
                if let Some(ScanAngles::Scaled(scan_angle)) = &columns.scan_angle {
                    LittleEndian::write_i16(bytes, scan_angle[index]);
                }
            }
            Field::UserData => bytes[0] = get(&columns.user_data, index),
            Field::PointSourceId => {
                LittleEndian::write_u16(bytes, get(&columns.point_source_id, index))
            }
            Field::GpsTime => LittleEndian::write_f64(bytes, get(&columns.gps_time, index)),
            Field::Color => get(&columns.color, index).write_to(bytes)?,
            Field::Nir => LittleEndian::write_u16(bytes, get(&columns.nir, index)),
            Field::Waveform => get(&columns.waveform, index).write_to(bytes)?,
        }
        Ok(())
    }
}

/// Returns a value from a column, or the default if the column is absent.
fn get<T: Copy + Default>(column: &Option<Vec<T>>, index: usize) -> T {
    column
        .as_ref()
        .map(|column| column[index])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Color, ExtraBytes};

    fn transforms() -> Vector<Transform> {
        Vector {
            x: Transform {
                scale: 0.01,
                offset: 0.,
            },
            y: Transform::default(),
            z: Transform::default(),
        }
    }

    #[test]
    fn missing_column() {
        let format = Format::new(2).unwrap();
        let mut columns = PointColumns::allocate(&format, 2).unwrap();
        columns.color = None;
        assert!(matches!(
            validate(&format, &columns),
            Err(Error::MissingColumn {
                column: "color",
                format: 2
            })
        ));
    }

    #[test]
    fn coordinates_only_columns_are_not_enough() {
        let columns = PointColumns::allocate_coordinates(2).unwrap();
        assert!(matches!(
            validate(&Format::new(0).unwrap(), &columns),
            Err(Error::MissingColumn { column: "bits", .. })
        ));
    }

    #[test]
    fn short_column() {
        let format = Format::new(1).unwrap();
        let mut columns = PointColumns::allocate(&format, 3).unwrap();
        columns.gps_time = Some(vec![1.]);
        assert!(matches!(
            validate(&format, &columns),
            Err(Error::ColumnLength {
                column: "gps_time",
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn wrong_scan_angle_width() {
        let format = Format::new(6).unwrap();
        let mut columns = PointColumns::allocate(&format, 1).unwrap();
        columns.scan_angle = Some(ScanAngles::Rank(vec![0]));
        assert!(validate(&format, &columns).is_err());
    }

    #[test]
    fn extra_bytes_mismatch() {
        let format = Format::resolve(0, 24).unwrap();
        let mut columns = PointColumns::allocate(&format, 1).unwrap();
        columns.extra_bytes = Some(ExtraBytes::new(3, 1).unwrap());
        assert!(matches!(
            validate(&format, &columns),
            Err(Error::ExtraBytesMismatch {
                expected: 4,
                actual: 3
            })
        ));
        columns.extra_bytes = None;
        assert!(matches!(
            validate(&format, &columns),
            Err(Error::MissingColumn {
                column: "extra_bytes",
                ..
            })
        ));
    }

    #[test]
    fn unused_columns_are_ignored() {
        let format = Format::new(0).unwrap();
        let mut columns = PointColumns::allocate(&Format::new(3).unwrap(), 1).unwrap();
        columns.color = Some(vec![Color::new(1, 2, 3)]);
        assert!(validate(&format, &columns).is_ok());
    }

    #[test]
    fn format_2_record() {
        let format = Format::resolve(2, 27).unwrap();
        let mut columns = PointColumns::allocate(&format, 2).unwrap();
        columns.x = vec![0., 1.5];
        columns.intensity = vec![0, 300];
        columns.scan_angle = Some(ScanAngles::Rank(vec![0, -90]));
        columns.color = Some(vec![Color::default(), Color::new(1, 2, 3)]);
        if let Some(extra_bytes) = columns.extra_bytes.as_mut() {
            extra_bytes.set(1, 0, 0xee);
        }
        validate(&format, &columns).unwrap();

        let mut chunk = vec![0xff; 27];
        Encoder::new(format.layout().fields(), 27, transforms())
            .encode(&columns, 1, &mut chunk)
            .unwrap();
        assert_eq!(150i32.to_le_bytes(), chunk[0..4]);
        assert_eq!(300u16.to_le_bytes(), chunk[12..14]);
        assert_eq!((-90i8) as u8, chunk[16]);
        assert_eq!(1u16.to_le_bytes(), chunk[20..22]);
        assert_eq!(3u16.to_le_bytes(), chunk[24..26]);
        assert_eq!(0xee, chunk[26]);
    }

    #[test]
    fn coordinates_are_checked_on_every_axis() {
        let mut columns = PointColumns::allocate_coordinates(3).unwrap();
        assert!(check_coordinates(&columns, &transforms()).is_ok());
        columns.z[2] = -1e12;
        assert!(matches!(
            check_coordinates(&columns, &transforms()),
            Err(Error::InverseTransform { n, .. }) if n == -1e12
        ));
    }

    #[test]
    fn unquantizable_coordinate() {
        let format = Format::new(0).unwrap();
        let mut columns = PointColumns::allocate(&format, 1).unwrap();
        columns.x = vec![1e20];
        let mut chunk = vec![0; 20];
        let encoder = Encoder::new(format.layout().fields(), 20, transforms());
        assert!(matches!(
            encoder.encode(&columns, 0, &mut chunk),
            Err(Error::InverseTransform { .. })
        ));
    }
}
