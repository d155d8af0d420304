use las_columns::{
    Error, Format, Header, ReadMode, Reader, ReaderOptions, Transform, Version,
    consistency::Warning,
    point::PointColumns,
};
use std::{fs::OpenOptions, path::PathBuf};
use tempfile::TempDir;

/// Writes ten points, then cuts the file off halfway through the fifth record.
fn truncated() -> (TempDir, PathBuf, PointColumns) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.las");
    let format = Format::new(1).unwrap();
    let mut columns = PointColumns::allocate(&format, 10).unwrap();
    columns.x = (0..10).map(f64::from).collect();
    columns.gps_time = Some((0..10).map(|i| f64::from(i) * 2.).collect());
    let mut header = Header::new(Version::new(1, 2), format);
    header.transforms.x = Transform {
        scale: 0.5,
        offset: 0.,
    };
    let header = las_columns::write_file(&path, &header, &columns, &[], &[]).unwrap();

    let len = u64::from(header.offset_to_point_data)
        + 4 * u64::from(header.point_data_record_length)
        + u64::from(header.point_data_record_length) / 2;
    OpenOptions::new()
        .write(true)
        .open(&path)
        .unwrap()
        .set_len(len)
        .unwrap();
    (dir, path, columns)
}

#[test]
fn strict_stops_after_the_header() {
    let (_dir, path, _) = truncated();
    let file = las_columns::read_file(&path, ReadMode::Full).unwrap();
    assert!(!file.is_usable());
    assert_eq!(Some(4), file.consistency.available_points);
    assert_eq!(
        vec![Warning::TooFewRecords {
            declared: 10,
            available: 4
        }],
        file.consistency.warnings
    );
    assert_eq!(10, file.header.number_of_points);
    assert!(file.points.is_none());
}

#[test]
fn strict_reader_hits_the_end_of_the_file() {
    let (_dir, path, _) = truncated();
    let mut reader = Reader::from_path(&path).unwrap();
    assert_eq!(10, reader.number_of_points());
    assert!(matches!(reader.read_points(), Err(Error::Io(_))));
}

#[test]
fn permissive_reads_whole_records() {
    let (_dir, path, columns) = truncated();
    let options = ReaderOptions::default().with_strict(false);
    let file = las_columns::read_file_with_options(&path, ReadMode::Full, options).unwrap();
    assert!(!file.is_usable());
    let points = file.points.unwrap();
    assert_eq!(4, points.len());
    assert_eq!(columns.x[..4], points.x[..]);
    assert_eq!(Some(vec![0., 2., 4., 6.]), points.gps_time);
    assert_eq!(Some(Vec::new()), file.vlrs);

    let mut reader = Reader::from_path_with_options(&path, options).unwrap();
    assert_eq!(4, reader.number_of_points());
    assert_eq!(4, reader.read_coordinates().unwrap().len());
}
