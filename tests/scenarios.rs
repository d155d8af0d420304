//! Files built byte by byte, checked against what the readers and writers make of them.

use byteorder::{LittleEndian, WriteBytesExt};
use las_columns::{
    Error, Format, Header, ReadMode, Reader, ReaderOptions, Version, Vlr, WriterOptions,
    consistency::Warning,
    point::PointColumns,
    raw::{
        self,
        header::{Evlr, LargeFile},
        vlr::RecordLength,
    },
};
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Packs a header, its vlrs, and records holding only x, y, z, and intensity.
fn build(header: &raw::Header, vlrs: &[raw::Vlr], records: &[(i32, i32, i32, u16)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    header.write_to(&mut bytes).unwrap();
    for vlr in vlrs {
        vlr.write_to(&mut bytes).unwrap();
    }
    for &(x, y, z, intensity) in records {
        bytes.write_i32::<LittleEndian>(x).unwrap();
        bytes.write_i32::<LittleEndian>(y).unwrap();
        bytes.write_i32::<LittleEndian>(z).unwrap();
        bytes.write_u16::<LittleEndian>(intensity).unwrap();
        bytes.resize(bytes.len() + usize::from(header.point_data_record_length) - 14, 0);
    }
    bytes
}

fn write_temp(bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.las");
    fs::write(&path, bytes).unwrap();
    (dir, path)
}

fn permissive() -> ReaderOptions {
    ReaderOptions::default().with_strict(false)
}

fn two_points(scale: f64) -> raw::Header {
    raw::Header {
        number_of_point_records: 2,
        number_of_points_by_return: [2, 0, 0, 0, 0],
        x_scale_factor: scale,
        y_scale_factor: scale,
        z_scale_factor: scale,
        ..Default::default()
    }
}

const RECORDS: [(i32, i32, i32, u16); 2] = [(100, 200, 300, 7), (-5, 0, 123_456, 65535)];

fn projection_vlr() -> raw::Vlr {
    let mut description = [0; 32];
    description[..8].copy_from_slice(b"GeoKeys!");
    raw::Vlr {
        reserved: 0xaabb,
        user_id: *b"LASF_Projection\0",
        record_id: 34735,
        description,
        record_length_after_header: RecordLength::Vlr(8),
        data: vec![1, 0, 1, 0, 0, 0, 0, 0],
        ..Default::default()
    }
}

#[test]
fn format_0_with_one_vlr() {
    let mut header = two_points(0.01);
    header.number_of_variable_length_records = 1;
    header.offset_to_point_data = 227 + 54 + 8;
    let bytes = build(&header, &[projection_vlr()], &RECORDS);
    assert_eq!(227 + 62 + 2 * 20, bytes.len());
    let (_dir, path) = write_temp(&bytes);

    let file = las_columns::read_file(&path, ReadMode::Full).unwrap();
    assert!(file.is_usable());
    assert!(file.consistency.warnings.is_empty());
    assert_eq!(2, file.header.number_of_points);
    assert_eq!([2, 0, 0, 0, 0], file.header.number_of_points_by_return[..5]);

    let vlrs = file.vlrs.unwrap();
    assert_eq!(1, vlrs.len());
    assert_eq!(0xaabb, vlrs[0].reserved);
    assert_eq!("LASF_Projection", vlrs[0].user_id);
    assert_eq!(34735, vlrs[0].record_id);
    assert_eq!("GeoKeys!", vlrs[0].description);
    assert!(!vlrs[0].is_extended);
    assert_eq!(vec![1, 0, 1, 0, 0, 0, 0, 0], vlrs[0].data);

    let points = file.points.unwrap();
    let scaled = |n: i32| 0.01 * f64::from(n) + 0.;
    assert_eq!(vec![scaled(100), scaled(-5)], points.x);
    assert_eq!(vec![scaled(200), scaled(0)], points.y);
    assert_eq!(vec![scaled(300), scaled(123_456)], points.z);
    assert_eq!(vec![7, 65535], points.intensity);
    assert_eq!(Some(vec![0, 0]), points.classification);
    assert!(points.gps_time.is_none());
    assert_eq!(Some(Vec::new()), file.evlrs);
}

#[test]
fn bad_signature() {
    let header = raw::Header {
        file_signature: *b"LASX",
        ..two_points(0.01)
    };
    let bytes = build(&header, &[], &RECORDS);
    assert!(matches!(
        Reader::new(Cursor::new(bytes.clone())),
        Err(Error::InvalidFileSignature(signature)) if &signature == b"LASX"
    ));
    let (_dir, path) = write_temp(&bytes);
    assert!(matches!(
        las_columns::read_file(&path, ReadMode::HeaderOnly),
        Err(Error::InvalidFileSignature(_))
    ));
}

#[test]
fn more_points_declared_than_stored() {
    let header = raw::Header {
        number_of_point_records: 5,
        ..two_points(0.01)
    };
    let (_dir, path) = write_temp(&build(&header, &[], &RECORDS));

    let file = las_columns::read_file(&path, ReadMode::Full).unwrap();
    assert!(!file.is_usable());
    assert_eq!(
        vec![Warning::TooFewRecords {
            declared: 5,
            available: 2
        }],
        file.consistency.warnings
    );
    assert_eq!(5, file.header.number_of_points);
    assert!(file.vlrs.is_none());
    assert!(file.points.is_none());

    let file =
        las_columns::read_file_with_options(&path, ReadMode::Full, permissive()).unwrap();
    assert_eq!(2, file.points.unwrap().len());
}

#[test]
fn las_1_4_uses_the_64_bit_count() {
    let version = Version::new(1, 4);
    let header = raw::Header {
        version,
        header_size: 375,
        offset_to_point_data: 375,
        number_of_point_records: 5,
        start_of_waveform_data_packet_record: Some(0),
        evlr: Some(Evlr::default()),
        large_file: Some(LargeFile {
            number_of_point_records: 2,
            ..Default::default()
        }),
        ..two_points(0.5)
    };
    let bytes = build(&header, &[], &RECORDS);
    assert_eq!(375 + 40, bytes.len());

    let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    assert!(reader.consistency().is_usable());
    assert_eq!(5, reader.raw_header().number_of_point_records);
    assert_eq!(2, reader.header().number_of_points);
    let points = reader.read_points().unwrap();
    assert_eq!(vec![50., -2.5], points.x);
    assert!(reader.read_evlrs().unwrap().is_empty());
}

#[test]
fn compressed_format() {
    let header = raw::Header {
        point_data_record_format: 200,
        point_data_record_length: 26,
        ..two_points(1.)
    };
    let bytes = build(&header, &[], &RECORDS);
    let (_dir, path) = write_temp(&bytes);

    let file = las_columns::read_file(&path, ReadMode::Full).unwrap();
    assert!(!file.is_usable());
    assert!(file.consistency.coordinates_only);
    assert_eq!(
        vec![Warning::Compressed(200), Warning::UnsupportedFormat(200)],
        file.consistency.warnings
    );
    assert!(file.points.is_none());

    let file =
        las_columns::read_file_with_options(&path, ReadMode::Full, permissive()).unwrap();
    let points = file.points.unwrap();
    assert!(points.is_coordinates_only());
    assert_eq!(vec![100., -5.], points.x);
    assert_eq!(vec![7, 65535], points.intensity);

    let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    assert!(reader.read_points().unwrap().is_coordinates_only());
}

#[test]
fn record_shorter_than_its_format() {
    let header = raw::Header {
        point_data_record_format: 3,
        point_data_record_length: 20,
        ..two_points(1.)
    };
    let (_dir, path) = write_temp(&build(&header, &[], &RECORDS));

    let file = las_columns::read_file(&path, ReadMode::Full).unwrap();
    assert!(file.is_usable());
    assert_eq!(
        vec![Warning::RecordLength {
            format: 3,
            record_length: 20,
            expected: 34
        }],
        file.consistency.warnings
    );
    let points = file.points.unwrap();
    assert!(points.is_coordinates_only());
    assert_eq!(vec![300., 123_456.], points.z);
}

#[test]
fn read_modes() {
    let mut header = two_points(0.01);
    header.number_of_variable_length_records = 1;
    header.offset_to_point_data = 227 + 62;
    let (_dir, path) = write_temp(&build(&header, &[projection_vlr()], &RECORDS));

    let file = las_columns::read_file(&path, ReadMode::HeaderOnly).unwrap();
    assert_eq!(2, file.header.number_of_points);
    assert!(file.vlrs.is_none());
    assert!(file.points.is_none());
    assert!(file.evlrs.is_none());

    let file = las_columns::read_file(&path, "VLR".parse().unwrap()).unwrap();
    assert_eq!(1, file.vlrs.unwrap().len());
    assert!(file.points.is_none());

    let file = las_columns::read_file(&path, ReadMode::CoordinatesAndIntensityOnly).unwrap();
    let points = file.points.unwrap();
    assert!(points.is_coordinates_only());
    assert_eq!(vec![7, 65535], points.intensity);
    assert_eq!(Some(Vec::new()), file.evlrs);
}

fn file_len(path: &Path) -> u64 {
    fs::metadata(path).unwrap().len()
}

#[test]
fn missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.las");
    let format = Format::new(3).unwrap();
    let mut columns = PointColumns::allocate(&format, 2).unwrap();
    columns.color = None;
    let header = Header::new(Version::new(1, 2), format);
    assert!(matches!(
        las_columns::write_file(&path, &header, &columns, &[], &[]),
        Err(Error::MissingColumn {
            column: "color",
            format: 3
        })
    ));
    assert_eq!(0, file_len(&path));
}

#[test]
fn header_size_heals() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("healed.las");
    let format = Format::new(0).unwrap();
    let mut header = Header::new(Version::new(1, 3), format);
    header.header_size = 227;
    header.offset_to_point_data = 1000;
    let columns = PointColumns::allocate(&format, 3).unwrap();
    let vlr = Vlr {
        data: vec![0; 8],
        ..Default::default()
    };

    let written =
        las_columns::write_file(&path, &header, &columns, &[vlr], &[]).unwrap();
    assert_eq!(235, written.header_size);
    assert_eq!(235 + 62, written.offset_to_point_data);
    assert_eq!(235 + 62 + 3 * 20, file_len(&path));

    let file = las_columns::read_file(&path, ReadMode::Full).unwrap();
    assert!(file.is_usable());
    assert_eq!(written, file.header);
    assert_eq!(Some(columns), file.points);
}

#[test]
fn unquantizable_coordinate_leaves_an_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unquantizable.las");
    let format = Format::new(0).unwrap();
    let mut columns = PointColumns::allocate(&format, 10).unwrap();
    columns.x[9] = 1e20;
    let result = las_columns::write_file_with_options(
        &path,
        &Header::new(Version::new(1, 2), format),
        &columns,
        &[],
        &[],
        WriterOptions::default().with_chunk_points(2),
    );
    assert!(matches!(
        result,
        Err(Error::InverseTransform { n, .. }) if n == 1e20
    ));
    assert_eq!(0, file_len(&path));
}

#[test]
fn non_ascii_strings_are_written_back() {
    let mut header = two_points(1.);
    header.system_identifier = [0xe9; 32];
    header.generating_software[..4].copy_from_slice(b"ab\xffd");
    header.number_of_variable_length_records = 1;
    header.offset_to_point_data = 227 + 62;
    let mut vlr = projection_vlr();
    vlr.description = [0x80; 32];
    let (dir, path) = write_temp(&build(&header, &[vlr], &RECORDS));

    let file = las_columns::read_file(&path, ReadMode::Full).unwrap();
    assert_eq!(32, file.header.system_identifier.chars().count());
    assert_eq!("ab\u{ff}d", file.header.generating_software);
    let vlrs = file.vlrs.unwrap();

    let copy = dir.path().join("copy.las");
    las_columns::write_file(&copy, &file.header, &file.points.unwrap(), &vlrs, &[]).unwrap();
    let bytes = fs::read(&copy).unwrap();
    let raw_header = raw::Header::read_from(&bytes[..]).unwrap();
    assert_eq!([0xe9; 32], raw_header.system_identifier);
    assert_eq!(header.generating_software, raw_header.generating_software);
    let raw_vlr = raw::Vlr::read_from(&bytes[227..], false).unwrap();
    assert_eq!([0x80; 32], raw_vlr.description);
    assert_eq!(bytes, fs::read(&path).unwrap());
}
