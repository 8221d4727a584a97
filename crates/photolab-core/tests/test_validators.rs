use chrono::{NaiveDate, NaiveTime};

use photolab_core::raw::Channel;
use photolab_core::validators::{
    vbool, vchannels, vdate, vdir, vfile, vflopath, vfloat, vfloat01, vmonth, FloatOrPath,
};

#[test]
fn test_vfile_accepts_existing_file() {
    let tmpfile = tempfile::NamedTempFile::new().unwrap();
    let parsed = vfile(tmpfile.path().to_str().unwrap()).unwrap();
    assert_eq!(parsed, tmpfile.path());
}

#[test]
fn test_vfile_rejects_missing_file() {
    assert!(vfile("/no/such/file.fits").is_err());
}

#[test]
fn test_vdir() {
    let tmpdir = tempfile::tempdir().unwrap();
    assert!(vdir(tmpdir.path().to_str().unwrap()).is_ok());
    assert!(vdir("/no/such/dir").is_err());
}

#[test]
fn test_vbool_literals() {
    assert!(vbool("True").unwrap());
    assert!(!vbool("False").unwrap());
    assert!(vbool("true").is_err());
    assert!(vbool("1").is_err());
}

#[test]
fn test_vdate_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(10, 20, 30)
        .unwrap();
    assert_eq!(vdate("2024-03-15T10:20:30").unwrap(), expected);
    assert_eq!(vdate("2024-03-15T10:20:30Z").unwrap(), expected);

    let midnight = NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_time(NaiveTime::MIN);
    assert_eq!(vdate("2024-03-15").unwrap(), midnight);

    let first = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_time(NaiveTime::MIN);
    assert_eq!(vdate("2024-03").unwrap(), first);
    assert_eq!(vmonth("2024-03").unwrap(), first);

    assert!(vdate("yesterday").is_err());
}

#[test]
fn test_vfloat_fractions() {
    assert_eq!(vfloat("0.25").unwrap(), 0.25);
    assert_eq!(vfloat("1/240").unwrap(), 1.0 / 240.0);
    assert!(vfloat("1/0").is_err());
    assert!(vfloat("abc").is_err());
}

#[test]
fn test_vfloat01_bounds() {
    assert_eq!(vfloat01("1.0").unwrap(), 1.0);
    assert_eq!(vfloat01("1/2").unwrap(), 0.5);
    assert!(vfloat01("1.5").is_err());
    assert!(vfloat01("-0.1").is_err());
}

#[test]
fn test_vflopath() {
    assert_eq!(vflopath("256").unwrap(), FloatOrPath::Value(256.0));
    let tmpfile = tempfile::NamedTempFile::new().unwrap();
    match vflopath(tmpfile.path().to_str().unwrap()).unwrap() {
        FloatOrPath::Path(path) => assert_eq!(path, tmpfile.path()),
        other => panic!("expected a path, got {other:?}"),
    }
    assert!(vflopath("/no/such/bias.fits").is_err());
}

#[test]
fn test_vchannels_sorts_and_dedups() {
    assert_eq!(
        vchannels("B,R,Gr").unwrap(),
        vec![Channel::R, Channel::Gr, Channel::B]
    );
    assert_eq!(vchannels("R,R").unwrap(), vec![Channel::R]);
    assert_eq!(
        vchannels("G,B,R").unwrap(),
        vec![Channel::R, Channel::G, Channel::B]
    );
}

#[test]
fn test_vchannels_rejects_mixed_green() {
    assert!(vchannels("G,Gr").is_err());
    assert!(vchannels("G,Gb").is_err());
    assert!(vchannels("Gr,Gb").is_ok());
}

#[test]
fn test_vchannels_rejects_unknown() {
    assert!(vchannels("").is_err());
    assert!(vchannels("R,X").is_err());
}
