mod common;

use approx::assert_abs_diff_eq;

use photolab_core::raw::{image_from, BayerPattern, Channel, NormRoi};

use common::{build_cube_fits, build_mosaic_fits, constant_rggb_mosaic, write_fits};

#[test]
fn test_mosaic_metadata() {
    let tmpfile = write_fits(&constant_rggb_mosaic());
    let mut loader = image_from(tmpfile.path(), NormRoi::full(), None).unwrap();

    let meta = loader.metadata().unwrap().clone();
    assert_eq!(meta.width, 4);
    assert_eq!(meta.height, 4);
    assert_eq!(meta.bayer_pattern, Some(BayerPattern::RGGB));
    assert_eq!(meta.exposure, Some(2.5));
    assert_eq!(meta.camera.as_deref(), Some("SYNTH-CAM"));
    assert_eq!(loader.shape().unwrap(), (4, 4));
    assert_eq!(loader.cfa_pattern().unwrap(), BayerPattern::RGGB);
}

#[test]
fn test_mosaic_demux_applies_bzero() {
    let tmpfile = write_fits(&constant_rggb_mosaic());
    let mut loader = image_from(tmpfile.path(), NormRoi::full(), None).unwrap();

    let stack = loader.load().unwrap();
    assert_eq!(stack.dim(), (4, 4, 4));
    // Stored as signed with BZERO 32768, read back unsigned.
    assert!(stack.index_axis(ndarray::Axis(0), 0).iter().all(|&v| v == 1000.0));
    assert!(stack.index_axis(ndarray::Axis(0), 1).iter().all(|&v| v == 2000.0));
    assert!(stack.index_axis(ndarray::Axis(0), 2).iter().all(|&v| v == 3000.0));
    assert!(stack.index_axis(ndarray::Axis(0), 3).iter().all(|&v| v == 4000.0));
}

#[test]
fn test_mosaic_statistics_constant_planes() {
    let tmpfile = write_fits(&constant_rggb_mosaic());
    let mut loader = image_from(
        tmpfile.path(),
        NormRoi::full(),
        Some(vec![Channel::R, Channel::B]),
    )
    .unwrap();

    let stats = loader.statistics().unwrap();
    assert_eq!(stats.len(), 2);
    assert_abs_diff_eq!(stats[0].mean, 1000.0);
    assert_abs_diff_eq!(stats[0].stddev, 0.0);
    assert_abs_diff_eq!(stats[1].mean, 4000.0);
}

#[test]
fn test_mosaic_green_statistics_synthesized() {
    let tmpfile = write_fits(&constant_rggb_mosaic());
    let mut loader = image_from(tmpfile.path(), NormRoi::full(), Some(vec![Channel::G])).unwrap();

    let stats = loader.statistics().unwrap();
    // (Gr + Gb) / 2 = (2000 + 3000) / 2
    assert_abs_diff_eq!(stats[0].mean, 2500.0);
}

#[test]
fn test_mosaic_roi_trims_planes() {
    let tmpfile = write_fits(&constant_rggb_mosaic());
    let n_roi = NormRoi::new(Some(0.0), Some(0.0), 0.5, 0.5);
    let mut loader = image_from(tmpfile.path(), n_roi, None).unwrap();

    // 8x8 mosaic -> 4x4 planes -> 2x2 window.
    let stack = loader.load().unwrap();
    assert_eq!(stack.dim(), (4, 2, 2));
    assert_eq!(loader.roi().unwrap().dimensions(), (2, 2));
}

#[test]
fn test_cube_planes_sliced_in_order() {
    let plane = |v: f32| vec![v; 6];
    let data = build_cube_fits(3, 2, &[plane(1.0), plane(2.0), plane(3.0), plane(4.0)]);
    let tmpfile = write_fits(&data);
    let mut loader = image_from(tmpfile.path(), NormRoi::full(), None).unwrap();

    // Cubes carry full-size planes, no halving.
    assert_eq!(loader.shape().unwrap(), (2, 3));
    let stack = loader.load().unwrap();
    assert_eq!(stack.dim(), (4, 2, 3));
    assert_eq!(stack[[0, 0, 0]], 1.0);
    assert_eq!(stack[[3, 1, 2]], 4.0);
}

#[test]
fn test_cube_wrong_plane_count_rejected() {
    let plane = |v: f32| vec![v; 6];
    let data = build_cube_fits(3, 2, &[plane(1.0), plane(2.0), plane(3.0)]);
    let tmpfile = write_fits(&data);
    let mut loader = image_from(tmpfile.path(), NormRoi::full(), None).unwrap();
    assert!(loader.load().is_err());
}

#[test]
fn test_mosaic_without_bayer_keyword_rejected() {
    let pixels = vec![0u16; 16];
    let mut data = build_mosaic_fits(4, 4, "RGGB", &pixels);
    // Corrupt the BAYER card key so parsing skips it.
    let pos = data
        .windows(5)
        .position(|w| w == b"BAYER")
        .expect("card present");
    data[pos..pos + 5].copy_from_slice(b"BOYER");
    let tmpfile = write_fits(&data);
    let mut loader = image_from(tmpfile.path(), NormRoi::full(), None).unwrap();
    assert!(loader.cfa_pattern().is_err());
    assert!(loader.load().is_err());
}

#[test]
fn test_non_ascii_header_card_rejected() {
    let mut data = constant_rggb_mosaic();
    // Overwrite "CAMERA  =" so an accented character straddles the
    // 8-byte keyword column.
    let pos = data
        .windows(6)
        .position(|w| w == b"CAMERA")
        .expect("card present");
    data[pos..pos + 9].copy_from_slice("HISTOIR\u{e9}".as_bytes());
    let tmpfile = write_fits(&data);
    assert!(image_from(tmpfile.path(), NormRoi::full(), None).is_err());
}

#[test]
fn test_truncated_file_rejected() {
    let data = constant_rggb_mosaic();
    let truncated = &data[..data.len() - 2880];
    let tmpfile = write_fits(truncated);
    assert!(image_from(tmpfile.path(), NormRoi::full(), None).is_err());
}

#[test]
fn test_unknown_extension_rejected() {
    let tmpfile = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    assert!(image_from(tmpfile.path(), NormRoi::full(), None).is_err());
}
