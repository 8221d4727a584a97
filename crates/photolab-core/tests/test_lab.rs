use photolab_core::lab::{
    CalibrationColumn, PhotodiodeModel, BENCH_WAVE_END, BENCH_WAVE_START, HAMAMATSU_S2281_01,
    OSI_PIN_10D,
};

#[test]
fn test_bench_wavelength_range() {
    assert_eq!(BENCH_WAVE_START, 350);
    // The monochromator scan stops one step short of 1050 nm.
    assert_eq!(BENCH_WAVE_END, 1049);
}

#[test]
fn test_calibration_column_names() {
    assert_eq!(CalibrationColumn::Wavelength.to_string(), "Wavelength");
    assert_eq!(CalibrationColumn::Responsivity.to_string(), "Responsivity");
    assert_eq!(CalibrationColumn::QuantumEfficiency.to_string(), "QE");
    assert_eq!(CalibrationColumn::Transmission.to_string(), "Transmission");
}

#[test]
fn test_photodiode_selection() {
    let model: PhotodiodeModel = "Hamamatsu".parse().unwrap();
    assert_eq!(model.datasheet(), &HAMAMATSU_S2281_01);
    let model: PhotodiodeModel = "PIN-10D".parse().unwrap();
    assert_eq!(model.datasheet(), &OSI_PIN_10D);
    assert_eq!(model.to_string(), "PIN-10D");
    assert!("BPW34".parse::<PhotodiodeModel>().is_err());
}
