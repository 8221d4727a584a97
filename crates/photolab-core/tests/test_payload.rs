use chrono::{TimeZone, Utc};

use photolab_core::photometer::PayloadDecoder;

fn tstamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 22, 30, 0).unwrap()
}

#[test]
fn test_json_payload() {
    let payload = r#"{"name": "stars123", "freq": 12.5, "mag": 19.2, "tamb": 21.5, "tsky": -8.25}"#;
    let reading = PayloadDecoder::Json.decode(payload, tstamp()).unwrap();
    assert_eq!(reading.tstamp, tstamp());
    assert_eq!(reading.name.as_deref(), Some("stars123"));
    assert_eq!(reading.freq, 12.5);
    assert_eq!(reading.mag, Some(19.2));
    assert_eq!(reading.tamb, Some(21.5));
    assert_eq!(reading.tsky, Some(-8.25));
}

#[test]
fn test_json_payload_minimal() {
    let reading = PayloadDecoder::Json.decode(r#"{"freq": 0.5}"#, tstamp()).unwrap();
    assert_eq!(reading.freq, 0.5);
    assert_eq!(reading.mag, None);
    assert_eq!(reading.name, None);
}

#[test]
fn test_json_payload_rejects_garbage() {
    assert!(PayloadDecoder::Json.decode("ready>", tstamp()).is_none());
    assert!(PayloadDecoder::Json.decode(r#"{"mag": 19.2}"#, tstamp()).is_none());
}

#[test]
fn test_old_payload_hertz() {
    let payload = "<fH 04606><tA +2987><tO +2481><mZ -0042>";
    let reading = PayloadDecoder::Old.decode(payload, tstamp()).unwrap();
    assert_eq!(reading.freq, 4606.0);
    assert_eq!(reading.tamb, Some(29.87));
    assert_eq!(reading.tsky, Some(24.81));
    assert_eq!(reading.mag, Some(-0.42));
}

#[test]
fn test_old_payload_millihertz_scaled() {
    let payload = "<fm 12500><tA +2100><tO -0350><mZ +2045>";
    let reading = PayloadDecoder::Old.decode(payload, tstamp()).unwrap();
    assert_eq!(reading.freq, 12.5);
    assert_eq!(reading.tamb, Some(21.0));
    assert_eq!(reading.tsky, Some(-3.5));
    assert_eq!(reading.mag, Some(20.45));
}

#[test]
fn test_old_payload_rejects_banner() {
    assert!(PayloadDecoder::Old
        .decode("TESS-W v1.0 ready", tstamp())
        .is_none());
    assert!(PayloadDecoder::Old
        .decode("<fH 04606><tA +2987>", tstamp())
        .is_none());
}

#[test]
fn test_old_payload_embedded_in_line() {
    // Firmware wraps the message in framing noise.
    let payload = "\u{1}<fH 00430><tA +2945><tO +2439><mZ -0000>\r";
    let reading = PayloadDecoder::Old.decode(payload, tstamp()).unwrap();
    assert_eq!(reading.freq, 430.0);
}
