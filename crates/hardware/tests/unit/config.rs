//! # Configuration Tests
//!
//! Tests for configuration defaults, deserialization, file loading, and validation.

use std::io::Write;

use hyperram_core::ConfigError;
use hyperram_core::config::{ClockOutput, ControllerConfig, DataWidth, PadConfig};
use hyperram_core::controller::HyperRamController;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn test_config_default() {
    let config = ControllerConfig::default();
    assert_eq!(config.data_width, 8);
    assert_eq!(config.latency, 6);
    assert_eq!(config.pads, PadConfig::default());
}

#[test]
fn test_pad_config_defaults() {
    let pads = PadConfig::default();
    assert_eq!(pads.clock, ClockOutput::SingleEnded);
    assert_eq!(pads.chip_selects, 1);
    assert!(pads.reset_pin);
}

#[test]
fn test_default_validates() {
    let params = ControllerConfig::default().validate().unwrap();
    assert_eq!(params.width(), DataWidth::X8);
    assert_eq!(params.latency(), 6);
}

// ══════════════════════════════════════════════════════════
// 2. JSON
// ══════════════════════════════════════════════════════════

#[test]
fn test_empty_json_uses_defaults() {
    let config = ControllerConfig::from_json("{}").unwrap();
    assert_eq!(config, ControllerConfig::default());
}

#[test]
fn test_partial_json() {
    let config = ControllerConfig::from_json(r#"{ "data_width": 16 }"#).unwrap();
    assert_eq!(config.data_width, 16);
    assert_eq!(config.latency, 6);
}

#[test]
fn test_pad_json() {
    let json = r#"{
        "latency": 7,
        "pads": { "clock": "differential", "chip_selects": 2, "reset_pin": false }
    }"#;
    let config = ControllerConfig::from_json(json).unwrap();
    assert_eq!(config.latency, 7);
    assert_eq!(config.pads.clock, ClockOutput::Differential);
    assert_eq!(config.pads.chip_selects, 2);
    assert!(!config.pads.reset_pin);
}

#[test]
fn test_malformed_json() {
    let err = ControllerConfig::from_json("{ data_width: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_unknown_clock_style_rejected() {
    let err = ControllerConfig::from_json(r#"{ "pads": { "clock": "lvds" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_serializes_back() {
    let config = ControllerConfig::default();
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(ControllerConfig::from_json(&text).unwrap(), config);
}

#[test]
fn test_data_width_deserializes_from_integer() {
    assert_eq!(serde_json::from_str::<DataWidth>("8").unwrap(), DataWidth::X8);
    assert_eq!(serde_json::from_str::<DataWidth>("16").unwrap(), DataWidth::X16);
    assert!(serde_json::from_str::<DataWidth>("12").is_err());
}

// ══════════════════════════════════════════════════════════
// 3. Files
// ══════════════════════════════════════════════════════════

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "data_width": 16, "latency": 3 }}"#).unwrap();

    let config = ControllerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.data_width, 16);
    assert_eq!(config.latency, 3);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ControllerConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

// ══════════════════════════════════════════════════════════
// 4. Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0)]
#[case(4)]
#[case(12)]
#[case(32)]
fn test_unsupported_width_rejected(#[case] width: u32) {
    let config = ControllerConfig {
        data_width: width,
        ..ControllerConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedDataWidth(w) if w == width));
    assert!(HyperRamController::new(&config).is_err());
}

#[rstest]
#[case(8, DataWidth::X8)]
#[case(16, DataWidth::X16)]
fn test_supported_width(#[case] bits: u32, #[case] width: DataWidth) {
    let config = ControllerConfig {
        data_width: bits,
        ..ControllerConfig::default()
    };
    assert_eq!(config.validate().unwrap().width(), width);
}

#[test]
fn test_zero_latency_rejected() {
    let config = ControllerConfig {
        latency: 0,
        ..ControllerConfig::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidLatency(0)
    ));
}

#[rstest]
#[case(17)]
#[case(0x2000_0000)]
#[case(u32::MAX)]
fn test_oversized_latency_rejected(#[case] latency: u32) {
    let config = ControllerConfig {
        latency,
        ..ControllerConfig::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidLatency(n) if n == latency
    ));
    assert!(HyperRamController::new(&config).is_err());
}

#[test]
fn test_maximum_latency_builds() {
    let config = ControllerConfig {
        latency: 16,
        ..ControllerConfig::default()
    };
    let controller = HyperRamController::new(&config).unwrap();
    assert_eq!(controller.timeline().period(), 71 + 10 * 8);
}

#[rstest]
#[case(0)]
#[case(3)]
fn test_chip_select_count_rejected(#[case] count: usize) {
    let mut config = ControllerConfig::default();
    config.pads.chip_selects = count;
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::UnsupportedChipSelects(n) if n == count
    ));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::UnsupportedDataWidth(12).to_string(),
        "unsupported data width: 12 (expected 8 or 16)"
    );
    assert_eq!(
        ConfigError::InvalidLatency(0).to_string(),
        "invalid latency: 0 (expected 1 to 16)"
    );
}

#[test]
fn test_data_width_properties() {
    assert_eq!(DataWidth::X8.bits(), 8);
    assert_eq!(DataWidth::X8.rwds_lines(), 1);
    assert_eq!(DataWidth::X8.data_steps(), 4);
    assert_eq!(DataWidth::X16.mask(), 0xFFFF);
    assert_eq!(DataWidth::X16.rwds_lines(), 2);
    assert_eq!(DataWidth::X16.data_steps(), 2);
    assert_eq!(
        DataWidth::X8.data_steps() * DataWidth::X8.bits(),
        hyperram_core::common::constants::BUS_DATA_BITS
    );
    assert_eq!(DataWidth::X16.to_string(), "x16");
}
