//! Timeline Construction Tests.

use hyperram_core::config::DataWidth;
use hyperram_core::controller::timeline::latency_cycles;
use hyperram_core::controller::{Action, Stage, Timeline};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Offsets
// ══════════════════════════════════════════════════════════

#[test]
fn x8_offsets_at_latency_six() {
    let t = Timeline::new(DataWidth::X8, 6);
    assert_eq!(t.offset_of(Stage::Settle), Some(0));
    assert_eq!(t.offset_of(Stage::CommandAddress), Some(3));
    assert_eq!(t.offset_of(Stage::Latency), Some(15));
    assert_eq!(t.offset_of(Stage::Data), Some(59));
    assert_eq!(t.offset_of(Stage::Teardown), Some(67));
    assert_eq!(t.ack_offset(), Some(69));
    assert_eq!(t.period(), 71);
}

#[test]
fn x16_offsets_at_latency_six() {
    let t = Timeline::new(DataWidth::X16, 6);
    assert_eq!(t.offset_of(Stage::Data), Some(59));
    assert_eq!(t.offset_of(Stage::Teardown), Some(63));
    assert_eq!(t.ack_offset(), Some(65));
    assert_eq!(t.period(), 67);
}

#[rstest]
fn period_formula(
    #[values(DataWidth::X8, DataWidth::X16)] width: DataWidth,
    #[values(1, 2, 3, 6, 7, 16)] latency: u32,
) {
    let t = Timeline::new(width, latency);
    let expected = 3 + 12 + latency_cycles(latency) + t.data_cycles() + 2 + 1 + 1;
    assert_eq!(t.period(), expected);
    assert_eq!(t.width(), width);
    assert_eq!(t.latency(), latency);
}

#[rstest]
#[case(1, 4)]
#[case(3, 20)]
#[case(6, 44)]
#[case(7, 52)]
fn latency_stage_length(#[case] latency: u32, #[case] cycles: u32) {
    assert_eq!(latency_cycles(latency), cycles);
}

#[rstest]
#[case(DataWidth::X8, 8)]
#[case(DataWidth::X16, 4)]
fn data_stage_length(#[case] width: DataWidth, #[case] cycles: u32) {
    assert_eq!(Timeline::new(width, 6).data_cycles(), cycles);
}

#[test]
fn offsets_strictly_increase() {
    for width in [DataWidth::X8, DataWidth::X16] {
        let t = Timeline::new(width, 1);
        assert!(t.steps().windows(2).all(|w| w[0].offset < w[1].offset));
    }
}

#[test]
fn step_lookup() {
    let t = Timeline::new(DataWidth::X8, 6);
    assert_eq!(t.step_at(59).map(|s| s.stage), Some(Stage::Data));
    assert_eq!(t.step_at(61).map(|s| s.stage), Some(Stage::Data));
    assert!(t.step_at(58).is_none());
    assert_eq!(t.step_at(71).map(|s| s.stage), Some(Stage::Idle));
}

// ══════════════════════════════════════════════════════════
// 2. Actions
// ══════════════════════════════════════════════════════════

fn masks(t: &Timeline) -> Vec<(u8, u8)> {
    t.steps()
        .iter()
        .flat_map(|s| s.actions.iter())
        .filter_map(|a| match *a {
            Action::Mask { line, lane } => Some((line, lane)),
            _ => None,
        })
        .collect()
}

#[test]
fn x8_masks_walk_lanes_downward() {
    let t = Timeline::new(DataWidth::X8, 6);
    assert_eq!(masks(&t), vec![(0, 3), (0, 2), (0, 1), (0, 0)]);
}

#[test]
fn x16_masks_upper_line_first() {
    let t = Timeline::new(DataWidth::X16, 6);
    assert_eq!(masks(&t), vec![(1, 3), (0, 2), (1, 1), (0, 0)]);
}

#[test]
fn command_address_step_actions() {
    let t = Timeline::new(DataWidth::X8, 6);
    let step = t.step_at(3).unwrap();
    assert!(step.actions.contains(&Action::ChipSelect(true)));
    assert!(step.actions.contains(&Action::LoadCommandAddress));
    assert!(step.actions.contains(&Action::CaActive(true)));
}

#[test]
fn write_data_loaded_once() {
    let t = Timeline::new(DataWidth::X16, 6);
    let loads: Vec<u32> = t
        .steps()
        .iter()
        .filter(|s| s.actions.contains(&Action::LoadWriteData))
        .map(|s| s.offset)
        .collect();
    assert_eq!(loads, vec![59]);
}

#[test]
fn display_lists_every_step() {
    let t = Timeline::new(DataWidth::X8, 6);
    let text = t.to_string();
    assert!(text.starts_with("timeline width=x8 latency=6 period=71"));
    assert_eq!(text.lines().count(), t.steps().len() + 1);
}
