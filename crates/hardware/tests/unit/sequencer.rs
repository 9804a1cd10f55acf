//! Sequencer Tests.
//!
//! Drives the timeline executor directly, without a data path or phase generator.

use hyperram_core::config::DataWidth;
use hyperram_core::controller::sequencer::ControlRegisters;
use hyperram_core::controller::{BusRequest, Sequencer, Stage};

/// Runs `seq` from a trigger edge until it returns to idle.
///
/// Returns the register snapshot after every edge, indexed by offset.
fn replay(seq: &mut Sequencer, request: &BusRequest) -> Vec<ControlRegisters> {
    let mut regs = Vec::new();
    seq.tick(true, request);
    regs.push(seq.registers());
    while seq.busy() {
        seq.tick(false, request);
        regs.push(seq.registers());
    }
    regs
}

#[test]
fn idle_without_trigger() {
    let mut seq = Sequencer::new(DataWidth::X8, 6);
    assert!(seq.tick(false, &BusRequest::read(0)).is_none());
    assert!(!seq.busy());
    assert_eq!(seq.stage(), Stage::Idle);
}

#[test]
fn trigger_applies_first_step() {
    let mut seq = Sequencer::new(DataWidth::X8, 6);
    let step = seq.tick(true, &BusRequest::read(0)).map(|s| (s.offset, s.stage));
    assert_eq!(step, Some((0, Stage::Settle)));
    assert!(seq.busy());
    assert_eq!(seq.elapsed(), 1);
}

#[test]
fn busy_for_one_period() {
    for (width, period) in [(DataWidth::X8, 71), (DataWidth::X16, 67)] {
        let mut seq = Sequencer::new(width, 6);
        let regs = replay(&mut seq, &BusRequest::read(0));
        // One snapshot per edge from the trigger to the return to idle.
        assert_eq!(regs.len(), period + 1);
        assert_eq!(seq.stage(), Stage::Idle);
    }
}

#[test]
fn trigger_ignored_while_busy() {
    let mut seq = Sequencer::new(DataWidth::X8, 6);
    let request = BusRequest::read(0);
    seq.tick(true, &request);
    for _ in 0..10 {
        seq.tick(true, &request);
    }
    assert_eq!(seq.elapsed(), 11);
}

#[test]
fn chip_select_window() {
    let mut seq = Sequencer::new(DataWidth::X8, 6);
    let regs = replay(&mut seq, &BusRequest::read(0));
    let selected: Vec<usize> = (0..regs.len()).filter(|&i| regs[i].cs).collect();
    assert_eq!(selected.first(), Some(&3));
    assert_eq!(selected.last(), Some(&66));
    assert_eq!(selected.len(), 64);
}

#[test]
fn ack_is_a_single_cycle_pulse() {
    let mut seq = Sequencer::new(DataWidth::X8, 6);
    let regs = replay(&mut seq, &BusRequest::read(0));
    let acked: Vec<usize> = (0..regs.len()).filter(|&i| regs[i].ack).collect();
    assert_eq!(acked, vec![69]);
}

#[test]
fn read_never_drives_data_lines() {
    let mut seq = Sequencer::new(DataWidth::X8, 6);
    let regs = replay(&mut seq, &BusRequest::read(0));
    assert!(regs[15..].iter().all(|r| !r.dq_oe && !r.rwds_oe));
    // Only the CA bytes are driven.
    assert_eq!(regs.iter().filter(|r| r.dq_oe).count(), 12);
}

#[test]
fn write_drives_through_data_stage() {
    let mut seq = Sequencer::new(DataWidth::X8, 6);
    let regs = replay(&mut seq, &BusRequest::write(0, 0));
    assert!(regs[59..67].iter().all(|r| r.dq_oe && r.rwds_oe));
    assert!(!regs[67].dq_oe && !regs[67].rwds_oe);
}

#[test]
fn x8_mask_inverts_selects() {
    let mut seq = Sequencer::new(DataWidth::X8, 6);
    let regs = replay(&mut seq, &BusRequest::write_masked(0, 0, 0b1010));
    let rwds: Vec<u8> = [59, 61, 63, 65].iter().map(|&i| regs[i].rwds_o).collect();
    assert_eq!(rwds, vec![0, 1, 0, 1]);
}

#[test]
fn x16_mask_pairs_lanes_per_step() {
    let mut seq = Sequencer::new(DataWidth::X16, 6);
    let regs = replay(&mut seq, &BusRequest::write_masked(0, 0, 0b0110));
    // Step 0 carries lanes 3 (line 1) and 2 (line 0); step 1 lanes 1 and 0.
    assert_eq!(regs[59].rwds_o, 0b10);
    assert_eq!(regs[61].rwds_o, 0b01);
}

#[test]
fn full_select_leaves_rwds_low() {
    let mut seq = Sequencer::new(DataWidth::X16, 6);
    let regs = replay(&mut seq, &BusRequest::write(0, 0));
    assert!(regs.iter().all(|r| r.rwds_o == 0));
}
