//! Simulation statistics collection and reporting.
//!
//! This module tracks bus-level activity of a simulated controller. It provides:
//! 1. **Cycles:** Total internal cycles and the share spent with a timeline in flight.
//! 2. **Transactions:** Reads and writes acknowledged.
//! 3. **Back-pressure:** Start opportunities refused because a timeline was running.
//! 4. **Bus health:** Cycles in which controller and device drove DQ at the same time.

use std::time::Instant;

/// Controller statistics.
#[derive(Clone, Debug)]
pub struct ControllerStats {
    start_time: Instant,
    /// Total internal cycles simulated.
    pub cycles: u64,
    /// Cycles with a timeline in flight.
    pub busy_cycles: u64,
    /// Read requests acknowledged.
    pub reads: u64,
    /// Write requests acknowledged.
    pub writes: u64,
    /// Start-phase cycles where a pending request found the sequencer busy.
    pub refused_triggers: u64,
    /// Cycles where both sides drove DQ.
    pub contention_cycles: u64,
}

impl Default for ControllerStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            busy_cycles: 0,
            reads: 0,
            writes: 0,
            refused_triggers: 0,
            contention_cycles: 0,
        }
    }
}

impl ControllerStats {
    /// Acknowledged transactions of either kind.
    pub const fn transactions(&self) -> u64 {
        self.reads + self.writes
    }

    /// Fraction of cycles with a timeline in flight (0.0 when nothing ran).
    pub fn utilisation(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.busy_cycles as f64 / self.cycles as f64
        }
    }

    /// Average cycles per acknowledged transaction (0.0 when none completed).
    pub fn cycles_per_transaction(&self) -> f64 {
        match self.transactions() {
            0 => 0.0,
            n => self.cycles as f64 / n as f64,
        }
    }

    /// Prints a summary to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        println!("\n==========================================================");
        println!("HYPERRAM CONTROLLER STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!(
            "busy_cycles              {} ({:.2}%)",
            self.busy_cycles,
            self.utilisation() * 100.0
        );
        println!("----------------------------------------------------------");
        println!("TRANSACTIONS");
        println!("  reads                  {}", self.reads);
        println!("  writes                 {}", self.writes);
        println!(
            "  cycles.per_txn         {:.2}",
            self.cycles_per_transaction()
        );
        println!("  refused_triggers       {}", self.refused_triggers);
        println!("  dq.contention          {}", self.contention_cycles);
        println!("==========================================================");
    }
}
