//! The cycle driver of the pipeline simulator.

use crate::{
    isa::RegFile,
    pipeline::{self, Commit, PipeRegs, Units},
};

/// Size of the instruction memory and of the data memory, in words.
pub const MEM_SIZE: usize = 1 << 16;

/// Counters collected during simulation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stats {
    /// Cycles in which the pipeline stalled on a load-use hazard.
    pub stalls: u64,
    /// Taken branches, each of which squashed three instructions.
    pub squashes: u64,
}

/// Pipeline simulator. The pipeline involves several pipeline registers
/// (flip-flops) and combinational logic circuits.
///
/// - Combinational logic: from `cur_state` and the storage units, through
///   the stage functions, to `nex_state` and `pending`.
/// - Clock tick: `nex_state` becomes `cur_state` and `pending` is written to
///   the register file and data memory.
///
/// No stage observes a value computed in the same cycle.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PipeSim {
    pub(crate) cur_state: PipeRegs,
    pub(crate) nex_state: PipeRegs,
    pub(crate) pending: Commit,
    pub(crate) units: Units,
    /// Number of words loaded from the program image.
    pub(crate) num_memory: usize,
    /// See [`PipeSim::is_terminate`].
    pub(crate) terminate: bool,
    /// Whether to print the state before every cycle
    pub(crate) tty_out: bool,
    pub(crate) cycle_count: u64,
    pub(crate) stats: Stats,
}

impl PipeSim {
    /// Initialize the simulator with the given program image. Registers are
    /// zeroed, all pipeline registers hold bubbles and pc is 0.
    ///
    /// tty_out: whether to print the machine state before each cycle
    pub fn new(image: &[i32], tty_out: bool) -> Self {
        let state = PipeRegs::default();
        Self {
            cur_state: state,
            nex_state: state,
            pending: Commit::default(),
            units: Units::init(image),
            num_memory: image.len().min(MEM_SIZE),
            terminate: false,
            tty_out,
            cycle_count: 0,
            stats: Stats::default(),
        }
    }

    /// Propagate signals through the combinational logic of all stages.
    /// The result is kept in `nex_state` and `pending` until
    /// [`PipeSim::initiate_next_cycle`] is called.
    fn propagate_signals(&mut self) {
        let cur = &self.cur_state;
        let mut nex = *cur;
        let mut commit = Commit::default();

        pipeline::fetch(cur, &self.units, &mut nex);
        if pipeline::decode(cur, &self.units, &mut nex) {
            self.stats.stalls += 1;
        }
        pipeline::execute(cur, &mut nex);
        if pipeline::memory(cur, &self.units, &mut nex, &mut commit) {
            tracing::debug!(
                "squash: `{}`, `{}` and the next fetch",
                cur.id_ex.instr,
                cur.if_id.instr
            );
            self.stats.squashes += 1;
        }
        pipeline::writeback(cur, &mut nex, &mut commit);

        self.nex_state = nex;
        self.pending = commit;
    }

    /// Latch the signals computed by [`PipeSim::propagate_signals`] and
    /// start the next cycle.
    fn initiate_next_cycle(&mut self) {
        let Commit {
            reg_write,
            mem_write,
        } = std::mem::take(&mut self.pending);
        if let Some((addr, value)) = mem_write {
            self.units.write_mem(addr, value);
        }
        if let Some((index, value)) = reg_write {
            self.units.write_reg(index, value);
        }
        self.cur_state = self.nex_state;
        self.cycle_count += 1;
        self.terminate = self.cur_state.wb_end.instr.is_halt();
        if self.terminate {
            tracing::debug!(
                "halted after {} cycles, {} stalls, {} squashes",
                self.cycle_count,
                self.stats.stalls,
                self.stats.squashes
            );
        }
    }

    /// Simulate one cycle. If `tty_out` is set, the state is printed
    /// before the cycle starts.
    pub fn step(&mut self) {
        if self.tty_out {
            self.print_state();
        }
        self.propagate_signals();
        self.initiate_next_cycle();
    }

    /// Run until the halt instruction reaches WB/END. Return the number of
    /// cycles executed.
    ///
    /// With `max_cycles`, give up once the limit is exceeded.
    pub fn run(&mut self, max_cycles: Option<u64>) -> anyhow::Result<u64> {
        while !self.is_terminate() {
            if max_cycles.is_some_and(|max| self.cycle_count >= max) {
                anyhow::bail!(
                    "exceed maximum CPU cycle limit: {} (pc = {})",
                    self.cycle_count,
                    self.program_counter()
                );
            }
            self.step();
        }
        Ok(self.cycle_count)
    }

    /// Print the machine state to stdout.
    pub fn print_state(&self) {
        print!("{}", crate::record::StateRecord::new(self));
    }

    /// Whether the simulation is terminated
    pub fn is_terminate(&self) -> bool {
        self.terminate
    }
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
    pub fn program_counter(&self) -> i32 {
        self.cur_state.f.pc
    }
    pub fn stats(&self) -> Stats {
        self.stats
    }
    pub fn pipe_regs(&self) -> &PipeRegs {
        &self.cur_state
    }
    /// Get the registers and their values
    pub fn registers(&self) -> RegFile {
        self.units.registers()
    }
    pub fn reg(&self, index: usize) -> Option<i32> {
        self.units.registers().get(index).copied()
    }
    /// The whole data memory.
    pub fn data_mem(&self) -> &[i32] {
        self.units.data_mem()
    }
    /// Number of words in the loaded program image.
    pub fn num_memory(&self) -> usize {
        self.num_memory
    }
}
