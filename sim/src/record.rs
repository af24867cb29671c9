//! Human-readable record of the machine state, printed before every cycle.

use std::fmt::{self, Display, Formatter};

use crate::{
    framework::PipeSim,
    isa::{Inst, Opcode, NUM_REGS},
};

const DONT_CARE: &str = " (Don't Care)";

/// Annotate a field that carries no meaning for the instruction in its
/// pipeline register.
fn dont_care(cond: bool) -> &'static str {
    if cond {
        DONT_CARE
    } else {
        ""
    }
}

/// Whether `instr` is one of `ops`. Unknown opcodes match nothing.
fn is_any(instr: Inst, ops: &[Opcode]) -> bool {
    instr.opcode().is_some_and(|op| ops.contains(&op))
}

/// A snapshot of the simulator, formatted as
///
/// ```text
/// @@@
/// state before cycle 0 starts:
///     pc = 0
///     data memory:
///     ...
/// end state
/// ```
pub struct StateRecord<'a> {
    sim: &'a PipeSim,
}

impl<'a> StateRecord<'a> {
    pub fn new(sim: &'a PipeSim) -> Self {
        Self { sim }
    }
}

impl Display for StateRecord<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Opcode::*;

        let sim = self.sim;
        let regs = sim.pipe_regs();

        writeln!(f, "\n@@@")?;
        writeln!(f, "state before cycle {} starts:", sim.cycle_count())?;
        writeln!(f, "\tpc = {}", sim.program_counter())?;

        writeln!(f, "\tdata memory:")?;
        for (i, word) in sim.data_mem().iter().take(sim.num_memory()).enumerate() {
            writeln!(f, "\t\tdataMem[ {} ] = {}", i, word)?;
        }
        writeln!(f, "\tregisters:")?;
        for (i, value) in sim.registers().iter().enumerate().take(NUM_REGS) {
            writeln!(f, "\t\treg[ {} ] = {}", i, value)?;
        }

        let if_id = &regs.if_id;
        writeln!(f, "\tIF/ID pipeline register:")?;
        writeln!(f, "\t\tinstruction = {} ( {} )", if_id.instr.word(), if_id.instr)?;
        writeln!(
            f,
            "\t\tpcPlus1 = {}{}",
            if_id.pc_plus1,
            dont_care(is_any(if_id.instr, &[Noop]))
        )?;

        let id_ex = &regs.id_ex;
        writeln!(f, "\tID/EX pipeline register:")?;
        writeln!(f, "\t\tinstruction = {} ( {} )", id_ex.instr.word(), id_ex.instr)?;
        writeln!(
            f,
            "\t\tpcPlus1 = {}{}",
            id_ex.pc_plus1,
            dont_care(is_any(id_ex.instr, &[Noop]))
        )?;
        writeln!(
            f,
            "\t\treadRegA = {}{}",
            id_ex.read_reg_a,
            dont_care(!is_any(id_ex.instr, &[Add, Nor, Lw, Sw, Beq, Jalr]))
        )?;
        writeln!(
            f,
            "\t\treadRegB = {}{}",
            id_ex.read_reg_b,
            dont_care(!is_any(id_ex.instr, &[Add, Nor, Sw, Beq]))
        )?;
        writeln!(
            f,
            "\t\toffset = {}{}",
            id_ex.offset,
            dont_care(!is_any(id_ex.instr, &[Lw, Sw, Beq]))
        )?;

        let ex_mem = &regs.ex_mem;
        let not_beq = !is_any(ex_mem.instr, &[Beq]);
        writeln!(f, "\tEX/MEM pipeline register:")?;
        writeln!(f, "\t\tinstruction = {} ( {} )", ex_mem.instr.word(), ex_mem.instr)?;
        writeln!(
            f,
            "\t\tbranchTarget {}{}",
            ex_mem.branch_target,
            dont_care(not_beq)
        )?;
        writeln!(
            f,
            "\t\teq ? {}{}",
            if ex_mem.eq { "True" } else { "False" },
            dont_care(not_beq)
        )?;
        writeln!(
            f,
            "\t\taluResult = {}{}",
            ex_mem.alu_result,
            dont_care(!is_any(ex_mem.instr, &[Add, Nor, Lw, Sw]))
        )?;
        writeln!(
            f,
            "\t\treadRegB = {}{}",
            ex_mem.read_reg_b,
            dont_care(!is_any(ex_mem.instr, &[Sw]))
        )?;

        for (name, instr, write_data) in [
            ("MEM/WB", regs.mem_wb.instr, regs.mem_wb.write_data),
            ("WB/END", regs.wb_end.instr, regs.wb_end.write_data),
        ] {
            writeln!(f, "\t{} pipeline register:", name)?;
            writeln!(f, "\t\tinstruction = {} ( {} )", instr.word(), instr)?;
            writeln!(
                f,
                "\t\twriteData = {}{}",
                write_data,
                dont_care(!is_any(instr, &[Add, Nor, Lw]))
            )?;
        }

        writeln!(f, "end state")
    }
}
