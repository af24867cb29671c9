//! Combinational logic of the five stages.
//!
//! Every stage reads the registers of the current cycle (`cur`) and writes
//! the registers of the next cycle (`nex`). A stage never reads `nex`, so the
//! order in which stages run only matters for the overrides of the fetch
//! stage: a stall from decode, then a redirect from memory, which wins.

use super::{forward_operands, hazard, PipeRegs, Units};
use crate::isa::{alu, Inst, Opcode};

/// Architectural writes of a cycle, applied when the cycle ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Commit {
    /// (register index, value)
    pub reg_write: Option<(usize, i32)>,
    /// (data memory address, value)
    pub mem_write: Option<(usize, i32)>,
}

/// Read the instruction at pc into IF/ID and advance pc.
pub fn fetch(cur: &PipeRegs, units: &Units, nex: &mut PipeRegs) {
    let pc = cur.f.pc;
    nex.if_id.instr = units.fetch(pc);
    nex.if_id.pc_plus1 = pc.wrapping_add(1);
    nex.f.pc = pc.wrapping_add(1);
}

/// Read the source registers of the instruction in IF/ID into ID/EX.
///
/// Returns true if the pipeline is stalled on a load-use hazard.
pub fn decode(cur: &PipeRegs, units: &Units, nex: &mut PipeRegs) -> bool {
    let instr = cur.if_id.instr;
    nex.id_ex.instr = instr;
    nex.id_ex.pc_plus1 = cur.if_id.pc_plus1;
    nex.id_ex.read_reg_a = units.reg(instr.reg_a());
    nex.id_ex.read_reg_b = units.reg(instr.reg_b());
    nex.id_ex.offset = instr.offset();

    let stalled = hazard::load_use_hazard(cur);
    if stalled {
        tracing::debug!("stall: `{}` waits for `{}`", instr, cur.id_ex.instr);
        hazard::stall(cur, nex);
    }
    stalled
}

/// Compute the ALU result, the branch target and the equality flag of the
/// instruction in ID/EX, on forwarded operands.
pub fn execute(cur: &PipeRegs, nex: &mut PipeRegs) {
    let id_ex = &cur.id_ex;
    let (val_a, val_b) = forward_operands(cur);

    nex.ex_mem.instr = id_ex.instr;
    nex.ex_mem.alu_result = alu(
        id_ex.instr.opcode(),
        val_a,
        val_b,
        id_ex.offset,
        id_ex.pc_plus1,
    );
    nex.ex_mem.branch_target = id_ex.pc_plus1.wrapping_add(id_ex.offset);
    nex.ex_mem.eq = val_a == val_b;
    nex.ex_mem.read_reg_b = val_b;
}

/// Access data memory for the instruction in EX/MEM and resolve branches.
///
/// A taken branch sets pc to its target and turns the three younger
/// instructions into bubbles. Returns true in that case.
pub fn memory(cur: &PipeRegs, units: &Units, nex: &mut PipeRegs, commit: &mut Commit) -> bool {
    let ex_mem = &cur.ex_mem;
    let mut write_data = ex_mem.alu_result;
    let mut taken = false;

    match ex_mem.instr.opcode() {
        Some(Opcode::Sw) => {
            if let Some(addr) = units.store_addr(ex_mem.alu_result) {
                commit.mem_write = Some((addr, ex_mem.read_reg_b));
            }
        }
        Some(Opcode::Lw) => write_data = units.load(ex_mem.alu_result),
        Some(Opcode::Beq) => {
            if ex_mem.eq {
                tracing::info!("branch taken to {}", ex_mem.branch_target);
                nex.f.pc = ex_mem.branch_target;
                nex.ex_mem.instr = Inst::NOOP;
                nex.id_ex.instr = Inst::NOOP;
                nex.if_id.instr = Inst::NOOP;
                taken = true;
            }
        }
        Some(Opcode::Add | Opcode::Nor | Opcode::Jalr | Opcode::Halt | Opcode::Noop) | None => {}
    }

    nex.mem_wb.instr = ex_mem.instr;
    nex.mem_wb.write_data = write_data;
    taken
}

/// Write the result of the instruction in MEM/WB back to the register file.
pub fn writeback(cur: &PipeRegs, nex: &mut PipeRegs, commit: &mut Commit) {
    let mem_wb = &cur.mem_wb;
    nex.wb_end.instr = mem_wb.instr;
    nex.wb_end.write_data = mem_wb.write_data;
    commit.reg_write = mem_wb.instr.dest().map(|dst| (dst, mem_wb.write_data));
}
