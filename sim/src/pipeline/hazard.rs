use super::PipeRegs;
use crate::isa::{Inst, Opcode};

/// Detect a load-use hazard: the instruction in ID/EX is a load and the
/// instruction in IF/ID names its destination in fieldA or fieldB.
///
/// Only ID/EX is checked. Loads further down the pipeline are resolved by
/// forwarding.
pub fn load_use_hazard(cur: &PipeRegs) -> bool {
    let load = cur.id_ex.instr;
    let next = cur.if_id.instr;
    match load.opcode() {
        Some(Opcode::Lw) => {
            let dst = load.reg_b();
            next.reg_a() == dst || next.reg_b() == dst
        }
        Some(
            Opcode::Add
            | Opcode::Nor
            | Opcode::Sw
            | Opcode::Beq
            | Opcode::Jalr
            | Opcode::Halt
            | Opcode::Noop,
        )
        | None => false,
    }
}

/// Turn this cycle's advance into a stall: pc and IF/ID keep their values
/// and ID/EX receives a bubble.
pub fn stall(cur: &PipeRegs, nex: &mut PipeRegs) {
    nex.f.pc = cur.f.pc;
    nex.if_id = cur.if_id;
    nex.id_ex.instr = Inst::NOOP;
}
