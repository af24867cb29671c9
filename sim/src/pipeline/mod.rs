//! The five-stage pipeline: its registers, hardware units and the
//! combinational logic of every stage.

mod forward;
mod hardware;
mod hazard;
mod stages;

pub use forward::forward_operands;
pub use hardware::Units;
pub use hazard::{load_use_hazard, stall};
pub use stages::{decode, execute, fetch, memory, writeback, Commit};

use crate::isa::Inst;

crate::define_stages! {
    /// Fetch stage register, holds the address of the next instruction.
    Fstage f {
        pc: i32 = 0
    }
    /// IF/ID pipeline register.
    IfId if_id {
        instr: Inst = Inst::NOOP, pc_plus1: i32 = 0
    }
    /// ID/EX pipeline register. Register values are read from the register
    /// file at decode time and corrected by forwarding in execute.
    IdEx id_ex {
        instr: Inst = Inst::NOOP, pc_plus1: i32 = 0,
        read_reg_a: i32 = 0, read_reg_b: i32 = 0, offset: i32 = 0
    }
    /// EX/MEM pipeline register.
    ExMem ex_mem {
        instr: Inst = Inst::NOOP, branch_target: i32 = 0, eq: bool = false,
        alu_result: i32 = 0,
        /// Forwarded value of regB, the data of a store.
        read_reg_b: i32 = 0
    }
    /// MEM/WB pipeline register.
    MemWb mem_wb {
        instr: Inst = Inst::NOOP, write_data: i32 = 0
    }
    /// WB/END pipeline register. It only keeps the last written value visible
    /// to forwarding for one more cycle.
    WbEnd wb_end {
        instr: Inst = Inst::NOOP, write_data: i32 = 0
    }
}
