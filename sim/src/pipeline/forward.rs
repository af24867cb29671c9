use super::PipeRegs;

/// Compute the up-to-date values of the two source registers of the
/// instruction in ID/EX.
///
/// The values read at decode time may be stale. Pending writes are held by
/// WB/END, MEM/WB and EX/MEM, from the oldest to the youngest. They are
/// applied in that order so the most recent write to a register wins.
pub fn forward_operands(regs: &PipeRegs) -> (i32, i32) {
    let src_a = regs.id_ex.instr.reg_a();
    let src_b = regs.id_ex.instr.reg_b();
    let mut val_a = regs.id_ex.read_reg_a;
    let mut val_b = regs.id_ex.read_reg_b;

    let writers = [
        ("WB/END", regs.wb_end.instr, regs.wb_end.write_data),
        ("MEM/WB", regs.mem_wb.instr, regs.mem_wb.write_data),
        ("EX/MEM", regs.ex_mem.instr, regs.ex_mem.alu_result),
    ];
    for (name, instr, value) in writers {
        let Some(dst) = instr.dest() else {
            continue;
        };
        if dst == src_a {
            tracing::trace!("forward reg[{}] = {} from {} to operand A", dst, value, name);
            val_a = value;
        }
        if dst == src_b {
            tracing::trace!("forward reg[{}] = {} from {} to operand B", dst, value, name);
            val_b = value;
        }
    }
    (val_a, val_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{Inst, Opcode};

    fn reader(a: usize, b: usize) -> PipeRegs {
        let mut regs = PipeRegs::default();
        regs.id_ex.instr = Inst::encode(Opcode::Add, a, b, 0);
        regs.id_ex.read_reg_a = -1;
        regs.id_ex.read_reg_b = -2;
        regs
    }

    #[test]
    fn test_no_writer() {
        let regs = reader(1, 2);
        assert_eq!(forward_operands(&regs), (-1, -2));
    }

    #[test]
    fn test_nearest_writer_wins() {
        let mut regs = reader(3, 3);
        regs.wb_end.instr = Inst::encode(Opcode::Add, 0, 0, 3);
        regs.wb_end.write_data = 10;
        regs.mem_wb.instr = Inst::encode(Opcode::Lw, 0, 3, 0);
        regs.mem_wb.write_data = 20;
        assert_eq!(forward_operands(&regs), (20, 20));

        regs.ex_mem.instr = Inst::encode(Opcode::Nor, 0, 0, 3);
        regs.ex_mem.alu_result = 30;
        assert_eq!(forward_operands(&regs), (30, 30));
    }

    #[test]
    fn test_each_operand() {
        let mut regs = reader(1, 2);
        regs.mem_wb.instr = Inst::encode(Opcode::Add, 5, 5, 2);
        regs.mem_wb.write_data = 7;
        regs.wb_end.instr = Inst::encode(Opcode::Lw, 0, 1, 0);
        regs.wb_end.write_data = 8;
        assert_eq!(forward_operands(&regs), (8, 7));
    }

    #[test]
    fn test_non_writers_ignored() {
        let mut regs = reader(0, 0);
        // fieldC of a store or a branch is an offset, not a register
        regs.ex_mem.instr = Inst::encode(Opcode::Sw, 0, 0, 0);
        regs.ex_mem.alu_result = 1;
        regs.mem_wb.instr = Inst::encode(Opcode::Beq, 0, 0, 0);
        regs.mem_wb.write_data = 2;
        regs.wb_end.instr = Inst::encode(Opcode::Halt, 0, 0, 0);
        regs.wb_end.write_data = 3;
        assert_eq!(forward_operands(&regs), (-1, -2));
    }

    #[test]
    fn test_load_in_ex_mem_forwards_address() {
        // EX/MEM only carries the ALU result, which is the address for a load
        let mut regs = reader(4, 0);
        regs.ex_mem.instr = Inst::encode(Opcode::Lw, 0, 4, 9);
        regs.ex_mem.alu_result = 9;
        assert_eq!(forward_operands(&regs), (9, -2));
    }
}
