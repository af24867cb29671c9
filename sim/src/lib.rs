//! Cycle-by-cycle simulator of a 5-stage pipeline (fetch, decode, execute,
//! memory, writeback) for an 8-register, word-addressed RISC machine, with
//! load-use stalls, operand forwarding and branch squashing.

mod dsl;
pub mod framework;
pub mod isa;
mod object;
pub mod pipeline;
mod record;
mod utils;

#[cfg(test)]
mod test;

pub use framework::{PipeSim, Stats, MEM_SIZE};
pub use object::Object;
pub use record::StateRecord;
pub use utils::{mem_changes, mem_diff};

#[cfg(test)]
mod tests {
    use crate::{
        isa::{Inst, Opcode},
        PipeSim,
    };

    #[test]
    fn test_halt_only() {
        let image = [Inst::encode(Opcode::Halt, 0, 0, 0).word()];
        let mut pipe = PipeSim::new(&image, false);
        let cycles = pipe.run(Some(100)).unwrap();
        assert_eq!(cycles, 5);
        assert_eq!(pipe.registers(), [0; 8]);
        assert_eq!(&pipe.data_mem()[..1], &image);
        assert!(pipe.data_mem()[1..].iter().all(|&w| w == 0));
    }

    #[test]
    fn test_step_until_halt() {
        let image = [
            Inst::encode(Opcode::Noop, 0, 0, 0).word(),
            Inst::encode(Opcode::Halt, 0, 0, 0).word(),
        ];
        let mut pipe = PipeSim::new(&image, false);
        while !pipe.is_terminate() {
            pipe.step();
        }
        assert_eq!(pipe.cycle_count(), 6);
        assert!(pipe.pipe_regs().wb_end.instr.is_halt());
    }
}
