//! This module contains utilities for verifying the correctness of the
//! pipeline.


use crate::{
    isa::{Inst, Opcode},
    PipeSim,
};

const MAX_CYCLES: u64 = 3_000_000;

pub(crate) fn add(a: usize, b: usize, dst: usize) -> Inst {
    Inst::encode(Opcode::Add, a, b, dst as i32)
}
pub(crate) fn nor(a: usize, b: usize, dst: usize) -> Inst {
    Inst::encode(Opcode::Nor, a, b, dst as i32)
}
pub(crate) fn lw(base: usize, dst: usize, offset: i32) -> Inst {
    Inst::encode(Opcode::Lw, base, dst, offset)
}
pub(crate) fn sw(base: usize, src: usize, offset: i32) -> Inst {
    Inst::encode(Opcode::Sw, base, src, offset)
}
pub(crate) fn beq(a: usize, b: usize, offset: i32) -> Inst {
    Inst::encode(Opcode::Beq, a, b, offset)
}
pub(crate) fn halt() -> Inst {
    Inst::encode(Opcode::Halt, 0, 0, 0)
}
pub(crate) fn noop() -> Inst {
    Inst::NOOP
}

/// Build a program image: the instructions, followed by data words.
pub(crate) fn image(insts: &[Inst], data: &[i32]) -> Vec<i32> {
    insts.iter().map(|i| i.word()).chain(data.iter().copied()).collect()
}

/// Run an image on the pipeline until it halts.
pub(crate) fn simulate(image: &[i32]) -> anyhow::Result<PipeSim> {
    let mut pipe = PipeSim::new(image, false);
    pipe.run(Some(MAX_CYCLES))?;
    Ok(pipe)
}
