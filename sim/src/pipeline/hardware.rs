//! Storage devices of the machine: instruction memory, data memory and the
//! register file.
//!
//! Stages only read from the units. Writes are collected in a
//! [`super::Commit`] and applied when the cycle ends.

use crate::{
    framework::MEM_SIZE,
    isa::{Inst, RegFile, NUM_REGS},
};

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Units {
    /// Read-only after loading.
    pub(crate) imem: Vec<i32>,
    pub(crate) dmem: Vec<i32>,
    pub(crate) reg_file: RegFile,
}

fn check_addr(addr: i32) -> Option<usize> {
    usize::try_from(addr).ok().filter(|&a| a < MEM_SIZE)
}

impl Units {
    /// Init CPU hardware with the given program image. The image is loaded
    /// into instruction memory and also serves as the initial data memory.
    ///
    /// The image must not be longer than [`MEM_SIZE`].
    pub fn init(image: &[i32]) -> Self {
        let mut imem = vec![0; MEM_SIZE];
        let len = image.len().min(MEM_SIZE);
        imem[..len].copy_from_slice(&image[..len]);
        Self {
            dmem: imem.clone(),
            imem,
            reg_file: [0; NUM_REGS],
        }
    }

    /// Read the instruction at `pc`. Addresses outside the memory read as a
    /// no-op.
    pub fn fetch(&self, pc: i32) -> Inst {
        match check_addr(pc) {
            Some(pc) => Inst(self.imem[pc]),
            None => {
                tracing::warn!("fetch from invalid address {}", pc);
                Inst::NOOP
            }
        }
    }

    /// Read data memory. Addresses outside the memory read as 0.
    pub fn load(&self, addr: i32) -> i32 {
        match check_addr(addr) {
            Some(a) => self.dmem[a],
            None => {
                tracing::warn!("load from invalid address {}", addr);
                0
            }
        }
    }

    /// Resolve the address of a store, `None` if it is outside the memory.
    pub fn store_addr(&self, addr: i32) -> Option<usize> {
        let r = check_addr(addr);
        if r.is_none() {
            tracing::warn!("store to invalid address {} is dropped", addr);
        }
        r
    }

    pub fn reg(&self, index: usize) -> i32 {
        self.reg_file[index]
    }

    pub fn registers(&self) -> RegFile {
        self.reg_file
    }

    pub fn data_mem(&self) -> &[i32] {
        &self.dmem
    }

    pub(crate) fn write_reg(&mut self, index: usize, value: i32) {
        tracing::info!("write back: reg[{}] = {}", index, value);
        self.reg_file[index] = value;
    }

    pub(crate) fn write_mem(&mut self, addr: usize, value: i32) {
        tracing::info!("write memory: addr = {}, data = {}", addr, value);
        self.dmem[addr] = value;
    }
}
