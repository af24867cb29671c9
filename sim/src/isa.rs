//! Instruction set definition of the 8-register word-addressed machine.
//!
//! An instruction is a 32-bit word with four fields:
//!
//! ```text
//!  31        22 21  19 18  16 15              0
//! +------------+------+------+-----------------+
//! |   opcode   | regA | regB |     fieldC      |
//! +------------+------+------+-----------------+
//! ```

use crate::framework::MEM_SIZE;

/// Number of general purpose registers.
pub const NUM_REGS: usize = 8;

/// We use a 32-bit integer array of length 8 to represent the register file.
pub type RegFile = [i32; NUM_REGS];

/// Operation codes, the discriminant is the value stored in bits \[31:22\].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Opcode {
    Add = 0,
    Nor = 1,
    Lw = 2,
    Sw = 3,
    Beq = 4,
    /// Decoded but never executed by the pipeline.
    Jalr = 5,
    Halt = 6,
    Noop = 7,
}

impl Opcode {
    pub const ALL: [Opcode; 8] = [
        Opcode::Add,
        Opcode::Nor,
        Opcode::Lw,
        Opcode::Sw,
        Opcode::Beq,
        Opcode::Jalr,
        Opcode::Halt,
        Opcode::Noop,
    ];

    /// Opcode of a raw code, `None` if the code is not part of the ISA.
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Nor => "nor",
            Opcode::Lw => "lw",
            Opcode::Sw => "sw",
            Opcode::Beq => "beq",
            Opcode::Jalr => "jalr",
            Opcode::Halt => "halt",
            Opcode::Noop => "noop",
        }
    }
}

/// Convert the lower 16 bits of `num` into a signed value.
pub fn sign_extend(num: i32) -> i32 {
    let num = num & 0xFFFF;
    if num & (1 << 15) != 0 {
        num - (1 << 16)
    } else {
        num
    }
}

/// A single instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Inst(pub i32);

impl Default for Inst {
    fn default() -> Self {
        Self::NOOP
    }
}

impl From<i32> for Inst {
    fn from(word: i32) -> Self {
        Self(word)
    }
}

impl Inst {
    /// The canonical no-op, used as the bubble of every pipeline latch.
    pub const NOOP: Inst = Inst((Opcode::Noop as i32) << 22);

    /// Build an instruction word. Register indices keep their lower 3 bits
    /// and `c` keeps its lower 16 bits.
    pub fn encode(op: Opcode, a: usize, b: usize, c: i32) -> Self {
        let a = (a & 0x7) as i32;
        let b = (b & 0x7) as i32;
        Self(((op as i32) << 22) | (a << 19) | (b << 16) | (c & 0xFFFF))
    }

    pub fn word(self) -> i32 {
        self.0
    }

    /// The raw opcode field (arithmetic shift, may be negative).
    pub fn code(self) -> i32 {
        self.0 >> 22
    }

    pub fn opcode(self) -> Option<Opcode> {
        Opcode::from_code(self.code())
    }

    pub fn reg_a(self) -> usize {
        ((self.0 >> 19) & 0x7) as usize
    }

    pub fn reg_b(self) -> usize {
        ((self.0 >> 16) & 0x7) as usize
    }

    /// The unsigned 16-bit fieldC.
    pub fn field_c(self) -> i32 {
        self.0 & 0xFFFF
    }

    /// fieldC sign-extended.
    pub fn offset(self) -> i32 {
        sign_extend(self.field_c())
    }

    /// The register this instruction writes back to, if any.
    pub fn dest(self) -> Option<usize> {
        match self.opcode() {
            Some(Opcode::Add | Opcode::Nor) => Some((self.field_c() & 0x7) as usize),
            Some(Opcode::Lw) => Some(self.reg_b()),
            Some(Opcode::Sw | Opcode::Beq | Opcode::Jalr | Opcode::Halt | Opcode::Noop) | None => {
                None
            }
        }
    }

    pub fn is_halt(self) -> bool {
        self.opcode() == Some(Opcode::Halt)
    }
}

impl std::fmt::Display for Inst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.opcode() {
            Some(op @ (Opcode::Add | Opcode::Nor | Opcode::Lw | Opcode::Sw | Opcode::Beq)) => {
                write!(
                    f,
                    "{} {} {} {}",
                    op.name(),
                    self.reg_a(),
                    self.reg_b(),
                    self.offset()
                )
            }
            Some(op @ Opcode::Jalr) => write!(f, "{} {} {}", op.name(), self.reg_a(), self.reg_b()),
            Some(op @ (Opcode::Halt | Opcode::Noop)) => f.write_str(op.name()),
            None => write!(f, ".fill {}", self.0),
        }
    }
}

/// Compute the result of the execute stage. Arithmetic wraps.
///
/// - `add`: `a + b`
/// - `nor`: `!(a | b)`
/// - `lw`, `sw`: effective address `a + offset`
/// - `beq`: branch target `offset + pc_plus1`
///
/// Other instructions produce 0, which is never consumed.
pub fn alu(op: Option<Opcode>, a: i32, b: i32, offset: i32, pc_plus1: i32) -> i32 {
    match op {
        Some(Opcode::Add) => a.wrapping_add(b),
        Some(Opcode::Nor) => !(a | b),
        Some(Opcode::Lw | Opcode::Sw) => a.wrapping_add(offset),
        Some(Opcode::Beq) => offset.wrapping_add(pc_plus1),
        Some(Opcode::Jalr | Opcode::Halt | Opcode::Noop) | None => 0,
    }
}

/// Simulation result of a program on the standard ISA.
#[derive(Debug, Clone)]
pub struct StandardResult {
    pub mem: Vec<i32>,
    pub regs: RegFile,
    pub pc: usize,
    pub n_insts: u64,
}

/// Execute a program image by the ISA semantics, one instruction
/// at a time. This function is used to verify the correctness of the
/// pipeline.
///
/// Like the pipeline, the image is mapped both as instruction memory and as
/// the initial data memory, and stores never modify the instructions.
pub fn simulate(image: &[i32], max_insts: u64) -> anyhow::Result<StandardResult> {
    if image.len() > MEM_SIZE {
        anyhow::bail!("program of {} words exceeds memory", image.len());
    }
    let mut imem = vec![0; MEM_SIZE];
    imem[..image.len()].copy_from_slice(image);
    let mut mem = imem.clone();

    fn ensure_addr(addr: i32) -> anyhow::Result<usize> {
        match usize::try_from(addr) {
            Ok(a) if a < MEM_SIZE => Ok(a),
            _ => anyhow::bail!("invalid memory address: {}", addr),
        }
    }

    let mut regs: RegFile = [0; NUM_REGS];
    let mut pc = 0;
    let mut n_insts = 0;

    loop {
        if n_insts >= max_insts {
            anyhow::bail!("exceed maximum instruction limit: {}", max_insts);
        }
        n_insts += 1;
        let inst = Inst(imem[pc]);
        let (a, b) = (regs[inst.reg_a()], regs[inst.reg_b()]);
        let pc_plus1 = pc as i32 + 1;
        let mut next_pc = pc_plus1;

        match inst.opcode() {
            Some(op @ (Opcode::Add | Opcode::Nor)) => {
                regs[(inst.field_c() & 0x7) as usize] = alu(Some(op), a, b, 0, pc_plus1);
            }
            Some(Opcode::Lw) => {
                let addr = ensure_addr(alu(inst.opcode(), a, b, inst.offset(), pc_plus1))?;
                regs[inst.reg_b()] = mem[addr];
            }
            Some(Opcode::Sw) => {
                let addr = ensure_addr(alu(inst.opcode(), a, b, inst.offset(), pc_plus1))?;
                mem[addr] = b;
            }
            Some(Opcode::Beq) => {
                if a == b {
                    next_pc = alu(inst.opcode(), a, b, inst.offset(), pc_plus1);
                }
            }
            Some(Opcode::Noop) => {}
            Some(Opcode::Halt) => break,
            Some(Opcode::Jalr) => anyhow::bail!("jalr at {} is not supported", pc),
            None => anyhow::bail!("unknown opcode {} at {}", inst.code(), pc),
        }

        pc = ensure_addr(next_pc).map_err(|_| anyhow::anyhow!("invalid pc: {}", next_pc))?;
    }

    Ok(StandardResult {
        mem,
        regs,
        pc,
        n_insts,
    })
}
