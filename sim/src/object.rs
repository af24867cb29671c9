//! Program images in machine-code text form: one decimal instruction word
//! per line.

use std::{fmt::Display, path::Path};

use anyhow::Context;

use crate::{framework::MEM_SIZE, isa::Inst};

/// A program loaded from machine code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    pub words: Vec<i32>,
}

/// Parse the leading decimal integer of a line, like `scanf("%d")`:
/// whitespace is skipped, a sign is optional, trailing text is ignored.
fn parse_word(line: &str) -> Option<i32> {
    let s = line.trim_start();
    let digits_start = usize::from(s.starts_with(['+', '-']));
    let len = s[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if len == 0 {
        return None;
    }
    s[..digits_start + len].parse().ok()
}

impl Object {
    /// Parse machine code. Every line must start with an integer.
    pub fn parse(src: &str) -> anyhow::Result<Self> {
        let mut words = Vec::new();
        for (addr, line) in src.lines().enumerate() {
            if addr >= MEM_SIZE {
                anyhow::bail!("program exceeds memory of {} words", MEM_SIZE);
            }
            let word = parse_word(line)
                .with_context(|| format!("error in reading address {}: `{}`", addr, line))?;
            words.push(word);
        }
        Ok(Self { words })
    }

    /// Read and parse a machine-code file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read file `{}`", path.display()))?;
        Self::parse(&content)
    }
}

/// Listing of the instruction memory.
impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "instruction memory:")?;
        for (i, word) in self.words.iter().enumerate() {
            writeln!(f, "\tinstrMem[ {} ] = {}", i, Inst::from(*word))?;
        }
        Ok(())
    }
}
