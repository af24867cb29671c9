// Load machine-code files and run them through the public API

use std::io::Write;

use lc2k_sim::{
    isa::{self, Inst, Opcode},
    Object, PipeSim, StateRecord,
};

fn write_obj(words: &[i32]) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    for word in words {
        writeln!(file, "{}", word)?;
    }
    file.flush()?;
    Ok(file)
}

fn run_file(words: &[i32]) -> anyhow::Result<PipeSim> {
    let file = write_obj(words)?;
    let obj = Object::load(file.path())?;
    assert_eq!(obj.words, words);
    let mut pipe = PipeSim::new(&obj.words, false);
    pipe.run(Some(10_000))?;
    Ok(pipe)
}

#[test]
fn test_load_and_run() -> anyhow::Result<()> {
    // lw 0 1 3; add 1 1 2; halt; .fill 21
    let pipe = run_file(&[8454147, 589826, 25165824, 21])?;
    assert_eq!(pipe.reg(1), Some(21));
    assert_eq!(pipe.reg(2), Some(42));
    assert_eq!(pipe.cycle_count(), 8);
    assert!(pipe.pipe_regs().wb_end.instr.is_halt());
    Ok(())
}

#[test]
fn test_final_state_record() -> anyhow::Result<()> {
    let halt = Inst::encode(Opcode::Halt, 0, 0, 0).word();
    let pipe = run_file(&[halt])?;
    let out = format!("{}", StateRecord::new(&pipe));
    assert!(out.starts_with("\n@@@\nstate before cycle 5 starts:\n\tpc = 5\n"), "{out}");
    assert!(out.contains("\t\tdataMem[ 0 ] = 25165824\n\tregisters:\n"));
    assert!(out.contains("\tWB/END pipeline register:\n\t\tinstruction = 25165824 ( halt )\n"));
    Ok(())
}

#[test]
fn test_agrees_with_reference() -> anyhow::Result<()> {
    // sum 1..=4 into r3 and store it
    let prog: Vec<i32> = [
        Inst::encode(Opcode::Lw, 0, 1, 9),
        Inst::encode(Opcode::Lw, 0, 2, 10),
        Inst::encode(Opcode::Add, 3, 1, 3),
        Inst::encode(Opcode::Add, 1, 2, 1),
        Inst::encode(Opcode::Beq, 1, 0, 1),
        Inst::encode(Opcode::Beq, 0, 0, -4),
        Inst::encode(Opcode::Sw, 0, 3, 11),
        Inst::encode(Opcode::Halt, 0, 0, 0),
        Inst::NOOP,
    ]
    .iter()
    .map(|i| i.word())
    .chain([4, -1, 0])
    .collect();

    let pipe = run_file(&prog)?;
    let answer = isa::simulate(&prog, 1000)?;
    assert_eq!(pipe.registers(), answer.regs);
    assert_eq!(pipe.data_mem(), answer.mem.as_slice());
    assert_eq!(pipe.data_mem()[11], 10);
    Ok(())
}

#[test]
fn test_bad_input() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "25165824\nhello")?;
    file.flush()?;
    let err = Object::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("address 1"), "{err:#}");

    assert!(Object::load("/nonexistent/prog.mc").is_err());
    Ok(())
}
