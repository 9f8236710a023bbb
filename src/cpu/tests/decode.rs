// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Runs single words on a fresh CPU, one opcode family at a time.
use super::*;

/// Every register starts out holding its own index
const REGS: [u8; 16] = [
    0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xe, 0xf,
];

/// Executes `word` at 0x200, with v = [REGS] and I = 0
fn exec(word: u16) -> Result<CPU> {
    let (mut cpu, mut screen) = (CPU::default(), Screen::default());
    cpu.mem.load_region(Program, &word.to_be_bytes())?;
    cpu.v = REGS;
    cpu.multistep(&mut screen, 1)?;
    Ok(cpu)
}

/// Executes a word which must run
fn run(word: u16) -> CPU {
    exec(word).unwrap_or_else(|e| panic!("{word:04x}: {e}"))
}

fn assert_unimplemented(words: impl IntoIterator<Item = u16>) {
    for word in words {
        assert!(
            matches!(exec(word), Err(Error::UnimplementedInstruction { word: w }) if w == word),
            "{word:04x} should not decode"
        );
    }
}

#[test]
fn sys() {
    run(0x00e0);
    assert!(matches!(
        exec(0x00ee),
        Err(Error::StackUnderflow { pc: 0x200 })
    ));
    // machine code calls aren't emulated
    assert_unimplemented([0x0000, 0x0420, 0x0fff, 0x00e1, 0x00ef]);
}

#[rustfmt::skip]
#[test]
fn control_flow() {
    // (word, pc afterwards)
    for (word, pc) in [
        (0x1230, 0x230), (0x1231, 0x231), // jmp
        (0x2230, 0x230), (0x2231, 0x231), // call
        (0x3000, 0x204), (0x3001, 0x202), // v0 == nn
        (0x4001, 0x204), (0x4000, 0x202), // v0 != nn
        (0x5000, 0x204), (0x5010, 0x202), // v0 == vy
        (0x9010, 0x204), (0x9000, 0x202), // v0 != vy
        (0xb230, 0x230), (0xb231, 0x231), // jmp + v0
        (0xe09e, 0x202), (0xe0a1, 0x204), // no key is ever held
    ] {
        assert_eq!(pc, run(word).pc, "{word:04x}");
    }
    assert_eq!([0x202], run(0x2230).stack());
    assert_unimplemented((0x1..0x10).flat_map(|n| [0x5ff0 | n, 0x9ff0 | n]));
    assert_unimplemented([0xefff, 0xe09f, 0xe0a0]);
}

#[rustfmt::skip]
#[test]
fn registers() {
    // (word, register, value afterwards)
    for (word, x, value) in [
        (0x6100, 0x1, 0x00), (0x62c5, 0x2, 0xc5), (0x63ff, 0x3, 0xff),
        (0x7100, 0x1, 0x01), (0x72c5, 0x2, 0xc7), (0x73ff, 0x3, 0x02),
        (0x8120, 0x1, 0x02), (0x8121, 0x1, 0x03), (0x8122, 0x1, 0x00), (0x8123, 0x1, 0x03),
        (0x8124, 0x1, 0x03), (0x8125, 0x1, 0xff), (0x8127, 0x1, 0x01),
        (0x8326, 0x3, 0x01), (0x8326, 0x2, 0x01), // shr writes vX and vY
        (0x832e, 0x3, 0x06), (0x832e, 0x2, 0x06), // shl writes vX and vY
        (0xf707, 0x7, 0x00),
    ] {
        assert_eq!(value, run(word).v[x], "{word:04x}: v{x:x}");
    }
    // 7xnn leaves the flag alone
    assert_eq!(0x0f, run(0x73ff).v[0xf]);
    assert_unimplemented((0x8..0xe).chain([0xf]).map(|n| 0x8120 | n));
}

#[rustfmt::skip]
#[test]
fn index() {
    // (word, I afterwards)
    for (word, i) in [
        (0xa230, 0x230), (0xa231, 0x231),
        (0xf31e, 0x003),
        (0xff29, 0x04b), // glyph 'f'
        (0xff55, 0x010), (0xff65, 0x010),
    ] {
        assert_eq!(i, run(word).i, "{word:04x}");
    }
}

#[test]
fn random() {
    for _ in 0..16 {
        assert!(run(0xc001).v[0] <= 1);
    }
}

#[test]
fn draw() {
    // onto a blank screen
    assert_eq!(0, run(0xd00f).v[0xf]);
}

#[test]
fn timers_and_keys() {
    assert_eq!(0xf, run(0xff15).delay());
    assert_eq!(0xf, run(0xff18).sound());
    let cpu = run(0xf00a);
    assert!(cpu.flags.keypause);
    assert_eq!(0x200, cpu.pc);
}

#[test]
fn memory() {
    assert_eq!(Some(&[0, 1, 5][..]), run(0xff33).mem.grab(0..3));
    assert_eq!(Some(&REGS[..]), run(0xff55).mem.grab(0..16));
    assert_eq!(&FONT[..16], run(0xff65).v());
    assert_unimplemented([0xffff, 0xf000, 0xf0ff, 0xf030]);
}
