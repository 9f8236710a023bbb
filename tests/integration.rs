//! Testing methods on Pipit's public API
use pipit::*;
use std::{collections::hash_map::DefaultHasher, hash::Hash};

#[test]
fn chip8() {
    let ch8 = Chip8::default(); // Default
    let ch82 = ch8.clone(); // Clone
    assert_eq!(ch8, ch82); // PartialEq
    println!("{ch8:?}"); // Debug
}

#[test]
fn error() {
    let error = Error::StackUnderflow { pc: 0x2a4 };
    assert_eq!(
        "stack underflow: return at 2a4 with an empty stack",
        error.to_string()
    );
    let error = Error::InvalidAddressRange { range: 0xffe..0x1000 };
    println!("{error} {error:?}");
}

mod mem {
    use super::*;
    mod region {
        use super::*;
        #[test]
        fn copy() {
            let r1 = Charset;
            let r2 = r1;
            assert_eq!(r1, r2);
        }
        #[test]
        fn display() {
            assert_eq!("CharsetProgram", format!("{Charset}{Program}"));
        }
        #[test]
        fn ord() {
            assert!(Charset < Program);
        }
        #[test]
        fn hash() {
            let mut hasher = DefaultHasher::new();
            Program.hash(&mut hasher);
            println!("{hasher:?}");
        }
    }

    #[test]
    fn missing_region() {
        let mut mem = Mem::new();
        assert!(matches!(
            mem.load_region(Program, &[0]),
            Err(Error::MissingRegion { region: Program })
        ));
    }

    #[test]
    fn hexdump() {
        let mem = mem! {
            Charset [0x0000..0x0050] = &FONT,
            Program [0x0200..0x0210] = b"\x00\xe0",
        };
        let dump = mem.to_string();
        assert!(dump.starts_with("[Charset]\n000: f0 90 90 90 f0 20 60 20"));
        assert!(dump.contains("[Program]\n200: 00 e0 00"));
    }

    #[test]
    fn read_write() {
        let mut mem = Mem::new();
        mem.write_fallible(0x123usize, 0xbeefu16).unwrap();
        let word: u16 = mem.read_fallible(0x123usize).unwrap();
        let byte: u8 = mem.read_fallible(0x124usize).unwrap();
        assert_eq!((0xbeef, 0xef), (word, byte));
        FallibleAutoCast::<u16>::read_fallible(&mem, 0xfffusize)
            .expect_err("A word at 0xfff hangs off the end of memory");
    }
}

mod chip8 {
    use super::*;

    #[test]
    fn add_immediate_scenario() -> Result<()> {
        let mut ch8 = Chip8::new();
        ch8.load_rom(&[0x6a, 0x12, 0x7a, 0x05])?;
        assert_eq!(Tick::Ran(Insn::movb { B: 0x12, x: 0xa }), ch8.step()?);
        assert_eq!(Tick::Ran(Insn::addb { B: 0x05, x: 0xa }), ch8.step()?);
        assert_eq!(0x17, ch8.cpu.v()[0xa]);
        assert_eq!(0x204, ch8.cpu.pc());
        Ok(())
    }

    #[test]
    fn carry_scenario() -> Result<()> {
        let mut ch8 = Chip8::new();
        // mov #ff, v0; mov #01, v1; add v1, v0
        ch8.load_rom(&[0x60, 0xff, 0x61, 0x01, 0x80, 0x14])?;
        for _ in 0..3 {
            ch8.step()?;
        }
        assert_eq!((0x00, 0x01), (ch8.cpu.v()[0], ch8.cpu.v()[0xf]));
        Ok(())
    }

    #[test]
    fn draw_scenario() -> Result<()> {
        let mut ch8 = Chip8::new();
        // mov $000, I; draw #5, v0, v0; draw #5, v0, v0
        ch8.load_rom(&[0xa0, 0x00, 0xd0, 0x05, 0xd0, 0x05])?;
        ch8.step()?;
        ch8.step()?;
        assert_eq!(0, ch8.cpu.v()[0xf]);
        let frame = ch8.screen.frame().expect("drawing should publish a frame");
        assert_eq!(0xf0, frame[0]);
        assert_eq!(0x90, frame[8]);
        ch8.step()?;
        assert_eq!(1, ch8.cpu.v()[0xf]);
        assert!(ch8.screen.as_slice().iter().all(|&byte| byte == 0));
        Ok(())
    }

    #[test]
    fn unimplemented_does_not_advance() -> Result<()> {
        let mut ch8 = Chip8::new();
        ch8.load_rom(&[0x81, 0x2f])?;
        assert_eq!(Tick::Unimplemented { word: 0x812f }, ch8.step()?);
        assert_eq!(Tick::Unimplemented { word: 0x812f }, ch8.step()?);
        assert_eq!(0x200, ch8.cpu.pc());
        Ok(())
    }

    #[test]
    fn load_rom_resets() -> Result<()> {
        let mut ch8 = Chip8::new();
        ch8.load_rom(&[0x6a, 0x12, 0x00, 0xe0])?;
        ch8.step()?;
        ch8.load_rom(&[0x00, 0xe0])?;
        assert_eq!((0x200, 0), (ch8.cpu.pc(), ch8.cpu.v()[0xa]));
        assert_eq!(Some(&[0x00, 0xe0, 0x00, 0x00][..]), ch8.cpu.mem().grab(0x200..0x204));
        Ok(())
    }

    #[test]
    fn oversized_rom() {
        let mut ch8 = Chip8::new();
        assert!(matches!(
            ch8.load_rom(&vec![0; 0x1000]),
            Err(Error::RomTooLarge { size: 0x1000, max: 0xe00 })
        ));
    }

    #[test]
    fn oversized_rom_keeps_state() {
        let mut ch8 = Chip8::new();
        // vA = 0x12; I = 0; draw the glyph for v0
        ch8.load_rom(&[0x6a, 0x12, 0xa0, 0x00, 0xd0, 0x05]).unwrap();
        for _ in 0..3 {
            ch8.step().unwrap();
        }
        let before = ch8.clone();
        assert!(matches!(
            ch8.load_rom(&vec![0; 0xe01]),
            Err(Error::RomTooLarge { size: 0xe01, max: 0xe00 })
        ));
        assert_eq!(before, ch8);
        assert_eq!(0x12, ch8.cpu.v()[0xa]);
        assert_eq!(0x206, ch8.cpu.pc());
    }
}

mod disassembler {
    use super::*;

    #[test]
    fn listing() {
        let rom = [0x00, 0xe0, 0xa2, 0x2a, 0xf0, 0x0f, 0xd0, 0x15];
        assert_eq!(
            disassemble(&rom, true),
            [
                "#0x000 : cls (0x00E0)",
                "#0x002 : mov    $22a, I (0xA22A)",
                "#0x004 : inval (0xF00F)",
                "#0x006 : draw   #5, v0, v1 (0xD015)",
            ]
        );
        assert_eq!(disassemble(&rom[..3], false), ["cls (0x00E0)"]);
    }

    #[test]
    fn decoded_display() {
        assert_eq!("inval", Decoded::classify(0xf00f).to_string());
        assert_eq!("ret", Decoded::from(0x00ee).to_string());
        assert_eq!(Some(Insn::font { x: 3 }), Decoded::classify(0xf329).insn());
        assert_eq!("font", Decoded::classify(0xf329).mnemonic());
    }
}

#[test]
fn quirks_from_bool() {
    assert_eq!(
        Quirks {
            shift: true,
            dma_inc: true
        },
        Quirks::from(true)
    );
    assert_eq!(Quirks::default(), Quirks::from(false));
}
