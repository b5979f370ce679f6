//! Runs small hand-assembled programs through Pipit's public API
use pipit::*;

fn chip8(program: &[u8]) -> Chip8 {
    Chip8 {
        cpu: CPU::new(program, vec![], Flags::default()).expect("program should fit"),
        io: Headless::seeded(0x5eed),
    }
}

/// Counts v0 up to 10 in a loop, then parks
#[test]
fn counting_loop() -> Result<()> {
    let mut ch8 = chip8(&[
        0x60, 0x00, // 200: mov  #00, v0
        0x70, 0x01, // 202: add  #01, v0
        0x30, 0x0a, // 204: se   #0a, v0
        0x12, 0x02, // 206: jmp  $202
        0x12, 0x08, // 208: jmp  $208
    ]);
    ch8.frame(100)?;
    assert_eq!(10, ch8.cpu.v()[0]);
    assert_eq!(0x208, ch8.cpu.pc());
    Ok(())
}

/// Converts a number to decimal, and draws its digits
#[test]
fn draw_decimal() -> Result<()> {
    let mut ch8 = chip8(&[
        0x60, 0x7b, // 200: mov  #7b, v0      ; 123
        0xa3, 0x00, // 202: mov  $300, I
        0xf0, 0x33, // 204: bcd  v0, &I
        0xf2, 0x65, // 206: dmai v2, &I       ; v0..=v2 = 1, 2, 3
        0x63, 0x00, // 208: mov  #00, v3      ; x
        0x64, 0x00, // 20a: mov  #00, v4      ; y
        0xf0, 0x29, // 20c: font v0, I
        0xd3, 0x45, // 20e: draw #5, v3, v4
        0x73, 0x05, // 210: add  #05, v3
        0xf1, 0x29, // 212: font v1, I
        0xd3, 0x45, // 214: draw #5, v3, v4
        0x73, 0x05, // 216: add  #05, v3
        0xf2, 0x29, // 218: font v2, I
        0xd3, 0x45, // 21a: draw #5, v3, v4
        0x12, 0x1c, // 21c: jmp  $21c
    ]);
    ch8.frame(20)?;
    assert_eq!(Some(&[1, 2, 3][..]), ch8.cpu.mem().get(0x300..0x303));
    // no digit overlaps another
    assert_eq!(0, ch8.cpu.v()[0xf]);
    // the top rows of `1`, `2` and `3`: 0x20, 0xF0, 0xF0, at x = 0, 5, 10
    let top: Vec<bool> = (0..15).map(|x| ch8.io.screen.get(x, 0)).collect();
    #[rustfmt::skip]
    let expected = [
        false, false, true,  false, false,
        true,  true,  true,  true,  false,
        true,  true,  true,  true,  false,
    ];
    assert_eq!(expected.as_slice(), top.as_slice());
    assert_eq!(1, ch8.io.frames());
    Ok(())
}

/// Subtraction reports borrow in vF, and the flag is unconditionally overwritten
#[test]
fn borrow_flags() -> Result<()> {
    let mut ch8 = chip8(&[
        0x60, 0x05, // 200: mov  #05, v0
        0x61, 0x05, // 202: mov  #05, v1
        0x80, 0x15, // 204: sub  v1, v0      ; 5 - 5: no borrow
        0x82, 0xf0, // 206: mov  vf, v2
        0x80, 0x15, // 208: sub  v1, v0      ; 0 - 5: borrow
        0x83, 0xf0, // 20a: mov  vf, v3
        0x12, 0x0c, // 20c: jmp  $20c
    ]);
    ch8.frame(7)?;
    assert_eq!(&[0xfbu8, 0x05, 0x01, 0x00], &ch8.cpu.v()[..4]);
    assert_eq!(0, ch8.cpu.v()[0xf]);
    Ok(())
}

/// The program halts at Fx0A until a key is held
#[test]
fn wait_for_key() -> Result<()> {
    let mut ch8 = chip8(&[
        0xf5, 0x0a, // 200: waitk v5
        0x12, 0x02, // 202: jmp   $202
    ]);
    ch8.frame(16)?;
    assert!(ch8.cpu.flags.keypause);
    assert_eq!(0x200, ch8.cpu.pc());
    ch8.io.keypad.press(0xb)?;
    ch8.frame(16)?;
    assert!(!ch8.cpu.flags.keypause);
    assert_eq!(0xb, ch8.cpu.v()[5]);
    assert_eq!(0x202, ch8.cpu.pc());
    Ok(())
}

/// Timers run down once per frame, and the buzzer sounds while ST > 0
#[test]
fn timers() -> Result<()> {
    let mut ch8 = chip8(&[
        0x60, 0x03, // 200: mov  #03, v0
        0xf0, 0x15, // 202: mov  v0, DT
        0xf0, 0x18, // 204: mov  v0, ST
        0x12, 0x06, // 206: jmp  $206
    ]);
    ch8.frame(3)?;
    assert_eq!((2, 2), (ch8.cpu.delay(), ch8.cpu.sound()));
    assert!(ch8.cpu.is_beeping());
    for _ in 0..5 {
        ch8.frame(3)?;
    }
    assert_eq!((0, 0), (ch8.cpu.delay(), ch8.cpu.sound()));
    assert!(!ch8.cpu.is_beeping());
    Ok(())
}

/// A runaway program gets stopped with an error instead of a panic
#[test]
fn runaway_recursion() {
    let mut ch8 = chip8(&[
        0x22, 0x00, // 200: call $200
    ]);
    match ch8.frame(100) {
        Err(Error::StackOverflow { addr: 0x200 }) => {}
        other => panic!("expected stack overflow, got {other:?}"),
    }
    assert_eq!(16, ch8.cpu.sp());
    assert_eq!(17, ch8.cpu.cycle());
}

/// Random numbers come from the peripheral, so seeded runs repeat
#[test]
fn seeded_random() -> Result<()> {
    let program = [
        0xc0, 0xff, // 200: rand #ff, v0
        0xc1, 0x0f, // 202: rand #0f, v1
        0x12, 0x04, // 204: jmp  $204
    ];
    let (mut a, mut b) = (chip8(&program), chip8(&program));
    a.frame(2)?;
    b.frame(2)?;
    assert_eq!(a.cpu.v(), b.cpu.v());
    assert_eq!(0, a.cpu.v()[1] & 0xf0);
    Ok(())
}

/// Cosmac VIP quirks change the results of the same program
#[test]
fn cosmac_quirks() -> Result<()> {
    let program = [
        0x60, 0x01, // 200: mov  #01, v0
        0x61, 0x80, // 202: mov  #80, v1
        0x80, 0x16, // 204: shr  v1, v0
        0xa3, 0x00, // 206: mov  $300, I
        0xf1, 0x55, // 208: dmao v1, &I
        0x12, 0x0a, // 20a: jmp  $20a
    ];
    let mut modern = chip8(&program);
    let mut cosmac = chip8(&program);
    cosmac.cpu.set_mode(Mode::Cosmac);
    modern.frame(6)?;
    cosmac.frame(6)?;
    // shift v0, or shift v1 into v0
    assert_eq!(0x00, modern.cpu.v()[0]);
    assert_eq!(0x40, cosmac.cpu.v()[0]);
    assert_eq!(0x01, modern.cpu.v()[0xf]);
    assert_eq!(0x00, cosmac.cpu.v()[0xf]);
    // I stays put, or moves past the transfer
    assert_eq!(0x300, modern.cpu.i());
    assert_eq!(0x302, cosmac.cpu.i());
    Ok(())
}

/// Programs can be loaded from disk
#[test]
fn load_program_from_file() -> Result<()> {
    let path = std::env::temp_dir().join(format!("pipit-{}.ch8", std::process::id()));
    std::fs::write(&path, [0x12, 0x00])?;
    let mut cpu = CPU::default();
    let result = cpu.load_program(&path).map(|cpu| cpu.mem().read_word(0x200u16));
    std::fs::remove_file(&path)?;
    assert_eq!(0x1200, result?);
    Ok(())
}

#[test]
fn load_missing_program() {
    let mut cpu = CPU::default();
    assert!(matches!(
        cpu.load_program("this/path/does/not/exist.ch8"),
        Err(Error::IoError(_))
    ));
}

#[test]
fn program_too_large() {
    assert!(matches!(
        CPU::new(&[0; 0xe01], vec![], Flags::default()),
        Err(Error::ProgramTooLarge { len: 0xe01, max: 0xe00 })
    ));
}

/// Disassembly of a program, the way the debugger prints it
#[test]
fn disassemble() {
    let dis = Dis::plain();
    let listing: Vec<String> = [0x00e0, 0x6a02, 0x8ab4, 0xd125, 0xf00a, 0x0000]
        .into_iter()
        .map(|word| dis.once(word))
        .collect();
    assert_eq!(listing[0], "cls    ");
    assert!(listing[1].starts_with("mov"));
    assert!(listing[5].starts_with("inval"));
}
