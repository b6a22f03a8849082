use std::time::Duration;

use superchip::{
    frontend::{Frontend, Headless},
    memory::{PROGRAM_START, STACK_CAPACITY},
    registers::FLAG,
    Chip8Error, Config, Emulator,
};

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn fast_config(batch_size: usize) -> Config {
    Config {
        batch_size,
        batch_pause: Duration::ZERO,
        ..Config::default()
    }
}

#[test]
fn clear_load_add() {
    let mut emu = Emulator::with_seed(&rom(&[0x00E0, 0x6005, 0x7003]), 1).unwrap();
    let mut frontend = Headless::new();
    emu.run_batch(&mut frontend, 3).unwrap();

    assert_eq!(emu.regs.get(0), 8);
    assert!(emu.fb.pixels().iter().all(|p| !p));
    assert_eq!(emu.mem.pc.0, PROGRAM_START + 6);
    assert_eq!(frontend.presents, 1);
}

#[test]
fn bcd_of_234() {
    let mut emu = Emulator::with_seed(&rom(&[0xA400, 0x60EA, 0xF033]), 1).unwrap();
    emu.run_batch(&mut Headless::new(), 3).unwrap();
    assert_eq!(emu.mem.slice(0x400, 3).unwrap(), &[2, 3, 4]);
}

#[test]
fn draw_presents_snapshot() {
    // draw the "0" glyph at (2, 1), then spin
    let program = rom(&[0x6002, 0x6101, 0x6200, 0xF229, 0xD015, 0x120A]);
    let mut emu = Emulator::with_seed(&program, 1).unwrap();
    let mut frontend = Headless::new();
    emu.run_batch(&mut frontend, 8).unwrap();

    let frame = frontend.last_frame.expect("draw should present");
    assert_eq!((frame.width, frame.height), (64, 32));
    // top row of the glyph is 0xF0
    assert!((2..6).all(|x| frame.is_set(x, 1)));
    assert!(!frame.is_set(6, 1));
    assert_eq!(frontend.presents, 1);
    assert_eq!(emu.regs.get(FLAG), 0);
}

#[test]
fn wait_for_key_resumes_on_scripted_press() {
    let program = rom(&[0xF50A, 0x6101, 0x1204]);
    let mut emu = Emulator::with_seed(&program, 1).unwrap();
    let mut frontend = Headless::new();
    emu.run_batch(&mut frontend, 20).unwrap();
    assert_eq!(emu.mem.pc.0, PROGRAM_START);
    assert_eq!(emu.regs.get(1), 0);

    let mut keys = [false; 16];
    keys[0x6] = true;
    keys[0x9] = true;
    frontend.queue_keys(keys);
    emu.run_batch(&mut frontend, 2).unwrap();
    assert_eq!(emu.regs.get(5), 0x9);
    assert_eq!(emu.regs.get(1), 1);
}

#[test]
fn delay_timer_ages_once_per_batch() {
    // V0 = 5, DT = V0, spin
    let program = rom(&[0x6005, 0xF015, 0x1204]);
    let mut emu = Emulator::with_seed(&program, 1).unwrap();
    let mut frontend = Headless::with_sync_limit(3);
    emu.run(&mut frontend, &fast_config(10)).unwrap();

    assert!(!frontend.is_open());
    assert_eq!(frontend.syncs, 3);
    assert_eq!(emu.delay_timer.get(), 2);
}

#[test]
fn busy_wait_on_delay_timer_finishes() {
    // DT = 3; loop: V1 = DT; if V1 != 0 goto loop; V2 = 1; spin
    let program = rom(&[0x6003, 0xF015, 0xF107, 0x3100, 0x1204, 0x6201, 0x120C]);
    let mut emu = Emulator::with_seed(&program, 1).unwrap();
    let mut frontend = Headless::with_sync_limit(5);
    emu.run(&mut frontend, &fast_config(10)).unwrap();
    assert_eq!(emu.regs.get(2), 1);
}

#[test]
fn unknown_opcode_halts_run() {
    let program = rom(&[0x6001, 0xFFFF]);
    let mut emu = Emulator::with_seed(&program, 1).unwrap();
    let mut frontend = Headless::new();
    let err = emu.run(&mut frontend, &fast_config(10)).unwrap_err();
    assert!(matches!(err, Chip8Error::UnknownOpcode { opcode: 0xFFFF }));
    assert_eq!(emu.regs.get(0), 1);
}

#[test]
fn runaway_recursion_overflows_stack() {
    let program = rom(&[0x2200]);
    let mut emu = Emulator::with_seed(&program, 1).unwrap();
    let err = emu
        .run(&mut Headless::new(), &fast_config(10))
        .unwrap_err();
    assert!(matches!(err, Chip8Error::StackOverflow { address: 0x202 }));
    assert_eq!(emu.mem.stack.pointer() as usize, STACK_CAPACITY);
}

#[test]
fn running_off_the_end_of_memory_faults() {
    let program = rom(&[0x1FFE]);
    let mut emu = Emulator::with_seed(&program, 1).unwrap();
    emu.mem.write_slice(0xFFE, &[0x60, 0x01]).unwrap();
    let err = emu.run_batch(&mut Headless::new(), 3).unwrap_err();
    assert!(matches!(err, Chip8Error::AddressOutOfRange { address: 0x1000 }));
    assert_eq!(emu.regs.get(0), 1);
}

#[test]
fn oversized_program_is_rejected() {
    let program = vec![0u8; 4096];
    assert!(matches!(
        Emulator::new(&program),
        Err(Chip8Error::RomTooLarge { size: 4096, .. })
    ));
}

#[test]
fn seeded_random_is_reproducible() {
    let program = rom(&[0xC0FF, 0xC1FF, 0xC2FF]);
    let mut a = Emulator::with_seed(&program, 42).unwrap();
    let mut b = Emulator::with_seed(&program, 42).unwrap();
    a.run_batch(&mut Headless::new(), 3).unwrap();
    b.run_batch(&mut Headless::new(), 3).unwrap();
    for reg in 0..3 {
        assert_eq!(a.regs.get(reg), b.regs.get(reg));
    }
}
