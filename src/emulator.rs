use std::{path::Path, thread};

use crate::{
    config::Config,
    decode::{Instruction, OpCodes},
    display::{FrameBuffer, Resolution},
    error::Chip8Error,
    frontend::Frontend,
    keyboard::Keyboard,
    memory::{Memory, FONT_START, MEMORY_SIZE},
    registers::Registers,
    timer::Timer,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuState {
    #[default]
    Running,
    // PC parked on the FX0A that is waiting; X is the target register
    WaitingForKey(u8),
}

/// Side effects the dispatcher asks the driver to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Present,
}

pub struct Emulator {
    pub fb: FrameBuffer,
    pub regs: Registers,
    pub mem: Memory,
    pub keyboard: Keyboard,
    pub delay_timer: Timer,
    // tracked only, never sonified
    pub sound_timer: Timer,
    pub state: CpuState,
    rng: StdRng,
}

impl Emulator {
    pub fn new(rom: &[u8]) -> Result<Self, Chip8Error> {
        Self::with_rng(rom, StdRng::from_entropy())
    }

    pub fn with_seed(rom: &[u8], seed: u64) -> Result<Self, Chip8Error> {
        Self::with_rng(rom, StdRng::seed_from_u64(seed))
    }

    pub fn from_file(path: &Path, seed: Option<u64>) -> Result<Self, Chip8Error> {
        let program = std::fs::read(path)?;
        match seed {
            Some(seed) => Self::with_seed(&program, seed),
            None => Self::new(&program),
        }
    }

    fn with_rng(rom: &[u8], rng: StdRng) -> Result<Self, Chip8Error> {
        let mut mem = Memory::new();
        mem.load_rom(rom)?;

        Ok(Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem,
            keyboard: Keyboard::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            state: CpuState::Running,
            rng,
        })
    }

    /// Reads the instruction at PC and advances PC past it.
    pub fn fetch_decode(&mut self) -> Result<OpCodes, Chip8Error> {
        let (high, low) = self.mem.next_instruction()?;
        Ok(OpCodes::decode_raw(&Instruction::from_bytes(high, low)))
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<Option<Request>, Chip8Error> {
        match ins {
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
                return Ok(Some(Request::Present));
            }
            OpCodes::PopSubroutine => {
                let addr = self.mem.stack.pop()?;
                self.mem.set_pc(addr);
            }
            OpCodes::LowRes => self.switch_resolution(Resolution::Low),
            OpCodes::HighRes => self.switch_resolution(Resolution::High),
            OpCodes::ScrollDown(rows) => self.fb.scroll_down(rows as usize),
            OpCodes::ScrollRight => self.fb.scroll_right(),
            OpCodes::ScrollLeft => self.fb.scroll_left(),
            OpCodes::Jump(addr) => {
                self.mem.set_pc(addr);
            }
            OpCodes::PushSubroutine(addr) => {
                // PC already points past the call
                self.mem.stack.push(self.mem.pc.0)?;
                self.mem.set_pc(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            // For the ALU ops below VF is written before VX, so with X = F
            // the result is what survives.
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            OpCodes::Add(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                let (z, carry) = x.overflowing_add(y);
                self.regs.set_flag(carry as u8);
                self.regs.set_register(vx, z);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag((x > y) as u8);
                self.regs.set_register(vx, x.wrapping_sub(y));
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag((y > x) as u8);
                self.regs.set_register(vx, y.wrapping_sub(x));
            }
            OpCodes::RightShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_flag(vx_value & 1);
                self.regs.set_register(vx, vx_value >> 1);
            }
            OpCodes::LeftShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_flag((vx_value >> 7) & 1);
                self.regs.set_register(vx, vx_value << 1);
            }
            OpCodes::SetIndexRegister(addr) => self.mem.set_index(addr),
            OpCodes::JumpWithOffset(addr) => {
                self.mem.set_pc(addr + self.regs.get(0) as u16);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                self.draw(reg_x, reg_y, height)?;
                return Ok(Some(Request::Present));
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keyboard.get_key_status_from_num(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keyboard.get_key_status_from_num(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.delay_timer.get() as u8)
            }
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx) as u16),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx) as u16),
            OpCodes::AddToIndex(vx) => {
                let sum = self.mem.index.0 as usize + self.regs.get(vx) as usize;
                self.mem.set_index((sum % MEMORY_SIZE) as u16);
                if sum >= MEMORY_SIZE {
                    self.regs.set_flag(1);
                }
            }
            OpCodes::GetKey(vx) => match self.keyboard.highest_pressed() {
                Some(key) => self.regs.set_register(vx, key),
                None => {
                    // park PC on this instruction until a key shows up
                    self.mem.decrement_pc();
                    self.state = CpuState::WaitingForKey(vx);
                    log::debug!("waiting for key into V{vx:X}");
                }
            },
            OpCodes::PointChar(vx) => {
                let glyph = self.regs.get(vx) as u16;
                self.mem.set_index(FONT_START + 5 * glyph);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                self.mem.write_slice(self.mem.index.0 as usize, &digits)?;
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let values: Vec<u8> = (0..=vx).map(|reg| self.regs.get(reg)).collect();
                self.mem.write_slice(self.mem.index.0 as usize, &values)?;
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let values = self
                    .mem
                    .slice(self.mem.index.0 as usize, vx as usize + 1)?;
                for (reg, value) in values.iter().enumerate() {
                    self.regs.set_register(reg as u8, *value);
                }
            }
            OpCodes::Unknown(opcode) => return Err(Chip8Error::UnknownOpcode { opcode }),
        }
        Ok(None)
    }

    fn switch_resolution(&mut self, resolution: Resolution) {
        self.fb.set_resolution(resolution);
        log::info!(
            "display now {}x{}",
            resolution.width(),
            resolution.height()
        );
    }

    fn draw(&mut self, reg_x: u8, reg_y: u8, height: u8) -> Result<(), Chip8Error> {
        // VF is cleared before the coordinates are read
        self.regs.set_flag(0);
        let x = self.regs.get(reg_x) as usize % self.fb.width();
        let y = self.regs.get(reg_y) as usize % self.fb.height();

        // N = 0 selects the 16x16 sprite, two bytes per row
        let (len, row_bytes) = match height {
            0 => (32, 2),
            n => (n as usize, 1),
        };
        // every sprite byte must be in memory, clipped rows included
        let sprite = self.mem.slice(self.mem.index.0 as usize, len)?;
        if self.fb.paint(x, y, sprite, row_bytes) {
            self.regs.set_flag(1);
        }
        Ok(())
    }

    /// One machine cycle against the current key latch. A machine parked on
    /// FX0A only looks at the keys; otherwise fetch, decode and execute.
    pub fn tick(&mut self) -> Result<Option<Request>, Chip8Error> {
        if let CpuState::WaitingForKey(vx) = self.state {
            if let Some(key) = self.keyboard.highest_pressed() {
                self.regs.set_register(vx, key);
                self.mem.increment_pc();
                self.state = CpuState::Running;
                log::debug!("key {key:X} released wait into V{vx:X}");
            }
            return Ok(None);
        }

        let pc = self.mem.pc.0;
        let operation = self.fetch_decode()?;
        log::trace!("{pc:#05x}: {operation:?}");
        self.execute_ins(operation).map_err(|err| {
            log::debug!("fault at {pc:#05x} executing {operation:?}: {err}");
            err
        })
    }

    /// Latch keys from the frontend, run one cycle, and repaint if asked to.
    pub fn cycle<F: Frontend>(&mut self, frontend: &mut F) -> Result<(), Chip8Error> {
        self.keyboard.latch(frontend.poll_keys());
        if let Some(Request::Present) = self.tick()? {
            frontend.present(&self.fb.snapshot())?;
        }
        Ok(())
    }

    pub fn run_batch<F: Frontend>(
        &mut self,
        frontend: &mut F,
        batch_size: usize,
    ) -> Result<(), Chip8Error> {
        for _ in 0..batch_size {
            self.cycle(frontend)?;
        }
        Ok(())
    }

    pub fn sync_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    /// Runs batches until the frontend closes or the program faults. Timers
    /// age by one after each batch, then the loop sleeps for `batch_pause`.
    pub fn run<F: Frontend>(&mut self, frontend: &mut F, config: &Config) -> Result<(), Chip8Error> {
        while frontend.is_open() {
            self.run_batch(frontend, config.batch_size)?;
            self.sync_timers();
            frontend.sync()?;
            if !config.batch_pause.is_zero() {
                thread::sleep(config.batch_pause);
            }
        }
        Ok(())
    }
}
