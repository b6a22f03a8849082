use crate::{
    error::Chip8Error,
    registers::{IndexRegister, ProgramCounter},
};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const FONT_START: TypeAddr = 0x50;
pub const STACK_CAPACITY: usize = 128;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub struct Memory {
    // 4k bytes
    // font data stored from 050 -> 09F (000 -> 04F is empty by convention)
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font_start = FONT_START as usize;
        bytes[font_start..font_start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);

        Self {
            bytes,
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0x0),
            stack: Stack::new(),
        }
    }

    pub fn set(&mut self, addr: usize, val: u8) -> Result<(), Chip8Error> {
        let cell = self
            .bytes
            .get_mut(addr)
            .ok_or(Chip8Error::AddressOutOfRange { address: addr })?;
        *cell = val;
        Ok(())
    }

    pub fn get(&self, addr: usize) -> Result<u8, Chip8Error> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Chip8Error::AddressOutOfRange { address: addr })
    }

    /// Borrow `len` bytes starting at `addr`, failing if any of them falls
    /// past the end of memory.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8], Chip8Error> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::AddressOutOfRange {
                address: end - 1,
            });
        }
        Ok(&self.bytes[addr..end])
    }

    /// Copies `data` to `addr..`, writing nothing unless all of it fits.
    pub fn write_slice(&mut self, addr: usize, data: &[u8]) -> Result<(), Chip8Error> {
        let end = addr + data.len();
        if end > MEMORY_SIZE {
            return Err(Chip8Error::AddressOutOfRange {
                address: end - 1,
            });
        }
        self.bytes[addr..end].copy_from_slice(data);
        Ok(())
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    pub fn decrement_pc(&mut self) {
        self.pc.decrement();
    }

    /// Reads the two bytes at PC and moves PC past them.
    pub fn next_instruction(&mut self) -> Result<(u8, u8), Chip8Error> {
        let pc = self.pc.0 as usize;
        let (l, r) = (self.get(pc)?, self.get(pc + 1)?);
        self.increment_pc();
        Ok((l, r))
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    // program image is copied verbatim to 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), Chip8Error> {
        let start_index = PROGRAM_START as usize;
        let max_size = MEMORY_SIZE - start_index;
        if bytes.len() > max_size {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max_size,
            });
        }
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        log::info!("loaded {} byte program at {:#05x}", bytes.len(), start_index);
        Ok(())
    }
}

pub struct Stack {
    addresses: [TypeAddr; STACK_CAPACITY],
    pointer: u16,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_CAPACITY],
            pointer: 0,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<(), Chip8Error> {
        let slot = self
            .addresses
            .get_mut(self.pointer as usize)
            .ok_or(Chip8Error::StackOverflow { address: addr })?;
        *slot = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr, Chip8Error> {
        if self.pointer == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.pointer -= 1;
        Ok(self.addresses[self.pointer as usize])
    }

    pub fn pointer(&self) -> u16 {
        self.pointer
    }

    /// Saved return addresses, oldest first.
    pub fn entries(&self) -> &[TypeAddr] {
        &self.addresses[..self.pointer as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_preloaded() {
        let mem = Memory::new();
        assert_eq!(mem.slice(FONT_START as usize, 80).unwrap(), &DEFAULT_FONT);
        assert_eq!(mem.get(0x9F).unwrap(), 0x80);
        assert_eq!(mem.get(0xA0).unwrap(), 0x00);
    }

    #[test]
    fn rom_lands_at_program_start() {
        let mut mem = Memory::new();
        mem.load_rom(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(mem.slice(0x200, 4).unwrap(), &[0x00, 0xE0, 0x12, 0x00]);
        assert_eq!(mem.pc.0, 0x200);
    }

    #[test]
    fn largest_rom_fits_exactly() {
        let mut mem = Memory::new();
        let rom = vec![0xAA; MEMORY_SIZE - 0x200];
        mem.load_rom(&rom).unwrap();
        assert_eq!(mem.get(MEMORY_SIZE - 1).unwrap(), 0xAA);
    }

    #[test]
    fn oversized_rom_is_rejected() {
        let mut mem = Memory::new();
        let rom = vec![0; MEMORY_SIZE - 0x200 + 1];
        assert!(matches!(
            mem.load_rom(&rom),
            Err(Chip8Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        ));
    }

    #[test]
    fn out_of_range_access_faults() {
        let mut mem = Memory::new();
        assert!(matches!(
            mem.get(4096),
            Err(Chip8Error::AddressOutOfRange { address: 4096 })
        ));
        assert!(mem.set(4096, 1).is_err());
        assert!(matches!(
            mem.slice(4094, 3),
            Err(Chip8Error::AddressOutOfRange { address: 4096 })
        ));
        assert!(mem.slice(4094, 2).is_ok());
    }

    #[test]
    fn partial_write_past_end_writes_nothing() {
        let mut mem = Memory::new();
        assert!(mem.write_slice(4094, &[1, 2, 3]).is_err());
        assert_eq!(mem.slice(4094, 2).unwrap(), &[0, 0]);
        mem.write_slice(4093, &[1, 2, 3]).unwrap();
        assert_eq!(mem.get(4095).unwrap(), 3);
    }

    #[test]
    fn fetch_at_last_byte_faults() {
        let mut mem = Memory::new();
        mem.set_pc(0xFFF);
        assert!(mem.next_instruction().is_err());
        assert_eq!(mem.pc.0, 0xFFF);
    }

    #[test]
    fn stack_is_bounded() {
        let mut stack = Stack::new();
        for i in 0..STACK_CAPACITY {
            stack.push(i as TypeAddr).unwrap();
        }
        assert_eq!(stack.pointer(), 128);
        assert!(matches!(
            stack.push(0x300),
            Err(Chip8Error::StackOverflow { address: 0x300 })
        ));
        assert_eq!(stack.pop().unwrap(), 127);
    }

    #[test]
    fn empty_stack_underflows() {
        let mut stack = Stack::new();
        assert!(matches!(stack.pop(), Err(Chip8Error::StackUnderflow)));
        stack.push(0x202).unwrap();
        assert_eq!(stack.entries(), &[0x202]);
        assert_eq!(stack.pop().unwrap(), 0x202);
        assert_eq!(stack.pointer(), 0);
    }
}
