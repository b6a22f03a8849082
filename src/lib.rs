// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits used, 16 stored)
//
// Stack of up to 128 return addresses
//
// Delay & sound timers count down once per instruction batch until 0;
// the sound timer is never played
//
// Display res: 64x32, or 128x64 after 00FF
//
// Opcodes are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod frontend;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;
pub mod window;

pub use config::Config;
pub use emulator::Emulator;
pub use error::Chip8Error;
