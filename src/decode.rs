use crate::memory::TypeAddr;

/// Two program bytes split into the fields the opcode table looks at.
/// Every bit pattern decodes; whether it means anything is decided by
/// `OpCodes::decode_raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub nibbles: [u8; 4],
    pub address: TypeAddr,
    pub immediate: u8,
    pub raw: u16,
}

impl Instruction {
    pub fn from_bytes(high: u8, low: u8) -> Self {
        let raw = ((high as u16) << 8) | low as u16;
        Self {
            nibbles: [high >> 4, high & 0xF, low >> 4, low & 0xF],
            address: raw & 0x0FFF,
            immediate: low,
            raw,
        }
    }

    pub fn x(&self) -> u8 {
        self.nibbles[1]
    }

    pub fn y(&self) -> u8 {
        self.nibbles[2]
    }

    pub fn n(&self) -> u8 {
        self.nibbles[3]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 00FE / 00FF
    LowRes,
    HighRes,
    // 00CN
    // shift every row down by N
    ScrollDown(u8),
    // 00FB / 00FC
    // always 4 columns, whatever the resolution
    ScrollRight,
    ScrollLeft,

    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, no carry
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    /// 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I at (VX, VY);
    // N = 0 draws a 16x16 sprite
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    Unknown(u16),
}

impl OpCodes {
    pub fn decode_raw(ins: &Instruction) -> Self {
        let (x, y, n) = (ins.x(), ins.y(), ins.n());

        match ins.nibbles[0] {
            0x0 => match ins.raw {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                0x00FB => Self::ScrollRight,
                0x00FC => Self::ScrollLeft,
                0x00FE => Self::LowRes,
                0x00FF => Self::HighRes,
                raw if raw & 0xFFF0 == 0x00C0 => Self::ScrollDown(n),
                raw => Self::Unknown(raw),
            },
            0x1 => Self::Jump(ins.address),
            0x2 => Self::PushSubroutine(ins.address),
            0x3 => Self::SkipEqualConstant(x, ins.immediate),
            0x4 => Self::SkipNotEqualConstant(x, ins.immediate),
            0x5 if n == 0 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, ins.immediate),
            0x7 => Self::AddToRegister(x, ins.immediate),
            0x8 => match n {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unknown(ins.raw),
            },
            0x9 if n == 0 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(ins.address),
            0xB => Self::JumpWithOffset(ins.address),
            0xC => Self::Random(x, ins.immediate),
            0xD => Self::Display(x, y, n),
            0xE => match ins.immediate {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unknown(ins.raw),
            },
            0xF => match ins.immediate {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unknown(ins.raw),
            },
            _ => Self::Unknown(ins.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(word: u16) -> OpCodes {
        OpCodes::decode_raw(&Instruction::from_bytes((word >> 8) as u8, word as u8))
    }

    proptest! {
        #[test]
        fn decode_is_total_and_lossless(high in any::<u8>(), low in any::<u8>()) {
            let ins = Instruction::from_bytes(high, low);
            let word = ((high as u16) << 8) | low as u16;
            let [a, b, c, d] = ins.nibbles.map(u16::from);
            prop_assert_eq!((a << 12) | (b << 8) | (c << 4) | d, word);
            prop_assert_eq!(ins.raw, word);
            prop_assert_eq!(ins.address, word & 0x0FFF);
            prop_assert_eq!(ins.immediate as u16, word & 0x00FF);
        }
    }

    #[test]
    fn system_opcodes() {
        assert_eq!(decode(0x00E0), OpCodes::ClearScreen);
        assert_eq!(decode(0x00EE), OpCodes::PopSubroutine);
        assert_eq!(decode(0x00FE), OpCodes::LowRes);
        assert_eq!(decode(0x00FF), OpCodes::HighRes);
        assert_eq!(decode(0x00C7), OpCodes::ScrollDown(7));
        assert_eq!(decode(0x00FB), OpCodes::ScrollRight);
        assert_eq!(decode(0x00FC), OpCodes::ScrollLeft);
        assert_eq!(decode(0x0123), OpCodes::Unknown(0x0123));
    }

    #[test]
    fn operand_fields() {
        assert_eq!(decode(0x1ABC), OpCodes::Jump(0xABC));
        assert_eq!(decode(0x2345), OpCodes::PushSubroutine(0x345));
        assert_eq!(decode(0x6A42), OpCodes::SetRegister(0xA, 0x42));
        assert_eq!(decode(0x8AB4), OpCodes::Add(0xA, 0xB));
        assert_eq!(decode(0xD12F), OpCodes::Display(1, 2, 0xF));
        assert_eq!(decode(0xE59E), OpCodes::SkipIfPressed(5));
        assert_eq!(decode(0xF233), OpCodes::ToDecimal(2));
        assert_eq!(decode(0xF318), OpCodes::CopyRegisterToSound(3));
    }

    #[test]
    fn unmapped_patterns_are_unknown() {
        for word in [0x5121, 0x8128, 0x812F, 0x9AB1, 0xE1FF, 0xF1FF, 0x00FD] {
            assert_eq!(decode(word), OpCodes::Unknown(word), "{word:#06x}");
        }
    }
}
