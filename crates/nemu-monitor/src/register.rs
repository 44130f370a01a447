//! The emulated i386 register file.
//!
//! The eight general purpose registers can be accessed through 32, 16 and
//! 8-bit names. Narrow names are views into the same storage: `ax` is the low
//! half of `eax`, while `al` and `ah` are the two bytes of `ax`.

use std::{fmt, str};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown register `{0}`")]
pub struct ParseRegisterError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Eax,
    Ecx,
    Edx,
    Ebx,
    Esp,
    Ebp,
    Esi,
    Edi,
    Ax,
    Cx,
    Dx,
    Bx,
    Sp,
    Bp,
    Si,
    Di,
    Al,
    Cl,
    Dl,
    Bl,
    Ah,
    Ch,
    Dh,
    Bh,
    Eip,
}

impl Register {
    /// Every register, in encoding order within each width.
    pub const ALL: [Register; 25] = [
        Self::Eax,
        Self::Ecx,
        Self::Edx,
        Self::Ebx,
        Self::Esp,
        Self::Ebp,
        Self::Esi,
        Self::Edi,
        Self::Ax,
        Self::Cx,
        Self::Dx,
        Self::Bx,
        Self::Sp,
        Self::Bp,
        Self::Si,
        Self::Di,
        Self::Al,
        Self::Cl,
        Self::Dl,
        Self::Bl,
        Self::Ah,
        Self::Ch,
        Self::Dh,
        Self::Bh,
        Self::Eip,
    ];

    /// The 32-bit general purpose registers, in encoding order.
    pub const GPR32: [Register; 8] = [
        Self::Eax,
        Self::Ecx,
        Self::Edx,
        Self::Ebx,
        Self::Esp,
        Self::Ebp,
        Self::Esi,
        Self::Edi,
    ];

    /// Width of the register in bytes.
    pub fn width(self) -> usize {
        match self.view() {
            View::Long(..) | View::Eip => 4,
            View::Word(..) => 2,
            View::Byte(..) => 1,
        }
    }

    /// The mnemonic of the register, without the `$` sigil.
    pub fn name(self) -> &'static str {
        match self {
            Self::Eax => "eax",
            Self::Ecx => "ecx",
            Self::Edx => "edx",
            Self::Ebx => "ebx",
            Self::Esp => "esp",
            Self::Ebp => "ebp",
            Self::Esi => "esi",
            Self::Edi => "edi",
            Self::Ax => "ax",
            Self::Cx => "cx",
            Self::Dx => "dx",
            Self::Bx => "bx",
            Self::Sp => "sp",
            Self::Bp => "bp",
            Self::Si => "si",
            Self::Di => "di",
            Self::Al => "al",
            Self::Cl => "cl",
            Self::Dl => "dl",
            Self::Bl => "bl",
            Self::Ah => "ah",
            Self::Ch => "ch",
            Self::Dh => "dh",
            Self::Bh => "bh",
            Self::Eip => "eip",
        }
    }

    /// Which part of the register storage this name refers to.
    fn view(self) -> View {
        match self {
            Self::Eax => View::Long(0),
            Self::Ecx => View::Long(1),
            Self::Edx => View::Long(2),
            Self::Ebx => View::Long(3),
            Self::Esp => View::Long(4),
            Self::Ebp => View::Long(5),
            Self::Esi => View::Long(6),
            Self::Edi => View::Long(7),
            Self::Ax => View::Word(0),
            Self::Cx => View::Word(1),
            Self::Dx => View::Word(2),
            Self::Bx => View::Word(3),
            Self::Sp => View::Word(4),
            Self::Bp => View::Word(5),
            Self::Si => View::Word(6),
            Self::Di => View::Word(7),
            Self::Al => View::Byte(0),
            Self::Cl => View::Byte(1),
            Self::Dl => View::Byte(2),
            Self::Bl => View::Byte(3),
            Self::Ah => View::Byte(4),
            Self::Ch => View::Byte(5),
            Self::Dh => View::Byte(6),
            Self::Bh => View::Byte(7),
            Self::Eip => View::Eip,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(fmt)
    }
}

impl str::FromStr for Register {
    type Err = ParseRegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.name() == s)
            .ok_or_else(|| ParseRegisterError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum View {
    /// All of general purpose slot `n`.
    Long(usize),
    /// Low 16 bits of slot `n`.
    Word(usize),
    /// Byte `n >> 2` of slot `n & 3`.
    Byte(usize),
    Eip,
}

/// Register storage of the emulated CPU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    gpr: [u32; 8],
    eip: u32,
}

impl Registers {
    /// Construct a zeroed register file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the given register through its view of the storage.
    pub fn read(&self, register: Register) -> u32 {
        match register.view() {
            View::Long(n) => self.gpr[n],
            View::Word(n) => self.gpr[n] & 0xffff,
            View::Byte(n) => (self.gpr[n & 3] >> ((n >> 2) * 8)) & 0xff,
            View::Eip => self.eip,
        }
    }

    /// Write the given register. Bits outside of the view are preserved and
    /// bits of `value` that don't fit the view are dropped.
    pub fn write(&mut self, register: Register, value: u32) {
        match register.view() {
            View::Long(n) => self.gpr[n] = value,
            View::Word(n) => self.gpr[n] = (self.gpr[n] & !0xffff) | (value & 0xffff),
            View::Byte(n) => {
                let shift = (n >> 2) * 8;
                let slot = &mut self.gpr[n & 3];
                *slot = (*slot & !(0xff << shift)) | ((value & 0xff) << shift);
            }
            View::Eip => self.eip = value,
        }
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        for register in Register::GPR32.iter().copied().chain(Some(Register::Eip)) {
            let value = self.read(register);
            writeln!(fmt, "{}\t0x{:08x}\t{}", register, value, value)?;
        }

        Ok(())
    }
}
