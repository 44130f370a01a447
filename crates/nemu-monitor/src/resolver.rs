use crate::{Memory, Register, Registers};

/// Access to live emulator state used while evaluating expressions.
pub trait Resolver {
    /// Read the current value of a register.
    ///
    /// Returns `None` if the register isn't exposed by the emulator.
    fn read_register(&self, register: Register) -> Option<u32>;

    /// Read `width` bytes of memory at the given address.
    ///
    /// Returns `None` if the memory could not be read.
    fn read_memory(&self, address: u32, width: usize) -> Option<u32>;
}

impl<T> Resolver for &T
where
    T: ?Sized + Resolver,
{
    fn read_register(&self, register: Register) -> Option<u32> {
        (**self).read_register(register)
    }

    fn read_memory(&self, address: u32, width: usize) -> Option<u32> {
        (**self).read_memory(address, width)
    }
}

/// The state of the emulated CPU: its registers and its memory.
#[derive(Debug, Clone, Default)]
pub struct Cpu {
    pub registers: Registers,
    pub memory: Memory,
}

impl Cpu {
    /// Construct a zeroed CPU with `memory_size` bytes of memory.
    pub fn new(memory_size: u32) -> Self {
        Self {
            registers: Registers::new(),
            memory: Memory::new(memory_size),
        }
    }
}

impl Resolver for Cpu {
    fn read_register(&self, register: Register) -> Option<u32> {
        Some(self.registers.read(register))
    }

    fn read_memory(&self, address: u32, width: usize) -> Option<u32> {
        self.memory.read(address, width)
    }
}
