//! Sparse emulated physical memory.

use byteorder::{ByteOrder as _, LittleEndian};
use hashbrown::HashMap;

const PAGE_BITS: u32 = 12;
const PAGE_SIZE: usize = 1 << PAGE_BITS;
const PAGE_MASK: u32 = (PAGE_SIZE as u32) - 1;

/// The default size of emulated memory, 128 MiB.
pub const DEFAULT_MEMORY_SIZE: u32 = 128 * 1024 * 1024;

/// Little-endian memory which only allocates the pages that were written to.
///
/// Bytes which have never been written read as zero.
#[derive(Debug, Clone)]
pub struct Memory {
    size: u32,
    pages: HashMap<u32, Box<[u8; PAGE_SIZE]>>,
}

impl Memory {
    /// Construct memory spanning `[0, size)`.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            pages: HashMap::new(),
        }
    }

    /// The number of addressable bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Test if `width` bytes at `address` lie within memory.
    pub fn contains(&self, address: u32, width: usize) -> bool {
        match address.checked_add(width as u32) {
            Some(end) => end <= self.size,
            None => false,
        }
    }

    /// Read a little-endian value of 1, 2 or 4 bytes.
    pub fn read(&self, address: u32, width: usize) -> Option<u32> {
        if !matches!(width, 1 | 2 | 4) || !self.contains(address, width) {
            return None;
        }

        let mut buf = [0u8; 4];
        let buf = &mut buf[..width];

        for (o, b) in buf.iter_mut().enumerate() {
            *b = self.byte(address + o as u32);
        }

        Some(match width {
            1 => u32::from(buf[0]),
            2 => u32::from(LittleEndian::read_u16(buf)),
            _ => LittleEndian::read_u32(buf),
        })
    }

    /// Write a little-endian value of 1, 2 or 4 bytes.
    ///
    /// Returns `false` if the write doesn't fit in memory.
    pub fn write(&mut self, address: u32, width: usize, value: u32) -> bool {
        let mut buf = [0u8; 4];

        let buf = match width {
            1 => {
                buf[0] = value as u8;
                &buf[..1]
            }
            2 => {
                LittleEndian::write_u16(&mut buf[..2], value as u16);
                &buf[..2]
            }
            4 => {
                LittleEndian::write_u32(&mut buf, value);
                &buf[..]
            }
            _ => return false,
        };

        if !self.contains(address, width) {
            return false;
        }

        for (o, b) in buf.iter().enumerate() {
            let address = address + o as u32;
            let page = self
                .pages
                .entry(address >> PAGE_BITS)
                .or_insert_with(|| Box::new([0u8; PAGE_SIZE]));
            page[(address & PAGE_MASK) as usize] = *b;
        }

        true
    }

    fn byte(&self, address: u32) -> u8 {
        match self.pages.get(&(address >> PAGE_BITS)) {
            Some(page) => page[(address & PAGE_MASK) as usize],
            None => 0,
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE)
    }
}
