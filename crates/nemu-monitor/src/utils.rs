use std::fmt;

/// Formats a 32-bit value as zero-padded hex, like `0x0010abcd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hex(pub u32);

impl fmt::Display for Hex {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "0x{:08x}", self.0)
    }
}

/// Parse a command line number, either `0x` prefixed hex or decimal.
pub fn parse_u32(input: &str) -> Option<u32> {
    let input = input.trim();

    if let Some(hex) = input.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok();
    }

    str::parse::<u32>(input).ok()
}

/// Parse an assignment of the form `<key>=<value>`.
pub fn split_assign(input: &str) -> Option<(&str, &str)> {
    let mut it = input.splitn(2, '=');
    let key = it.next()?.trim();
    let value = it.next()?.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}
