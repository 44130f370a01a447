//! Expression evaluation and watchpoints for the monitor of the NEMU i386
//! emulator.
//!
//! <br>
//!
//! ## Usage
//!
//! Expressions are evaluated against live emulator state through a
//! [Resolver], which provides register and memory values. The [Monitor] bundles
//! a resolver with a pool of watchpoints.
//!
//! ```
//! use nemu_monitor::{Config, Cpu, Monitor, Register};
//!
//! let mut monitor = Monitor::new(Cpu::default(), Config::default());
//! monitor.resolver_mut().registers.write(Register::Esp, 0x1000);
//! monitor.resolver_mut().memory.write(0x1004, 4, 0x100);
//!
//! assert_eq!(1, monitor.evaluate("*($esp+4) == 0x100 && $esp > 10")?);
//! # Ok::<_, nemu_monitor::Error>(())
//! ```
//!
//! <br>
//!
//! ## Expressions
//!
//! All values are unsigned 32-bit numbers, and arithmetic wraps around.
//! Expressions take the following forms (the earlier it is listed, the higher
//! its precedence):
//!
//! * `<number>` - A decimal literal, like `42`.
//! * `0x<hex>` - A hex literal, like `0x2a`.
//! * `$<register>` - The current value of a register.
//!   * 32-bit: `eax`, `ecx`, `edx`, `ebx`, `esp`, `ebp`, `esi`, `edi`, `eip`.
//!   * 16-bit: `ax`, `cx`, `dx`, `bx`, `sp`, `bp`, `si`, `di`.
//!   * 8-bit: `al`, `cl`, `dl`, `bl`, `ah`, `ch`, `dh`, `bh`.
//! * `(<value>)` - Override default precedence.
//! * `*<value>` - Read the 32-bit word at the given address. The address must
//!   be below the configured memory limit (128 MiB by default).
//!   * Example: `*($esp + 4)`
//! * `<value> * <value>`, `<value> / <value>` - Multiply or divide. Division by
//!   zero is an error.
//! * `<value> + <value>`, `<value> - <value>` - Add or subtract.
//! * `<`, `>`, `<=`, `>=` - Compare, producing `1` or `0`.
//! * `==`, `!=` - Test for equality, producing `1` or `0`.
//! * `<value> && <value>` - `1` if both values are non-zero. Both sides are
//!   always evaluated.
//!
//! Binary operators of the same precedence group left to right, so `10-3-2`
//! is `5`.
//!
//! A `*` is a dereference if it comes first or follows an operator or `(`.
//! Otherwise it multiplies.
//!
//! <br>
//!
//! ## Watchpoints
//!
//! A fixed number of watchpoints (32 by default) can be active at once. Each
//! keeps the id of the slot it was allocated from until it's deleted.

pub mod config;
mod error;
pub mod expr;
pub mod lexer;
mod memory;
mod monitor;
pub mod opts;
mod register;
mod resolver;
mod token;
pub mod utils;
mod watch;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use self::config::Config;
pub use self::error::{Error, ErrorKind};
pub use self::expr::{evaluate, Evaluator};
pub use self::memory::{Memory, DEFAULT_MEMORY_SIZE};
pub use self::monitor::{Monitor, WatchChange};
pub use self::register::{ParseRegisterError, Register, Registers};
pub use self::resolver::{Cpu, Resolver};
pub use self::token::Token;
pub use self::watch::{WatchPool, Watchpoint};
