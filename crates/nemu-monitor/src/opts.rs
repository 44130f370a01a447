use crate::{utils, Register};
use anyhow::{anyhow, bail};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct Opts {
    /// Configuration file to load.
    pub config: Option<PathBuf>,
    /// Register values to seed the CPU with.
    pub registers: Vec<(Register, u32)>,
    /// Memory words to seed the CPU with.
    pub memory: Vec<(u32, u32)>,
    /// Expressions to set watchpoints on.
    pub watches: Vec<String>,
    /// Memory to examine, as a word count and an address expression.
    pub examine: Vec<(usize, String)>,
    /// Dump all registers.
    pub dump_registers: bool,
    /// Expressions to evaluate.
    pub exprs: Vec<String>,
}

/// Parse commandline options.
pub fn opts() -> anyhow::Result<Opts> {
    let m = app().get_matches();

    let mut opts = Opts::default();
    opts.config = m.value_of("config").map(PathBuf::from);
    opts.dump_registers = m.is_present("dump-registers");

    for reg in m.values_of("reg").into_iter().flatten() {
        opts.registers.push(parse_register(reg)?);
    }

    for mem in m.values_of("mem").into_iter().flatten() {
        let (address, value) =
            utils::split_assign(mem).ok_or_else(|| anyhow!("expected ADDR=VALUE: {}", mem))?;
        let address =
            utils::parse_u32(address).ok_or_else(|| anyhow!("bad address: {}", address))?;
        let value = utils::parse_u32(value).ok_or_else(|| anyhow!("bad value: {}", value))?;
        opts.memory.push((address, value));
    }

    for examine in m.values_of("examine").into_iter().flatten() {
        let mut it = examine.splitn(2, ':');

        let (count, expr) = match (it.next(), it.next()) {
            (Some(count), Some(expr)) => (count, expr),
            _ => bail!("expected N:EXPR: {}", examine),
        };

        let count = str::parse::<usize>(count.trim())
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| anyhow!("count should be a positive integer: {}", count))?;

        opts.examine.push((count, expr.to_string()));
    }

    opts.watches = m
        .values_of("watch")
        .into_iter()
        .flatten()
        .map(String::from)
        .collect();

    opts.exprs = m
        .values_of("expr")
        .into_iter()
        .flatten()
        .map(String::from)
        .collect();

    Ok(opts)
}

/// Parse a register assignment like `eax=0x10`, making sure the value fits in
/// the register.
fn parse_register(arg: &str) -> anyhow::Result<(Register, u32)> {
    let (name, value) =
        utils::split_assign(arg).ok_or_else(|| anyhow!("expected NAME=VALUE: {}", arg))?;
    let register = str::parse::<Register>(name)?;
    let value = utils::parse_u32(value).ok_or_else(|| anyhow!("bad value: {}", value))?;

    let bits = register.width() * 8;

    if bits < 32 && value >> bits != 0 {
        bail!(
            "value 0x{:x} does not fit in {}-bit register `{}`",
            value,
            bits,
            register
        );
    }

    Ok((register, value))
}

fn app() -> clap::App<'static, 'static> {
    clap::App::new("nemu-monitor")
        .version(crate::VERSION)
        .about("Evaluates debugger expressions against emulated CPU state")
        .arg(
            clap::Arg::with_name("config")
                .help("Load limits from the given TOML file.")
                .takes_value(true)
                .long("config"),
        )
        .arg(
            clap::Arg::with_name("reg")
                .help("Set a register before evaluating, like `eax=0x10`.")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .long("reg"),
        )
        .arg(
            clap::Arg::with_name("mem")
                .help("Write a 32-bit word to memory before evaluating, like `0x100=42`.")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .long("mem"),
        )
        .arg(
            clap::Arg::with_name("watch")
                .help("Set a watchpoint on the given expression.")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .long("watch"),
        )
        .arg(
            clap::Arg::with_name("examine")
                .help("Print N words of memory starting at EXPR, like `4:$esp`.")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .long("examine"),
        )
        .arg(
            clap::Arg::with_name("dump-registers")
                .help("Print the value of every register.")
                .long("dump-registers"),
        )
        .arg(
            clap::Arg::with_name("expr")
                .help("Expressions to evaluate.")
                .multiple(true),
        )
}
