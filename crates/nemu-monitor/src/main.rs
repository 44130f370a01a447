use anyhow::bail;
use nemu_monitor::{Config, Cpu, Monitor};
use std::io::{self, Write as _};
use tracing_subscriber::EnvFilter;

fn try_main() -> anyhow::Result<()> {
    let opts = nemu_monitor::opts::opts()?;

    let config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut cpu = Cpu::new(config.memory_limit);

    for (register, value) in &opts.registers {
        cpu.registers.write(*register, *value);
    }

    for (address, value) in &opts.memory {
        if !cpu.memory.write(*address, 4, *value) {
            bail!("address out of bound: 0x{:08x}", address);
        }
    }

    let mut monitor = Monitor::new(cpu, config);

    for expr in &opts.watches {
        monitor.watch_create(expr)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if opts.dump_registers {
        write!(out, "{}", monitor.resolver().registers)?;
    }

    for (count, expr) in &opts.examine {
        for (address, value) in monitor.examine(*count, expr)? {
            writeln!(out, "0x{:08x}:\t0x{:08x}", address, value)?;
        }
    }

    for expr in &opts.exprs {
        writeln!(out, "{}", monitor.evaluate(expr)?)?;
    }

    for watch in monitor.watch_list() {
        writeln!(
            out,
            "Watchpoint {}: {} = {}",
            watch.id, watch.expr, watch.last_value
        )?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = try_main() {
        eprintln!("error: {}", e);

        for c in e.chain().skip(1) {
            eprintln!("Caused by: {}", c);
        }

        std::process::exit(1);
    }
}
