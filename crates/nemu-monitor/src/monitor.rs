use crate::{expr, utils::Hex, Config, Error, Resolver, WatchPool, Watchpoint};
use log::warn;
use std::convert::TryFrom;

/// A watchpoint whose value changed since it was last checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchChange {
    pub id: usize,
    pub expr: String,
    pub old: u32,
    pub new: u32,
}

/// The operations the debugger's command layer is built on.
pub struct Monitor<R> {
    resolver: R,
    watches: WatchPool,
    config: Config,
}

impl<R> Monitor<R>
where
    R: Resolver,
{
    /// Construct a new monitor over the given emulator state.
    pub fn new(resolver: R, config: Config) -> Self {
        Self {
            resolver,
            watches: WatchPool::new(config.watch_capacity),
            config,
        }
    }

    /// Access the emulator state.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Access the emulator state mutably, like when stepping it.
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate an expression against the current state.
    pub fn evaluate(&self, input: &str) -> Result<u32, Error> {
        expr::evaluate(input, &self.resolver, &self.config)
    }

    /// Set a watchpoint on the given expression and return its id.
    ///
    /// If the expression can't be evaluated the watchpoint is released again.
    pub fn watch_create(&mut self, input: &str) -> Result<usize, Error> {
        let id = self.watches.create(input)?.id;

        let value = match self.evaluate(input) {
            Ok(value) => value,
            Err(e) => {
                self.watches.delete(id)?;
                return Err(e);
            }
        };

        if let Some(watch) = self.watches.get_mut(id) {
            watch.last_value = value;
        }

        Ok(id)
    }

    /// Delete the watchpoint with the given id.
    pub fn watch_delete(&mut self, id: usize) -> Result<(), Error> {
        self.watches.delete(id)?;
        Ok(())
    }

    /// Active watchpoints, most recently created first.
    pub fn watch_list(&self) -> impl Iterator<Item = &Watchpoint> {
        self.watches.iter()
    }

    /// Re-evaluate every watchpoint and report the ones which changed.
    ///
    /// Watchpoints which fail to evaluate keep their last value.
    pub fn check_watchpoints(&mut self) -> Vec<WatchChange> {
        let mut changes = Vec::new();

        for id in self.watches.ids() {
            let expr = match self.watches.get(id) {
                Some(watch) => watch.expr.clone(),
                None => continue,
            };

            let new = match expr::evaluate(&expr, &self.resolver, &self.config) {
                Ok(value) => value,
                Err(e) => {
                    warn!("watchpoint #{} `{}` failed: {}", id, expr, e);
                    continue;
                }
            };

            let watch = match self.watches.get_mut(id) {
                Some(watch) => watch,
                None => continue,
            };

            let old = watch.last_value;
            watch.last_value = new;

            if old != new {
                changes.push(WatchChange { id, expr, old, new });
            }
        }

        changes
    }

    /// Read `count` consecutive words starting at the address the given
    /// expression evaluates to.
    ///
    /// Fails without reading anything if any of the words would lie at or
    /// above the memory limit.
    pub fn examine(&self, count: usize, input: &str) -> Result<Vec<(u32, u32)>, Error> {
        let start = self.evaluate(input)?;
        let limit = self.config.memory_limit;

        // number of words starting below the limit.
        let available = (u64::from(limit.saturating_sub(start)) + 3) / 4;

        if count as u64 > available {
            let failed = u64::from(start) + available * 4;
            let failed = u32::try_from(failed).unwrap_or(limit);
            return Err(Error::AddressOutOfBounds(Hex(failed)));
        }

        let mut words = Vec::new();

        for n in 0..count as u32 {
            let address = start + n * 4;

            let value = self
                .resolver
                .read_memory(address, 4)
                .ok_or(Error::MemoryRead(Hex(address)))?;

            words.push((address, value));
        }

        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::{Monitor, WatchChange};
    use crate::{utils::Hex, Config, Cpu, Error, ErrorKind, Register};

    fn monitor() -> Monitor<Cpu> {
        Monitor::new(Cpu::new(0x1000), Config {
            memory_limit: 0x1000,
            ..Config::default()
        })
    }

    #[test]
    fn test_evaluate() -> anyhow::Result<()> {
        let mut m = monitor();
        m.resolver_mut().registers.write(Register::Esp, 0x100);
        m.resolver_mut().memory.write(0x104, 4, 0x100);
        assert_eq!(1, m.evaluate("*($esp+4) == 0x100")?);
        Ok(())
    }

    #[test]
    fn test_watch_create_caches_value() -> anyhow::Result<()> {
        let mut m = monitor();
        m.resolver_mut().registers.write(Register::Eax, 7);

        let id = m.watch_create("$eax * 2")?;
        let watch = m.watch_list().next().unwrap();
        assert_eq!(id, watch.id);
        assert_eq!("$eax * 2", watch.expr);
        assert_eq!(14, watch.last_value);
        Ok(())
    }

    #[test]
    fn test_watch_create_failure_releases_slot() -> anyhow::Result<()> {
        let mut m = monitor();
        let e = m.watch_create("1/0").unwrap_err();
        assert_eq!(ErrorKind::Arithmetic, e.kind());
        assert_eq!(0, m.watch_list().count());

        // the slot went back to the free list, so it's handed out again.
        assert_eq!(0, m.watch_create("1")?);
        Ok(())
    }

    #[test]
    fn test_watch_delete() -> anyhow::Result<()> {
        let mut m = monitor();
        let a = m.watch_create("1")?;
        let b = m.watch_create("2")?;
        m.watch_delete(b)?;
        assert_eq!(vec![a], m.watch_list().map(|w| w.id).collect::<Vec<_>>());

        let e = m.watch_delete(b).unwrap_err();
        assert_eq!(ErrorKind::UnknownWatchpoint, e.kind());
        Ok(())
    }

    #[test]
    fn test_check_watchpoints() -> anyhow::Result<()> {
        let mut m = monitor();
        let a = m.watch_create("$eax")?;
        let b = m.watch_create("*0x10")?;
        m.watch_create("$ebx")?;

        assert!(m.check_watchpoints().is_empty());

        m.resolver_mut().registers.write(Register::Al, 3);
        m.resolver_mut().memory.write(0x10, 4, 9);

        let changes = m.check_watchpoints();

        assert_eq!(
            vec![
                WatchChange {
                    id: b,
                    expr: "*0x10".into(),
                    old: 0,
                    new: 9,
                },
                WatchChange {
                    id: a,
                    expr: "$eax".into(),
                    old: 0,
                    new: 3,
                },
            ],
            changes
        );

        assert!(m.check_watchpoints().is_empty());
        Ok(())
    }

    #[test]
    fn test_check_keeps_value_on_failure() -> anyhow::Result<()> {
        let mut m = monitor();
        m.resolver_mut().registers.write(Register::Ecx, 1);
        let id = m.watch_create("10 / $ecx")?;

        m.resolver_mut().registers.write(Register::Ecx, 0);
        assert!(m.check_watchpoints().is_empty());
        assert_eq!(10, m.watch_list().next().unwrap().last_value);

        m.resolver_mut().registers.write(Register::Ecx, 5);
        let changes = m.check_watchpoints();
        assert_eq!(1, changes.len());
        assert_eq!((id, 10, 2), (changes[0].id, changes[0].old, changes[0].new));
        Ok(())
    }

    #[test]
    fn test_examine() -> anyhow::Result<()> {
        let mut m = monitor();
        m.resolver_mut().registers.write(Register::Esp, 0x20);
        m.resolver_mut().memory.write(0x20, 4, 1);
        m.resolver_mut().memory.write(0x24, 4, 2);

        assert_eq!(
            vec![(0x20, 1), (0x24, 2), (0x28, 0)],
            m.examine(3, "$esp")?
        );

        let e = m.examine(2, "0xffc").unwrap_err();
        assert_eq!(ErrorKind::Resolve, e.kind());
        assert!(matches!(e, Error::AddressOutOfBounds(Hex(0x1000))));

        let e = m.examine(3, "0xff9").unwrap_err();
        assert!(matches!(e, Error::AddressOutOfBounds(Hex(0x1001))));

        assert_eq!(vec![(0xff9, 0)], m.examine(1, "0xff9")?);
        assert!(m.examine(0, "0xffffffff")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_examine_huge_count() {
        let m = monitor();

        let e = m.examine(usize::MAX, "0").unwrap_err();
        assert_eq!(ErrorKind::Resolve, e.kind());
        assert!(matches!(e, Error::AddressOutOfBounds(Hex(0x1000))));

        let e = m.examine(usize::MAX, "0x2000").unwrap_err();
        assert!(matches!(e, Error::AddressOutOfBounds(Hex(0x2000))));
    }

    #[test]
    fn test_examine_reports_limit_on_wrap() {
        let m = Monitor::new(
            Cpu::new(0x1000),
            Config {
                memory_limit: u32::MAX,
                ..Config::default()
            },
        );

        let e = m.examine(2, "0xfffffffc").unwrap_err();
        assert!(matches!(e, Error::AddressOutOfBounds(Hex(u32::MAX))));
    }
}
