//! A fixed capacity pool of watchpoints.
//!
//! Slots live in a single array and are linked into either the _free_ list or
//! the _active_ list through their indexes. The index of a slot is the id of
//! the watchpoint stored in it, so ids are stable for the lifetime of the pool.

use crate::Error;
use log::debug;

/// An expression whose value is tracked across execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchpoint {
    /// Id of the slot the watchpoint is stored in.
    pub id: usize,
    /// The expression being watched.
    pub expr: String,
    /// The most recently computed value of the expression.
    pub last_value: u32,
}

#[derive(Debug)]
struct Slot {
    /// Next slot in whichever list this slot belongs to.
    next: Option<usize>,
    /// Set if and only if the slot is in the active list.
    watch: Option<Watchpoint>,
}

#[derive(Debug)]
pub struct WatchPool {
    slots: Vec<Slot>,
    /// Head of the free list.
    free: Option<usize>,
    /// Head of the active list. The most recently created watchpoint comes
    /// first.
    active: Option<usize>,
    len: usize,
}

impl WatchPool {
    /// Construct a pool with `capacity` free slots.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|id| Slot {
                next: if id + 1 < capacity { Some(id + 1) } else { None },
                watch: None,
            })
            .collect();

        Self {
            slots,
            free: if capacity > 0 { Some(0) } else { None },
            active: None,
            len: 0,
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of active watchpoints.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Test if there are no active watchpoints.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Take a free slot and make it the head of the active list.
    ///
    /// The watchpoint starts out with a value of zero, it's up to the caller
    /// to evaluate the expression.
    pub fn create(&mut self, expr: impl Into<String>) -> Result<&mut Watchpoint, Error> {
        let id = self.free.ok_or(Error::PoolExhausted(self.capacity()))?;

        let slot = &mut self.slots[id];
        assert!(slot.watch.is_none(), "free slot #{} is in use", id);

        self.free = slot.next;
        slot.next = self.active;
        self.active = Some(id);
        self.len += 1;

        let expr = expr.into();
        debug!("watchpoint #{} created: {}", id, expr);

        Ok(slot.watch.get_or_insert(Watchpoint {
            id,
            expr,
            last_value: 0,
        }))
    }

    /// Remove the watchpoint with the given id from the active list, wherever
    /// it is, and put its slot at the head of the free list.
    pub fn delete(&mut self, id: usize) -> Result<Watchpoint, Error> {
        let mut prev = None;
        let mut current = self.active;

        while let Some(index) = current {
            if index == id {
                break;
            }

            prev = Some(index);
            current = self.slots[index].next;
        }

        if current.is_none() {
            return Err(Error::UnknownWatchpoint(id));
        }

        let next = self.slots[id].next;

        match prev {
            Some(prev) => self.slots[prev].next = next,
            None => self.active = next,
        }

        let slot = &mut self.slots[id];
        slot.next = self.free;
        self.free = Some(id);
        self.len -= 1;

        let watch = match slot.watch.take() {
            Some(watch) => watch,
            None => panic!("active slot #{} is empty", id),
        };

        debug!("watchpoint #{} deleted: {}", id, watch.expr);
        Ok(watch)
    }

    /// Access an active watchpoint.
    pub fn get(&self, id: usize) -> Option<&Watchpoint> {
        self.slots.get(id)?.watch.as_ref()
    }

    /// Access an active watchpoint mutably.
    pub fn get_mut(&mut self, id: usize) -> Option<&mut Watchpoint> {
        self.slots.get_mut(id)?.watch.as_mut()
    }

    /// Iterate over active watchpoints, most recently created first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: &self.slots,
            current: self.active,
        }
    }

    /// Ids of the active watchpoints, most recently created first.
    pub fn ids(&self) -> Vec<usize> {
        self.iter().map(|w| w.id).collect()
    }
}

impl<'a> IntoIterator for &'a WatchPool {
    type Item = &'a Watchpoint;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the active list of a [WatchPool].
pub struct Iter<'a> {
    slots: &'a [Slot],
    current: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Watchpoint;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = &self.slots[self.current?];
        self.current = slot.next;

        match &slot.watch {
            Some(watch) => Some(watch),
            None => panic!("active list links to an empty slot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WatchPool;
    use crate::ErrorKind;

    fn pool_with(n: usize) -> anyhow::Result<WatchPool> {
        let mut pool = WatchPool::new(32);

        for i in 0..n {
            pool.create(format!("$eax + {}", i))?;
        }

        Ok(pool)
    }

    #[test]
    fn test_exhaustion() -> anyhow::Result<()> {
        let mut pool = pool_with(32)?;
        assert_eq!(32, pool.len());

        let e = pool.create("1").unwrap_err();
        assert_eq!(ErrorKind::PoolExhausted, e.kind());

        pool.delete(17)?;
        assert_eq!(17, pool.create("2")?.id);

        let e = pool.create("3").unwrap_err();
        assert_eq!(ErrorKind::PoolExhausted, e.kind());
        Ok(())
    }

    #[test]
    fn test_ids_in_allocation_order() -> anyhow::Result<()> {
        let mut pool = WatchPool::new(4);
        assert_eq!(0, pool.create("a")?.id);
        assert_eq!(1, pool.create("b")?.id);
        assert_eq!(2, pool.create("c")?.id);
        assert_eq!(vec![2, 1, 0], pool.ids());
        Ok(())
    }

    #[test]
    fn test_delete_positions() -> anyhow::Result<()> {
        let mut pool = pool_with(5)?;
        assert_eq!(vec![4, 3, 2, 1, 0], pool.ids());

        // middle
        assert_eq!("$eax + 2", pool.delete(2)?.expr);
        assert_eq!(vec![4, 3, 1, 0], pool.ids());

        // tail
        pool.delete(0)?;
        assert_eq!(vec![4, 3, 1], pool.ids());

        // head with successors keeps the successors.
        pool.delete(4)?;
        assert_eq!(vec![3, 1], pool.ids());

        pool.delete(3)?;
        pool.delete(1)?;
        assert!(pool.is_empty());
        assert_eq!(None, pool.iter().next());
        Ok(())
    }

    #[test]
    fn test_freed_slot_reused_first() -> anyhow::Result<()> {
        let mut pool = pool_with(3)?;
        pool.delete(1)?;
        pool.delete(0)?;

        assert_eq!(0, pool.create("x")?.id);
        assert_eq!(1, pool.create("y")?.id);
        assert_eq!(3, pool.create("z")?.id);
        assert_eq!(vec![3, 1, 0, 2], pool.ids());
        Ok(())
    }

    #[test]
    fn test_unknown() -> anyhow::Result<()> {
        let mut pool = pool_with(2)?;
        assert_eq!(ErrorKind::UnknownWatchpoint, pool.delete(5).unwrap_err().kind());
        assert_eq!(ErrorKind::UnknownWatchpoint, pool.delete(99).unwrap_err().kind());

        pool.delete(1)?;
        assert_eq!(ErrorKind::UnknownWatchpoint, pool.delete(1).unwrap_err().kind());
        assert_eq!(vec![0], pool.ids());
        Ok(())
    }

    #[test]
    fn test_interleaved_keeps_ids() -> anyhow::Result<()> {
        let mut pool = WatchPool::new(32);
        let a = pool.create("a")?.id;
        let b = pool.create("b")?.id;
        let c = pool.create("c")?.id;
        pool.delete(b)?;
        let d = pool.create("d")?.id;
        pool.delete(a)?;
        let e = pool.create("e")?.id;

        let listed = pool
            .iter()
            .map(|w| (w.id, w.expr.as_str()))
            .collect::<Vec<_>>();

        assert_eq!(vec![(e, "e"), (d, "d"), (c, "c")], listed);
        assert_eq!(b, d);
        assert_eq!(a, e);
        assert_eq!(Some("c"), pool.get(c).map(|w| w.expr.as_str()));
        assert_eq!(None, pool.get(b + 10));
        Ok(())
    }

    #[test]
    fn test_zero_capacity() {
        let mut pool = WatchPool::new(0);
        assert_eq!(ErrorKind::PoolExhausted, pool.create("1").unwrap_err().kind());
    }
}
