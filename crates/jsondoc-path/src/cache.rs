//! Per-thread cache of compiled plans.
//!
//! Compilation is pure, so each thread keeps its own small LRU map and
//! no locking is ever needed. Entries are stamped with a monotonic
//! counter on every access; when the map outgrows its bound, the entry
//! with the oldest stamp is dropped. Failed compilations are never
//! cached.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::ast::CompiledPath;
use crate::error::ParseError;
use crate::parser;

const MAX_ENTRIES: usize = 64;

thread_local! {
    static CACHE: RefCell<PlanCache> = RefCell::new(PlanCache::new());
}

/// Compiles `expression`, reusing this thread's cached plan when one
/// exists. Cache hits return the same shared allocation.
pub(crate) fn compiled(expression: &str) -> Result<Rc<CompiledPath>, ParseError> {
    CACHE.with(|cache| cache.borrow_mut().get(expression))
}

struct PlanCache {
    entries: AHashMap<String, Entry>,
    clock: u64,
}

struct Entry {
    plan: Rc<CompiledPath>,
    last_used: u64,
}

impl PlanCache {
    fn new() -> Self {
        PlanCache {
            entries: AHashMap::new(),
            clock: 0,
        }
    }

    fn get(&mut self, expression: &str) -> Result<Rc<CompiledPath>, ParseError> {
        self.clock += 1;
        let now = self.clock;
        if let Some(entry) = self.entries.get_mut(expression) {
            entry.last_used = now;
            return Ok(Rc::clone(&entry.plan));
        }
        let plan = Rc::new(parser::parse_expression(expression)?);
        self.entries.insert(
            expression.to_owned(),
            Entry {
                plan: Rc::clone(&plan),
                last_used: now,
            },
        );
        if self.entries.len() > MAX_ENTRIES {
            self.evict_oldest();
        }
        Ok(plan)
    }

    fn evict_oldest(&mut self) {
        if let Some(key) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone())
        {
            self.entries.remove(&key);
        }
    }
}
