use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use catalog::EntityRef;

/// Counts of one import run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReadStats {
    /// Records looked at, duplicates included.
    pub read: usize,
    /// Distinct logical names.
    pub unique: usize,
    /// Entities actually built.
    pub created: usize,
}

impl Display for ReadStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scanned {} entries, {} unique, {} created",
            self.read, self.unique, self.created
        )
    }
}

/// Keeps at most one entity per kind, namespace and name. The first record wins and later ones
/// are dropped without merging.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<EntityRef>,
    stats: ReadStats,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, entity_ref: &EntityRef) -> bool {
        self.seen.contains(entity_ref)
    }

    /// Returns `false` if the reference had been marked before.
    pub fn mark_seen(&mut self, entity_ref: EntityRef) -> bool {
        let inserted = self.seen.insert(entity_ref);
        if inserted {
            self.stats.unique += 1;
        }
        inserted
    }

    /// Counts one read record and marks it. `true` means this record is the first of its name.
    pub fn check_and_mark(&mut self, entity_ref: EntityRef) -> bool {
        self.record_read();
        self.mark_seen(entity_ref)
    }

    pub fn record_read(&mut self) {
        self.stats.read += 1;
    }

    pub fn record_created(&mut self) {
        self.stats.created += 1;
    }

    pub fn stats(&self) -> ReadStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use catalog::{EntityKind, EntityRef};

    use crate::dedupe::{Deduplicator, ReadStats};

    fn component(namespace: &str, name: &str) -> EntityRef {
        EntityRef::new(EntityKind::Component, namespace, name)
    }

    #[test]
    fn first_record_should_win() {
        let mut dedupe = Deduplicator::new();
        assert!(dedupe.check_and_mark(component("giantswarm", "foo")));
        dedupe.record_created();
        assert!(!dedupe.check_and_mark(component("giantswarm", "foo")));
        assert!(dedupe.seen(&component("giantswarm", "foo")));

        assert_eq!(
            ReadStats {
                read: 2,
                unique: 1,
                created: 1
            },
            dedupe.stats()
        );
    }

    #[test]
    fn key_should_include_kind_and_namespace() {
        let mut dedupe = Deduplicator::new();
        assert!(dedupe.mark_seen(component("giantswarm", "foo")));
        assert!(dedupe.mark_seen(component("default", "foo")));
        assert!(dedupe.mark_seen(EntityRef::new(EntityKind::Group, "giantswarm", "foo")));
        assert!(!dedupe.seen(&component("giantswarm", "bar")));
        assert_eq!(3, dedupe.stats().unique);
    }

    #[test]
    fn stats_should_display_counts() {
        let stats = ReadStats {
            read: 240,
            unique: 180,
            created: 170,
        };
        assert_eq!(
            "scanned 240 entries, 180 unique, 170 created",
            stats.to_string()
        );
    }
}
