//! Compound groups: sections merged into one open area
//!
//! Groups live in an arena and sections hold a `CompoundId`. Merging two
//! groups moves the absorbed group's members into the survivor and leaves a
//! redirect behind, so stale handles still resolve to the live group.

use serde::{Deserialize, Serialize};

use crate::grid::SectionId;

/// Handle to a group in the `CompoundArena`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompoundId(pub u32);

/// Members of one open area, in the order they joined
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompoundGroup {
    members: Vec<SectionId>,
    merged_into: Option<CompoundId>,
}

impl CompoundGroup {
    pub fn members(&self) -> &[SectionId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The first section that joined; its style is shared by the whole group
    pub fn first(&self) -> Option<SectionId> {
        self.members.first().copied()
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.members.contains(&id)
    }
}

/// Owner of every compound group of a level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompoundArena {
    groups: Vec<CompoundGroup>,
}

impl CompoundArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group holding only `first`
    pub fn create(&mut self, first: SectionId) -> CompoundId {
        let id = CompoundId(self.groups.len() as u32);
        self.groups.push(CompoundGroup {
            members: vec![first],
            merged_into: None,
        });
        id
    }

    /// Follow merge redirects to the live group
    pub fn resolve(&self, mut id: CompoundId) -> CompoundId {
        while let Some(next) = self.groups[id.0 as usize].merged_into {
            id = next;
        }
        id
    }

    pub fn get(&self, id: CompoundId) -> &CompoundGroup {
        &self.groups[self.resolve(id).0 as usize]
    }

    /// Add a section to a group; adding an existing member is a no-op
    pub fn join(&mut self, id: CompoundId, section: SectionId) {
        let live = self.resolve(id);
        let group = &mut self.groups[live.0 as usize];
        if !group.members.contains(&section) {
            group.members.push(section);
        }
    }

    /// Merge the group of `absorbed` into the group of `survivor`
    ///
    /// Returns the live id of the merged group.
    pub fn merge(&mut self, survivor: CompoundId, absorbed: CompoundId) -> CompoundId {
        let keep = self.resolve(survivor);
        let gone = self.resolve(absorbed);
        if keep == gone {
            return keep;
        }

        let moved = std::mem::take(&mut self.groups[gone.0 as usize].members);
        self.groups[gone.0 as usize].merged_into = Some(keep);
        for section in moved {
            self.join(keep, section);
        }
        keep
    }

    /// Number of live (not absorbed) groups
    pub fn live_count(&self) -> usize {
        self.groups.iter().filter(|g| g.merged_into.is_none()).count()
    }
}
