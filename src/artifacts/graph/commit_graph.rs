//! Commit graph traversal
//!
//! Commits form a DAG where every node has up to two parents: the first parent
//! and, for merge commits, the merge parent. All traversals are iterative.
//!
//! ## Split point
//!
//! The split point of `source` and `target` is found in two phases:
//!
//! 1. Mark every ancestor of `target` (inclusive) as visited from the target side
//! 2. Walk breadth-first outward from `source`, following the first parent and
//!    then the merge parent of each commit in discovery order, and stop at the
//!    first commit that was also visited from the target side
//!
//! This is the *first* common ancestor met by the walk. When the source side
//! reaches an older common ancestor through a shorter path than a newer one,
//! the older one wins; it is not guaranteed to be a lowest common ancestor.
//!
//! ```rust,ignore
//! let graph = CommitGraph::new(|oid| Ok(database.load_commit(oid)?.slim()));
//! let split = graph.split_point(&current, &given)?;
//! ```

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// Read-only view of the commit DAG
///
/// Generic over the function loading a commit's parent edges, so the same
/// traversal runs against the object database or an in-memory store.
#[derive(Debug, Clone)]
pub struct CommitGraph<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> CommitGraph<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Every commit reachable from `oid` over both parent edges, `oid` included
    pub fn ancestors_of(&self, oid: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        let mut ancestors = HashSet::new();
        let mut stack = vec![oid.clone()];

        while let Some(current) = stack.pop() {
            if !ancestors.insert(current.clone()) {
                continue;
            }

            let commit = (self.commit_loader)(&current)?;
            stack.extend(
                commit
                    .parents
                    .into_iter()
                    .filter(|parent| !ancestors.contains(parent)),
            );
        }

        Ok(ancestors)
    }

    /// Whether `candidate` is `of` or one of its ancestors
    pub fn is_ancestor(&self, candidate: &ObjectId, of: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.ancestors_of(of)?.contains(candidate))
    }

    /// First common ancestor of `source` and `target` met by a breadth-first
    /// walk from `source`
    pub fn split_point(&self, source: &ObjectId, target: &ObjectId) -> anyhow::Result<ObjectId> {
        let mut states: HashMap<ObjectId, VisitState> = self
            .ancestors_of(target)?
            .into_iter()
            .map(|oid| (oid, VisitState::VISITED_FROM_TARGET))
            .collect();

        let mut queue = VecDeque::from([source.clone()]);
        while let Some(current) = queue.pop_front() {
            let state = states.entry(current.clone()).or_insert(VisitState::NONE);
            if state.contains(VisitState::VISITED_FROM_SOURCE) {
                continue;
            }
            *state |= VisitState::VISITED_FROM_SOURCE;

            if *state == VisitState::VISITED_FROM_BOTH {
                tracing::debug!(%source, %target, split_point = %current, "found split point");
                return Ok(current);
            }

            let commit = (self.commit_loader)(&current)?;
            queue.extend(commit.parents);
        }

        anyhow::bail!(
            "commits {} and {} share no common ancestor",
            source.to_short_oid(),
            target.to_short_oid()
        )
    }
}
