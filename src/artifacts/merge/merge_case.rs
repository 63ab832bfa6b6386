//! Merge case classification
//!
//! Every path present in at least one of the split point, the current commit
//! and the given commit falls into exactly one of thirteen cases, decided by
//! where the path is present and which of its versions are equal:
//!
//! | #  | split | current | given | condition                 | action                |
//! |----|-------|---------|-------|---------------------------|-----------------------|
//! | 1  | yes   | yes     | yes   | current = split != given  | take given            |
//! | 2  | yes   | yes     | yes   | given = split != current  | keep                  |
//! | 3  | yes   | yes     | yes   | current = given           | keep                  |
//! | 4  | yes   | no      | no    |                           | keep                  |
//! | 5  | no    | yes     | no    |                           | keep                  |
//! | 6  | no    | no      | yes   |                           | take given            |
//! | 7  | yes   | yes     | no    | current = split           | remove                |
//! | 8  | yes   | no      | yes   | given = split             | keep                  |
//! | 9  | no    | yes     | yes   | current = given           | keep                  |
//! | 10 | yes   | yes     | yes   | all three differ          | conflict, both sides  |
//! | 11 | yes   | yes     | no    | current != split          | conflict, current only|
//! | 12 | yes   | no      | yes   | given != split            | conflict, given only  |
//! | 13 | no    | yes     | yes   | current != given          | conflict, both sides  |

use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;

bitflags! {
    /// Where a path is present
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Presence: u8 {
        const SPLIT = 0b001;
        const CURRENT = 0b010;
        const GIVEN = 0b100;
    }
}

/// What the merge does to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// Leave the working file and the staging index alone
    Keep,
    /// Check out the given version and stage it
    TakeGiven,
    /// Delete the working file and stage its removal
    Remove,
    /// Write conflict markers and stage the result
    Conflict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeCase {
    ModifiedInGiven,
    ModifiedInCurrent,
    ModifiedIdentically,
    RemovedInBoth,
    AddedInCurrent,
    AddedInGiven,
    RemovedInGiven,
    RemovedInCurrent,
    AddedIdentically,
    ModifiedDifferently,
    ModifiedInCurrentRemovedInGiven,
    RemovedInCurrentModifiedInGiven,
    AddedDifferently,
}

impl MergeCase {
    /// Classify a path from its version in each of the three snapshots
    ///
    /// Returns `None` for a path absent from all three.
    pub fn classify(
        split: Option<&ObjectId>,
        current: Option<&ObjectId>,
        given: Option<&ObjectId>,
    ) -> Option<Self> {
        let mut presence = Presence::empty();
        presence.set(Presence::SPLIT, split.is_some());
        presence.set(Presence::CURRENT, current.is_some());
        presence.set(Presence::GIVEN, given.is_some());

        let all = Presence::SPLIT | Presence::CURRENT | Presence::GIVEN;
        let case = match presence {
            p if p == all => {
                if current == given {
                    MergeCase::ModifiedIdentically
                } else if current == split {
                    MergeCase::ModifiedInGiven
                } else if given == split {
                    MergeCase::ModifiedInCurrent
                } else {
                    MergeCase::ModifiedDifferently
                }
            }
            p if p == Presence::SPLIT => MergeCase::RemovedInBoth,
            p if p == Presence::CURRENT => MergeCase::AddedInCurrent,
            p if p == Presence::GIVEN => MergeCase::AddedInGiven,
            p if p == Presence::SPLIT | Presence::CURRENT => {
                if current == split {
                    MergeCase::RemovedInGiven
                } else {
                    MergeCase::ModifiedInCurrentRemovedInGiven
                }
            }
            p if p == Presence::SPLIT | Presence::GIVEN => {
                if given == split {
                    MergeCase::RemovedInCurrent
                } else {
                    MergeCase::RemovedInCurrentModifiedInGiven
                }
            }
            p if p == Presence::CURRENT | Presence::GIVEN => {
                if current == given {
                    MergeCase::AddedIdentically
                } else {
                    MergeCase::AddedDifferently
                }
            }
            _ => return None,
        };

        Some(case)
    }

    /// Position of the case in the merge table
    pub fn number(&self) -> u8 {
        match self {
            MergeCase::ModifiedInGiven => 1,
            MergeCase::ModifiedInCurrent => 2,
            MergeCase::ModifiedIdentically => 3,
            MergeCase::RemovedInBoth => 4,
            MergeCase::AddedInCurrent => 5,
            MergeCase::AddedInGiven => 6,
            MergeCase::RemovedInGiven => 7,
            MergeCase::RemovedInCurrent => 8,
            MergeCase::AddedIdentically => 9,
            MergeCase::ModifiedDifferently => 10,
            MergeCase::ModifiedInCurrentRemovedInGiven => 11,
            MergeCase::RemovedInCurrentModifiedInGiven => 12,
            MergeCase::AddedDifferently => 13,
        }
    }

    pub fn action(&self) -> MergeAction {
        match self {
            MergeCase::ModifiedInGiven | MergeCase::AddedInGiven => MergeAction::TakeGiven,
            MergeCase::RemovedInGiven => MergeAction::Remove,
            MergeCase::ModifiedDifferently
            | MergeCase::ModifiedInCurrentRemovedInGiven
            | MergeCase::RemovedInCurrentModifiedInGiven
            | MergeCase::AddedDifferently => MergeAction::Conflict,
            MergeCase::ModifiedInCurrent
            | MergeCase::ModifiedIdentically
            | MergeCase::RemovedInBoth
            | MergeCase::AddedInCurrent
            | MergeCase::RemovedInCurrent
            | MergeCase::AddedIdentically => MergeAction::Keep,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.action() == MergeAction::Conflict
    }
}
