//! User-facing commands
//!
//! Each command is an inherent method on [`Repository`](crate::areas::repository::Repository)
//! that checks every precondition before it mutates the object store, the
//! refs, the staging index or the working tree, and writes its output through
//! the repository writer.
//!
//! ## Commands
//!
//! - `init`: Create the repository directory and the root commit
//! - `add` / `rm`: Stage additions and removals
//! - `commit`: Record the staged snapshot
//! - `log`: Show commit history (`log`, `global-log`, `find`)
//! - `status`: Show branches, staged changes and working tree changes
//! - `branch`: Create or delete branches
//! - `checkout`: Switch branches, restore files, reset
//! - `merge`: Three-way merge of another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod rm;
pub mod status;
