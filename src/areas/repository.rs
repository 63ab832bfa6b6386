use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::staging::StagingIndex;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use std::cell::{Ref, RefCell, RefMut};
use std::path::Path;

/// Name of the directory holding all repository state
pub const REPOSITORY_DIR: &str = ".twig";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    staging: RefCell<StagingIndex>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let repository_path = path.join(REPOSITORY_DIR);

        let staging = StagingIndex::new(repository_path.join("staging").into_boxed_path());
        let database = Database::new(repository_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(repository_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            staging: RefCell::new(staging),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository_path(&self) -> Box<Path> {
        self.path.join(REPOSITORY_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.repository_path().is_dir()
    }

    /// Fail unless the repository exists, then load the staging index
    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            anyhow::bail!(RepositoryError::NotInitialized);
        }

        self.staging_mut().rehydrate()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn staging(&self) -> Ref<'_, StagingIndex> {
        self.staging.borrow()
    }

    pub fn staging_mut(&self) -> RefMut<'_, StagingIndex> {
        self.staging.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// The commit the current branch points at
    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.database.load_commit(&self.refs.current_commit()?)
    }

    pub fn commit_graph(
        &self,
    ) -> CommitGraph<impl Fn(&ObjectId) -> anyhow::Result<SlimCommit> + '_> {
        CommitGraph::new(|oid: &ObjectId| Ok(self.database.load_commit(oid)?.slim()))
    }
}
