use crate::areas::repository::Repository;
use crate::artifacts::branch::{HEAD_REF_NAME, REF_ALIASES};
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

/// A user-supplied reference to a commit
///
/// Supported formats:
/// - `HEAD` and its alias `@`: the commit of the current branch
/// - Full ids: 40 hexadecimal characters, looked up directly
/// - Abbreviated ids: any shorter hexadecimal prefix, matched against every
///   stored commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Head,
    CommitId(String),
}

impl Revision {
    pub fn parse(revision: &str) -> Self {
        let revision = REF_ALIASES.get(revision).copied().unwrap_or(revision);

        if revision == HEAD_REF_NAME {
            Revision::Head
        } else {
            Revision::CommitId(revision.to_string())
        }
    }

    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Head => repository.refs().current_commit(),
            Revision::CommitId(id) => Self::resolve_oid(id, repository),
        }
    }

    fn resolve_oid(id: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if !Self::looks_like_oid(id) {
            anyhow::bail!(RepositoryError::CommitNotFound);
        }

        if id.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(id.to_string())?;
            if !repository.database().contains(ObjectType::Commit, &oid) {
                anyhow::bail!(RepositoryError::CommitNotFound);
            }
            return Ok(oid);
        }

        let mut candidates = repository.database().find_commits_by_prefix(id)?;
        match candidates.len() {
            0 => anyhow::bail!(RepositoryError::CommitNotFound),
            1 => Ok(candidates.remove(0)),
            count => {
                tracing::debug!(prefix = id, ?candidates, "ambiguous commit id");
                anyhow::bail!(RepositoryError::AmbiguousCommitId {
                    prefix: id.to_string(),
                    candidates: count,
                })
            }
        }
    }

    fn looks_like_oid(id: &str) -> bool {
        !id.is_empty() && id.len() <= OBJECT_ID_LENGTH && id.chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Commit;
    use crate::artifacts::objects::snapshot::Snapshot;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;

    #[fixture]
    fn repository() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repository = Repository::new(dir.path(), Box::new(std::io::sink())).unwrap();
        repository.init().unwrap();

        (dir, repository)
    }

    fn store_commits(repository: &Repository, count: usize) -> Vec<ObjectId> {
        let root = Commit::root();

        (0..count)
            .map(|i| {
                let commit = Commit::new(
                    Some(root.oid().clone()),
                    None,
                    Snapshot::empty(),
                    "Sun Jan 1 12:00:00 2023 +0000".to_string(),
                    format!("commit {i}"),
                )
                .unwrap();
                repository.database().store_commit(&commit).unwrap();
                commit.oid().clone()
            })
            .collect()
    }

    #[rstest]
    #[case("HEAD", Revision::Head)]
    #[case("@", Revision::Head)]
    #[case("abc123", Revision::CommitId("abc123".to_string()))]
    fn aliases_are_expanded(#[case] input: &str, #[case] expected: Revision) {
        assert_eq!(Revision::parse(input), expected);
    }

    #[rstest]
    fn head_resolves_to_the_current_branch_commit(repository: (TempDir, Repository)) {
        let (_dir, repository) = repository;

        assert_eq!(
            Revision::parse("@").resolve(&repository).unwrap(),
            Commit::root().oid().clone()
        );
    }

    #[rstest]
    fn full_and_abbreviated_ids_resolve(repository: (TempDir, Repository)) {
        let (_dir, repository) = repository;
        let oid = Commit::root().oid().clone();

        for input in [oid.as_ref(), &oid.as_ref()[..8], &oid.as_ref().to_uppercase()[..8]] {
            assert_eq!(Revision::parse(input).resolve(&repository).unwrap(), oid);
        }
    }

    #[rstest]
    #[case("not-hex")]
    #[case("")]
    #[case("0000000000000000000000000000000000000000")]
    fn unknown_ids_are_not_found(repository: (TempDir, Repository), #[case] input: &str) {
        let (_dir, repository) = repository;

        let error = Revision::parse(input).resolve(&repository).unwrap_err();

        assert_eq!(
            error.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::CommitNotFound)
        );
    }

    #[rstest]
    fn shared_prefixes_are_ambiguous(repository: (TempDir, Repository)) {
        let (_dir, repository) = repository;
        // 17 ids over 16 possible first characters: at least two share one
        let oids = store_commits(&repository, 17);
        let mut by_first_char: HashMap<char, usize> = HashMap::new();
        for oid in oids.iter().chain(std::iter::once(Commit::root().oid())) {
            *by_first_char
                .entry(oid.as_ref().chars().next().unwrap())
                .or_default() += 1;
        }
        let (prefix, count) = by_first_char
            .into_iter()
            .find(|(_, count)| *count > 1)
            .unwrap();

        let error = Revision::parse(&prefix.to_string())
            .resolve(&repository)
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::AmbiguousCommitId {
                prefix: prefix.to_string(),
                candidates: count,
            })
        );
    }
}
