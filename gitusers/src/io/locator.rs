//! Repository discovery: walk upward from a directory looking for `.git`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

/// Name of the repository metadata entry.
pub const GIT_ENTRY: &str = ".git";
const GITDIR_PREFIX: &str = "gitdir:";
/// File inside a linked worktree's gitdir naming the shared metadata directory.
const COMMONDIR_FILE: &str = "commondir";

/// A located repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Directory containing the `.git` entry.
    pub root: PathBuf,
    /// Metadata directory (`.git` itself, or the target of a `gitdir:` file).
    pub git_dir: PathBuf,
    /// Directory holding the shared config. Differs from `git_dir` only in
    /// linked worktrees, where `git_dir/commondir` points back at the main
    /// repository's metadata.
    pub common_dir: PathBuf,
}

impl Repository {
    /// Path of the repository-local config file.
    pub fn config_path(&self) -> PathBuf {
        self.common_dir.join("config")
    }
}

/// Find the repository enclosing `start`.
///
/// Ancestors listed in `ceilings` (and everything above them) are not
/// searched, like git's `GIT_CEILING_DIRECTORIES`; `start` itself always is.
/// `Ok(None)` when the walk ends without finding `.git`.
/// A `.git` file without a `gitdir:` line is an error.
pub fn find_repository(start: &Path, ceilings: &[PathBuf]) -> Result<Option<Repository>> {
    for dir in start.ancestors() {
        if dir != start && ceilings.iter().any(|ceiling| ceiling == dir) {
            debug!(ceiling = %dir.display(), "stopped at ceiling directory");
            break;
        }
        let entry = dir.join(GIT_ENTRY);
        let meta = match fs::metadata(&entry) {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("stat {}", entry.display()));
            }
        };
        let git_dir = if meta.is_file() {
            resolve_gitdir_file(&entry)?
        } else {
            entry
        };
        let common_dir = resolve_common_dir(&git_dir)?;
        debug!(
            root = %dir.display(),
            git_dir = %git_dir.display(),
            common_dir = %common_dir.display(),
            "found repository"
        );
        return Ok(Some(Repository {
            root: dir.to_path_buf(),
            git_dir,
            common_dir,
        }));
    }
    debug!(start = %start.display(), "no repository found");
    Ok(None)
}

/// Resolve a `gitdir: <path>` redirect file (submodules, linked worktrees).
fn resolve_gitdir_file(entry: &Path) -> Result<PathBuf> {
    let contents =
        fs::read_to_string(entry).with_context(|| format!("read {}", entry.display()))?;
    let target = contents
        .lines()
        .find_map(|line| line.trim().strip_prefix(GITDIR_PREFIX))
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .ok_or_else(|| anyhow!("{} has no gitdir line", entry.display()))?;
    let parent = entry
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", entry.display()))?;
    Ok(clean_path(&parent.join(target)))
}

/// Follow `git_dir/commondir` when present; otherwise `git_dir` is the common dir.
fn resolve_common_dir(git_dir: &Path) -> Result<PathBuf> {
    let pointer = git_dir.join(COMMONDIR_FILE);
    let contents = match fs::read_to_string(&pointer) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(git_dir.to_path_buf());
        }
        Err(err) => return Err(err).with_context(|| format!("read {}", pointer.display())),
    };
    let target = contents.trim();
    if target.is_empty() {
        return Err(anyhow!("{} is empty", pointer.display()));
    }
    Ok(clean_path(&git_dir.join(target)))
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
/// Symlinks are not resolved.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_git_dir_in_ancestor() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join(".git")).expect("git dir");
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).expect("nested");

        let repo = find_repository(&nested, &[]).expect("find").expect("repo");
        assert_eq!(repo.root, root);
        assert_eq!(repo.git_dir, root.join(".git"));
        assert_eq!(repo.common_dir, root.join(".git"));
        assert_eq!(repo.config_path(), root.join(".git").join("config"));
    }

    #[test]
    fn ceiling_stops_the_walk() {
        let temp = tempfile::tempdir().expect("tempdir");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("nested");

        let found = find_repository(&nested, &[temp.path().to_path_buf()]).expect("find");
        assert_eq!(found, None);
    }

    #[test]
    fn ceiling_does_not_hide_git_in_start_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(temp.path().join(".git")).expect("git dir");

        let repo = find_repository(temp.path(), &[temp.path().to_path_buf()])
            .expect("find")
            .expect("repo");
        assert_eq!(repo.root, temp.path());
    }

    #[test]
    fn linked_worktree_reads_config_from_common_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let main_git = temp.path().join("main").join(".git");
        let wt_meta = main_git.join("worktrees").join("wt");
        fs::create_dir_all(&wt_meta).expect("worktree meta");
        fs::write(wt_meta.join("commondir"), "../..\n").expect("commondir");
        let wt = temp.path().join("wt");
        fs::create_dir_all(&wt).expect("worktree");
        fs::write(wt.join(".git"), format!("gitdir: {}\n", wt_meta.display())).expect("write");

        let repo = find_repository(&wt, &[]).expect("find").expect("repo");
        assert_eq!(repo.git_dir, wt_meta);
        assert_eq!(repo.common_dir, main_git);
        assert_eq!(repo.config_path(), main_git.join("config"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_gitdir_file_is_followed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let pointer = temp.path().join("pointer");
        fs::write(&pointer, "gitdir: meta\n").expect("write");
        let repo_dir = temp.path().join("repo");
        fs::create_dir_all(&repo_dir).expect("repo");
        std::os::unix::fs::symlink(&pointer, repo_dir.join(".git")).expect("symlink");

        let repo = find_repository(&repo_dir, &[]).expect("find").expect("repo");
        assert_eq!(repo.git_dir, repo_dir.join("meta"));
    }

    #[test]
    fn resolves_gitdir_file_relative_to_parent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let sub = temp.path().join("sub");
        fs::create_dir_all(&sub).expect("sub");
        fs::write(sub.join(".git"), "gitdir: ../modules/foo\n").expect("write");

        let repo = find_repository(&sub, &[]).expect("find").expect("repo");
        assert_eq!(repo.root, sub);
        assert_eq!(repo.git_dir, temp.path().join("modules").join("foo"));
    }

    #[test]
    fn absolute_gitdir_is_kept() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().join("elsewhere").join("meta");
        fs::write(
            temp.path().join(".git"),
            format!("gitdir: {}\n", target.display()),
        )
        .expect("write");

        let repo = find_repository(temp.path(), &[]).expect("find").expect("repo");
        assert_eq!(repo.git_dir, target);
    }

    #[test]
    fn gitdir_file_without_redirect_is_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(".git"), "nonsense\n").expect("write");
        assert!(find_repository(temp.path(), &[]).is_err());
    }

    #[test]
    fn clean_path_folds_parent_components() {
        assert_eq!(
            clean_path(Path::new("/a/b/./../c/d/..")),
            PathBuf::from("/a/c")
        );
        assert_eq!(clean_path(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(clean_path(Path::new("../x/../y")), PathBuf::from("../y"));
    }
}
