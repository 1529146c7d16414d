//! Executable lookup over an explicit list of directories.
//!
//! Layer 2 never shells out to `which`: it walks a [`SearchPath`] built from
//! `PATH`, optional extra directories, and optionally the bin directories of
//! version managers that a non-login process would not have on `PATH`
//! (nvm, volta, cargo, mise, pyenv, ...). Out-of-band installs through those
//! tools are exactly what package-manager listings miss.

use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Version manager install roots probed relative to the home directory,
/// with an env var that relocates the root.
struct ManagerDirs {
    env_var: Option<&'static str>,
    default_root: &'static str,
    bin_subpaths: &'static [&'static str],
}

const MANAGER_DIRS: &[ManagerDirs] = &[
    ManagerDirs {
        env_var: Some("CARGO_HOME"),
        default_root: ".cargo",
        bin_subpaths: &["bin"],
    },
    ManagerDirs {
        env_var: None,
        default_root: ".local",
        bin_subpaths: &["bin"],
    },
    ManagerDirs {
        env_var: Some("MISE_DATA_DIR"),
        default_root: ".local/share/mise",
        bin_subpaths: &["shims"],
    },
    ManagerDirs {
        env_var: Some("VOLTA_HOME"),
        default_root: ".volta",
        bin_subpaths: &["bin"],
    },
    ManagerDirs {
        env_var: Some("PYENV_ROOT"),
        default_root: ".pyenv",
        bin_subpaths: &["bin", "shims"],
    },
    ManagerDirs {
        env_var: Some("RBENV_ROOT"),
        default_root: ".rbenv",
        bin_subpaths: &["bin", "shims"],
    },
];

/// Ordered directories searched for executables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Search exactly the given directories.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        let mut path = Self::default();
        path.extend(dirs);
        path
    }

    /// Search the current process `PATH`.
    pub fn from_env() -> Self {
        Self::new(parse_system_path())
    }

    /// Append directories, skipping ones already present.
    pub fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, dirs: I) {
        for dir in dirs {
            if !self.dirs.contains(&dir) {
                self.dirs.push(dir);
            }
        }
    }

    /// Append the bin directories of version managers found on this host.
    pub fn with_version_managers(mut self) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        let found = probe_manager_dirs(&home, &|key: &str| std::env::var(key));
        self.extend(found);
        self
    }

    /// The directories, in search order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve a tool to the first executable match.
    ///
    /// Names containing a path separator are checked directly.
    pub fn resolve(&self, tool: &str) -> Option<PathBuf> {
        let tool = tool.trim();
        if tool.is_empty() {
            return None;
        }

        if tool.contains(std::path::MAIN_SEPARATOR) {
            let candidate = PathBuf::from(tool);
            return (candidate.is_file() && is_executable(&candidate)).then_some(candidate);
        }

        self.dirs.iter().find_map(|dir| {
            let candidate = dir.join(tool);
            (candidate.is_file() && is_executable(&candidate)).then_some(candidate)
        })
    }

    /// Whether any of the candidates resolves.
    pub fn any_resolves<S: AsRef<str>>(&self, candidates: &[S]) -> bool {
        candidates.iter().any(|c| self.resolve(c.as_ref()).is_some())
    }
}

/// Find existing version manager bin directories.
///
/// The env var wins over the default root so relocated installs
/// (e.g. `VOLTA_HOME=/opt/volta`) are found. nvm keeps one bin directory
/// per installed Node version; all of them are returned, newest name last.
fn probe_manager_dirs<F>(home: &Path, env_fn: &F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let mut found = Vec::new();

    for def in MANAGER_DIRS {
        let root = def
            .env_var
            .and_then(|var| env_fn(var).ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(def.default_root));

        for sub in def.bin_subpaths {
            let dir = root.join(sub);
            if dir.is_dir() {
                found.push(dir);
            }
        }
    }

    let nvm_root = env_fn("NVM_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home.join(".nvm"));
    if let Ok(entries) = std::fs::read_dir(nvm_root.join("versions").join("node")) {
        let mut versions: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path().join("bin"))
            .filter(|p| p.is_dir())
            .collect();
        versions.sort();
        found.extend(versions);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Create a fake binary at a path (creates parent dirs as needed).
    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[cfg(unix)]
    fn create_non_executable_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "not executable").unwrap();
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn resolve_finds_first_match() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_fake_binary(&dir_a.join("git"));
        create_fake_binary(&dir_b.join("git"));

        let path = SearchPath::new(vec![dir_a.clone(), dir_b]);
        assert_eq!(path.resolve("git"), Some(dir_a.join("git")));
    }

    #[test]
    fn resolve_returns_none_when_not_found() {
        let temp = TempDir::new().unwrap();
        let path = SearchPath::new(vec![temp.path().to_path_buf()]);
        assert!(path.resolve("git").is_none());
        assert!(path.resolve("").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_skips_non_executable() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_non_executable_file(&dir_a.join("node"));
        create_fake_binary(&dir_b.join("node"));

        let path = SearchPath::new(vec![dir_a, dir_b.clone()]);
        assert_eq!(path.resolve("node"), Some(dir_b.join("node")));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_accepts_absolute_paths() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("tool");
        create_fake_binary(&bin);

        let path = SearchPath::new(vec![]);
        assert_eq!(path.resolve(bin.to_str().unwrap()), Some(bin));
    }

    #[test]
    fn directories_ignored_as_executables() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("git")).unwrap();

        let path = SearchPath::new(vec![temp.path().to_path_buf()]);
        assert!(path.resolve("git").is_none());
    }

    #[test]
    fn extend_deduplicates() {
        let mut path = SearchPath::new(vec![PathBuf::from("/usr/bin")]);
        path.extend(vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
        assert_eq!(
            path.dirs(),
            &[PathBuf::from("/usr/bin"), PathBuf::from("/bin")]
        );
    }

    #[test]
    fn any_resolves_checks_all_candidates() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("python3"));

        let path = SearchPath::new(vec![temp.path().to_path_buf()]);
        assert!(path.any_resolves(&["python", "python3"]));
        assert!(!path.any_resolves(&["python2"]));
    }

    #[test]
    fn probe_finds_default_roots() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        create_fake_binary(&home.join(".cargo/bin/rg"));
        fs::create_dir_all(home.join(".pyenv/shims")).unwrap();

        let found = probe_manager_dirs(home, &|_| Err(std::env::VarError::NotPresent));

        assert!(found.contains(&home.join(".cargo/bin")));
        assert!(found.contains(&home.join(".pyenv/shims")));
        assert!(!found.contains(&home.join(".pyenv/bin")));
    }

    #[test]
    fn probe_checks_env_var_before_default() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let custom = temp.path().join("custom-volta");
        fs::create_dir_all(home.join(".volta/bin")).unwrap();
        fs::create_dir_all(custom.join("bin")).unwrap();
        let custom_str = custom.to_string_lossy().to_string();

        let found = probe_manager_dirs(&home, &|var| {
            if var == "VOLTA_HOME" {
                Ok(custom_str.clone())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        });

        assert!(found.contains(&custom.join("bin")));
        assert!(!found.contains(&home.join(".volta/bin")));
    }

    #[test]
    fn probe_lists_nvm_node_versions() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        create_fake_binary(&home.join(".nvm/versions/node/v18.19.0/bin/node"));
        create_fake_binary(&home.join(".nvm/versions/node/v20.11.1/bin/node"));

        let found = probe_manager_dirs(home, &|_| Err(std::env::VarError::NotPresent));

        let nvm: Vec<_> = found
            .iter()
            .filter(|p| p.starts_with(home.join(".nvm")))
            .collect();
        assert_eq!(nvm.len(), 2);
        assert!(nvm[1].ends_with("v20.11.1/bin"));
    }

    #[test]
    fn probe_returns_nothing_for_empty_home() {
        let temp = TempDir::new().unwrap();
        let found = probe_manager_dirs(temp.path(), &|_| Err(std::env::VarError::NotPresent));
        assert!(found.is_empty());
    }
}
