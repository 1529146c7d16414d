//! Package manager adapters.
//!
//! Each supported manager has exactly one listing command that prints every
//! installed package, and a normalizer turning that output into canonical
//! package names.

use crate::detection::search_path::SearchPath;
use crate::error::{PkgsenseError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Zypper,
    Apk,
    Brew,
}

impl PackageManagerKind {
    /// Every supported manager, in host detection order.
    pub fn all() -> &'static [PackageManagerKind] {
        &[
            PackageManagerKind::Apt,
            PackageManagerKind::Dnf,
            PackageManagerKind::Yum,
            PackageManagerKind::Pacman,
            PackageManagerKind::Zypper,
            PackageManagerKind::Apk,
            PackageManagerKind::Brew,
        ]
    }

    /// Parse an identifier, case-insensitively.
    pub fn parse(id: &str) -> Result<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "apt" | "apt-get" => Ok(PackageManagerKind::Apt),
            "dnf" => Ok(PackageManagerKind::Dnf),
            "yum" => Ok(PackageManagerKind::Yum),
            "pacman" => Ok(PackageManagerKind::Pacman),
            "zypper" => Ok(PackageManagerKind::Zypper),
            "apk" => Ok(PackageManagerKind::Apk),
            "brew" | "homebrew" => Ok(PackageManagerKind::Brew),
            _ => Err(PkgsenseError::UnknownPackageManager {
                manager: id.trim().to_string(),
            }),
        }
    }

    /// Canonical identifier.
    pub fn id(&self) -> &'static str {
        match self {
            PackageManagerKind::Apt => "apt",
            PackageManagerKind::Dnf => "dnf",
            PackageManagerKind::Yum => "yum",
            PackageManagerKind::Pacman => "pacman",
            PackageManagerKind::Zypper => "zypper",
            PackageManagerKind::Apk => "apk",
            PackageManagerKind::Brew => "brew",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            PackageManagerKind::Apt => "APT (dpkg)",
            PackageManagerKind::Dnf => "DNF",
            PackageManagerKind::Yum => "YUM",
            PackageManagerKind::Pacman => "pacman",
            PackageManagerKind::Zypper => "Zypper",
            PackageManagerKind::Apk => "apk",
            PackageManagerKind::Brew => "Homebrew",
        }
    }

    /// The single listing command: program and arguments.
    pub fn listing_command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            PackageManagerKind::Apt => ("dpkg", &["-l"]),
            PackageManagerKind::Dnf => ("dnf", &["list", "installed"]),
            PackageManagerKind::Yum => ("yum", &["list", "installed"]),
            PackageManagerKind::Pacman => ("pacman", &["-Qq"]),
            PackageManagerKind::Zypper => ("zypper", &["se", "--installed-only"]),
            PackageManagerKind::Apk => ("apk", &["info"]),
            PackageManagerKind::Brew => ("brew", &["list"]),
        }
    }

    /// The listing command as one display string.
    pub fn listing_command_line(&self) -> String {
        let (program, args) = self.listing_command();
        std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Binaries whose presence identifies this manager on a host.
    fn marker_binaries(&self) -> &'static [&'static str] {
        match self {
            PackageManagerKind::Apt => &["dpkg", "apt-get"],
            PackageManagerKind::Dnf => &["dnf"],
            PackageManagerKind::Yum => &["yum"],
            PackageManagerKind::Pacman => &["pacman"],
            PackageManagerKind::Zypper => &["zypper"],
            PackageManagerKind::Apk => &["apk"],
            PackageManagerKind::Brew => &["brew"],
        }
    }

    /// Pick the host's manager: the first whose marker binary resolves.
    pub fn detect(search_path: &SearchPath) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| search_path.any_resolves(kind.marker_binaries()))
    }

    /// Parse listing output into the set of installed package names.
    pub fn normalize(&self, output: &str) -> HashSet<String> {
        match self {
            PackageManagerKind::Apt => parse_dpkg(output),
            PackageManagerKind::Dnf | PackageManagerKind::Yum => parse_rpm_list(output),
            PackageManagerKind::Zypper => parse_zypper(output),
            PackageManagerKind::Pacman | PackageManagerKind::Apk => parse_lines(output),
            PackageManagerKind::Brew => output.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl FromStr for PackageManagerKind {
    type Err = PkgsenseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// `dpkg -l`: keep `ii` (installed) and `hi` (held) rows, drop `:arch`.
fn parse_dpkg(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let status = cols.next()?;
            if status != "ii" && status != "hi" {
                return None;
            }
            let name = cols.next()?;
            let name = name.split_once(':').map_or(name, |(base, _)| base);
            Some(name.to_string())
        })
        .collect()
}

/// `dnf/yum list installed`: `name.arch  version  repo`.
///
/// Header lines have no `.` in the first token; wrapped continuation lines
/// start with whitespace.
fn parse_rpm_list(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| {
            let first = line.split_whitespace().next()?;
            let (name, _arch) = first.rsplit_once('.')?;
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// `zypper se --installed-only`: `S | Name | Summary | Type` table rows.
fn parse_zypper(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut cols = line.split('|').map(str::trim);
            let status = cols.next()?;
            let name = cols.next()?;
            (status.starts_with('i') && !name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

fn parse_lines(output: &str) -> HashSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn parse_is_case_insensitive_and_trimmed() {
        assert_eq!(
            PackageManagerKind::parse("  APT ").unwrap(),
            PackageManagerKind::Apt
        );
        assert_eq!(
            "apt-get".parse::<PackageManagerKind>().unwrap(),
            PackageManagerKind::Apt
        );
        assert_eq!(
            PackageManagerKind::parse("Pacman").unwrap(),
            PackageManagerKind::Pacman
        );
    }

    #[test]
    fn parse_unknown_manager_fails() {
        let err = PackageManagerKind::parse("portage").unwrap_err();
        assert!(matches!(
            err,
            PkgsenseError::UnknownPackageManager { ref manager } if manager == "portage"
        ));
    }

    #[test]
    fn ids_round_trip() {
        for kind in PackageManagerKind::all() {
            assert_eq!(PackageManagerKind::parse(kind.id()).unwrap(), *kind);
        }
    }

    #[test]
    fn listing_command_lines() {
        assert_eq!(PackageManagerKind::Apt.listing_command_line(), "dpkg -l");
        assert_eq!(
            PackageManagerKind::Dnf.listing_command_line(),
            "dnf list installed"
        );
        assert_eq!(PackageManagerKind::Pacman.listing_command_line(), "pacman -Qq");
        assert_eq!(
            PackageManagerKind::Zypper.listing_command_line(),
            "zypper se --installed-only"
        );
    }

    #[test]
    fn normalize_dpkg() {
        let output = "\
Desired=Unknown/Install/Remove/Purge/Hold
| Status=Not/Inst/Conf-files/Unpacked/halF-conf/Half-inst/trig-aWait/Trig-pend
||/ Name           Version      Architecture Description
+++-==============-============-============-=================================
ii  git            1:2.43.0-1   amd64        fast, scalable, distributed revision control system
hi  libc6:amd64    2.39-0       amd64        GNU C Library
rc  oldpkg         1.0          amd64        removed but configured
un  ghost          <none>       <none>       (no description available)
";
        assert_eq!(
            PackageManagerKind::Apt.normalize(output),
            set(&["git", "libc6"])
        );
    }

    #[test]
    fn normalize_dnf() {
        let output = "\
Installed Packages
bash.x86_64                    5.2.15-3.fc38          @anaconda
python3-libs.x86_64            3.11.4-1.fc38          @updates
a-very-long-package-name-that-wraps.noarch
                               1.0-1.fc38             @fedora
";
        assert_eq!(
            PackageManagerKind::Dnf.normalize(output),
            set(&["bash", "python3-libs", "a-very-long-package-name-that-wraps"])
        );
    }

    #[test]
    fn normalize_yum_keeps_dots_in_name() {
        let output = "Installed Packages\npython3.11.x86_64   3.11.2-1   @base\n";
        assert_eq!(
            PackageManagerKind::Yum.normalize(output),
            set(&["python3.11"])
        );
    }

    #[test]
    fn normalize_zypper() {
        let output = "\
Loading repository data...
Reading installed packages...

S  | Name       | Summary                  | Type
---+------------+--------------------------+--------
i+ | git        | Fast version control     | package
i  | vim        | Vi IMproved              | package
v  | other      | Different version        | package
";
        assert_eq!(
            PackageManagerKind::Zypper.normalize(output),
            set(&["git", "vim"])
        );
    }

    #[test]
    fn normalize_one_per_line() {
        let output = "git\n\n  curl \nbase-devel\n";
        let expected = set(&["git", "curl", "base-devel"]);
        assert_eq!(PackageManagerKind::Pacman.normalize(output), expected);
        assert_eq!(PackageManagerKind::Apk.normalize(output), expected);
    }

    #[test]
    fn normalize_brew_columns() {
        let output = "git\t\tnode\nripgrep   visual-studio-code\n";
        assert_eq!(
            PackageManagerKind::Brew.normalize(output),
            set(&["git", "node", "ripgrep", "visual-studio-code"])
        );
    }

    #[test]
    fn normalize_empty_output() {
        for kind in PackageManagerKind::all() {
            assert!(kind.normalize("").is_empty());
        }
    }

    #[cfg(unix)]
    #[test]
    fn detect_picks_first_marker_in_order() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        for bin in ["pacman", "brew"] {
            let path = temp.path().join(bin);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let search = SearchPath::new(vec![temp.path().to_path_buf()]);
        assert_eq!(
            PackageManagerKind::detect(&search),
            Some(PackageManagerKind::Pacman)
        );
    }

    #[test]
    fn detect_none_on_empty_path() {
        let temp = TempDir::new().unwrap();
        let search = SearchPath::new(vec![temp.path().to_path_buf()]);
        assert_eq!(PackageManagerKind::detect(&search), None);
    }
}
