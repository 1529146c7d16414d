//! Package-token to binary heuristics used by Layer 2.
//!
//! An entry is *strong* when a listed binary is the package's own program
//! (`git` for `git`); finding it settles the question. An entry is *weak* when
//! the binaries are proxies that other packages also ship (`gcc` for
//! `build-essential`), so a hit is only a guess for Layer 3 to confirm.

use std::collections::BTreeMap;

/// Candidate binaries for one package token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicEntry {
    pub binaries: Vec<String>,
    pub weak: bool,
}

/// `(token, binaries, weak)`
const BUILTIN: &[(&str, &[&str], bool)] = &[
    (
        "python3",
        &[
            "python3",
            "python3.8",
            "python3.9",
            "python3.10",
            "python3.11",
            "python3.12",
        ],
        false,
    ),
    ("python", &["python", "python2", "python3"], false),
    ("pip", &["pip", "pip3", "pip2"], false),
    ("nodejs", &["node", "nodejs"], false),
    ("npm", &["npm"], false),
    ("openjdk", &["java", "javac"], true),
    ("default-jdk", &["java", "javac"], true),
    ("java", &["java", "javac"], false),
    ("docker", &["docker"], false),
    ("docker.io", &["docker"], true),
    ("docker-ce", &["docker"], true),
    ("mysql-server", &["mysqld", "mysql"], true),
    ("postgresql", &["postgres", "psql"], true),
    ("redis-server", &["redis-server", "redis-cli"], true),
    ("build-essential", &["gcc", "g++", "make"], true),
    ("curl", &["curl"], false),
    ("wget", &["wget"], false),
    ("git", &["git"], false),
    ("vim", &["vim", "vi"], false),
    ("nano", &["nano"], false),
    ("htop", &["htop"], false),
    ("tree", &["tree"], false),
    ("code", &["code"], false),
    ("sublime-text", &["subl"], false),
    ("atom", &["atom"], false),
];

/// Lookup table from package token to candidate binaries.
#[derive(Debug, Clone, Default)]
pub struct HeuristicTable {
    entries: BTreeMap<String, HeuristicEntry>,
}

impl HeuristicTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(token, binaries, weak)| {
                (
                    token.to_string(),
                    HeuristicEntry {
                        binaries: binaries.iter().map(|b| b.to_string()).collect(),
                        weak: *weak,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Layer user entries over this table. User entries are strong.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Vec<String>>) -> Self {
        for (token, binaries) in overrides {
            let binaries: Vec<String> = binaries
                .iter()
                .map(|b| b.trim())
                .filter(|b| !b.is_empty())
                .map(str::to_string)
                .collect();
            if binaries.is_empty() {
                continue;
            }
            self.entries.insert(
                token.trim().to_string(),
                HeuristicEntry {
                    binaries,
                    weak: false,
                },
            );
        }
        self
    }

    pub fn get(&self, token: &str) -> Option<&HeuristicEntry> {
        self.entries.get(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
