//! Configuration types for scrubbing.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! partial configuration file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining scan and rewrite settings.
//! - [`ScanConfig`] - Which documents are processed and where script assets live.
//! - [`RewriteConfig`] - How the rewriter matches deleted identifiers.
//!
//! # Example
//!
//! ```
//! # use scrub::config::{AppConfig, MatchMode};
//! let config = AppConfig::default();
//! assert_eq!(config.rewrite().match_mode(), MatchMode::Reference);
//! assert_eq!(config.scan().extensions(), ["prefab"]);
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Scan configuration section.
    #[serde(default)]
    scan: ScanConfig,

    /// Rewrite configuration section.
    #[serde(default)]
    rewrite: RewriteConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(scan: ScanConfig, rewrite: RewriteConfig) -> Self {
        Self { scan, rewrite }
    }

    /// Returns the scan configuration.
    pub fn scan(&self) -> &ScanConfig {
        &self.scan
    }

    /// Returns the rewrite configuration.
    pub fn rewrite(&self) -> &RewriteConfig {
        &self.rewrite
    }
}

/// Document discovery and script registry settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions of documents to process, without the dot.
    extensions: Vec<String>,

    /// Directories, relative to the project root, searched for `.meta` files
    /// declaring script guids.
    script_roots: Vec<String>,

    /// Extra script guids treated as resolvable.
    known_guids: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["prefab".to_string()],
            script_roots: vec![
                "Assets".to_string(),
                "Packages".to_string(),
                "Library/PackageCache".to_string(),
            ],
            known_guids: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Creates a scan configuration.
    pub fn new(extensions: Vec<String>, script_roots: Vec<String>, known_guids: Vec<String>) -> Self {
        Self {
            extensions,
            script_roots,
            known_guids,
        }
    }

    /// Document file extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Script registry roots.
    pub fn script_roots(&self) -> &[String] {
        &self.script_roots
    }

    /// Guids always treated as resolvable.
    pub fn known_guids(&self) -> &[String] {
        &self.known_guids
    }
}

/// Rewriter settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewriteConfig {
    #[serde(default)]
    match_mode: MatchMode,
}

impl RewriteConfig {
    /// Creates a rewrite configuration.
    pub fn new(match_mode: MatchMode) -> Self {
        Self { match_mode }
    }

    /// How lines are tested for deleted identifiers.
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }
}

/// How the rewriter decides that a line mentions an identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The identifier must stand alone as in [`MatchMode::Token`] and appear
    /// in a reference position: right after `&` (a block header) or after
    /// `fileID:` (an object reference). Class numbers, counters and guids
    /// never match.
    #[default]
    Reference,

    /// The identifier must stand alone: it may not be preceded by an ASCII
    /// alphanumeric or `-`, nor followed by an ASCII alphanumeric.
    Token,

    /// Plain substring containment. `20` matches inside `201`.
    Substring,
}
