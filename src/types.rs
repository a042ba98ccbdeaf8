use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Coarse classification of a web project's framework or build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Nextjs,
    Vite,
    Astro,
    Svelte,
    Nuxt,
    Remix,
    Plain,
    Unknown,
}

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Nextjs => "nextjs",
            ProjectType::Vite => "vite",
            ProjectType::Astro => "astro",
            ProjectType::Svelte => "svelte",
            ProjectType::Nuxt => "nuxt",
            ProjectType::Remix => "remix",
            ProjectType::Plain => "plain",
            ProjectType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A standalone stylesheet.
    File,
    /// The first `<style>` element of an HTML document.
    Inline,
}

/// The single destination generated CSS is written to.
///
/// `path` is relative to the project root, `/`-separated and free of `.`
/// and `..` segments. For inline targets it names the HTML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssTarget {
    pub kind: TargetKind,
    pub path: String,
}

impl CssTarget {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::File,
            path: path.into(),
        }
    }

    pub fn inline(html_path: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Inline,
            path: html_path.into(),
        }
    }

    pub fn is_inline(&self) -> bool {
        self.kind == TargetKind::Inline
    }
}

/// Everything detection learned about a project root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub root_dir: PathBuf,
    /// Conventional stylesheet locations that exist, highest priority first.
    pub css_files: Vec<String>,
    pub css_target: Option<CssTarget>,
    pub has_tailwind: bool,
}

/// The eight palette slots a theme fills in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub primary_shadow: String,
    pub accent: String,
    pub accent_shadow: String,
    pub background: String,
    pub card_background: String,
    pub text: String,
    pub extra: String,
}
