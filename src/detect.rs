//! Project detection — classifies a project root and picks the stylesheet
//! generated CSS should land in, purely by looking at the filesystem.
//!
//! Every probe is best effort: a missing, unreadable or malformed file is
//! treated the same as an absent one, and "no target" is a valid answer.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::lexer::{self, Tag};
use crate::types::{CssTarget, ProjectInfo, ProjectType};

/// Dependencies that identify a framework, highest priority first.
const DEPENDENCY_RULES: &[(&str, ProjectType)] = &[
    ("next", ProjectType::Nextjs),
    ("nuxt", ProjectType::Nuxt),
    ("@remix-run/react", ProjectType::Remix),
    ("astro", ProjectType::Astro),
    ("svelte", ProjectType::Svelte),
    ("vite", ProjectType::Vite),
];

/// Config files consulted when `package.json` is inconclusive.
const CONFIG_RULES: &[(&[&str], ProjectType)] = &[
    (&["next.config.js", "next.config.mjs", "next.config.ts"], ProjectType::Nextjs),
    (&["vite.config.js", "vite.config.mjs", "vite.config.ts", "vite.config.mts"], ProjectType::Vite),
    (&["astro.config.mjs", "astro.config.js", "astro.config.ts"], ProjectType::Astro),
    (&["svelte.config.js"], ProjectType::Svelte),
    (&["nuxt.config.js", "nuxt.config.ts"], ProjectType::Nuxt),
];

const TAILWIND_CONFIGS: &[&str] = &["tailwind.config.js", "tailwind.config.ts", "tailwind.config.mjs"];

const HTML_ENTRY_POINTS: &[&str] = &["index.html", "public/index.html", "src/index.html"];

/// File names that usually hold a site's main stylesheet, by preference.
const MAIN_STYLESHEET_NAMES: &[&str] = &["main.css", "style.css", "styles.css", "global.css", "app.css"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl PackageJson {
    fn has_dependency(&self, name: &str) -> bool {
        [&self.dependencies, &self.dev_dependencies]
            .into_iter()
            .filter_map(|deps| deps.get(name))
            .any(is_truthy)
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn read_package_json(root: &Path) -> Option<PackageJson> {
    let text = fs::read_to_string(root.join("package.json")).ok()?;
    match serde_json::from_str(&text) {
        Ok(pkg) => Some(pkg),
        Err(e) => {
            debug!("ignoring malformed package.json: {e}");
            None
        }
    }
}

fn any_exists(root: &Path, names: &[&str]) -> bool {
    names.iter().any(|name| root.join(name).exists())
}

/// Classify a project root.
pub fn detect_project_type(root: &Path) -> ProjectType {
    if let Some(pkg) = read_package_json(root) {
        if let Some((_, ty)) = DEPENDENCY_RULES.iter().find(|(dep, _)| pkg.has_dependency(dep)) {
            return *ty;
        }
    }

    if let Some((_, ty)) = CONFIG_RULES.iter().find(|(files, _)| any_exists(root, files)) {
        return *ty;
    }

    if root.join("index.html").exists() {
        return ProjectType::Plain;
    }
    ProjectType::Unknown
}

pub fn has_tailwind(root: &Path) -> bool {
    any_exists(root, TAILWIND_CONFIGS)
}

/// Conventional stylesheet locations for a project type, by preference.
pub fn css_candidates(project_type: ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::Nextjs => &[
            "src/app/globals.css",
            "app/globals.css",
            "src/styles/globals.css",
            "styles/globals.css",
        ],
        ProjectType::Vite => &["src/index.css", "src/style.css", "src/styles/index.css", "src/App.css"],
        ProjectType::Astro => &["src/styles/global.css", "src/styles/globals.css", "src/styles/main.css"],
        ProjectType::Svelte => &["src/app.css", "src/global.css", "src/styles/global.css"],
        ProjectType::Nuxt => &["assets/css/main.css", "assets/main.css", "assets/css/global.css"],
        ProjectType::Remix => &["app/styles/global.css", "app/root.css", "app/styles.css"],
        ProjectType::Plain => &[
            "styles.css",
            "style.css",
            "css/styles.css",
            "css/style.css",
            "css/main.css",
            "index.css",
        ],
        ProjectType::Unknown => &["src/styles.css", "src/index.css", "styles.css", "style.css", "css/styles.css"],
    }
}

/// Candidate stylesheets that exist under `root`, in priority order.
pub fn find_existing_css_files(root: &Path, project_type: ProjectType) -> Vec<String> {
    css_candidates(project_type)
        .iter()
        .filter(|rel| root.join(rel).is_file())
        .map(|rel| rel.to_string())
        .collect()
}

/// What an HTML entry point says about its styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlStyleInfo {
    /// Root-relative path of the HTML file.
    pub html_file: String,
    /// Local stylesheet hrefs as written, deduplicated, in document order.
    pub stylesheet_links: Vec<String>,
    /// Whether a `<style>` element sits inside `<head>`.
    pub has_inline_style: bool,
}

/// Extract local stylesheet links and inline-style presence from a document.
pub fn scan_html(html_file: &str, html: &str) -> HtmlStyleInfo {
    let tags = lexer::tokenize(html);
    let mut stylesheet_links: Vec<String> = Vec::new();
    let mut in_head = false;
    let mut has_inline_style = false;

    for tag in &tags {
        if tag.is_start("head") {
            in_head = true;
        } else if tag.is_end("head") {
            in_head = false;
        } else if tag.is_start("style") && in_head {
            has_inline_style = true;
        } else if let Some(href) = local_stylesheet_href(tag) {
            if !stylesheet_links.iter().any(|l| l == href) {
                stylesheet_links.push(href.to_string());
            }
        }
    }

    HtmlStyleInfo {
        html_file: html_file.to_string(),
        stylesheet_links,
        has_inline_style,
    }
}

fn local_stylesheet_href(tag: &Tag) -> Option<&str> {
    if !tag.is_start("link") {
        return None;
    }
    let is_stylesheet = tag
        .attr("rel")?
        .split_ascii_whitespace()
        .any(|r| r.eq_ignore_ascii_case("stylesheet"));
    let href = tag.attr("href")?.trim();
    let remote = href.starts_with("http://") || href.starts_with("https://") || href.starts_with("//");
    (is_stylesheet && !href.is_empty() && !remote).then_some(href)
}

/// Scan the first readable HTML entry point under `root`.
pub fn parse_html_for_styles(root: &Path) -> Option<HtmlStyleInfo> {
    HTML_ENTRY_POINTS.iter().find_map(|rel| {
        let html = fs::read_to_string(root.join(rel)).ok()?;
        Some(scan_html(rel, &html))
    })
}

/// Resolve an href from `html_file` to a root-relative, normalized path.
///
/// A leading `/` is root-relative. Query strings and fragments are dropped.
pub fn resolve_href(html_file: &str, href: &str) -> String {
    let href = href.split(['?', '#']).next().unwrap_or(href);
    if let Some(absolute) = href.strip_prefix('/') {
        return normalize_rel_path(absolute);
    }
    let dir = html_file.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    if dir.is_empty() {
        normalize_rel_path(href)
    } else {
        normalize_rel_path(&format!("{dir}/{href}"))
    }
}

/// Lexically normalize a `/`-separated relative path. `..` never climbs
/// above the root.
pub fn normalize_rel_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

fn file_name_matches(link: &str, name: &str) -> bool {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    let file = path.rsplit('/').next().unwrap_or(path);
    file.eq_ignore_ascii_case(name)
}

/// Choose a target from what an HTML entry point references.
pub fn target_from_html(info: &HtmlStyleInfo) -> Option<CssTarget> {
    let chosen = match info.stylesheet_links.as_slice() {
        [] if info.has_inline_style => return Some(CssTarget::inline(info.html_file.clone())),
        [] => return None,
        [only] => only,
        links => MAIN_STYLESHEET_NAMES
            .iter()
            .find_map(|name| links.iter().find(|l| file_name_matches(l, name)))
            .unwrap_or(&links[0]),
    };
    Some(CssTarget::file(resolve_href(&info.html_file, chosen)))
}

/// Inspect `root` and work out its type and CSS target.
pub fn detect_project(root: &Path) -> ProjectInfo {
    let project_type = detect_project_type(root);
    let css_files = find_existing_css_files(root, project_type);

    let mut css_target = None;
    if matches!(project_type, ProjectType::Plain | ProjectType::Unknown) {
        css_target = parse_html_for_styles(root).and_then(|info| target_from_html(&info));
    }
    if css_target.is_none() {
        css_target = css_files.first().map(|f| CssTarget::file(f.clone()));
    }

    debug!(
        project_type = %project_type,
        css_files = ?css_files,
        css_target = ?css_target,
        "project detected"
    );

    ProjectInfo {
        project_type,
        root_dir: root.to_path_buf(),
        css_files,
        css_target,
        has_tailwind: has_tailwind(root),
    }
}

/// Where a stylesheet is created when detection finds none.
pub fn default_css_path(project_type: ProjectType) -> &'static str {
    match project_type {
        ProjectType::Nextjs => "src/app/globals.css",
        ProjectType::Vite => "src/index.css",
        ProjectType::Astro => "src/styles/global.css",
        ProjectType::Svelte => "src/app.css",
        ProjectType::Nuxt => "assets/css/main.css",
        ProjectType::Remix => "app/styles/global.css",
        ProjectType::Plain => "styles.css",
        ProjectType::Unknown => "src/styles/theme-forseen.css",
    }
}

/// How to wire a freshly created stylesheet into the project.
pub fn import_instruction(project_type: ProjectType, css_path: &str) -> String {
    let from_src = css_path.strip_prefix("src/").unwrap_or(css_path);
    match project_type {
        ProjectType::Nextjs => format!("Add to your layout.tsx or _app.tsx:\nimport './{from_src}';"),
        ProjectType::Vite => format!("Add to your main.tsx or main.ts:\nimport './{from_src}';"),
        ProjectType::Astro => format!("Add to your Layout.astro:\nimport '{css_path}';"),
        ProjectType::Svelte => {
            format!("Add to your +layout.svelte or App.svelte:\nimport './{from_src}';")
        }
        ProjectType::Nuxt => format!("Add to nuxt.config.ts:\ncss: ['~/{css_path}']"),
        ProjectType::Remix => {
            format!("Add to your root.tsx links function:\n{{ rel: 'stylesheet', href: '/{css_path}' }}")
        }
        ProjectType::Plain => format!("Add to your HTML <head>:\n<link rel=\"stylesheet\" href=\"{css_path}\">"),
        ProjectType::Unknown => "Import this CSS file in your application entry point.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn next_dependency_wins() {
        let dir = project(&[(
            "package.json",
            r#"{"dependencies": {"next": "14.0.0", "react": "18.2.0"}}"#,
        )]);
        assert_eq!(detect_project_type(dir.path()), ProjectType::Nextjs);
    }

    #[test]
    fn dependency_priority_order() {
        let dir = project(&[(
            "package.json",
            r#"{"dependencies": {"svelte": "4"}, "devDependencies": {"vite": "5", "astro": "4"}}"#,
        )]);
        assert_eq!(detect_project_type(dir.path()), ProjectType::Astro);
    }

    #[test]
    fn empty_dependency_version_does_not_count() {
        let dir = project(&[("package.json", r#"{"dependencies": {"next": ""}}"#), ("index.html", "")]);
        assert_eq!(detect_project_type(dir.path()), ProjectType::Plain);
    }

    #[test]
    fn malformed_package_json_falls_back_to_config_files() {
        let dir = project(&[("package.json", "{ not json"), ("vite.config.ts", "")]);
        assert_eq!(detect_project_type(dir.path()), ProjectType::Vite);
    }

    #[test]
    fn config_file_probe_order() {
        let dir = project(&[("svelte.config.js", ""), ("nuxt.config.ts", "")]);
        assert_eq!(detect_project_type(dir.path()), ProjectType::Svelte);
    }

    #[test]
    fn plain_and_unknown() {
        let plain = project(&[("index.html", "<html></html>")]);
        assert_eq!(detect_project_type(plain.path()), ProjectType::Plain);
        let empty = project(&[]);
        assert_eq!(detect_project_type(empty.path()), ProjectType::Unknown);
    }

    #[test]
    fn css_files_keep_priority_order() {
        let dir = project(&[
            ("package.json", r#"{"dependencies": {"next": "14.0.0"}}"#),
            ("styles/globals.css", ""),
            ("app/globals.css", ""),
        ]);
        let info = detect_project(dir.path());
        assert_eq!(info.css_files, vec!["app/globals.css", "styles/globals.css"]);
        assert_eq!(info.css_target, Some(CssTarget::file("app/globals.css")));
    }

    #[test]
    fn tailwind_detection() {
        let dir = project(&[("tailwind.config.mjs", "")]);
        assert!(has_tailwind(dir.path()));
        assert!(!detect_project(project(&[]).path()).has_tailwind);
    }

    #[test]
    fn single_local_link_becomes_target() {
        let dir = project(&[(
            "index.html",
            r#"<html><head>
<link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Inter">
<link rel="stylesheet" href="css/style.css">
</head></html>"#,
        )]);
        let info = detect_project(dir.path());
        assert_eq!(info.project_type, ProjectType::Plain);
        assert_eq!(info.css_target, Some(CssTarget::file("css/style.css")));
    }

    #[test]
    fn inline_style_in_head_becomes_target() {
        let dir = project(&[(
            "index.html",
            "<html><head><style>body { margin: 0; }</style></head><body></body></html>",
        )]);
        let info = detect_project(dir.path());
        assert_eq!(info.css_target, Some(CssTarget::inline("index.html")));
    }

    #[test]
    fn commented_out_link_is_not_a_target() {
        let info = scan_html(
            "index.html",
            r#"<head><!-- ---- old theme ---- <link rel="stylesheet" href="old.css"> --><style>p{}</style></head>"#,
        );
        assert!(info.stylesheet_links.is_empty());
        assert_eq!(target_from_html(&info), Some(CssTarget::inline("index.html")));
    }

    #[test]
    fn style_outside_head_is_not_inline_target() {
        let info = scan_html("index.html", "<head></head><body><style>p{}</style></body>");
        assert!(!info.has_inline_style);
        assert_eq!(target_from_html(&info), None);
    }

    #[test]
    fn multiple_links_prefer_main_stylesheet_names() {
        let info = scan_html(
            "index.html",
            r#"<head>
<link rel="stylesheet" href="vendor/reset.css">
<link href="assets/app.css" rel="stylesheet">
<link rel="stylesheet" href="assets/style.css">
</head>"#,
        );
        assert_eq!(info.stylesheet_links.len(), 3);
        assert_eq!(target_from_html(&info), Some(CssTarget::file("assets/style.css")));
    }

    #[test]
    fn multiple_links_without_known_name_use_first() {
        let info = scan_html(
            "index.html",
            r#"<link rel="stylesheet" href="a.css"><link rel="stylesheet" href="b.css">"#,
        );
        assert_eq!(target_from_html(&info), Some(CssTarget::file("a.css")));
    }

    #[test]
    fn duplicate_links_are_collapsed() {
        let info = scan_html(
            "index.html",
            r#"<link rel="stylesheet" href="a.css"><link href="a.css" rel="stylesheet">"#,
        );
        assert_eq!(info.stylesheet_links, vec!["a.css"]);
    }

    #[test]
    fn non_stylesheet_links_are_ignored() {
        let info = scan_html(
            "index.html",
            r#"<link rel="icon" href="favicon.css"><link rel="preload stylesheet" href="x.css">"#,
        );
        assert_eq!(info.stylesheet_links, vec!["x.css"]);
    }

    #[test]
    fn hrefs_resolve_against_html_directory() {
        assert_eq!(resolve_href("public/index.html", "css/site.css"), "public/css/site.css");
        assert_eq!(resolve_href("public/index.html", "/css/site.css"), "css/site.css");
        assert_eq!(resolve_href("src/index.html", "../styles.css?v=3"), "styles.css");
        assert_eq!(resolve_href("index.html", "./main.css"), "main.css");
    }

    #[test]
    fn entry_point_priority() {
        let dir = project(&[(
            "public/index.html",
            r#"<head><link rel="stylesheet" href="site.css"></head>"#,
        )]);
        let info = detect_project(dir.path());
        assert_eq!(info.project_type, ProjectType::Unknown);
        assert_eq!(info.css_target, Some(CssTarget::file("public/site.css")));
    }

    #[test]
    fn plain_without_html_hints_falls_back_to_css_files() {
        let dir = project(&[("index.html", "<html><head></head></html>"), ("css/main.css", "")]);
        let info = detect_project(dir.path());
        assert_eq!(info.css_target, Some(CssTarget::file("css/main.css")));
    }

    #[test]
    fn nothing_found_is_none() {
        let dir = project(&[("package.json", r#"{"dependencies": {"vite": "5"}}"#)]);
        let info = detect_project(dir.path());
        assert_eq!(info.project_type, ProjectType::Vite);
        assert!(info.css_files.is_empty());
        assert_eq!(info.css_target, None);
    }

    #[test]
    fn import_instructions() {
        assert_eq!(
            import_instruction(ProjectType::Nextjs, "src/app/globals.css"),
            "Add to your layout.tsx or _app.tsx:\nimport './app/globals.css';"
        );
        assert_eq!(
            import_instruction(ProjectType::Nuxt, "assets/css/main.css"),
            "Add to nuxt.config.ts:\ncss: ['~/assets/css/main.css']"
        );
        assert!(import_instruction(ProjectType::Remix, "app/styles/global.css")
            .contains("{ rel: 'stylesheet', href: '/app/styles/global.css' }"));
    }
}
