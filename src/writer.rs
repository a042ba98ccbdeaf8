//! Block writer — materializes a generated block into a [`CssTarget`].
//!
//! Stateless: every call re-reads the target, splices the block and writes
//! the whole file back. Content outside the block is kept as-is apart from
//! the whitespace adjoining it.

use std::fs;
use std::io::{self, Write};
use std::ops::Range;
use std::path::Path;

use tracing::debug;

use crate::block::{self, FONT_START_MARKER, THEME_START_MARKER};
use crate::error::{Result, WriteError};
use crate::lexer;
use crate::types::{CssTarget, TargetKind, ThemeColors};

/// A successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub message: String,
    /// The target file did not exist before this write.
    pub created: bool,
    pub inline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Theme,
    Font,
}

impl BlockKind {
    fn start_marker(self) -> &'static str {
        match self {
            BlockKind::Theme => THEME_START_MARKER,
            BlockKind::Font => FONT_START_MARKER,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            BlockKind::Theme => "theme colors",
            BlockKind::Font => "font family",
        }
    }

    /// Place `block` into stylesheet text that holds no block of this kind.
    /// Themes go first, fonts go last.
    fn place(self, rest: &str, block: &str) -> String {
        if rest.trim().is_empty() {
            return format!("{block}\n");
        }
        match self {
            BlockKind::Theme => format!("{block}\n\n{}", rest.trim_start()),
            BlockKind::Font => format!("{}\n\n{block}\n", rest.trim_end()),
        }
    }
}

/// Write theme colors to `target`, resolved against `root`.
pub fn write_theme_to_target(
    root: &Path,
    target: &CssTarget,
    colors: &ThemeColors,
    is_dark_mode: bool,
) -> Result<WriteOutcome> {
    let css = block::theme_block(colors, is_dark_mode);
    write_block(root, target, &css, BlockKind::Theme)
}

/// Write a font family to `target`, resolved against `root`.
pub fn write_font_to_target(root: &Path, target: &CssTarget, font_family: &str) -> Result<WriteOutcome> {
    let css = block::font_block(font_family);
    write_block(root, target, &css, BlockKind::Font)
}

fn write_block(root: &Path, target: &CssTarget, css: &str, kind: BlockKind) -> Result<WriteOutcome> {
    debug!(path = %target.path, kind = ?kind, inline = target.is_inline(), "writing block");
    match target.kind {
        TargetKind::File => write_to_file(root, &target.path, css, kind),
        TargetKind::Inline => write_to_inline_style(root, &target.path, css, kind),
    }
}

fn write_to_file(root: &Path, rel: &str, css: &str, kind: BlockKind) -> Result<WriteOutcome> {
    let path = root.join(rel);
    let io_err = |e| WriteError::io(rel, false, e);

    let (existing, created) = match fs::read_to_string(&path) {
        Ok(content) => (content, false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
            (String::new(), true)
        }
        Err(e) => return Err(io_err(e)),
    };

    let rest = block::remove_block(&existing, kind.start_marker(), "\n\n");
    let content = kind.place(&rest, css);
    replace_file(&path, &content).map_err(io_err)?;

    let verb = if created { "Created" } else { "Updated" };
    Ok(WriteOutcome {
        message: format!("{verb} {rel} with {}", kind.describe()),
        created,
        inline: false,
    })
}

fn write_to_inline_style(root: &Path, html_rel: &str, css: &str, kind: BlockKind) -> Result<WriteOutcome> {
    let path = root.join(html_rel);
    let html = match fs::read_to_string(&path) {
        Ok(html) => html,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(WriteError::HtmlNotFound(html_rel.to_string()));
        }
        Err(e) => return Err(WriteError::io(html_rel, true, e)),
    };

    let inner = first_style_content(&html).ok_or_else(|| WriteError::StyleTagNotFound(html_rel.to_string()))?;
    let style = inline_style_content(&html[inner.clone()], css, kind.start_marker());

    let mut updated = String::with_capacity(html.len() + css.len() + 2);
    updated.push_str(&html[..inner.start]);
    updated.push_str(&style);
    updated.push_str(&html[inner.end..]);
    replace_file(&path, &updated).map_err(|e| WriteError::io(html_rel, true, e))?;

    Ok(WriteOutcome {
        message: format!("Updated inline styles in {html_rel}"),
        created: false,
        inline: true,
    })
}

/// Byte range of the text inside the document's first `<style>` element.
fn first_style_content(html: &str) -> Option<Range<usize>> {
    let tags = lexer::tokenize(html);
    let open = tags.iter().position(|t| t.is_start("style"))?;
    // Style content is raw text, so the closing tag is the very next one.
    let close = tags.get(open + 1).filter(|t| t.is_end("style"))?;
    Some(tags[open].span.end..close.span.start)
}

/// New inner text of a `<style>` element: the old one without a block of
/// this kind, with `css` appended.
fn inline_style_content(inner: &str, css: &str, start_marker: &str) -> String {
    let rest = block::remove_block(inner, start_marker, "\n\n");
    let body = if rest.trim().is_empty() {
        css.to_string()
    } else {
        format!("{}\n\n{css}", rest.trim_end())
    };
    if body.starts_with('\n') {
        format!("{body}\n")
    } else {
        format!("\n{body}\n")
    }
}

/// Replace `path` with `content` through a temp file and a rename, keeping
/// the original file's permissions or, for a new file, the default create
/// mode. Symlinks are written through.
fn replace_file(path: &Path, content: &str) -> io::Result<()> {
    let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let existing = fs::metadata(&path).ok().map(|meta| meta.permissions());
    let mut builder = tempfile::Builder::new();
    // New files get the usual create mode (umask applied), not 0600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if existing.is_none() {
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
    }

    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    if let Some(permissions) = existing {
        fs::set_permissions(tmp.path(), permissions)?;
    }
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(())
}
