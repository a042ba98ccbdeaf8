//! Marker blocks — the unit of idempotent CSS replacement.
//!
//! A block starts with a start-marker comment and ends with [`END_MARKER`].
//! Splicing works on byte offsets of those literal markers and is only
//! reliable against blocks this crate wrote itself; hand-edited or nested
//! markers are not understood.

use std::borrow::Cow;

use crate::types::ThemeColors;

pub const THEME_START_MARKER: &str = "/* ThemeForseen Colors";
pub const FONT_START_MARKER: &str = "/* ThemeForseen Font";
pub const END_MARKER: &str = "/* End ThemeForseen */";

/// Generate the theme color block.
pub fn theme_block(colors: &ThemeColors, is_dark_mode: bool) -> String {
    let mode = if is_dark_mode { "Dark Mode" } else { "Light Mode" };
    format!(
        "{THEME_START_MARKER} - {mode} */
:root {{
  --color-primary: {primary};
  --color-primary-shadow: {primary_shadow};
  --color-accent: {accent};
  --color-accent-shadow: {accent_shadow};
  --color-bg: {background};
  --color-card-bg: {card_background};
  --color-text: {text};
  --color-extra: {extra};
}}
{END_MARKER}",
        primary = colors.primary,
        primary_shadow = colors.primary_shadow,
        accent = colors.accent,
        accent_shadow = colors.accent_shadow,
        background = colors.background,
        card_background = colors.card_background,
        text = colors.text,
        extra = colors.extra,
    )
}

/// Generate the font family block.
pub fn font_block(font_family: &str) -> String {
    format!(
        "{FONT_START_MARKER} */
:root {{
  --font-family: {font_family};
}}
{END_MARKER}"
    )
}

/// Byte range of the first block opened by `start_marker`, end marker
/// included.
pub fn find_block(content: &str, start_marker: &str) -> Option<std::ops::Range<usize>> {
    let start = content.find(start_marker)?;
    let end = content[start..].find(END_MARKER)? + start + END_MARKER.len();
    Some(start..end)
}

/// Remove the first block opened by `start_marker`.
///
/// Whitespace on both sides of the block is trimmed and the remaining
/// halves are rejoined with `joiner`. A start marker without a following
/// end marker leaves the content untouched.
pub fn remove_block<'a>(content: &'a str, start_marker: &str, joiner: &str) -> Cow<'a, str> {
    let Some(span) = find_block(content, start_marker) else {
        return Cow::Borrowed(content);
    };
    let before = content[..span.start].trim_end();
    let after = content[span.end..].trim_start();
    match (before.is_empty(), after.is_empty()) {
        (false, false) => Cow::Owned(format!("{before}{joiner}{after}")),
        (false, true) => Cow::Borrowed(before),
        (true, _) => Cow::Borrowed(after),
    }
}
