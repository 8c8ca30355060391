// crates/insert_pragma/src/lib.rs

//! Line-oriented insertion of the inline pragma ahead of `copyWith` getters.
//!
//! Files are treated as plain line sequences. Nothing here parses Dart, so a
//! line inside a comment or a string literal that has the getter's shape is
//! patched as well.

use once_cell::sync::Lazy;
use pragma_marker::COPY_WITH_PATTERN;
use regex::Regex;

static COPY_WITH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(COPY_WITH_PATTERN).expect("COPY_WITH_PATTERN is a valid regex"));

/// The pieces of a line that matched the declaration pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationMatch<'a> {
    pub indent: &'a str,
    pub head: &'a str,
    pub trailing: &'a str,
}

/// Recognises declaration lines.
///
/// The pattern must be anchored at the start of the line and capture the
/// indent in group 1. Groups 2 and 3 are optional.
#[derive(Clone, Debug)]
pub struct DeclarationMatcher {
    regex: Regex,
}

impl DeclarationMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Matches a single line. The line terminator is not part of the match.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<DeclarationMatch<'a>> {
        let caps = self.regex.captures(strip_terminator(line))?;
        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
        Some(DeclarationMatch {
            indent: group(1),
            head: group(2),
            trailing: group(3),
        })
    }
}

impl Default for DeclarationMatcher {
    fn default() -> Self {
        Self {
            regex: COPY_WITH_REGEX.clone(),
        }
    }
}

/// Result of patching one file's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchOutcome {
    pub content: String,
    pub inserted: usize,
}

impl PatchOutcome {
    pub fn is_changed(&self) -> bool {
        self.inserted > 0
    }
}

/// Splits `content` into lines, keeping each line's terminator.
/// Joining the result gives back `content` byte for byte.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

/// Returns true when the nearest non-blank line before `index` contains `marker`.
///
/// Blank lines (empty after trimming) are skipped, however many there are.
/// When no such line exists the declaration counts as unannotated.
pub fn has_marker_before<S: AsRef<str>>(lines: &[S], index: usize, marker: &str) -> bool {
    let end = index.min(lines.len());
    lines[..end]
        .iter()
        .rev()
        .map(AsRef::<str>::as_ref)
        .find(|line| !line.trim().is_empty())
        .map_or(false, |line| line.contains(marker))
}

/// Inserts `indent + marker` ahead of every matching line that lacks it.
///
/// The backward lookup always consults the original lines, so inserted
/// markers never influence later decisions. Every input line is emitted
/// unchanged and in order.
pub fn patch_lines<S: AsRef<str>>(
    lines: &[S],
    matcher: &DeclarationMatcher,
    marker: &str,
) -> Vec<String> {
    let mut output = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().map(AsRef::<str>::as_ref).enumerate() {
        if let Some(decl) = matcher.match_line(line) {
            if !has_marker_before(lines, i, marker) {
                output.push(format!("{}{}{}", decl.indent, marker, terminator_for(line)));
            }
        }
        output.push(line.to_string());
    }
    output
}

/// Patches a whole file's content.
pub fn patch_content(content: &str, matcher: &DeclarationMatcher, marker: &str) -> PatchOutcome {
    let lines = split_lines(content);
    let patched = patch_lines(&lines, matcher, marker);
    let inserted = patched.len() - lines.len();
    PatchOutcome {
        content: patched.concat(),
        inserted,
    }
}

fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

// An inserted line follows the declaration's own line ending; a final line
// without one still gets "\n" so the marker stays on its own line.
fn terminator_for(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}
