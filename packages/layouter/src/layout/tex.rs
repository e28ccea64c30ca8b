//! TeX wrapping for element captions.

use crate::config::BOLD_COMMAND;

/// Remove one enclosing `$…$` and every `\boldsymbol{…}` inside it.
///
/// Text that is not dollar-wrapped is not TeX and comes back unchanged.
///
/// # Examples
/// ```
/// use ggb_layouter::layout::strip_tex;
///
/// assert_eq!(strip_tex(r"$\boldsymbol{foo}$"), "foo");
/// assert_eq!(strip_tex("plain"), "plain");
/// assert_eq!(strip_tex(r"$\boldsymbol{a{b}c}$"), "abc");
/// ```
#[must_use]
pub fn strip_tex(text: &str) -> String {
    match text.strip_prefix('$') {
        Some(rest) if text.len() > 1 && rest.ends_with('$') => {
            strip_tex_cmd(&rest[..rest.len() - 1], BOLD_COMMAND)
        }
        Some("") => String::new(),
        _ => text.to_string(),
    }
}

/// Remove every `\<cmd>{…}` wrapper, keeping the argument.
///
/// Braces are matched with nesting. Inside the argument, bare brace groups
/// are flattened; groups that belong to a command (`\frac{a}{b}`) or a
/// script (`x^{2}`) are kept. An opener without a closing brace is removed
/// on its own.
#[must_use]
pub fn strip_tex_cmd(text: &str, cmd: &str) -> String {
    let opener = format!("\\{cmd}{{");
    let mut current = text.to_string();

    while let Some(start) = find_command(&current, &opener) {
        let prefix = &current[..start];
        let rest = &current[start + opener.len()..];
        let next = match unwrap_argument(rest) {
            Some((argument, tail)) => format!("{prefix}{argument}{tail}"),
            None => format!("{prefix}{rest}"),
        };
        current = next;
    }
    current
}

/// First occurrence of `opener` whose backslash is not itself escaped.
fn find_command(text: &str, opener: &str) -> Option<usize> {
    text.match_indices(opener)
        .map(|(start, _)| start)
        .find(|&start| trailing_backslashes(&text[..start]) % 2 == 0)
}

fn trailing_backslashes(text: &str) -> usize {
    text.chars().rev().take_while(|&c| c == '\\').count()
}

/// Split `rest` at the brace closing an already-open group.
///
/// Returns the flattened argument and the text after the closing brace.
fn unwrap_argument(rest: &str) -> Option<(String, &str)> {
    let mut out = String::with_capacity(rest.len());
    // One entry per open group: whether its braces are kept.
    let mut groups: Vec<bool> = Vec::new();
    let mut chars = rest.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            // Control symbols: `\{`, `\}` and `\\` consume the next character.
            '\\' => {
                out.push(c);
                if let Some((_, escaped @ ('{' | '}' | '\\'))) = chars.clone().next() {
                    out.push(escaped);
                    chars.next();
                }
            }
            '{' => {
                let keep = opens_group_argument(&out);
                groups.push(keep);
                if keep {
                    out.push('{');
                }
            }
            '}' => match groups.pop() {
                None => return Some((out, &rest[i + 1..])),
                Some(true) => out.push('}'),
                Some(false) => {}
            },
            _ => out.push(c),
        }
    }
    None
}

/// Whether a `{` following `before` is the argument of a command or script.
fn opens_group_argument(before: &str) -> bool {
    match before.chars().next_back() {
        Some('^' | '_' | '}') => true,
        Some(c) if c.is_ascii_alphabetic() => {
            let word = before.trim_end_matches(|ch: char| ch.is_ascii_alphabetic());
            trailing_backslashes(word) % 2 == 1
        }
        _ => false,
    }
}

/// Wrap caption text as inline TeX, optionally bold.
#[must_use]
pub fn wrap_tex(text: &str, bold: bool) -> String {
    if bold {
        format!("$\\{BOLD_COMMAND}{{{text}}}$")
    } else {
        format!("${text}$")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tex_basic() {
        assert_eq!(strip_tex(r"$\boldsymbol{foo}$"), "foo");
        assert_eq!(strip_tex("plain"), "plain");
        assert_eq!(strip_tex("$x$"), "x");
        assert_eq!(strip_tex("$"), "");
        assert_eq!(strip_tex("$$"), "");
        assert_eq!(strip_tex("%n"), "%n");
    }

    #[test]
    fn test_strip_tex_nested_braces() {
        assert_eq!(strip_tex(r"$\boldsymbol{a{b}c}$"), "abc");
        assert_eq!(strip_tex(r"$\boldsymbol{\boldsymbol{x}}$"), "x");
        assert_eq!(strip_tex(r"$\boldsymbol{\frac{a}{b}}$"), r"\frac{a}{b}");
        assert_eq!(strip_tex(r"$\boldsymbol{x^{2}_{i}}$"), "x^{2}_{i}");
    }

    #[test]
    fn test_strip_tex_keeps_surrounding_text() {
        assert_eq!(strip_tex(r"$a + \boldsymbol{b} + c$"), "a + b + c");
        assert_eq!(strip_tex(r"$\boldsymbol{a}\boldsymbol{b}$"), "ab");
    }

    #[test]
    fn test_strip_tex_only_inside_dollars() {
        assert_eq!(strip_tex(r"\boldsymbol{x}"), r"\boldsymbol{x}");
    }

    #[test]
    fn test_strip_tex_cmd_unbalanced() {
        assert_eq!(strip_tex_cmd(r"\boldsymbol{abc", "boldsymbol"), "abc");
        assert_eq!(strip_tex_cmd(r"\mathrm{\{x\}}", "mathrm"), r"\{x\}");
        assert_eq!(strip_tex_cmd("no command", "boldsymbol"), "no command");
    }

    #[test]
    fn test_strip_tex_cmd_line_break_before_group() {
        // `\\` is a line break, so the brace after it opens a plain group.
        assert_eq!(strip_tex_cmd(r"\boldsymbol{a\\{b}c}", "boldsymbol"), r"a\\bc");
        assert_eq!(strip_tex_cmd(r"\boldsymbol{\\x{b}}", "boldsymbol"), r"\\xb");
        assert_eq!(strip_tex_cmd(r"\boldsymbol{\\\{b}", "boldsymbol"), r"\\\{b");
    }

    #[test]
    fn test_strip_tex_cmd_skips_escaped_backslash() {
        assert_eq!(strip_tex_cmd(r"\\boldsymbol{x}", "boldsymbol"), r"\\boldsymbol{x}");
    }

    #[test]
    fn test_wrap_tex() {
        assert_eq!(wrap_tex("A", false), "$A$");
        assert_eq!(wrap_tex("A", true), r"$\boldsymbol{A}$");
        assert_eq!(strip_tex(&wrap_tex("%n", true)), "%n");
    }
}
