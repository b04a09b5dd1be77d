//! Best-effort repair of near-JSON text.
//!
//! Model responses are usually valid JSON but arrive in a handful of broken
//! shapes: wrapped in a markdown fence, full-width punctuation from CJK
//! sources, unquoted keys or values, comments, trailing commas, unterminated
//! strings. [`repair`] runs a fixed pipeline of string transforms over the
//! text; each step is a pure function that can be unit-tested on its own.
//!
//! The transforms are heuristics. The caller must still attempt to parse the
//! result and treat a second parse failure as terminal.

use regex::Regex;

/// Run the full repair pipeline over a purported-JSON string.
///
/// Step order matters: later steps assume the normalization done by earlier
/// ones (e.g. value quoting relies on punctuation already being ASCII).
pub fn repair(input: &str) -> String {
    let step = strip_control_chars(input);
    let step = balance_quotes(&step);
    let step = apply_outside_strings(&step, normalize_punctuation);
    let step = apply_outside_strings(&step, quote_bare_keys);
    let step = apply_outside_strings(&step, quote_bare_values);
    let step = strip_comments(&step);
    let step = apply_outside_strings(&step, strip_trailing_commas);
    ensure_braces(&step)
}

/// Strip a leading ```` ```json ```` fence marker and trailing ```` ``` ````.
///
/// Cheap pre-check run before attempting a parse; many models wrap JSON
/// output in a markdown code block even when asked not to.
pub fn strip_code_fence(input: &str) -> &str {
    let mut s = input.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Remove control characters except newline, carriage return, and tab.
pub fn strip_control_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Close strings left unterminated at a line boundary.
///
/// Tracks an "in string" flag across lines by counting unescaped quotes per
/// line. A line with an odd count toggles the flag. When a later line brings
/// its own balanced quotes while the flag is set, the opener line never got
/// its closing quote, so one is inserted there (before any trailing
/// `,` / `}` / `]`). Strings still open at the end of input are closed on
/// their opener line.
///
/// This is best-effort: legitimate multi-line string values can be both
/// over- and under-corrected.
pub fn balance_quotes(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(|l| l.to_string()).collect();
    let mut open_line: Option<usize> = None;

    for i in 0..lines.len() {
        let quotes = unescaped_quote_count(&lines[i]);
        match open_line {
            None => {
                if quotes % 2 == 1 {
                    open_line = Some(i);
                }
            }
            Some(opened) => {
                if quotes % 2 == 1 {
                    // this line's odd quote closes the open string
                    open_line = None;
                } else if quotes > 0 {
                    // the line is self-balanced, so the string opened above
                    // never terminated; close it back on its opener line
                    lines[opened] = close_string(&lines[opened]);
                    open_line = None;
                }
                // a line with no quotes is treated as a bare continuation
            }
        }
    }

    if let Some(opened) = open_line {
        lines[opened] = close_string(&lines[opened]);
    }

    let mut out = lines.join("\n");
    if input.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn unescaped_quote_count(line: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            count += 1;
        }
    }
    count
}

/// Insert a closing quote before any trailing `,` / `}` / `]` run.
fn close_string(line: &str) -> String {
    let body_end = line
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '}' | ']'))
        .len();
    let mut out = String::with_capacity(line.len() + 1);
    out.push_str(&line[..body_end]);
    out.push('"');
    out.push_str(&line[body_end..]);
    out
}

/// Replace full-width and localized punctuation with ASCII equivalents.
pub fn normalize_punctuation(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '：' => ':',
            '，' | '、' => ',',
            '｛' => '{',
            '｝' => '}',
            '［' => '[',
            '］' => ']',
            '（' => '(',
            '）' => ')',
            other => other,
        })
        .collect()
}

/// Wrap bare identifier keys in double quotes.
///
/// Matches `identifier:` after `{`, `,`, or at the start of a line. A colon
/// followed by `/` is skipped so protocol separators in bare URLs survive.
pub fn quote_bare_keys(input: &str) -> String {
    let re = Regex::new(r"(?m)([{,]\s*|^[ \t]*)([A-Za-z_][A-Za-z0-9_]*)[ \t]*:").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let end = caps.get(0).unwrap().end();
        if input[end..].starts_with('/') {
            // protocol separator in a bare URL, not a key
            caps[0].to_string()
        } else {
            format!("{}\"{}\":", &caps[1], &caps[2])
        }
    })
    .to_string()
}

/// Wrap bare scalar values in double quotes.
///
/// A token after a colon that is not a string, number, object, array, or
/// JSON literal gets quoted (e.g. `{"名称": 北大}`).
pub fn quote_bare_values(input: &str) -> String {
    let re = Regex::new(r#":[ \t]*([^\s",:\[\]{}][^,\n\]}]*)"#).unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let token = caps[1].trim_end();
        if token == "true" || token == "false" || token == "null" || token.parse::<f64>().is_ok() {
            caps[0].to_string()
        } else {
            format!(": \"{}\"", token)
        }
    })
    .to_string()
}

/// Strip `//` line comments and `/* */` block comments outside strings.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' => match chars.peek() {
                Some('/') => {
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for next in chars.by_ref() {
                        if prev == '*' && next == '/' {
                            break;
                        }
                        prev = next;
                    }
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }
    out
}

/// Remove trailing commas immediately before a closing `}` or `]`.
pub fn strip_trailing_commas(input: &str) -> String {
    let re = Regex::new(r",(\s*[}\]])").unwrap();
    re.replace_all(input, "$1").to_string()
}

/// Trim surrounding whitespace and ensure the text is brace-delimited.
pub fn ensure_braces(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len() + 2);
    if !trimmed.starts_with('{') {
        out.push('{');
    }
    out.push_str(trimmed);
    if !trimmed.ends_with('}') {
        out.push('}');
    }
    out
}

/// Apply a transform to the parts of the input that sit outside string
/// literals, leaving quoted content untouched.
fn apply_outside_strings<F>(input: &str, transform: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::with_capacity(input.len());
    let mut segment = String::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            out.push_str(&transform(&segment));
            segment.clear();
            out.push(c);
            in_string = true;
        } else {
            segment.push(c);
        }
    }
    out.push_str(&transform(&segment));
    out
}
