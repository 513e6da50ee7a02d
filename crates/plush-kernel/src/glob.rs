//! Wildcard expansion for command arguments.
//!
//! Implements the shell patterns the launcher expands right before spawning:
//! - `*` matches zero or more characters
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]` match a character in the set or range
//! - `[!abc]` or `[^abc]` match a character NOT in the set
//!
//! Expansion walks the filesystem one path component at a time, relative to
//! the shell's working directory for relative patterns. Entries starting
//! with `.` only match when the pattern component itself starts with `.`.
//! A pattern matching nothing is passed through literally, not dropped.

use std::path::{Path, PathBuf};

use crate::expand::expand_tilde;

/// Match a string against a glob pattern.
///
/// Returns true if the pattern matches the entire input string.
pub fn glob_match(pattern: &str, input: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let input: Vec<char> = input.chars().collect();
    match_recursive(&pattern, 0, &input, 0)
}

/// Recursive matching with backtracking for `*`.
fn match_recursive(pattern: &[char], pi: usize, input: &[char], ii: usize) -> bool {
    if pi >= pattern.len() {
        return ii >= input.len();
    }

    match pattern[pi] {
        '*' => {
            // Skip consecutive stars.
            let mut next_pi = pi;
            while next_pi < pattern.len() && pattern[next_pi] == '*' {
                next_pi += 1;
            }
            for skip in 0..=input.len().saturating_sub(ii) {
                if match_recursive(pattern, next_pi, input, ii + skip) {
                    return true;
                }
            }
            false
        }
        '?' => ii < input.len() && match_recursive(pattern, pi + 1, input, ii + 1),
        '[' => {
            if ii >= input.len() {
                return false;
            }
            match class_match(pattern, pi, input[ii]) {
                Some((hit, class_end)) => {
                    hit && match_recursive(pattern, class_end + 1, input, ii + 1)
                }
                // Unterminated class: treat `[` as a literal.
                None => input[ii] == '[' && match_recursive(pattern, pi + 1, input, ii + 1),
            }
        }
        c => ii < input.len() && input[ii] == c && match_recursive(pattern, pi + 1, input, ii + 1),
    }
}

/// Test a character against the `[...]` class starting at `pi`.
///
/// Returns whether the character matched and the index of the closing `]`,
/// or None if the class is unterminated.
fn class_match(pattern: &[char], pi: usize, c: char) -> Option<(bool, usize)> {
    let mut i = pi + 1;
    let negated = matches!(pattern.get(i), Some('!') | Some('^'));
    if negated {
        i += 1;
    }

    let body_start = i;
    // A `]` as the first body character is a literal member of the set.
    if pattern.get(i) == Some(&']') {
        i += 1;
    }
    while i < pattern.len() && pattern[i] != ']' {
        i += 1;
    }
    if i >= pattern.len() {
        return None;
    }

    let body = &pattern[body_start..i];
    let mut hit = false;
    let mut j = 0;
    while j < body.len() {
        if j + 2 < body.len() && body[j + 1] == '-' {
            if body[j] <= c && c <= body[j + 2] {
                hit = true;
            }
            j += 3;
        } else {
            if body[j] == c {
                hit = true;
            }
            j += 1;
        }
    }
    Some((hit != negated, i))
}

/// True if the argument contains glob metacharacters.
pub fn has_glob_chars(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Expand every argument in a vector, in order.
///
/// Each argument is tilde-expanded first; arguments with metacharacters are
/// then matched against the filesystem. Non-matching patterns pass through
/// literally.
pub fn expand_wildcards(args: &[String], cwd: &Path, home: Option<&Path>) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        let arg = expand_tilde(arg, home);
        if !has_glob_chars(&arg) {
            out.push(arg);
            continue;
        }
        let mut matches = match_pattern(&arg, cwd);
        if matches.is_empty() {
            out.push(arg);
        } else {
            matches.sort();
            out.append(&mut matches);
        }
    }
    out
}

/// Match one pattern against the filesystem, component by component.
fn match_pattern(pattern: &str, cwd: &Path) -> Vec<String> {
    let (base, rest) = match pattern.strip_prefix('/') {
        Some(rest) => (PathBuf::from("/"), rest),
        None => (cwd.to_path_buf(), pattern),
    };
    let absolute = pattern.starts_with('/');

    let components: Vec<&str> = rest.split('/').filter(|c| !c.is_empty()).collect();
    if components.is_empty() {
        return Vec::new();
    }

    // Candidates carry both the real path (for directory reads) and the
    // display string handed back to the command.
    let mut candidates: Vec<(PathBuf, String)> = vec![(base, String::new())];

    for (depth, component) in components.iter().enumerate() {
        let mut next = Vec::new();
        for (path, display) in &candidates {
            if has_glob_chars(component) {
                let Ok(entries) = std::fs::read_dir(path) else {
                    continue;
                };
                for entry in entries.flatten() {
                    let name = entry.file_name();
                    let Some(name) = name.to_str() else { continue };
                    if name.starts_with('.') && !component.starts_with('.') {
                        continue;
                    }
                    if !glob_match(component, name) {
                        continue;
                    }
                    // Intermediate components must be directories.
                    if depth + 1 < components.len() && !entry.path().is_dir() {
                        continue;
                    }
                    next.push((entry.path(), join_display(display, name, absolute)));
                }
            } else {
                let candidate = path.join(component);
                if candidate.symlink_metadata().is_ok() {
                    next.push((candidate, join_display(display, component, absolute)));
                }
            }
        }
        candidates = next;
        if candidates.is_empty() {
            break;
        }
    }

    candidates.into_iter().map(|(_, display)| display).collect()
}

fn join_display(prefix: &str, name: &str, absolute: bool) -> String {
    if prefix.is_empty() {
        if absolute {
            format!("/{name}")
        } else {
            name.to_string()
        }
    } else {
        format!("{prefix}/{name}")
    }
}
