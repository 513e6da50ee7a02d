//! Environment-variable and tilde expansion.
//!
//! `$VAR` expansion runs over the raw line before tokenization. Tilde
//! expansion is argument-level and is applied by the wildcard expander and
//! by `cd`.

use std::path::Path;

/// Expand `$VAR` references against the process environment.
///
/// Variable names are runs of `[A-Za-z0-9_]` after `$`. A name that is not
/// set in the environment is left in place literally, as is a `$` not
/// followed by a name character.
pub fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if name_len == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        let name = &after[..name_len];
        match std::env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}

/// Expand a leading tilde against the home directory.
///
/// `~` becomes the home directory; `~/rest` becomes `<home>/rest`. Anything
/// else (including `~user`) is returned unchanged, as is everything when no
/// home directory is known.
pub fn expand_tilde(arg: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return arg.to_string();
    };

    if arg == "~" {
        home.display().to_string()
    } else if let Some(rest) = arg.strip_prefix("~/") {
        home.join(rest).display().to_string()
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn expands_set_variable() {
        // PATH is always present.
        let expanded = expand_env_vars("echo $PATH");
        assert!(!expanded.contains("$PATH"));
        assert!(expanded.starts_with("echo "));
    }

    #[test]
    fn unset_variable_stays_literal() {
        assert_eq!(
            expand_env_vars("echo $PLUSH_NO_SUCH_VAR_9321"),
            "echo $PLUSH_NO_SUCH_VAR_9321"
        );
    }

    #[test]
    fn lone_dollar_stays_literal() {
        assert_eq!(expand_env_vars("echo $ a$"), "echo $ a$");
    }

    #[test]
    fn expansion_in_the_middle_of_a_word() {
        unsafe { std::env::set_var("PLUSH_TEST_MID", "X") };
        assert_eq!(expand_env_vars("a$PLUSH_TEST_MID-b"), "aX-b");
    }

    #[test]
    fn tilde_alone_is_home() {
        let home = PathBuf::from("/home/someone");
        assert_eq!(expand_tilde("~", Some(&home)), "/home/someone");
    }

    #[test]
    fn tilde_slash_joins_home() {
        let home = PathBuf::from("/home/someone");
        assert_eq!(expand_tilde("~/src", Some(&home)), "/home/someone/src");
    }

    #[test]
    fn tilde_user_is_untouched() {
        let home = PathBuf::from("/home/someone");
        assert_eq!(expand_tilde("~other", Some(&home)), "~other");
    }

    #[test]
    fn no_home_means_no_expansion() {
        assert_eq!(expand_tilde("~/src", None), "~/src");
    }
}
