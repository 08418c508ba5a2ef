//! Shell quoting for displaying command lines.

/// Quote a string for safe use as a shell argument.
///
/// Returns the string unchanged if it contains only safe characters
/// (alphanumeric, `-`, `_`, `.`, `/`, `:`, `=`, `~`). Otherwise wraps it in
/// single quotes with internal single quotes escaped. Empty strings return `''`.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '~')
    }) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

/// Render a program and its arguments as a copy-pasteable command line.
pub fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(shell_quote(program))
        .chain(args.iter().map(|a| shell_quote(a.as_ref())))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_arguments_pass_through() {
        assert_eq!(shell_quote("hello"), "hello");
        assert_eq!(shell_quote("/usr/bin/foo"), "/usr/bin/foo");
        assert_eq!(shell_quote("web:/home/dev/.bashrc"), "web:/home/dev/.bashrc");
        assert_eq!(shell_quote("nofile=90000:90000"), "nofile=90000:90000");
    }

    #[test]
    fn unsafe_arguments_are_wrapped() {
        assert_eq!(shell_quote("hello world"), "'hello world'");
        assert_eq!(shell_quote("$HOME"), "'$HOME'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn command_line_joins_quoted_parts() {
        assert_eq!(
            command_line("docker", &["exec", "web", "sh", "-c", "git clone x y"]),
            "docker exec web sh -c 'git clone x y'"
        );
        assert_eq!(command_line::<&str>("ls", &[]), "ls");
    }
}
