//! Shell-argument quoting for binary paths embedded in command strings

/// Characters that force an argument into quotes before it is safe to embed
/// in a `sh -c` command line.
const SHELL_META: &[char] = &[
    ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}', '<',
    '>', '|', '&', ';', '#', '~',
];

/// Quote an argument for embedding in a shell command string. Plain
/// arguments pass through untouched so composed commands stay readable.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    if cfg!(windows) {
        // cmd.exe: double quotes, embedded quotes doubled
        format!("\"{}\"", arg.replace('"', "\"\""))
    } else {
        // POSIX sh: single quotes, embedded quotes spliced out
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
