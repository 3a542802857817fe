//! PHP executable lookup and capability checks.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Command;

use semver::Version;

use crate::error::InstallError;
use crate::shell::quote_arg;

/// Extensions the scaffolded framework cannot boot without.
pub const REQUIRED_EXTENSIONS: [&str; 7] = [
    "ctype",
    "filter",
    "hash",
    "mbstring",
    "openssl",
    "session",
    "tokenizer",
];

/// Locates the PHP executable. Honors `PHP_PATH`, then walks `PATH`, then
/// falls back to the bare name.
pub fn php_executable() -> PathBuf {
    if let Ok(path) = std::env::var("PHP_PATH") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(paths) = std::env::var_os("PATH") {
        let name = if cfg!(windows) { "php.exe" } else { "php" };
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return candidate;
            }
        }
    }

    PathBuf::from("php")
}

/// Shell-ready PHP invocation for embedding in command strings.
pub fn php_binary() -> String {
    quote_arg(&php_executable().to_string_lossy())
}

/// Extensions reported by `php -m`. Empty when PHP cannot be invoked.
pub fn loaded_extensions() -> HashSet<String> {
    let output = Command::new(php_executable()).arg("-m").output();

    match output {
        Ok(out) if out.status.success() => {
            parse_extensions(&String::from_utf8_lossy(&out.stdout))
        }
        _ => HashSet::new(),
    }
}

/// Checks the fixed required-extension list against `loaded`, reporting
/// the complete missing set in one error.
pub fn ensure_extensions_available(loaded: &HashSet<String>) -> Result<(), InstallError> {
    let missing: Vec<String> = REQUIRED_EXTENSIONS
        .iter()
        .filter(|extension| !loaded.contains(**extension))
        .map(|extension| extension.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(InstallError::MissingExtensions { missing })
    }
}

/// Version reported by `php -v`, if PHP is present and parseable.
pub fn php_version() -> Option<Version> {
    let output = Command::new(php_executable()).arg("-v").output();

    match output {
        Ok(out) if out.status.success() => {
            parse_php_version(&String::from_utf8_lossy(&out.stdout))
        }
        _ => None,
    }
}

fn parse_extensions(output: &str) -> HashSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('['))
        .map(str::to_string)
        .collect()
}

fn parse_php_version(output: &str) -> Option<Version> {
    // First line looks like `PHP 8.3.6 (cli) (built: ...)`; distro builds
    // append suffixes such as `8.1.2-1ubuntu2`.
    let raw = output.split_whitespace().nth(1)?;
    let bare: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Version::parse(&bare).ok()
}
