//! Composer resolution and availability checks.

use std::path::Path;
use std::process::Command;

use crate::runtime::php::php_binary;
use crate::shell::quote_arg;

/// Where to send users who do not have Composer yet.
pub const DOCS_URL: &str = "https://getcomposer.org";

/// Resolves the Composer invocation to embed in command strings: a local
/// `composer.phar` under `working_dir` run through PHP, or the global
/// `composer` binary.
pub fn find_composer(working_dir: &Path) -> String {
    let phar = working_dir.join("composer.phar");
    if phar.is_file() {
        return format!("{} {}", php_binary(), quote_arg(&phar.to_string_lossy()));
    }

    "composer".to_string()
}

/// Check if Composer is callable at all, local phar included.
pub fn is_installed(working_dir: &Path) -> bool {
    working_dir.join("composer.phar").is_file()
        || Command::new("composer")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
}

/// Get the installed Composer version banner (if available).
pub fn get_version() -> Option<String> {
    let output = Command::new("composer").arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let banner = String::from_utf8_lossy(&out.stdout);
            banner.lines().next().map(|line| line.trim().to_string())
        }
        _ => None,
    }
}
