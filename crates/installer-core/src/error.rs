//! Error taxonomy for validation and preflight failures
//!
//! Everything here is raised before the first external command runs; child
//! process failures are carried as exit codes, not errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    /// An enum-constrained option was set to a value outside its allow-list
    #[error("Invalid {field} [{value}]. Possible values are: {}.", .allowed.join(", "))]
    InvalidOption {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("The name may only contain letters, numbers, dashes, underscores, and periods.")]
    InvalidProjectName { name: String },

    #[error("Application already exists!")]
    TargetExists { path: PathBuf },

    #[error(
        "The following PHP extensions are required but are not installed: {}",
        join_with_and(.missing)
    )]
    MissingExtensions { missing: Vec<String> },
}

/// Join a list with ", ", using ", and " before the final item.
fn join_with_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_lists_allowed_values() {
        let err = InstallError::InvalidOption {
            field: "database driver",
            value: "oracle".to_string(),
            allowed: &["mysql", "pgsql"],
        };
        assert_eq!(
            err.to_string(),
            "Invalid database driver [oracle]. Possible values are: mysql, pgsql."
        );
    }

    #[test]
    fn test_missing_extensions_message_joins_complete_set() {
        let err = InstallError::MissingExtensions {
            missing: vec![
                "mbstring".to_string(),
                "openssl".to_string(),
                "tokenizer".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "The following PHP extensions are required but are not installed: \
             mbstring, openssl, and tokenizer"
        );
    }

    #[test]
    fn test_missing_extensions_message_single_item() {
        let err = InstallError::MissingExtensions {
            missing: vec!["openssl".to_string()],
        };
        assert!(err.to_string().ends_with("not installed: openssl"));
    }
}
