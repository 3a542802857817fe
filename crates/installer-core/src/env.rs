//! Whole-file find and replace for the scaffolded environment templates.
//!
//! Every routine reads the full file, transforms the content and writes it
//! back. [`configure_database_connection`] drives these primitives against
//! the project's `.env` and `.env.example` to inject the resolved
//! connection settings.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::plan::DatabaseSettings;

/// Connection lines exactly as they appear in a fresh framework skeleton.
pub const DATABASE_DEFAULTS: [&str; 5] = [
    "DB_HOST=127.0.0.1",
    "DB_PORT=3306",
    "DB_DATABASE=laravel",
    "DB_USERNAME=root",
    "DB_PASSWORD=",
];

static DB_CONNECTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DB_CONNECTION=.*").unwrap());

/// Replaces every occurrence of a literal `search` string in `file`.
pub fn replace_in_file(search: &str, replace: &str, file: &Path) -> Result<()> {
    let contents = read(file)?;
    write(file, &contents.replace(search, replace))
}

/// Applies several literal replacement pairs to `file` in one read/write
/// pass. Pairs are applied in order, each over the whole content.
pub fn replace_all_in_file<'a, I>(pairs: I, file: &Path) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut contents = read(file)?;
    for (search, replace) in pairs {
        contents = contents.replace(search, replace);
    }
    write(file, &contents)
}

/// Replaces every match of `pattern` in `file`. The replacement supports
/// capture-group expansion (`$1` and friends).
pub fn replace_pattern_in_file(pattern: &Regex, replace: &str, file: &Path) -> Result<()> {
    let contents = read(file)?;
    write(file, pattern.replace_all(&contents, replace).as_ref())
}

/// Points `.env` and `.env.example` at the chosen database.
///
/// File-based drivers have no server to reach, so their connection lines
/// are commented out instead of rewritten; the transform is idempotent and
/// is undone when a later run switches back to a server driver.
pub fn configure_database_connection(
    directory: &Path,
    settings: &DatabaseSettings,
) -> Result<()> {
    let env = directory.join(".env");
    let example = directory.join(".env.example");

    let connection = format!("DB_CONNECTION={}", settings.driver.key());
    for file in [&env, &example] {
        replace_pattern_in_file(&DB_CONNECTION_LINE, &connection, file)?;
    }

    if settings.driver.is_file_based() {
        let environment = read(&env)?;
        if !environment.contains("# DB_HOST=127.0.0.1") {
            comment_database_defaults(directory)?;
        }
        return Ok(());
    }

    uncomment_database_defaults(directory)?;

    let database_name = settings.name.to_lowercase().replace('-', "_");
    let replacements = [
        format!("DB_HOST={}", settings.host),
        format!("DB_PORT={}", settings.port),
        format!("DB_DATABASE={database_name}"),
        format!("DB_USERNAME={}", settings.username),
        format!("DB_PASSWORD={}", settings.password),
    ];

    for file in [&env, &example] {
        let pairs = DATABASE_DEFAULTS
            .iter()
            .copied()
            .zip(replacements.iter().map(String::as_str));
        replace_all_in_file(pairs, file)?;
    }

    Ok(())
}

fn comment_database_defaults(directory: &Path) -> Result<()> {
    let commented: Vec<String> = DATABASE_DEFAULTS
        .iter()
        .map(|line| format!("# {line}"))
        .collect();

    for file in [directory.join(".env"), directory.join(".env.example")] {
        let pairs = DATABASE_DEFAULTS
            .iter()
            .copied()
            .zip(commented.iter().map(String::as_str));
        replace_all_in_file(pairs, &file)?;
    }

    Ok(())
}

fn uncomment_database_defaults(directory: &Path) -> Result<()> {
    let commented: Vec<String> = DATABASE_DEFAULTS
        .iter()
        .map(|line| format!("# {line}"))
        .collect();

    for file in [directory.join(".env"), directory.join(".env.example")] {
        let pairs = commented
            .iter()
            .map(String::as_str)
            .zip(DATABASE_DEFAULTS.iter().copied());
        replace_all_in_file(pairs, &file)?;
    }

    Ok(())
}

fn read(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

fn write(file: &Path, contents: &str) -> Result<()> {
    fs::write(file, contents).with_context(|| format!("failed to write {}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Database;

    const ENV_SKELETON: &str = "APP_NAME=Laravel\n\
APP_URL=http://localhost\n\
\n\
DB_CONNECTION=mysql\n\
DB_HOST=127.0.0.1\n\
DB_PORT=3306\n\
DB_DATABASE=laravel\n\
DB_USERNAME=root\n\
DB_PASSWORD=\n";

    fn scaffold(dir: &Path) {
        fs::write(dir.join(".env"), ENV_SKELETON).unwrap();
        fs::write(dir.join(".env.example"), ENV_SKELETON).unwrap();
    }

    fn settings(driver: Database) -> DatabaseSettings {
        DatabaseSettings {
            driver,
            host: "127.0.0.1".to_string(),
            port: "3306".to_string(),
            name: "laravel".to_string(),
            username: "root".to_string(),
            password: String::new(),
        }
    }

    #[test]
    fn literal_replacement_hits_every_occurrence() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("sample.txt");
        fs::write(&file, "aaa bbb aaa").unwrap();

        replace_in_file("aaa", "ccc", &file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "ccc bbb ccc");
    }

    #[test]
    fn pattern_replacement_rewrites_the_whole_line() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join(".env");
        fs::write(&file, "DB_CONNECTION=mysql\nDB_CONNECTION=stale\n").unwrap();

        replace_pattern_in_file(&DB_CONNECTION_LINE, "DB_CONNECTION=pgsql", &file).unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "DB_CONNECTION=pgsql\nDB_CONNECTION=pgsql\n"
        );
    }

    #[test]
    fn server_driver_rewrites_connection_values_in_both_files() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());

        let settings = DatabaseSettings {
            driver: Database::Pgsql,
            host: "db.local".to_string(),
            port: "5555".to_string(),
            name: "My-App".to_string(),
            username: "admin".to_string(),
            password: "s3cret".to_string(),
        };
        configure_database_connection(tmp.path(), &settings).unwrap();

        for file in [".env", ".env.example"] {
            let contents = fs::read_to_string(tmp.path().join(file)).unwrap();
            assert!(contents.contains("DB_CONNECTION=pgsql"), "{file}");
            assert!(contents.contains("DB_HOST=db.local"), "{file}");
            assert!(contents.contains("DB_PORT=5555"), "{file}");
            assert!(contents.contains("DB_DATABASE=my_app"), "{file}");
            assert!(contents.contains("DB_USERNAME=admin"), "{file}");
            assert!(contents.contains("DB_PASSWORD=s3cret"), "{file}");
        }
    }

    #[test]
    fn sqlite_comments_the_connection_lines_idempotently() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());

        configure_database_connection(tmp.path(), &settings(Database::Sqlite)).unwrap();
        let once = fs::read_to_string(tmp.path().join(".env")).unwrap();
        assert!(once.contains("DB_CONNECTION=sqlite"));
        assert!(once.contains("# DB_HOST=127.0.0.1"));
        assert!(once.contains("# DB_PASSWORD="));
        assert!(!once.contains("# # "));

        configure_database_connection(tmp.path(), &settings(Database::Sqlite)).unwrap();
        let twice = fs::read_to_string(tmp.path().join(".env")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn comment_then_uncomment_restores_the_original_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        scaffold(tmp.path());

        configure_database_connection(tmp.path(), &settings(Database::Sqlite)).unwrap();
        configure_database_connection(tmp.path(), &settings(Database::Mysql)).unwrap();

        for file in [".env", ".env.example"] {
            let contents = fs::read_to_string(tmp.path().join(file)).unwrap();
            assert_eq!(contents, ENV_SKELETON, "{file}");
        }
    }
}
