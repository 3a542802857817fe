//! Scaffold orchestration: from raw arguments to an installed application.
//!
//! The pipeline is linear and single-pass: validate, guard the target
//! directory, create the base skeleton, install the chosen bundle, patch
//! configuration, run follow-up setup. The first failing command batch
//! stops the run and its exit code becomes the process exit code.

use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use semver::Version;
use serde::Serialize;

use crate::env::{configure_database_connection, replace_in_file};
use crate::options::{Backend, SolarisPackage};
use crate::plan::{ensure_target_available, NewArgs, ScaffoldPlan};
use crate::runner::{CommandBatch, CommandRunner};
use crate::runtime::composer::find_composer;
use crate::runtime::php;
use crate::shell::quote_arg;

/// Composer credential file granting access to the private package source.
#[derive(Debug, Serialize)]
struct ComposerAuth<'a> {
    #[serde(rename = "github-oauth")]
    github_oauth: GithubOauth<'a>,
}

#[derive(Debug, Serialize)]
struct GithubOauth<'a> {
    #[serde(rename = "github.com")]
    github_com: &'a str,
}

/// Runs the whole scaffolding pipeline for one invocation.
///
/// Returns the exit code of the last executed command batch. Validation
/// and guard failures surface as errors before any command runs.
pub async fn run(args: NewArgs) -> Result<i32> {
    let plan = ScaffoldPlan::from_args(&args)?;
    let directory = plan.installation_directory();
    ensure_target_available(&directory)?;

    match plan.backend {
        Backend::Laravel => install_laravel(&plan, &directory).await,
        backend => {
            println!(
                "  {}",
                format!(
                    "The {} backend is not bundled with this installer yet; nothing was created.",
                    backend.label()
                )
                .yellow()
            );
            Ok(0)
        }
    }
}

async fn install_laravel(plan: &ScaffoldPlan, directory: &Path) -> Result<i32> {
    php::ensure_extensions_available(&php::loaded_extensions())?;

    if let Some(version) = php::php_version() {
        if version < Version::new(8, 2, 0) {
            eprintln!(
                "  {} PHP {version} detected; the scaffolded application targets PHP 8.2 or newer.\n",
                " WARN ".black().on_yellow(),
            );
        }
    }

    let composer = find_composer(directory);
    let php_binary = php::php_binary();

    let runner = CommandRunner::new(std::io::stdout().is_terminal())
        .exempt_prefix(format!("{php_binary} ./vendor/bin/pest"));

    let base = CommandBatch::new(base_scaffold_commands(&composer, &php_binary, directory));
    let created = runner.run(&base).await?;
    if !created.success() {
        return Ok(created.exit_code);
    }

    write_auth_json(directory, &plan.token)?;
    append_gitignore(directory)?;

    let extras =
        CommandBatch::new(package_install_commands(&composer, plan.package)).in_dir(directory);
    let installed = runner.run(&extras).await?;
    if !installed.success() {
        return Ok(installed.exit_code);
    }

    replace_in_file(
        "APP_URL=http://localhost",
        "APP_URL=http://localhost:8000",
        &directory.join(".env"),
    )?;
    configure_database_connection(directory, &plan.database)?;

    let toggles = [
        ("npm-install", Toggle::Enabled(plan.npm)),
        ("migrate", Toggle::Enabled(plan.migrate)),
        ("seeder", Toggle::Enabled(plan.seeder)),
    ];
    let solaris =
        CommandBatch::new([solaris_install_command(&php_binary, directory, &toggles)])
            .in_dir(directory);
    let configured = runner.run(&solaris).await?;
    if !configured.success() {
        return Ok(configured.exit_code);
    }

    let follow_ups =
        CommandBatch::new(follow_up_commands(&php_binary, directory)).in_dir(directory);
    let finished = runner.run(&follow_ups).await?;

    Ok(finished.exit_code)
}

/// Commands that fetch and prepare the base framework skeleton.
pub fn base_scaffold_commands(composer: &str, php: &str, directory: &Path) -> Vec<String> {
    let dir = quote_arg(&directory.to_string_lossy());
    let artisan = quote_arg(&directory.join("artisan").to_string_lossy());

    let mut commands = vec![
        format!(
            "{composer} create-project laravel/laravel {dir} --remove-vcs --prefer-dist --no-scripts"
        ),
        format!("{composer} run post-root-package-install -d {dir}"),
        format!("{php} {artisan} key:generate --ansi"),
    ];

    if !cfg!(windows) {
        commands.push(format!("chmod 755 {artisan}"));
    }

    commands
}

/// Registers every repository in the bundle's dependency chain, then
/// requires the most specific package with its full transitive dependency
/// set, bypassing the local cache.
pub fn package_install_commands(composer: &str, package: SolarisPackage) -> Vec<String> {
    let chain = package.composer_packages();

    let mut commands: Vec<String> = chain
        .iter()
        .map(|pack| {
            format!("{composer} config repositories.{pack} vcs https://github.com/{pack}.git")
        })
        .collect();

    if let Some(last) = chain.last() {
        commands.push(format!(
            "{composer} require {last} --with-all-dependencies --no-cache"
        ));
    }

    commands
}

/// A post-install toggle handed to the application's own installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// Bare flag, emitted only when enabled.
    Enabled(bool),
    /// String-valued flag, emitted as a quoted `--key="value"` pair.
    Value(String),
}

/// Builds the application's own install invocation from the post-install
/// toggles.
pub fn solaris_install_command(
    php: &str,
    directory: &Path,
    toggles: &[(&str, Toggle)],
) -> String {
    let artisan = quote_arg(&directory.join("artisan").to_string_lossy());
    let mut command = format!("{php} {artisan} solaris:install");

    for (flag, toggle) in toggles {
        match toggle {
            Toggle::Enabled(true) => {
                command.push_str(" --");
                command.push_str(flag);
            }
            Toggle::Enabled(false) => {}
            Toggle::Value(value) => {
                command.push_str(&format!(" --{flag}=\"{value}\""));
            }
        }
    }

    command
}

/// Broadcasting setup commands run once the application installer is done.
pub fn follow_up_commands(php: &str, directory: &Path) -> Vec<String> {
    let artisan = quote_arg(&directory.join("artisan").to_string_lossy());

    vec![
        format!("{php} {artisan} reverb:install -q -n"),
        format!("{php} {artisan} install:broadcasting --without-node --force --reverb"),
    ]
}

fn write_auth_json(directory: &Path, token: &str) -> Result<()> {
    let auth = ComposerAuth {
        github_oauth: GithubOauth { github_com: token },
    };
    let path = directory.join("auth.json");

    fs::write(&path, serde_json::to_string_pretty(&auth)?)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Keeps the credential file out of version control. Appending is
/// idempotent and drops blank lines, like the upstream skeleton expects.
fn append_gitignore(directory: &Path) -> Result<()> {
    let path = directory.join(".gitignore");

    let mut lines: Vec<String> = if path.exists() {
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    if !lines.iter().any(|line| line == "auth.json") {
        lines.push("auth.json".to_string());
        fs::write(&path, lines.join("\n") + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}
