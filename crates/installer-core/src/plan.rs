//! Invocation arguments and the validated scaffold plan derived from them.
//!
//! [`NewArgs`] mirrors the `solaris new` command surface: everything is
//! optional so the interactive prompts can fill the gaps. [`ScaffoldPlan`]
//! is the fully-resolved form the installer executes; building one via
//! [`ScaffoldPlan::from_args`] performs all option validation up front so
//! later stages never see an invalid value.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;

use crate::error::InstallError;
use crate::options::{default_frontend, Backend, Database, Frontend, SolarisPackage};

// Project names may use letters, numbers, dashes, underscores and dots.
static INVALID_NAME_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\pL\pN\-_.]").unwrap());

/// Format check shared by the prompt layer and argument validation.
pub fn is_valid_project_name(name: &str) -> bool {
    !INVALID_NAME_CHAR.is_match(name)
}

/// Raw `solaris new` arguments before prompting and validation.
#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    pub name: Option<String>,
    pub token: Option<String>,
    pub package: Option<String>,
    pub laravel: bool,
    pub fiber: bool,
    pub netcore: bool,
    pub blade: bool,
    pub vue: bool,
    pub react: bool,
    pub database: Option<String>,
    pub db_host: Option<String>,
    pub db_port: Option<String>,
    pub db_name: Option<String>,
    pub db_username: Option<String>,
    pub db_password: Option<String>,
    pub redis_db: Option<String>,
    pub redis_cache_db: Option<String>,
    pub npm: Option<bool>,
    pub migrate: Option<bool>,
    pub seeder: Option<bool>,
}

/// Resolved database connection settings written into the `.env` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub driver: Database,
    pub host: String,
    pub port: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Everything the installer needs, validated and defaulted.
#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    pub name: String,
    pub token: String,
    pub package: SolarisPackage,
    pub backend: Backend,
    pub frontend: Frontend,
    pub database: DatabaseSettings,
    pub redis_db: String,
    pub redis_cache_db: String,
    pub npm: bool,
    pub migrate: bool,
    pub seeder: bool,
}

impl ScaffoldPlan {
    /// Validates raw arguments and fills in defaults.
    ///
    /// The project name and Composer token are hard requirements; every
    /// other field falls back to the same defaults the prompts offer.
    pub fn from_args(args: &NewArgs) -> Result<Self> {
        let name = match args.name.as_deref() {
            Some(name) if !name.is_empty() => {
                name.trim_end_matches(['/', '\\']).to_string()
            }
            _ => bail!("The project name is required."),
        };
        if !is_valid_project_name(&name) {
            return Err(InstallError::InvalidProjectName { name }.into());
        }

        let token = match args.token.as_deref() {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => bail!("The Composer token is required."),
        };

        let package = match args.package.as_deref() {
            Some(value) => SolarisPackage::parse(value)?,
            None => SolarisPackage::Core,
        };

        let backend = if args.laravel {
            Backend::Laravel
        } else if args.fiber {
            Backend::Fiber
        } else if args.netcore {
            Backend::Netcore
        } else {
            Backend::Laravel
        };

        let frontend = if args.blade {
            Frontend::Blade
        } else if args.vue {
            Frontend::Vue
        } else if args.react {
            Frontend::React
        } else {
            default_frontend(backend)
        };

        let driver = match args.database.as_deref() {
            Some(value) => Database::parse(value)?,
            None => Database::Mysql,
        };

        let database = DatabaseSettings {
            driver,
            host: args.db_host.clone().unwrap_or_else(|| "127.0.0.1".to_string()),
            port: args
                .db_port
                .clone()
                .unwrap_or_else(|| driver.default_port().to_string()),
            name: args.db_name.clone().unwrap_or_else(|| "solaris".to_string()),
            username: args.db_username.clone().unwrap_or_else(|| "root".to_string()),
            password: args.db_password.clone().unwrap_or_default(),
        };

        Ok(Self {
            name,
            token,
            package,
            backend,
            frontend,
            database,
            redis_db: args.redis_db.clone().unwrap_or_else(|| "0".to_string()),
            redis_cache_db: args.redis_cache_db.clone().unwrap_or_else(|| "1".to_string()),
            npm: args.npm.unwrap_or(false),
            migrate: args.migrate.unwrap_or(false),
            seeder: args.seeder.unwrap_or(false),
        })
    }

    /// Absolute path the application will be created in.
    pub fn installation_directory(&self) -> PathBuf {
        installation_directory(&self.name)
    }
}

/// Resolves a project name to its target directory. A name of `.` means
/// the current working directory.
pub fn installation_directory(name: &str) -> PathBuf {
    if name == "." {
        PathBuf::from(".")
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(name)
    }
}

/// Refuses to scaffold over an existing file or directory. Installing
/// into the current working directory itself is allowed.
pub fn ensure_target_available(directory: &Path) -> Result<(), InstallError> {
    let is_current_dir = directory == Path::new(".")
        || std::env::current_dir()
            .map(|cwd| cwd == directory)
            .unwrap_or(false);
    if is_current_dir {
        return Ok(());
    }

    if directory.is_dir() || directory.is_file() {
        return Err(InstallError::TargetExists {
            path: directory.to_path_buf(),
        });
    }

    Ok(())
}
