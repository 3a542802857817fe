//! Fixed option tables: packages, backends, frontends, database drivers
//!
//! Everything the prompt layer offers for selection is derived from the
//! immutable tables in this module, so the derivations stay unit-testable
//! without any interactive I/O.

use crate::error::InstallError;
use std::collections::HashSet;
use std::fmt;

/// Solaris add-on bundles installable on top of the base scaffold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarisPackage {
    Core,
    MasterData,
    Sales,
    Marketing,
    Service,
}

impl SolarisPackage {
    pub const ALL: [SolarisPackage; 5] = [
        SolarisPackage::Core,
        SolarisPackage::MasterData,
        SolarisPackage::Sales,
        SolarisPackage::Marketing,
        SolarisPackage::Service,
    ];

    pub const KEYS: [&'static str; 5] = ["core", "master-data", "sales", "marketing", "service"];

    /// Machine key, as accepted by `--package`
    pub fn key(&self) -> &'static str {
        match self {
            SolarisPackage::Core => "core",
            SolarisPackage::MasterData => "master-data",
            SolarisPackage::Sales => "sales",
            SolarisPackage::Marketing => "marketing",
            SolarisPackage::Service => "service",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SolarisPackage::Core => "Core",
            SolarisPackage::MasterData => "Master Data",
            SolarisPackage::Sales => "Sales",
            SolarisPackage::Marketing => "Marketing",
            SolarisPackage::Service => "Service",
        }
    }

    pub fn parse(value: &str) -> Result<Self, InstallError> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == value)
            .ok_or_else(|| InstallError::InvalidOption {
                field: "solaris package",
                value: value.to_string(),
                allowed: &Self::KEYS,
            })
    }

    /// Composer dependency chain for this bundle, least to most specific.
    /// Every entry gets registered as a VCS repository; only the last one is
    /// required directly, and Composer pulls the rest transitively.
    pub fn composer_packages(&self) -> &'static [&'static str] {
        match self {
            SolarisPackage::Core => &["isystemasia/solaris-laravel"],
            SolarisPackage::MasterData => &[
                "isystemasia/solaris-laravel",
                "isystemasia/solaris-laravel-masterdata",
            ],
            SolarisPackage::Sales => &[
                "isystemasia/solaris-laravel",
                "isystemasia/solaris-laravel-masterdata",
                "isystemasia/solaris-laravel-sales",
            ],
            SolarisPackage::Marketing => &[
                "isystemasia/solaris-laravel",
                "isystemasia/solaris-laravel-masterdata",
                "isystemasia/solaris-laravel-marketing",
            ],
            SolarisPackage::Service => &[
                "isystemasia/solaris-laravel",
                "isystemasia/solaris-laravel-masterdata",
                "isystemasia/solaris-laravel-service",
            ],
        }
    }
}

impl fmt::Display for SolarisPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Backend variants offered by the installer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Laravel,
    Fiber,
    Netcore,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Laravel, Backend::Fiber, Backend::Netcore];

    pub fn key(&self) -> &'static str {
        match self {
            Backend::Laravel => "laravel",
            Backend::Fiber => "fiber",
            Backend::Netcore => "netcore",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Backend::Laravel => "PHP Laravel",
            Backend::Fiber => "Go Fiber",
            Backend::Netcore => "C# ASP.Net Core",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Frontend starter kits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frontend {
    Blade,
    Vue,
    React,
}

impl Frontend {
    pub fn key(&self) -> &'static str {
        match self {
            Frontend::Blade => "blade",
            Frontend::Vue => "vue",
            Frontend::React => "react",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frontend::Blade => "Laravel Blade - Solar UI",
            Frontend::Vue => "Solar Vue",
            Frontend::React => "Solar React",
        }
    }
}

/// Frontends available for a given backend. Blade renders through the
/// Laravel templating engine, so it is only offered on that backend.
pub fn frontend_options(backend: Backend) -> Vec<Frontend> {
    let mut options = vec![Frontend::Blade, Frontend::Vue, Frontend::React];
    if backend != Backend::Laravel {
        options.retain(|f| *f != Frontend::Blade);
    }
    options
}

/// Preselected frontend for a given backend
pub fn default_frontend(backend: Backend) -> Frontend {
    if backend == Backend::Laravel {
        Frontend::Blade
    } else {
        Frontend::Vue
    }
}

/// Supported database drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Database {
    Mysql,
    Mariadb,
    Pgsql,
    Sqlsrv,
    Sqlite,
}

impl Database {
    pub const ALL: [Database; 5] = [
        Database::Mysql,
        Database::Mariadb,
        Database::Pgsql,
        Database::Sqlsrv,
        Database::Sqlite,
    ];

    pub const KEYS: [&'static str; 5] = ["mysql", "mariadb", "pgsql", "sqlsrv", "sqlite"];

    /// Machine key, as accepted by `--database` and written to DB_CONNECTION
    pub fn key(&self) -> &'static str {
        match self {
            Database::Mysql => "mysql",
            Database::Mariadb => "mariadb",
            Database::Pgsql => "pgsql",
            Database::Sqlsrv => "sqlsrv",
            Database::Sqlite => "sqlite",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Database::Mysql => "MySQL",
            Database::Mariadb => "MariaDB",
            Database::Pgsql => "PostgreSQL",
            Database::Sqlsrv => "SQL Server",
            Database::Sqlite => "SQLite",
        }
    }

    /// PHP extension the driver needs at runtime
    pub fn pdo_extension(&self) -> &'static str {
        match self {
            Database::Mysql | Database::Mariadb => "pdo_mysql",
            Database::Pgsql => "pdo_pgsql",
            Database::Sqlsrv => "pdo_sqlsrv",
            Database::Sqlite => "pdo_sqlite",
        }
    }

    pub fn default_port(&self) -> &'static str {
        match self {
            Database::Mysql | Database::Mariadb => "3306",
            Database::Pgsql => "5432",
            Database::Sqlsrv => "1433",
            Database::Sqlite => "3306",
        }
    }

    /// Drivers backed by a single file need no host/port/credentials
    pub fn is_file_based(&self) -> bool {
        matches!(self, Database::Sqlite)
    }

    pub fn parse(value: &str) -> Result<Self, InstallError> {
        Self::ALL
            .into_iter()
            .find(|d| d.key() == value)
            .ok_or_else(|| InstallError::InvalidOption {
                field: "database driver",
                value: value.to_string(),
                allowed: &Self::KEYS,
            })
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Default port for a raw `--db_port`-less invocation; unknown driver
/// strings fall back to the MySQL port and fail validation later.
pub fn default_database_port(driver: &str) -> &'static str {
    Database::parse(driver)
        .map(|d| d.default_port())
        .unwrap_or("3306")
}

/// A database entry as presented in the selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseOption {
    pub driver: Database,
    pub label: String,
    pub available: bool,
}

/// Database drivers in prompt order: drivers whose PDO extension is missing
/// from the PHP runtime sort last and say so in their label. The sort is
/// stable, so available drivers keep their table order.
pub fn database_options(loaded_extensions: &HashSet<String>) -> Vec<DatabaseOption> {
    let mut options: Vec<DatabaseOption> = Database::ALL
        .into_iter()
        .map(|driver| {
            let available = loaded_extensions.contains(driver.pdo_extension());
            let label = if available {
                driver.label().to_string()
            } else {
                format!("{} (Missing PDO extension)", driver.label())
            };
            DatabaseOption {
                driver,
                label,
                available,
            }
        })
        .collect();

    options.sort_by_key(|option| !option.available);
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_package_parse_roundtrip() {
        for package in SolarisPackage::ALL {
            assert_eq!(SolarisPackage::parse(package.key()).unwrap(), package);
        }
    }

    #[test]
    fn test_package_parse_rejects_unknown() {
        let err = SolarisPackage::parse("warehouse").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid solaris package [warehouse]"));
        assert!(message.contains("core, master-data, sales, marketing, service"));
    }

    #[test]
    fn test_package_chain_ends_with_most_specific() {
        assert_eq!(
            SolarisPackage::Sales.composer_packages().last().copied(),
            Some("isystemasia/solaris-laravel-sales")
        );
        assert_eq!(
            SolarisPackage::Core.composer_packages(),
            &["isystemasia/solaris-laravel"]
        );
        // Every chain starts from the base package
        for package in SolarisPackage::ALL {
            assert_eq!(
                package.composer_packages().first().copied(),
                Some("isystemasia/solaris-laravel")
            );
        }
    }

    #[test]
    fn test_database_parse_rejects_unknown() {
        let err = Database::parse("oracle").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid database driver [oracle]"));
        assert!(message.contains("mysql, mariadb, pgsql, sqlsrv, sqlite"));
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(default_database_port("mysql"), "3306");
        assert_eq!(default_database_port("mariadb"), "3306");
        assert_eq!(default_database_port("pgsql"), "5432");
        assert_eq!(default_database_port("sqlsrv"), "1433");
        // sqlite and unknown drivers fall back to the MySQL port
        assert_eq!(default_database_port("sqlite"), "3306");
        assert_eq!(default_database_port("nonsense"), "3306");
    }

    #[test]
    fn test_frontend_options_depend_on_backend() {
        assert_eq!(
            frontend_options(Backend::Laravel),
            vec![Frontend::Blade, Frontend::Vue, Frontend::React]
        );
        assert_eq!(
            frontend_options(Backend::Fiber),
            vec![Frontend::Vue, Frontend::React]
        );
        assert_eq!(
            frontend_options(Backend::Netcore),
            vec![Frontend::Vue, Frontend::React]
        );
    }

    #[test]
    fn test_default_frontend() {
        assert_eq!(default_frontend(Backend::Laravel), Frontend::Blade);
        assert_eq!(default_frontend(Backend::Fiber), Frontend::Vue);
    }

    #[test]
    fn test_database_options_sort_missing_last() {
        let loaded = extensions(&["pdo_pgsql", "pdo_sqlite"]);
        let options = database_options(&loaded);

        let keys: Vec<&str> = options.iter().map(|o| o.driver.key()).collect();
        assert_eq!(keys, vec!["pgsql", "sqlite", "mysql", "mariadb", "sqlsrv"]);

        assert!(options[0].available);
        assert_eq!(options[0].label, "PostgreSQL");
        assert!(!options[2].available);
        assert_eq!(options[2].label, "MySQL (Missing PDO extension)");
    }

    #[test]
    fn test_database_options_keep_table_order_when_all_available() {
        let loaded = extensions(&["pdo_mysql", "pdo_pgsql", "pdo_sqlsrv", "pdo_sqlite"]);
        let options = database_options(&loaded);
        let keys: Vec<&str> = options.iter().map(|o| o.driver.key()).collect();
        assert_eq!(keys, vec!["mysql", "mariadb", "pgsql", "sqlsrv", "sqlite"]);
        assert!(options.iter().all(|o| o.available));
    }
}
