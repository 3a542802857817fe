//! Solaris CLI - Create and configure new Solaris applications

use anyhow::Result;
use clap::{Parser, Subcommand};
use installer_core::NewArgs;

#[derive(Parser, Debug)]
#[command(name = "solaris")]
#[command(about = "The Solaris application installer")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new solaris application
    New(CliNewArgs),
}

#[derive(Parser, Debug)]
pub struct CliNewArgs {
    /// Project directory name
    pub name: Option<String>,

    /// Token granting access to the private Solaris packages
    pub token: Option<String>,

    /// Install solaris package. Possible values are: core, master-data, sales, marketing, service
    #[arg(long)]
    pub package: Option<String>,

    /// PHP Laravel Backend
    #[arg(long, group = "backend")]
    pub laravel: bool,

    /// Go Fiber Backend
    #[arg(long, group = "backend")]
    pub fiber: bool,

    /// C# ASP.Net Core
    #[arg(long, group = "backend")]
    pub netcore: bool,

    /// Install Laravel Blade Solar UI Starter Kit
    #[arg(long, group = "frontend")]
    pub blade: bool,

    /// Install Solar Vue Starter Kit
    #[arg(long, group = "frontend")]
    pub vue: bool,

    /// Install Solar React Starter Kit
    #[arg(long, group = "frontend")]
    pub react: bool,

    /// The database driver your application will use. Possible values are: mysql, mariadb, pgsql, sqlsrv, sqlite
    #[arg(long)]
    pub database: Option<String>,

    /// Database host
    #[arg(long = "db_host")]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long = "db_port")]
    pub db_port: Option<String>,

    /// Database name
    #[arg(long = "db_name")]
    pub db_name: Option<String>,

    /// Database username
    #[arg(long = "db_username")]
    pub db_username: Option<String>,

    /// Database password
    #[arg(long = "db_password")]
    pub db_password: Option<String>,

    /// Redis DB index
    #[arg(long = "redis_db")]
    pub redis_db: Option<String>,

    /// Redis Cache DB index
    #[arg(long = "redis_cache_db")]
    pub redis_cache_db: Option<String>,

    /// Doing npm install after setup package.json finish
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub npm: Option<bool>,

    /// Doing migrate after install finish
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub migrate: Option<bool>,

    /// Doing seeder after install finish
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub seeder: Option<bool>,
}

/// Folds clap's injected `SetTrue` default back to `None`. An absent flag
/// parses as `Some(false)`, and the flags take no value, so `Some(false)`
/// can only mean "not given" and must stay open for the prompts.
fn presence_flag(flag: Option<bool>) -> Option<bool> {
    flag.filter(|&set| set)
}

impl From<CliNewArgs> for NewArgs {
    fn from(args: CliNewArgs) -> Self {
        NewArgs {
            name: args.name,
            token: args.token,
            package: args.package,
            laravel: args.laravel,
            fiber: args.fiber,
            netcore: args.netcore,
            blade: args.blade,
            vue: args.vue,
            react: args.react,
            database: args.database,
            db_host: args.db_host,
            db_port: args.db_port,
            db_name: args.db_name,
            db_username: args.db_username,
            db_password: args.db_password,
            redis_db: args.redis_db,
            redis_cache_db: args.redis_cache_db,
            npm: presence_flag(args.npm),
            migrate: presence_flag(args.migrate),
            seeder: presence_flag(args.seeder),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let cli = Cli::parse();

    let args = match cli.command {
        Some(Command::New(new_args)) => new_args.into(),
        // No subcommand provided, default to the interactive `new` flow
        None => NewArgs::default(),
    };

    let result = installer_core::run(args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    let code = result?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
