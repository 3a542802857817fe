//! Charm-style CLI prompts using cliclack

use std::path::PathBuf;

use anyhow::Result;

use crate::install;
use crate::options::{
    database_options, default_database_port, default_frontend, frontend_options, Backend,
    Database, Frontend, SolarisPackage,
};
use crate::plan::{is_valid_project_name, NewArgs};
use crate::runtime::{composer, php};

const BANNER: &str = r#"
 $$$$$$\            $$\                     $$\
$$  __$$\           $$ |                    \__|
$$ /  \__| $$$$$$\  $$ | $$$$$$\   $$$$$$\  $$\  $$$$$$$\
\$$$$$$\  $$  __$$\ $$ | \____$$\ $$  __$$\ $$ |$$  _____|
 \____$$\ $$ /  $$ |$$ | $$$$$$$ |$$ |  \__|$$ |\$$$$$$\
$$\   $$ |$$ |  $$ |$$ |$$  __$$ |$$ |      $$ | \____$$\
\$$$$$$  |\$$$$$$  |$$ |\$$$$$$$ |$$ |      $$ |$$$$$$$  |
 \______/  \______/ \__| \_______|\__|      \__|\_______/
"#;

/// Run the `new` command, prompting for any field not already supplied.
pub async fn run(mut args: NewArgs) -> Result<i32> {
    println!("{}", console::style(BANNER).yellow());
    cliclack::intro("Create a new Solaris application")?;

    // Step 1: Fill the gaps interactively
    resolve_prompts(&mut args)?;
    let name = args.name.clone().unwrap_or_default();

    // Step 2: Preflight the package manager for PHP builds
    if args.laravel {
        handle_composer_check()?;
    }

    // Step 3: Hand over to the installer pipeline
    let code = install::run(args).await?;

    if code == 0 {
        cliclack::outro(format!(
            "Solaris application ready in [{name}]. Build something amazing!"
        ))?;
    } else {
        cliclack::log::error(format!("Installation failed with exit code: {code}"))?;
    }

    Ok(code)
}

fn resolve_prompts(args: &mut NewArgs) -> Result<()> {
    if args.name.as_deref().is_none_or(str::is_empty) {
        // Empty submissions must reach the validator, its message replaces
        // the builtin "Input required".
        let name: String = cliclack::input("What is the name of your project?")
            .placeholder("E.g. example-app")
            .required(false)
            .validate(|input: &String| validate_project_name_input(input))
            .interact()?;
        args.name = Some(name);
    }

    if args.token.as_deref().is_none_or(str::is_empty) {
        let token: String = cliclack::password("Enter your solaris token")
            .mask('▪')
            .allow_empty()
            .validate(|input: &String| validate_token_input(input))
            .interact()?;
        args.token = Some(token);
    }

    if args.package.is_none() {
        let mut select = cliclack::select("Which package will your application use?");
        for package in SolarisPackage::ALL {
            select = select.item(package, package.label(), "");
        }
        let package: SolarisPackage = select.initial_value(SolarisPackage::Core).interact()?;
        args.package = Some(package.key().to_string());
    }

    if !args.laravel && !args.fiber && !args.netcore {
        let mut select = cliclack::select("Which backend would you like to install?");
        for backend in Backend::ALL {
            select = select.item(backend, backend.label(), "");
        }
        match select.initial_value(Backend::Laravel).interact()? {
            Backend::Fiber => args.fiber = true,
            Backend::Netcore => args.netcore = true,
            Backend::Laravel => args.laravel = true,
        }
    }

    let backend = if args.laravel {
        Backend::Laravel
    } else if args.fiber {
        Backend::Fiber
    } else {
        Backend::Netcore
    };

    if !args.blade && !args.vue && !args.react {
        let mut select = cliclack::select("Which frontend would you like to install?");
        for frontend in frontend_options(backend) {
            select = select.item(frontend, frontend.label(), "");
        }
        match select.initial_value(default_frontend(backend)).interact()? {
            Frontend::Blade => args.blade = true,
            Frontend::Vue => args.vue = true,
            Frontend::React => args.react = true,
        }
    }

    if args.database.is_none() {
        let options = database_options(&php::loaded_extensions());
        let mut select = cliclack::select("Which database will your application use?");
        for option in &options {
            select = select.item(option.driver, &option.label, "");
        }
        if let Some(first) = options.first() {
            select = select.initial_value(first.driver);
        }
        let driver: Database = select.interact()?;
        args.database = Some(driver.key().to_string());
    }

    if args.db_host.is_none() {
        let host: String = cliclack::input("Database host")
            .default_input("127.0.0.1")
            .interact()?;
        args.db_host = Some(host);
    }

    if args.db_port.is_none() {
        let driver = args.database.as_deref().unwrap_or("mysql");
        let port: String = cliclack::input("Database port")
            .default_input(default_database_port(driver))
            .interact()?;
        args.db_port = Some(port);
    }

    if args.db_name.is_none() {
        let name: String = cliclack::input("Database name")
            .default_input("solaris")
            .interact()?;
        args.db_name = Some(name);
    }

    if args.db_username.is_none() {
        let username: String = cliclack::input("Database username")
            .default_input("root")
            .interact()?;
        args.db_username = Some(username);
    }

    if args.db_password.is_none() {
        // An empty password is a legitimate answer here.
        let password: String = cliclack::password("Database password")
            .mask('▪')
            .allow_empty()
            .interact()?;
        args.db_password = Some(password);
    }

    if args.redis_db.is_none() {
        let index: String = cliclack::input("Redis DB index")
            .default_input("0")
            .interact()?;
        args.redis_db = Some(index);
    }

    if args.redis_cache_db.is_none() {
        let index: String = cliclack::input("Redis Cache DB index")
            .default_input("1")
            .interact()?;
        args.redis_cache_db = Some(index);
    }

    if args.npm.is_none() {
        args.npm = Some(
            cliclack::confirm("Would you like to run the npm install after package.json updated")
                .initial_value(true)
                .interact()?,
        );
    }

    if args.migrate.is_none() {
        args.migrate = Some(
            cliclack::confirm("Would you like to run the database migrations")
                .initial_value(true)
                .interact()?,
        );
    }

    if args.seeder.is_none() {
        args.seeder = Some(
            cliclack::confirm("Would you like to run the database seeder")
                .initial_value(true)
                .interact()?,
        );
    }

    Ok(())
}

fn validate_project_name_input(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        Err("The project name is required.")
    } else if !is_valid_project_name(name) {
        Err("The name may only contain letters, numbers, dashes, underscores, and periods.")
    } else {
        Ok(())
    }
}

fn validate_token_input(token: &str) -> Result<(), &'static str> {
    if token.is_empty() {
        Err("Token is required.")
    } else {
        Ok(())
    }
}

fn handle_composer_check() -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if composer::is_installed(&cwd) {
        let version =
            composer::get_version().unwrap_or_else(|| "local composer.phar".to_string());
        cliclack::log::success(format!("Composer installed ({version})"))?;
        return Ok(());
    }

    cliclack::log::warning("Composer is not installed")?;

    let action: &str = cliclack::select("What would you like to do?")
        .item(
            "docs",
            format!("Open documentation ({})", composer::DOCS_URL),
            "",
        )
        .item(
            "continue",
            "Continue anyway",
            "the scaffold commands will fail without Composer",
        )
        .interact()?;

    if action == "docs" {
        open::that(composer::DOCS_URL)?;
        cliclack::outro("After installing Composer, run this command again.")?;
        std::process::exit(0);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation_reports_the_required_and_charset_messages() {
        assert_eq!(
            validate_project_name_input(""),
            Err("The project name is required.")
        );
        assert_eq!(
            validate_project_name_input("my app"),
            Err("The name may only contain letters, numbers, dashes, underscores, and periods.")
        );
        assert_eq!(validate_project_name_input("my-app"), Ok(()));
    }

    #[test]
    fn token_validation_requires_a_value() {
        assert_eq!(validate_token_input(""), Err("Token is required."));
        assert_eq!(validate_token_input("ghp_secret"), Ok(()));
    }
}
