//! `autoparts init` command - Initialize a new store

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::project::{Project, ProjectError};
use crate::core::StoreError;
use crate::store::Store;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Load a small demo data set into the new database
    #[arg(long)]
    pub demo: bool,

    /// Rewrite the config even if .autoparts/ already exists (data is kept)
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let project = match Project::init(&path, args.force) {
        Ok(project) => project,
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Auto-parts store already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("autoparts init --force").yellow()
            );
            return Ok(());
        }
        Err(e) => return Err(miette::miette!("{}", e)),
    };

    let database = global.database.clone().unwrap_or_else(|| project.database_path());
    let store = Store::open(&database)?;

    if !global.quiet {
        println!(
            "{} Initialized auto-parts store at {}",
            style("✓").green(),
            style(project.root().display()).cyan()
        );
        println!(
            "  {} {}",
            style("database:").dim(),
            style(database.display()).dim()
        );
    }

    if args.demo {
        match store.seed_demo() {
            Ok(stats) => {
                if !global.quiet {
                    println!(
                        "{} Loaded demo data: {} records in {} tables",
                        style("✓").green(),
                        style(stats.records).cyan(),
                        stats.tables
                    );
                }
            }
            Err(StoreError::NotEmpty) => {
                eprintln!(
                    "{} Database already holds records; demo data not loaded",
                    style("!").yellow()
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !global.quiet {
        println!();
        println!("Next steps:");
        println!(
            "  {} List the available tables",
            style("autoparts tables").yellow()
        );
        println!(
            "  {} Browse products",
            style("autoparts table list products").yellow()
        );
        println!(
            "  {} See the report catalog",
            style("autoparts report list").yellow()
        );
    }
    Ok(())
}
