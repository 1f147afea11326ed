use autoparts::cli::{Cli, Commands};
use autoparts::core::logging::{init_logging, Verbosity};
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(Verbosity::from_flags(global.quiet, global.verbose));

    match cli.command {
        Commands::Init(args) => autoparts::cli::commands::init::run(args, &global),
        Commands::Tables(args) => autoparts::cli::commands::tables::run(args, &global),
        Commands::Table(cmd) => autoparts::cli::commands::table::run(cmd, &global),
        Commands::Report(cmd) => autoparts::cli::commands::report::run(cmd, &global),
        Commands::Import(args) => autoparts::cli::commands::import::run(args, &global),
        Commands::Status(args) => autoparts::cli::commands::status::run(args, &global),
        Commands::Config(cmd) => autoparts::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => autoparts::cli::commands::completions::run(args),
    }
}
