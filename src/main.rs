use clap::Parser;
use miette::Result;
use signup::cli::{Cli, Commands, GlobalOpts};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
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
    init_logging(&global);

    match cli.command {
        Commands::Register(args) => signup::cli::commands::register::run(args, &global),
        Commands::Profile(args) => signup::cli::commands::profile::run(args, &global),
        Commands::Onboard(args) => signup::cli::commands::onboard::run(args, &global),
        Commands::Lookup(cmd) => signup::cli::commands::lookup::run(cmd, &global),
        Commands::Completions(args) => signup::cli::commands::completions::run(args),
    }
}

/// Log to stderr; RUST_LOG wins over the verbosity flag
fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose { "debug" } else { "error" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("signup={}", default_level)))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
