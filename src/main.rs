use clap::Parser;
use carebook::cli::commands::{Cli, Commands};
use carebook::cli::handlers;
use carebook::io::config_io::resolve_data_dir;

fn main() {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = carebook::tui::run(&data_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            // Init creates the data dir, so it runs before anything reads it
            if let Err(e) = handlers::cmd_init(args, &data_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli, &data_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
