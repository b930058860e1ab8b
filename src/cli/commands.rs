use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "carebook", about = concat!("carebook v", env!("CARGO_PKG_VERSION"), " - medications, activities and caregivers"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: $CAREBOOK_DIR or ./carebook)
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory with a default carebook.toml
    Init(InitArgs),
    /// List records in a collection
    List(ListArgs),
    /// Show one record by id
    Show(ShowArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing carebook.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// medications, activities, templates or users
    pub collection: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Record id (e.g. MED-1)
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_command_launches_tui() {
        let cli = Cli::try_parse_from(["carebook"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["carebook", "list", "users", "--json", "-C", "/tmp/cb"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir.as_deref(), Some("/tmp/cb"));
        match cli.command {
            Some(Commands::List(args)) => assert_eq!(args.collection, "users"),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn init_force() {
        let cli = Cli::try_parse_from(["carebook", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init(InitArgs { force: true }))));
    }

    #[test]
    fn show_requires_id() {
        assert!(Cli::try_parse_from(["carebook", "show"]).is_err());
    }
}
