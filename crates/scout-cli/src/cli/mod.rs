use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{AuthCommands, Commands};

/// Top-level CLI parser for the `scout` binary.
#[derive(Debug, Parser)]
#[command(name = "scout", version, about = "Scout - company research saved to Google Drive")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (no spinners, errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the sign-in URL instead of opening a browser
    #[arg(long, global = true)]
    pub no_browser: bool,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            no_browser: self.no_browser,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{AuthCommands, Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn research_takes_company_and_global_flags() {
        let cli = Cli::try_parse_from([
            "scout",
            "--format",
            "raw",
            "research",
            "Acme Corp",
            "--no-browser",
            "--folder",
            "Leads",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.no_browser);
        let Commands::Research(args) = cli.command else {
            panic!("expected research command");
        };
        assert_eq!(args.company, "Acme Corp");
        assert_eq!(args.folder.as_deref(), Some("Leads"));
    }

    #[test]
    fn extract_requires_at_least_one_url() {
        assert!(Cli::try_parse_from(["scout", "extract"]).is_err());

        let cli = Cli::try_parse_from(["scout", "extract", "https://a", "https://b", "--max-chars", "500"])
            .expect("cli should parse");
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract command");
        };
        assert_eq!(args.urls, vec!["https://a", "https://b"]);
        assert_eq!(args.max_chars, Some(500));
    }

    #[test]
    fn auth_subcommands_parse() {
        let cli = Cli::try_parse_from(["scout", "auth", "url", "--quiet"]).expect("cli should parse");
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Auth { action: AuthCommands::Url }));

        let cli = Cli::try_parse_from(["scout", "-v", "auth", "login"]).expect("cli should parse");
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Auth { action: AuthCommands::Login }));
    }

    #[test]
    fn output_format_defaults_to_json_and_rejects_unknown() {
        let cli = Cli::try_parse_from(["scout", "profile", "Acme"]).expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(Cli::try_parse_from(["scout", "--format", "table", "profile", "Acme"]).is_err());
    }
}
