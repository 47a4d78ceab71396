use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in, research a company, extract its articles and save to Drive.
    Research(ResearchArgs),
    /// Research a company without signing in or saving anything.
    Profile(ProfileArgs),
    /// Extract readable Markdown from article URLs.
    Extract(ExtractArgs),
    /// Google sign-in.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ResearchArgs {
    /// Company name.
    pub company: String,

    /// Drive folder to save under (overrides `drive.root_folder_name`).
    #[arg(long)]
    pub folder: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ProfileArgs {
    /// Company name.
    pub company: String,
}

#[derive(Clone, Debug, Args)]
pub struct ExtractArgs {
    /// Article URLs, processed in order.
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Cap each article body at this many characters (0 = unlimited).
    #[arg(long)]
    pub max_chars: Option<usize>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Print a fresh authorization URL without waiting for the redirect.
    Url,
    /// Sign in through the browser and show who is signed in.
    Login,
}
