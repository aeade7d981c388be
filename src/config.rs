use clap::Parser;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const USER_AGENT_NAME: &str = concat!("gh-user-search/", env!("CARGO_PKG_VERSION"));

/// Search GitHub users and browse their repositories.
///
/// Without QUERY an interactive prompt is started: type a username fragment
/// and press Enter to search, `:help` lists the other commands.
#[derive(Parser, Debug)]
#[command(name = "gh-user-search", version, about, long_about = None)]
pub struct Args {
    /// Run a single search for QUERY, print the results and exit
    pub query: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Show every user's repositories in single-search mode
    #[arg(short, long, requires = "query")]
    pub expand: bool,

    /// Print repository URLs instead of terminal hyperlinks
    #[arg(long)]
    pub no_hyperlinks: bool,
}
