//! Available subcommands.

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the language-server command, installing it if needed
    Resolve {
        /// Print the outcome as a JSON report instead of the bare command
        #[arg(long)]
        json: bool,
    },

    /// Print the command that installs the language server manually
    InstallHint,

    /// Resolve the language server and run it with stdio bridged to this terminal
    Run {
        /// Arguments passed to the server (after `--`)
        #[arg(last = true)]
        args: Vec<String>,
    },
}
