//! Invocation-contract parsing.
//!
//! The build tool invokes this wrapper as its step shell
//! (`make SHELL=tracebuild`): argv[1] is the shell flag the tool passes
//! (usually `-c`) and everything after it is the step's command line. There
//! is deliberately no other CLI surface; help/version flags are disabled so
//! hyphen-led build commands can never be mistaken for options.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tracebuild")]
#[command(about = "Build-step tracer emitting Chrome Trace Event timings", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Shell flag supplied by the build tool (usually "-c"); ignored.
    #[arg(allow_hyphen_values = true)]
    pub shell_flag: String,

    /// The build step's command line: everything after the shell flag.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// The full command line as one string, as handed to `sh -c`.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Whitespace-split tokens fed to the classifier.
    pub fn tokens(&self) -> Vec<String> {
        self.command_line()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}
