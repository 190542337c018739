//! Environment capture command.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::debug;

use crate::data::{capture_env, write_yaml_file};

/// Output formats accepted by capture commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML output.
    Yaml,
    /// YAML output (`.yml` spelling).
    Yml,
}

/// Capture-env command options.
#[derive(Parser, Debug)]
pub struct CaptureEnvCommand {
    /// Output file path.
    #[arg(short, long, default_value = "env_config.yaml")]
    pub output: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "yaml", ignore_case = true)]
    pub format: OutputFormat,
}

impl CaptureEnvCommand {
    /// Executes the capture-env command.
    pub fn execute(self) -> Result<()> {
        let count = self.capture()?;
        println!(
            "✓ Captured {} environment variables to {}",
            count,
            self.output.display()
        );
        Ok(())
    }

    /// Writes the environment snapshot to the output file and returns the variable count.
    pub fn capture(&self) -> Result<usize> {
        let snapshot = capture_env();
        debug!(format = ?self.format, output = %self.output.display(), "Writing environment snapshot");
        write_yaml_file(&snapshot, &self.output)?;
        Ok(snapshot.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    fn parse(args: &[&str]) -> CaptureEnvCommand {
        let mut argv = vec!["config-utils", "capture-env"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::CaptureEnv(cmd) => cmd,
            _ => panic!("expected capture-env"),
        }
    }

    #[test]
    fn defaults() {
        let cmd = parse(&[]);
        assert_eq!(cmd.output, PathBuf::from("env_config.yaml"));
        assert_eq!(cmd.format, OutputFormat::Yaml);
    }

    #[test]
    fn format_is_case_insensitive() {
        assert_eq!(parse(&["-f", "YML"]).format, OutputFormat::Yml);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["config-utils", "capture-env", "--format", "json"]).is_err());
    }
}
