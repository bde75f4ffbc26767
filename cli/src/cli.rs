use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "droptty",
    version = droptty_core::version(),
    about = "droptty - A drop-down terminal overlay summoned by a global hotkey",
)]
pub struct Args {
    /// Specify custom configuration file path
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Specify custom configuration file path"
    )]
    pub config_path: Option<PathBuf>,

    /// Validate configuration and exit without starting
    #[arg(
        long = "dry-run",
        help = "Validate configuration and exit without starting"
    )]
    pub dry_run: bool,

    /// Use default configuration and ignore config files
    #[arg(
        long = "defaults",
        help = "Use default configuration and ignore config files"
    )]
    pub use_defaults: bool,

    /// Write a documented default configuration file and exit
    #[arg(
        long = "write-default-config",
        help = "Write a documented default configuration file and exit"
    )]
    pub write_default_config: bool,

    /// Only log info, warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log everything, including trace output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from(["droptty", "--config", "/tmp/overlay.yaml", "--dry-run", "-v"]);
        assert_eq!(args.config_path, Some(PathBuf::from("/tmp/overlay.yaml")));
        assert!(args.dry_run);
        assert!(args.verbose);
        assert!(!args.use_defaults);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["droptty", "--quiet", "--verbose"]).is_err());
    }
}
