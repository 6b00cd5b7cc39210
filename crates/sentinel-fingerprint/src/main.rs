//! CLI entry point for the sentinel-fingerprint processor.
//!
//! Designed to sit in a shell pipeline: reads NDJSON events from stdin,
//! writes the fingerprinted events to stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::{fmt, EnvFilter};

use sentinel_core::FingerprintConfig;
use sentinel_fingerprint::stream::process_stream;
use sentinel_fingerprint::Fingerprint;

#[derive(Parser)]
#[command(name = "sentinel-fingerprint")]
#[command(about = "Content fingerprinting for Sentinel event streams")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file prefix (default: sentinel).
    #[arg(short, long, default_value = "sentinel", global = true)]
    config: String,

    /// Hash function override (md5, sha1, sha256, sha3_512, ...).
    #[arg(long, global = true)]
    hash: Option<String>,

    /// Output encoding override: hex, base32, base64.
    #[arg(long, global = true)]
    encoding: Option<String>,

    /// Field to include, in order. Repeat to add more; replaces configured fields.
    #[arg(long = "field", global = true)]
    fields: Vec<String>,

    /// Target field override.
    #[arg(long, global = true)]
    target: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Fingerprint NDJSON events from stdin (the default).
    Run {
        /// Log and drop lines that are not valid events instead of failing.
        #[arg(long)]
        skip_invalid: bool,
    },
    /// Print the resolved processor configuration.
    Describe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let mut processor = Fingerprint::new(&config)?;

    match cli.command.unwrap_or(Command::Run { skip_invalid: false }) {
        Command::Run { skip_invalid } => {
            let stdin = BufReader::new(tokio::io::stdin());
            let stdout = tokio::io::stdout();
            process_stream(&mut processor, stdin, stdout, skip_invalid).await?;
        }
        Command::Describe => {
            println!("{processor}");
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<FingerprintConfig> {
    let config = FingerprintConfig::load(&cli.config)?;
    Ok(cli.apply_overrides(config))
}

impl Cli {
    /// Options given on the command line win over the loaded config.
    fn apply_overrides(&self, mut config: FingerprintConfig) -> FingerprintConfig {
        if let Some(hash) = &self.hash {
            config.hash = hash.clone();
        }
        if let Some(encoding) = &self.encoding {
            config.encoding = encoding.clone();
        }
        if !self.fields.is_empty() {
            config.fields = self.fields.clone();
        }
        if let Some(target) = &self.target {
            config.target = target.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> FingerprintConfig {
        FingerprintConfig {
            hash: "sha1".to_string(),
            encoding: "base64".to_string(),
            fields: vec!["message".to_string(), "beat.host".to_string()],
            target: "event.hash".to_string(),
        }
    }

    #[test]
    fn no_flags_keep_loaded_config() {
        let cli = Cli::try_parse_from(["sentinel-fingerprint"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "sentinel");
        assert_eq!(cli.apply_overrides(loaded()), loaded());
    }

    #[test]
    fn flags_replace_loaded_values() {
        let cli = Cli::try_parse_from([
            "sentinel-fingerprint",
            "--hash",
            "MD5",
            "--encoding",
            "hex",
            "--field",
            "@timestamp",
            "--field",
            "message",
            "--target",
            "fp",
        ])
        .unwrap();

        let config = cli.apply_overrides(loaded());
        assert_eq!(config.hash, "MD5");
        assert_eq!(config.encoding, "hex");
        assert_eq!(config.fields, vec!["@timestamp", "message"]);
        assert_eq!(config.target, "fp");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sentinel-fingerprint",
            "run",
            "--skip-invalid",
            "--field",
            "a",
            "--config",
            "pipeline",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Command::Run { skip_invalid: true })));
        assert_eq!(cli.config, "pipeline");

        let config = cli.apply_overrides(loaded());
        assert_eq!(config.fields, vec!["a"]);
        assert_eq!(config.hash, "sha1");
        assert_eq!(config.target, "event.hash");
    }

    #[test]
    fn describe_subcommand_parses() {
        let cli = Cli::try_parse_from(["sentinel-fingerprint", "describe", "--hash", "sha512"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Describe)));
        assert_eq!(cli.apply_overrides(loaded()).hash, "sha512");
    }
}
