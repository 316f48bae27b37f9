use crate::config::toml_config::AnalyzerConfig;
use crate::domain::model::{InputSources, RunRequest, ValueSource};
use crate::utils::error::{AnalyzerError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "edhrec-etl")]
#[command(about = "Aggregate card counts across recent EDHREC decklists for a commander")]
pub struct CliConfig {
    #[arg(long, help = "Override commander name")]
    pub commander: Option<String>,

    #[arg(long, default_value = "commander.txt", help = "File holding the commander name")]
    pub commander_file: String,

    #[arg(long, help = "Number of recent decks to use")]
    pub recent: Option<usize>,

    #[arg(long, help = "Minimum deck price")]
    pub min_price: Option<f64>,

    #[arg(long, help = "Maximum deck price")]
    pub max_price: Option<f64>,

    #[arg(short, long, help = "Path to a TOML settings file")]
    pub config: Option<String>,

    #[arg(long, help = "Override the output directory")]
    pub output: Option<String>,

    #[arg(long, help = "Override the cache directory")]
    pub cache_dir: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// True when none of the run parameters were passed on the command line.
    pub fn has_no_run_args(&self) -> bool {
        self.commander.is_none()
            && self.recent.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    pub fn usage_hint() -> &'static str {
        "\n--- Command Line Usage (optional) ---\n\
         edhrec-etl --recent 20 --min-price 200 --max-price 450\n\
         Commander name is always read from commander.txt unless overridden.\n\n\
         No CLI arguments detected, falling back to interactive prompts.\n"
    }

    /// Load the settings file and apply the path overrides from the command line.
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        let mut config = AnalyzerConfig::load(self.config.as_deref())?;
        if let Some(output) = &self.output {
            config.paths.output_path = output.clone();
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.paths.cache_dir = cache_dir.clone();
        }
        Ok(config)
    }

    /// Build the run request, reading the commander file and prompting for anything missing.
    pub fn resolve_request<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(RunRequest, InputSources)> {
        let (commander, commander_source) = match &self.commander {
            Some(name) => (name.trim().to_string(), ValueSource::Cli),
            None => {
                let raw = std::fs::read_to_string(&self.commander_file).map_err(|e| {
                    AnalyzerError::ConfigError {
                        message: format!(
                            "Cannot read commander file '{}': {}",
                            self.commander_file, e
                        ),
                    }
                })?;
                (raw.trim().to_string(), ValueSource::File)
            }
        };

        let (recent, recent_source) = match self.recent {
            Some(v) => (v, ValueSource::Cli),
            None => (
                prompt(input, output, "How many recent decks to use?: ", "recent")?,
                ValueSource::Prompt,
            ),
        };

        let (min_price, min_source) = match self.min_price {
            Some(v) => (v, ValueSource::Cli),
            None => (
                prompt(input, output, "Minimum deck price?: ", "min_price")?,
                ValueSource::Prompt,
            ),
        };

        let (max_price, max_source) = match self.max_price {
            Some(v) => (v, ValueSource::Cli),
            None => (
                prompt(input, output, "Maximum deck price?: ", "max_price")?,
                ValueSource::Prompt,
            ),
        };

        let request = RunRequest::new(commander)
            .with_max_decks(recent)
            .with_price_range(min_price, max_price);
        let sources = InputSources {
            commander: commander_source,
            recent: recent_source,
            min_price: min_source,
            max_price: max_source,
        };

        Ok((request, sources))
    }
}

fn prompt<T, R, W>(input: &mut R, output: &mut W, question: &str, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    R: BufRead,
    W: Write,
{
    output.write_all(question.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    answer
        .parse::<T>()
        .map_err(|_| AnalyzerError::InvalidConfigValueError {
            field: field.to_string(),
            value: answer.to_string(),
            reason: "Not a valid number".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["edhrec-etl"];
        argv.extend_from_slice(args);
        CliConfig::parse_from(argv)
    }

    #[test]
    fn test_all_values_from_cli() {
        let config = parse(&[
            "--commander",
            "Atraxa, Praetors' Voice",
            "--recent",
            "10",
            "--min-price",
            "100",
            "--max-price",
            "450",
        ]);
        assert!(!config.has_no_run_args());

        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let (request, sources) = config.resolve_request(&mut input, &mut output).unwrap();

        assert_eq!(request.commander, "Atraxa, Praetors' Voice");
        assert_eq!(request.max_decks, 10);
        assert_eq!(request.min_price, 100.0);
        assert_eq!(request.max_price, 450.0);
        assert_eq!(sources, InputSources::all(ValueSource::Cli));
        assert!(output.is_empty());
    }

    #[test]
    fn test_commander_file_and_prompts() {
        let mut commander_file = NamedTempFile::new().unwrap();
        commander_file.write_all(b"  Krenko, Mob Boss\n").unwrap();

        let config = parse(&[
            "--commander-file",
            commander_file.path().to_str().unwrap(),
            "--max-price",
            "300",
        ]);

        let mut input = Cursor::new(b"15\n50.5\n".to_vec());
        let mut output = Vec::new();
        let (request, sources) = config.resolve_request(&mut input, &mut output).unwrap();

        assert_eq!(request.commander, "Krenko, Mob Boss");
        assert_eq!(request.max_decks, 15);
        assert_eq!(request.min_price, 50.5);
        assert_eq!(request.max_price, 300.0);
        assert_eq!(sources.commander, ValueSource::File);
        assert_eq!(sources.recent, ValueSource::Prompt);
        assert_eq!(sources.max_price, ValueSource::Cli);

        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.contains("How many recent decks to use?"));
        assert!(prompts.contains("Minimum deck price?"));
        assert!(!prompts.contains("Maximum deck price?"));
    }

    #[test]
    fn test_invalid_prompt_answer() {
        let config = parse(&["--commander", "Krenko", "--min-price", "0", "--max-price", "1"]);
        let mut input = Cursor::new(b"lots\n".to_vec());
        let mut output = Vec::new();

        let err = config.resolve_request(&mut input, &mut output).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::InvalidConfigValueError { ref field, .. } if field == "recent"
        ));
    }

    #[test]
    fn test_missing_commander_file() {
        let config = parse(&["--commander-file", "/nonexistent/commander.txt"]);
        assert!(config.has_no_run_args());

        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = config.resolve_request(&mut input, &mut output).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigError { .. }));
    }

    #[test]
    fn test_path_overrides() {
        let config = parse(&["--output", "/tmp/reports", "--cache-dir", "/tmp/cache"]);
        let settings = config.analyzer_config().unwrap();
        assert_eq!(settings.paths.output_path, "/tmp/reports");
        assert_eq!(settings.paths.cache_dir, "/tmp/cache");
    }
}
