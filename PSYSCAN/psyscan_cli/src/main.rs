use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use psyscan_discourse::{
    AnalysisConfig, AnalysisJob, BatchAnalyzer, ConsoleCommand, ConsoleCommandReceiver,
    DiscourseAnalysis, DiscourseAnalyzer, DiscourseTelemetry, Document, Language,
    LinguisticResources, NarrativeComposer, NarrativeReading, PsiMethod,
};
use serde::Serialize;
use shared_event_bus::FileEventPublisher;
use shared_logging::LogLevel;
use tokio::{runtime::Runtime, sync::mpsc::unbounded_channel};

#[derive(Parser, Debug)]
#[command(name = "psyscan", version, about = "Discourse seismograph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyzes one speech.
    Analyze {
        /// Text file, or `-` for stdin.
        #[arg(long, default_value = "-")]
        input: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Analyzes several speeches concurrently, one JSON line each.
    Batch {
        /// Text files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Reads JSON-lines commands from stdin until `quit`.
    Serve {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// TOML analysis config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Declared language (`fr`, `en`, ...).
    #[arg(long)]
    language: Option<String>,
    /// Sentences per block.
    #[arg(long)]
    block_size: Option<usize>,
    /// Psi definition (`composite_resistance` or `max_share_fraction`).
    #[arg(long)]
    psi: Option<PsiMethod>,
    /// JSON-lines log file.
    #[arg(long)]
    log_path: Option<PathBuf>,
    /// Minimum log level.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// JSON-lines event file.
    #[arg(long)]
    event_log: Option<PathBuf>,
    /// Adds the narrative reading to the output.
    #[arg(long)]
    narrative: bool,
    /// Pretty-prints JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a DiscourseAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    narrative: Option<NarrativeReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

struct Session {
    config: AnalysisConfig,
    resources: LinguisticResources,
    telemetry: Option<DiscourseTelemetry>,
    narrative: bool,
    pretty: bool,
}

impl Session {
    fn new(common: &CommonArgs) -> Result<Self> {
        let config = resolve_config(common)?;
        let telemetry = build_telemetry(common)?;
        Ok(Self {
            resources: LinguisticResources::builtin(&config.extra_stopwords),
            config,
            telemetry,
            narrative: common.narrative,
            pretty: common.pretty,
        })
    }

    fn analyzer(&self, config: AnalysisConfig) -> Result<DiscourseAnalyzer> {
        let analyzer = DiscourseAnalyzer::new(config, self.resources.clone())?;
        Ok(match &self.telemetry {
            Some(tel) => analyzer.with_telemetry(tel.clone()),
            None => analyzer,
        })
    }

    fn emit(
        &self,
        correlation_id: Option<&str>,
        result: Result<&DiscourseAnalysis, &str>,
    ) -> Result<()> {
        let report = match result {
            Ok(analysis) => Report {
                correlation_id,
                analysis: Some(analysis),
                narrative: self
                    .narrative
                    .then(|| NarrativeComposer::new(self.telemetry.clone()).compose(analysis)),
                error: None,
            },
            Err(error) => Report {
                correlation_id,
                analysis: None,
                narrative: None,
                error: Some(error),
            },
        };
        let line = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{line}");
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { input, common } => handle_analyze(&input, &common),
        Commands::Batch { files, common } => handle_batch(files, &common),
        Commands::Serve { common } => handle_serve(&common),
    }
}

fn handle_analyze(input: &str, common: &CommonArgs) -> Result<()> {
    let session = Session::new(common)?;
    let text = read_input(input)?;
    let analyzer = session.analyzer(session.config.clone())?;
    let analysis = analyzer.analyze(&Document::new(text, session.config.language.clone()))?;
    session.emit(None, Ok(&analysis))
}

fn handle_batch(files: Vec<PathBuf>, common: &CommonArgs) -> Result<()> {
    let session = Session::new(common)?;
    let jobs = files
        .iter()
        .map(|path| {
            Ok(AnalysisJob {
                document: Document::new(read_file(path)?, session.config.language.clone()),
                correlation_id: path.display().to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let analyzer = Arc::new(session.analyzer(session.config.clone())?);
    let batch = BatchAnalyzer::new(analyzer, session.telemetry.clone());
    let runtime = Runtime::new()?;
    let outcomes = runtime.block_on(async {
        let outcomes = batch.process_batch(jobs).await;
        if let Some(tel) = &session.telemetry {
            tel.flush().await;
        }
        outcomes
    })?;
    for outcome in &outcomes {
        session.emit(
            Some(&outcome.correlation_id),
            outcome.result.as_ref().map_err(String::as_str),
        )?;
    }
    Ok(())
}

fn handle_serve(common: &CommonArgs) -> Result<()> {
    let session = Arc::new(Session::new(common)?);
    let runtime = Runtime::new()?;
    runtime.block_on(async {
        let (tx, mut rx) = unbounded_channel();
        let receiver = ConsoleCommandReceiver::new(tx, session.telemetry.clone());
        let reader = tokio::spawn(async move { receiver.run().await });
        while let Some(command) = rx.recv().await {
            let ConsoleCommand::Analyze {
                text,
                language,
                block_size,
                correlation_id,
            } = command
            else {
                continue;
            };
            let mut config = session.config.clone();
            if let Some(language) = language.as_deref() {
                config.language = Language::parse(language);
            }
            if let Some(block_size) = block_size {
                config.block_size = block_size;
            }
            let worker = Arc::clone(&session);
            let result = tokio::task::spawn_blocking(move || {
                let document = Document::new(text, config.language.clone());
                worker
                    .analyzer(config)
                    .and_then(|analyzer| Ok(analyzer.analyze(&document)?))
            })
            .await?;
            match &result {
                Ok(analysis) => session.emit(correlation_id.as_deref(), Ok(analysis))?,
                Err(err) => {
                    let message = format!("{err:#}");
                    session.emit(correlation_id.as_deref(), Err(message.as_str()))?;
                }
            }
        }
        reader.await??;
        if let Some(tel) = &session.telemetry {
            tel.flush().await;
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn resolve_config(common: &CommonArgs) -> Result<AnalysisConfig> {
    let mut config = match &common.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(language) = &common.language {
        config.language = Language::parse(language);
    }
    if let Some(block_size) = common.block_size {
        config.block_size = block_size;
    }
    if let Some(psi) = common.psi {
        config.psi_method = psi;
    }
    config.validate()?;
    Ok(config)
}

fn build_telemetry(common: &CommonArgs) -> Result<Option<DiscourseTelemetry>> {
    if common.log_path.is_none() && common.event_log.is_none() {
        return Ok(None);
    }
    let level = LogLevel::parse(&common.log_level)
        .ok_or_else(|| anyhow!("unknown log level `{}`", common.log_level))?;
    let mut builder = DiscourseTelemetry::builder("psyscan").min_level(level);
    if let Some(path) = &common.log_path {
        builder = builder.log_path(path);
    }
    if let Some(path) = &common.event_log {
        let publisher = FileEventPublisher::new(path)
            .with_context(|| format!("opening event log {}", path.display()))?;
        builder = builder.event_publisher(Arc::new(publisher));
    }
    Ok(Some(builder.build()?))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading speech from stdin")?;
        Ok(text)
    } else {
        read_file(Path::new(input))
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading speech {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn common(args: &[&str]) -> CommonArgs {
        let mut argv = vec!["psyscan", "serve"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Serve { common } => common,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("psyscan.toml");
        fs::write(&path, "block_size = 4\nlanguage = \"fr\"\n").unwrap();
        let args = common(&[
            "--config",
            path.to_str().unwrap(),
            "--language",
            "English",
            "--psi",
            "max_share_fraction",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.block_size, 4);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.psi_method, PsiMethod::MaxShareFraction);
    }

    #[test]
    fn zero_block_size_and_blank_language_are_rejected() {
        assert!(resolve_config(&common(&["--block-size", "0"])).is_err());
        assert!(resolve_config(&common(&["--language", ""])).is_err());
    }

    #[test]
    fn telemetry_is_optional() {
        assert!(build_telemetry(&common(&[])).unwrap().is_none());
        let dir = tempdir().unwrap();
        let log = dir.path().join("psyscan.log");
        let args = common(&["--log-path", log.to_str().unwrap(), "--log-level", "warn"]);
        assert!(build_telemetry(&args).unwrap().is_some());
        assert!(build_telemetry(&common(&["--log-path", "x.log", "--log-level", "loud"])).is_err());
    }
}
