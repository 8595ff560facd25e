use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use citesmith_bib::BibliographyParser;
use citesmith_core::config_file::{self, ConfigFile};
use citesmith_format::{CitationFormatter, CitationStyle};
use citesmith_index::{ContentIndex, IndexOptions};
use citesmith_metadata::{MetadataExtractor, TextDocument};
use citesmith_pipeline::{
    ClaimExtractor, HeuristicQuoteExtractor, JsonClaimFile, PipelineEvent, PipelineOptions,
    UnconfiguredExtractor, process_paper_with_progress,
};

mod output;

use output::ColorMode;

/// Citesmith - Cite the claims in a draft paper from a library of sources
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add citations to a draft paper
    Cite {
        /// Path to the draft paper (plain text)
        paper: PathBuf,

        /// Directory of source documents (plain text, pages separated by form feed)
        #[arg(short, long)]
        library: PathBuf,

        /// Plain-text bibliography used to enrich source metadata
        #[arg(short, long)]
        bibliography: Option<PathBuf>,

        /// JSON file listing the claims to cite
        #[arg(short, long)]
        claims: Option<PathBuf>,

        /// Citation style: apa, mla, chicago or ieee
        #[arg(short, long)]
        style: Option<String>,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the full result as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show the metadata extracted from source documents
    Inspect {
        /// Text documents to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Parse a bibliography and list its entries
    Bib {
        /// Plain-text bibliography file
        file: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List the supported citation styles
    Styles,

    /// Show the configuration, or set the default citation style
    Config {
        /// Save this style as the default
        #[arg(long)]
        set_style: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = config_file::load_config();

    match cli.command {
        Command::Cite {
            paper,
            library,
            bibliography,
            claims,
            style,
            output,
            json,
            no_color,
        } => cite(
            &config,
            &paper,
            &library,
            bibliography.as_deref(),
            claims.as_deref(),
            style,
            output,
            json,
            no_color,
        ),
        Command::Inspect { files, no_color } => inspect(&files, no_color),
        Command::Bib { file, no_color } => bib(&file, no_color),
        Command::Styles => styles(&config),
        Command::Config { set_style } => configure(config, set_style),
    }
}

/// Resolve the citation style: CLI flag > CITESMITH_STYLE > config file > APA.
fn resolve_style(flag: Option<String>, config: &ConfigFile) -> anyhow::Result<CitationStyle> {
    let name = flag
        .or_else(|| std::env::var("CITESMITH_STYLE").ok())
        .or_else(|| config.formatting.as_ref().and_then(|f| f.style.clone()));
    match name {
        Some(name) => name
            .parse()
            .with_context(|| format!("invalid citation style '{}'", name)),
        None => Ok(CitationStyle::default()),
    }
}

fn output_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    })
}

/// Load every readable text file in `dir` into a content index.
///
/// Returns the index and the number of files skipped.
fn load_library(dir: &Path, options: IndexOptions) -> anyhow::Result<(ContentIndex, usize)> {
    if !dir.is_dir() {
        anyhow::bail!("library directory not found: {}", dir.display());
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let extractor = MetadataExtractor::new();
    let mut index = ContentIndex::with_options(options);
    let mut skipped = 0;
    for path in &paths {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            skipped += 1;
            continue;
        };
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(filename, error = %e, "skipping unreadable file");
                skipped += 1;
                continue;
            }
        };
        if let Err(e) = index.ingest(filename, &TextDocument::from_text(&text), &extractor) {
            tracing::warn!(filename, error = %e, "skipping document");
            skipped += 1;
        }
    }
    Ok((index, skipped))
}

#[allow(clippy::too_many_arguments)]
fn cite(
    config: &ConfigFile,
    paper: &Path,
    library: &Path,
    bibliography: Option<&Path>,
    claims: Option<&Path>,
    style: Option<String>,
    output: Option<PathBuf>,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let style = resolve_style(style, config)?;
    let color = ColorMode(!no_color && !json && output.is_none());
    let mut writer = output_writer(output.as_deref())?;
    let progress_color = ColorMode(!no_color);

    let paper_text = std::fs::read_to_string(paper)
        .with_context(|| format!("failed to read paper {}", paper.display()))?;

    let (index, skipped) = load_library(library, IndexOptions::from_config(config.index.as_ref()))?;
    if index.is_empty() {
        anyhow::bail!("no readable source documents in {}", library.display());
    }
    output::print_library_summary(&mut std::io::stderr(), &index.statistics(), skipped, progress_color)?;

    let bib = match bibliography {
        Some(path) => {
            let mut parser = BibliographyParser::new();
            let count = parser
                .load_file(path)
                .with_context(|| format!("failed to load bibliography {}", path.display()))?;
            tracing::info!(entries = count, "bibliography loaded");
            Some(parser)
        }
        None => None,
    };

    let claim_file = claims
        .map(|path| {
            JsonClaimFile::from_path(path)
                .with_context(|| format!("failed to load claims {}", path.display()))
        })
        .transpose()?;
    let extractor: &dyn ClaimExtractor = match &claim_file {
        Some(file) => file,
        None => &UnconfiguredExtractor,
    };

    let result = process_paper_with_progress(
        &paper_text,
        &index,
        bib.as_ref(),
        style,
        extractor,
        &HeuristicQuoteExtractor::default(),
        &PipelineOptions::from_config(config),
        |event| {
            report_progress(&mut std::io::stderr(), &event, progress_color);
        },
    );
    eprintln!();

    if json {
        serde_json::to_writer_pretty(&mut writer, &result)?;
        writeln!(writer)?;
    } else {
        output::print_paper_result(&mut writer, &result, color)?;
    }
    Ok(())
}

/// Write a progress line, logging instead of failing when the write fails.
fn report_progress(w: &mut dyn Write, event: &PipelineEvent, color: ColorMode) -> bool {
    match output::print_progress(w, event, color) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to write progress");
            false
        }
    }
}

fn inspect(files: &[PathBuf], no_color: bool) -> anyhow::Result<()> {
    let color = ColorMode(!no_color);
    let extractor = MetadataExtractor::new();
    let mut stdout = std::io::stdout();
    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let metadata = extractor.extract_metadata(&TextDocument::from_text(&text));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        output::print_metadata(&mut stdout, &name, &metadata, color)?;
    }
    Ok(())
}

fn bib(file: &Path, no_color: bool) -> anyhow::Result<()> {
    let mut parser = BibliographyParser::new();
    parser
        .load_file(file)
        .with_context(|| format!("failed to load bibliography {}", file.display()))?;
    output::print_bibliography(&mut std::io::stdout(), &parser, ColorMode(!no_color))?;
    Ok(())
}

fn styles(config: &ConfigFile) -> anyhow::Result<()> {
    let current = resolve_style(None, config).unwrap_or_default();
    for name in CitationFormatter::available_styles() {
        let marker = if name == current.name() { "*" } else { " " };
        println!("{} {}", marker, name);
    }
    Ok(())
}

fn configure(mut config: ConfigFile, set_style: Option<String>) -> anyhow::Result<()> {
    if let Some(name) = set_style {
        let style: CitationStyle = name
            .parse()
            .with_context(|| format!("invalid citation style '{}'", name))?;
        config.formatting.get_or_insert_with(Default::default).style =
            Some(style.name().to_lowercase());
        let path = config_file::save_config(&config)?;
        println!("Saved default style {} to {}", style, path.display());
        return Ok(());
    }

    match config_file::config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no config directory)"),
    }
    let style = resolve_style(None, &config)?;
    let scoring = PipelineOptions::from_config(&config).scoring;
    println!("Style:                {}", style);
    println!("Similarity threshold: {}", scoring.similarity_threshold);
    println!("Max features:         {}", scoring.max_features);
    println!(
        "Ranking weights:      {} similarity / {} authority",
        scoring.similarity_weight, scoring.authority_weight
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use citesmith_core::config_file::FormattingConfig;

    #[test]
    fn test_style_flag_beats_config() {
        let config = ConfigFile {
            formatting: Some(FormattingConfig {
                style: Some("mla".into()),
            }),
            ..Default::default()
        };
        assert_eq!(
            resolve_style(Some("IEEE".into()), &config).unwrap(),
            CitationStyle::Ieee
        );
        assert!(resolve_style(Some("harvard".into()), &config).is_err());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_progress_write_failure_is_reported() {
        let event = PipelineEvent::ClaimsIdentified { count: 2 };
        assert!(!report_progress(&mut ClosedPipe, &event, ColorMode(false)));

        let mut buf = Vec::new();
        assert!(report_progress(&mut buf, &event, ColorMode(false)));
        assert_eq!(String::from_utf8(buf).unwrap(), "Found 2 claims needing citations\n");
    }

    #[test]
    fn test_load_library_skips_blank_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Doe_2019_Oceans.txt"),
            "Ocean Heat\n\nOcean heat content rose sharply.\x0cSecond page text.",
        )
        .unwrap();
        std::fs::write(dir.path().join("empty.txt"), "   ").unwrap();

        let (index, skipped) = load_library(dir.path(), IndexOptions::default()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(index.document("Doe_2019_Oceans.txt").unwrap().pages.len(), 2);
        assert!(load_library(&dir.path().join("missing"), IndexOptions::default()).is_err());
    }
}
