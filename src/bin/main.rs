use clap::{Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use lexicon_core::core::date::to_ordinal;
use lexicon_core::{Lexicon, LexiconConfig, LexiconError, Segmenter};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexicon", version, about = "Compile verb, actor and agent dictionaries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile the dictionaries named in a configuration file
    Compile {
        #[arg(short, long)]
        config: PathBuf,
        /// Write a binary snapshot of the compiled dictionaries
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print a compiled snapshot as JSON
    Dump {
        #[arg(short, long)]
        snapshot: PathBuf,
        #[arg(value_enum, default_value_t = Section::Verbs)]
        section: Section,
    },
    /// Split a story into sentences, one per line
    Segment {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// The file already holds one sentence per line
        #[arg(long)]
        parsed: bool,
        file: PathBuf,
    },
    /// Convert YYYYMMDD or YYMMDD dates to ordinal days
    Ordinal {
        #[arg(required = true)]
        dates: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Section {
    Verbs,
    Actors,
    Agents,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, LexiconError> {
    match command {
        Command::Compile { config, out } => {
            let config = LexiconConfig::from_file(&config)?;
            let lexicon = Lexicon::compile(&config)?;
            print_summary(&lexicon);
            if let Some(out) = out {
                lexicon.save(&out)?;
                println!("Snapshot written to '{}'", out.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Dump { snapshot, section } => {
            let lexicon = Lexicon::load(&snapshot)?;
            let value = match section {
                Section::Verbs => json!({
                    "forms": lexicon.verbs.forms.entries(),
                    "patterns": lexicon.verbs.patterns.entries(),
                    "synsets": lexicon.verbs.synsets.entries(),
                }),
                Section::Actors => json!({
                    "phrases": lexicon.actors.phrases.entries(),
                    "codes": lexicon.actors.codes,
                }),
                Section::Agents => json!({
                    "phrases": lexicon.agents.phrases.entries(),
                }),
            };
            let text = serde_json::to_string_pretty(&value).map_err(std::io::Error::from)?;
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Segment { config, parsed, file } => {
            let (segmenter, parsed_input) = match config {
                Some(path) => {
                    let config = LexiconConfig::from_file(&path)?;
                    (config.segmenter, config.parsed_input)
                }
                None => (Segmenter::default(), false),
            };
            let text = fs::read_to_string(&file)?;
            for sentence in segmenter.split_input(&text, parsed || parsed_input) {
                println!("{}", sentence.trim());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Ordinal { dates } => {
            let mut code = ExitCode::SUCCESS;
            for date in &dates {
                match to_ordinal(date) {
                    Ok(ordinal) => println!("{date}\t{ordinal}"),
                    Err(err) => {
                        eprintln!("{} {err}", "error:".red().bold());
                        code = ExitCode::FAILURE;
                    }
                }
            }
            Ok(code)
        }
    }
}

fn print_summary(lexicon: &Lexicon) {
    println!("{}", "Compiled lexicon".bold());
    println!(
        "  verbs   {} forms, {} patterns, {} synsets",
        lexicon.verbs.forms.len(),
        lexicon.verbs.patterns.len(),
        lexicon.verbs.synset_names().count()
    );
    println!(
        "  actors  {} phrases in {} clusters",
        lexicon.actors.phrases.len(),
        lexicon.actors.cluster_count()
    );
    println!("  agents  {} phrases", lexicon.agents.phrases.len());

    if lexicon.diagnostics.is_empty() {
        println!("{}", "No lines skipped.".green());
        return;
    }
    println!("{}", format!("{} lines skipped:", lexicon.diagnostics.len()).yellow());
    for diagnostic in &lexicon.diagnostics {
        println!("  {diagnostic}");
    }
}
