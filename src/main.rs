use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use posseq::report::{INPUT_PROMPT, SaveOutcome, run_find, searching, tag_table, write_stats};
use posseq::session::{Controls, parse_line};
use posseq::{Action, Corpus, CorpusFormat, Outcome, Query, Session};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "posseq")]
#[command(about = "Find word sequences in a tagged corpus that match a POS tag sequence")]
struct Cli {
    /// Tagged corpus file (.conllu, word/TAG text, optionally .gz)
    #[arg(long, short, global = true, env = "POSSEQ_CORPUS")]
    corpus: Option<PathBuf>,

    /// Corpus name used in summaries (defaults to the file stem)
    #[arg(long, global = true, env = "POSSEQ_CORPUS_NAME")]
    name: Option<String>,

    /// Corpus format: conllu or tagged (guessed from the extension otherwise)
    #[arg(long, global = true)]
    format: Option<CorpusFormat>,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the phrases matching a tag sequence
    Find {
        /// Two or more POS tags, e.g. ADJ NOUN NOUN
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
        /// Also save the matches to this file (.txt is added if missing)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print at most this many phrases
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search interactively (the default)
    Interactive,
    /// Print the tag table
    Tags,
    /// Print token and tag counts for the corpus
    Stats,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(format!("posseq={level}").parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Tags => {
            print!("{}", tag_table());
        }
        Commands::Stats => {
            let corpus = load_corpus(&cli.corpus, cli.format, cli.name.as_deref())?;
            write_stats(&mut std::io::stdout().lock(), &corpus)?;
        }
        Commands::Find {
            tags,
            output,
            limit,
        } => {
            let corpus = load_corpus(&cli.corpus, cli.format, cli.name.as_deref())?;
            let stdout = std::io::stdout();
            let saved = run_find(
                &mut stdout.lock(),
                &corpus,
                &tags.join(" "),
                output.as_deref(),
                limit,
            )?;
            if let SaveOutcome::Saved(path) = saved {
                eprintln!("File saved: {}", path.display());
            }
        }
        Commands::Interactive => {
            let corpus = load_corpus(&cli.corpus, cli.format, cli.name.as_deref())?;
            interactive(&corpus)?;
        }
    }

    Ok(())
}

fn load_corpus(
    path: &Option<PathBuf>,
    format: Option<CorpusFormat>,
    name: Option<&str>,
) -> anyhow::Result<Corpus> {
    let path = path
        .as_ref()
        .ok_or_else(|| anyhow!("No corpus given: pass --corpus or set POSSEQ_CORPUS"))?;
    let corpus = Corpus::from_file(path, format)
        .with_context(|| format!("Loading corpus {}", path.display()))?;
    Ok(match name {
        Some(name) => corpus.with_name(name),
        None => corpus,
    })
}

fn interactive(corpus: &Corpus) -> anyhow::Result<()> {
    let mut session = Session::new(corpus);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}", INPUT_PROMPT);
    println!("Commands: :add TAG, :find, :reset, :save [FILE], :tags, :quit");

    loop {
        print!("{} > ", controls_label(session.controls()));
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let actions = match parse_line(&line?) {
            Ok(actions) => actions,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        for action in actions {
            if action == Action::Find && session.controls().find {
                if let Ok(query) = Query::parse(session.input()) {
                    println!("{}", searching(&query));
                }
            }
            match session.dispatch(action) {
                Outcome::Input { error, .. } => {
                    if let Some(e) = error {
                        println!("{}", e);
                    }
                }
                Outcome::Results { summary, .. } => {
                    println!("{}", summary);
                    if let Some((_, matches)) = session.results() {
                        for line in matches.lines() {
                            println!("{}", line);
                        }
                    }
                }
                Outcome::Cleared => println!("{}", INPUT_PROMPT),
                Outcome::Saved(path) => println!("File saved: {}", path.display()),
                Outcome::SaveFailed(message) => println!("{}", message),
                Outcome::Tags(table) => print!("{}", table),
                Outcome::Ignored => {}
                Outcome::Exit => return Ok(()),
            }
        }
    }
    Ok(())
}

/// `[find reset -]`: enabled controls by name, disabled ones as `-`
fn controls_label(controls: Controls) -> String {
    let show = |enabled: bool, name: &'static str| if enabled { name } else { "-" };
    format!(
        "[{} {} {}]",
        show(controls.find, "find"),
        show(controls.reset, "reset"),
        show(controls.save, "save")
    )
}
