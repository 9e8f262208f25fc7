use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use keyword_sniffer::{
    reckon, sort_results, AggregateOptions, DiffOptions, Error, FileLookupResults, KeywordLookup,
    LookupConfig, ScoringRegistry, StemmerRegistry, Taxonomy,
};
use log::{error, info};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extract domain keywords from documents using a curated keyword taxonomy.
#[derive(Parser)]
#[command(name = "keyword-sniffer-cli", version, about)]
struct Cli {
    /// Increase logging verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up keywords in a file or a directory tree
    Lookup {
        /// File or directory to look up keywords in
        path: PathBuf,

        #[command(flatten)]
        lookup: LookupArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Print only keyword names, ordered by score
        #[arg(long)]
        summary: bool,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Aggregate several keyword taxonomies into one
    Aggregate {
        /// Taxonomy file to aggregate (JSON or CSV, optionally gzipped)
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Do not compute spelling variants as synonyms
        #[arg(long)]
        no_synonyms: bool,

        /// Drop keywords with an aggregated occurrence count below this
        #[arg(long, default_value_t = AggregateOptions::default().occurrence_count_filter)]
        occurrence_count_filter: usize,

        /// Write the aggregated taxonomy to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare two keyword taxonomies
    Diff {
        file_a: PathBuf,
        file_b: PathBuf,

        /// Compare synonyms only
        #[arg(long)]
        synonyms_only: bool,

        /// Compare keywords only
        #[arg(long)]
        keywords_only: bool,

        /// Compare regular expressions only
        #[arg(long)]
        regexp_only: bool,
    },

    /// Show the normalized keywords and stopwords a lookup would use
    Reckon {
        #[command(flatten)]
        lookup: LookupArgs,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct LookupArgs {
    /// Keyword taxonomy (JSON or CSV, optionally gzipped); bundled one if omitted
    #[arg(long)]
    keywords_file: Option<PathBuf>,

    /// Stopwords file; bundled list if omitted
    #[arg(long)]
    stopwords_file: Option<PathBuf>,

    /// Blacklist file in stopwords format
    #[arg(long)]
    blacklist_file: Option<PathBuf>,

    /// Stemmer to use (e.g. EnglishStemmer, PorterStemmer)
    #[arg(long)]
    stemmer: Option<String>,

    /// Lemmatize tokens and synonyms
    #[arg(long)]
    lemmatize: bool,

    /// N-gram size; computed from the taxonomy if omitted
    #[arg(long)]
    ngram_size: Option<usize>,

    /// Scorer to use (Count, RelativeUsage, TfIdf)
    #[arg(long)]
    scorer: Option<String>,

    /// Skip files which fail instead of aborting
    #[arg(long)]
    ignore_errors: bool,
}

impl LookupArgs {
    fn to_config(&self) -> LookupConfig {
        LookupConfig {
            keywords_file: self.keywords_file.clone(),
            stopwords_file: self.stopwords_file.clone(),
            blacklist_file: self.blacklist_file.clone(),
            stemmer: self.stemmer.clone(),
            lemmatize: self.lemmatize,
            ngram_size: self.ngram_size,
            scorer: self.scorer.clone(),
            ignore_errors: self.ignore_errors,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Text,
}

fn main() {
    let cli = Cli::parse();

    // Initialize the logger; RUST_LOG takes precedence over -v
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli.command) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Lookup {
            path,
            lookup,
            format,
            summary,
            output,
        } => {
            let lookup = KeywordLookup::new(
                &lookup.to_config(),
                &StemmerRegistry::with_defaults(),
                &ScoringRegistry::with_defaults(),
            )?;

            let files = lookup.collect_files(&path)?;
            info!("Looking up keywords in {} files", files.len());

            let progress = ProgressBar::new(files.len() as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("  Lookup [{bar:30}] {pos}/{len} ({eta})")
            {
                progress.set_style(style);
            }

            let results = lookup.lookup_files(&files, |_| progress.inc(1));
            progress.finish_and_clear();

            let mut writer = open_output(output.as_deref())?;
            write_lookup_results(&mut writer, &results?, format, summary)?;
            writer.flush()?;
        }

        Command::Aggregate {
            inputs,
            no_synonyms,
            occurrence_count_filter,
            output,
        } => {
            let taxonomies = inputs
                .iter()
                .map(|input| Taxonomy::from_path(input))
                .collect::<Result<Vec<_>, _>>()?;

            let aggregated = Taxonomy::aggregate(
                &taxonomies,
                &AggregateOptions {
                    compute_synonyms: !no_synonyms,
                    occurrence_count_filter,
                },
            );

            info!("Aggregated {} keywords", aggregated.len());

            let mut writer = open_output(output.as_deref())?;
            writeln!(writer, "{}", aggregated.to_json()?)?;
            writer.flush()?;
        }

        Command::Diff {
            file_a,
            file_b,
            synonyms_only,
            keywords_only,
            regexp_only,
        } => {
            let taxonomy_a = Taxonomy::from_path(&file_a)?;
            let taxonomy_b = Taxonomy::from_path(&file_b)?;

            let changes = taxonomy_a.diff(
                &taxonomy_b,
                &DiffOptions {
                    synonyms_only,
                    keywords_only,
                    regexp_only,
                },
            )?;

            for change in changes {
                println!("{}", change);
            }
        }

        Command::Reckon { lookup, output } => {
            let reckoned = reckon(&lookup.to_config(), &StemmerRegistry::with_defaults())?;

            let mut writer = open_output(output.as_deref())?;
            writeln!(writer, "{}", serde_json::to_string_pretty(&reckoned)?)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, Error> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn write_lookup_results(
    writer: &mut dyn Write,
    results: &FileLookupResults,
    format: OutputFormat,
    summary: bool,
) -> Result<(), Error> {
    match format {
        OutputFormat::Json => {
            let mut document = serde_json::Map::new();

            for (path, scores) in results {
                let sorted = sort_results(scores);

                let value = if summary {
                    serde_json::Value::from(
                        sorted
                            .into_iter()
                            .map(|(keyword, _)| keyword)
                            .collect::<Vec<_>>(),
                    )
                } else {
                    serde_json::Value::Object(
                        sorted
                            .into_iter()
                            .map(|(keyword, score)| (keyword, serde_json::Value::from(score)))
                            .collect(),
                    )
                };

                document.insert(path.clone(), value);
            }

            writeln!(writer, "{}", serde_json::to_string_pretty(&document)?)?;
        }

        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);

            if summary {
                csv_writer.write_record(["path", "keyword"])?;
            } else {
                csv_writer.write_record(["path", "keyword", "score"])?;
            }

            for (path, scores) in results {
                for (keyword, score) in sort_results(scores) {
                    if summary {
                        csv_writer.write_record([path.as_str(), keyword.as_str()])?;
                    } else {
                        csv_writer.write_record([
                            path.as_str(),
                            keyword.as_str(),
                            score.to_string().as_str(),
                        ])?;
                    }
                }
            }

            csv_writer.flush()?;
        }

        OutputFormat::Text => {
            for (path, scores) in results {
                let sorted = sort_results(scores);

                if summary {
                    let keywords: Vec<String> =
                        sorted.into_iter().map(|(keyword, _)| keyword).collect();
                    writeln!(writer, "{}: {}", path, keywords.join(", "))?;
                } else {
                    writeln!(writer, "{}:", path)?;
                    for (keyword, score) in sorted {
                        writeln!(writer, "  {}: {:.2}", keyword, score)?;
                    }
                }
            }
        }
    }

    Ok(())
}
