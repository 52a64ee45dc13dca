use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use sheet_vlookup::execution::{ExecutionEngine, ExecutionOptions, StdErrExecutionObserver};
use sheet_vlookup::export::write_csv_to_path;
use sheet_vlookup::ingestion::{load_table_from_path, LoadOptions, StdErrObserver};
use sheet_vlookup::processing::{lookup_tables, MatchFilterMode};
use sheet_vlookup::samples::{write_sample_files, SampleFormat, SampleOptions};
use sheet_vlookup::settings::{LookupSettings, SettingsStore};
use sheet_vlookup::TableRole;

#[derive(Parser)]
#[command(
    name = "sheet-vlookup",
    version,
    about = "Enrich the rows of a lookup table with columns from a source table (VLOOKUP over whole sheets)."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join a lookup file against a source file.
    Run(RunArgs),
    /// Write the demo source/lookup files.
    Samples(SamplesArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Source (reference) table: .csv, .tsv, .xlsx, ...
    #[arg(long)]
    source: PathBuf,

    /// Lookup table whose rows are enriched.
    #[arg(long)]
    lookup: PathBuf,

    /// Lookup-table column holding the values to look up (letters or 1-based number).
    #[arg(long)]
    lookup_value_column: Option<String>,

    /// Source-table key column.
    #[arg(long)]
    key_column: Option<String>,

    /// Source columns to return, e.g. `B` or `B,D-F`.
    #[arg(long)]
    return_columns: Option<String>,

    /// Trim surrounding whitespace from keys (default).
    #[arg(long, overrides_with = "no_trim")]
    trim: bool,

    /// Compare keys without trimming.
    #[arg(long, overrides_with = "trim")]
    no_trim: bool,

    /// Drop every character that is not an ASCII letter or digit before comparing keys.
    #[arg(long, overrides_with = "no_ignore_special")]
    ignore_special: bool,

    /// Keep punctuation and spaces in keys (default).
    #[arg(long, overrides_with = "ignore_special")]
    no_ignore_special: bool,

    /// Compare keys case-sensitively.
    #[arg(long, overrides_with = "no_case_sensitive")]
    case_sensitive: bool,

    /// Compare keys ignoring case (default).
    #[arg(long, overrides_with = "case_sensitive")]
    no_case_sensitive: bool,

    /// Copy every lookup column into the result, not just the lookup value.
    #[arg(long, overrides_with = "no_include_all_lookup_columns")]
    include_all_lookup_columns: bool,

    /// Copy only the lookup value column (default).
    #[arg(long, overrides_with = "include_all_lookup_columns")]
    no_include_all_lookup_columns: bool,

    /// Which rows to keep.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Write the result table as CSV.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// JSON settings file; its stored settings are the base that flags override.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Store the effective settings back into `--settings`.
    #[arg(long, requires = "settings")]
    save_settings: bool,

    /// Match lookup rows on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Body rows to print after the summary (0 disables the preview).
    #[arg(long, default_value_t = 10)]
    preview: usize,

    /// Log ingestion and execution events to stderr.
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    All,
    Found,
    Notfound,
}

impl From<ModeArg> for MatchFilterMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => MatchFilterMode::All,
            ModeArg::Found => MatchFilterMode::Found,
            ModeArg::Notfound => MatchFilterMode::NotFound,
        }
    }
}

#[derive(Args)]
struct SamplesArgs {
    /// Output directory.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Body rows per table.
    #[arg(long, default_value_t = 20)]
    rows: usize,

    /// RNG seed for reproducible files.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = FormatArg::Xlsx)]
    format: FormatArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Samples(args) => samples(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let store = args.settings.as_deref().map(SettingsStore::new);
    let base = match &store {
        Some(store) => store
            .load()
            .with_context(|| format!("failed to read settings from {}", store.path().display()))?
            .unwrap_or_default(),
        None => LookupSettings::default(),
    };
    let settings = apply_flags(base, &args);

    let mut load = LoadOptions::default();
    if args.verbose {
        load.observer = Some(Arc::new(StdErrObserver));
    }
    let source = load_table_from_path(&args.source, &load.for_role(TableRole::Source))
        .with_context(|| format!("failed to load source table {}", args.source.display()))?;
    let lookup = load_table_from_path(&args.lookup, &load.for_role(TableRole::Lookup))
        .with_context(|| format!("failed to load lookup table {}", args.lookup.display()))?;

    let outcome = if args.parallel {
        let mut engine = ExecutionEngine::new(ExecutionOptions::default())?;
        if args.verbose {
            engine = engine.with_observer(Arc::new(StdErrExecutionObserver));
        }
        engine.lookup_tables(&source, &lookup, &settings)?
    } else {
        lookup_tables(&source, &lookup, &settings)?
    };

    println!("{}", outcome.summary());
    if args.preview > 0 {
        let width = outcome.table.header().len();
        print!("{}", outcome.table.preview(args.preview, width));
    }

    if let Some(path) = &args.output {
        write_csv_to_path(&outcome.table, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("wrote {} rows to {}", outcome.table.row_count(), path.display());
    }

    if args.save_settings {
        if let Some(store) = &store {
            store
                .save(&settings)
                .with_context(|| format!("failed to save settings to {}", store.path().display()))?;
        }
    }
    Ok(())
}

fn apply_flags(mut settings: LookupSettings, args: &RunArgs) -> LookupSettings {
    if let Some(v) = &args.lookup_value_column {
        settings.lookup_value_column = v.clone();
    }
    if let Some(v) = &args.key_column {
        settings.key_column = v.clone();
    }
    if let Some(v) = &args.return_columns {
        settings.return_columns = v.clone();
    }
    // Each flag pair is mutually overriding, so at most one of them is set.
    for (field, on, off) in [
        (&mut settings.trim, args.trim, args.no_trim),
        (&mut settings.ignore_special, args.ignore_special, args.no_ignore_special),
        (&mut settings.case_sensitive, args.case_sensitive, args.no_case_sensitive),
        (
            &mut settings.include_all_lookup_columns,
            args.include_all_lookup_columns,
            args.no_include_all_lookup_columns,
        ),
    ] {
        if on || off {
            *field = on;
        }
    }
    if let Some(mode) = args.mode {
        settings.match_filter_mode = mode.into();
    }
    settings
}

fn samples(args: SamplesArgs) -> Result<()> {
    let format = match args.format {
        FormatArg::Xlsx => SampleFormat::Xlsx,
        FormatArg::Csv => SampleFormat::Csv,
    };
    let opts = SampleOptions {
        row_count: args.rows,
        seed: args.seed,
        ..Default::default()
    };
    let written = write_sample_files(&args.dir, format, &opts)
        .with_context(|| format!("failed to write samples into {}", args.dir.display()))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
