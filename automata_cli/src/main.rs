use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use automata_cli::{
    dataset::{dna_smoke_set, load_sequences, rna_smoke_set},
    report::{format_trace, highlight, MetricsAggregator, Reporter},
    serialize::to_json,
};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use seqautomata::{Automaton, AutomatonKind, ModePreference, PatternSpec};

/// Automata simulator - match patterns and dot-bracket structures against
/// DNA/RNA sequences
#[derive(Parser, Debug)]
#[command(name = "automata-sim")]
#[command(about = "Runs NFA, DFA, EFA or PDA simulations over sequence datasets", long_about = None)]
struct Args {
    /// Pattern to compile
    #[arg(long, default_value = "")]
    pattern: String,

    /// FASTA-like dataset; a built-in smoke set is used without one
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Substitutions allowed per match
    #[arg(long = "k", default_value_t = 0)]
    k: usize,

    /// Print per-position trace events
    #[arg(long)]
    trace: bool,

    /// auto, nfa, dfa, efa or pda
    #[arg(long, default_value = "auto")]
    mode: ModePreference,

    /// Treat the inputs as dot-bracket strings
    #[arg(long)]
    dot_bracket: bool,

    /// Secondary structure to validate each sequence against
    #[arg(long, value_name = "DOT_BRACKET")]
    structure: Option<String>,

    /// Write the built automaton as JSON to PATH, or stdout for `-`
    #[arg(long, value_name = "PATH")]
    dump_automaton: Option<String>,

    /// When to colour the output
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
    color: ColorWhen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    fn enabled(self) -> bool {
        match self {
            ColorWhen::Always => true,
            ColorWhen::Never => false,
            ColorWhen::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

fn dump(automaton: Automaton<'_>, path: &str) -> Result<()> {
    let json = to_json(automaton).context("failed to serialize automaton")?;
    if path == "-" {
        println!("{}", json);
        return Ok(());
    }
    std::fs::write(Path::new(path), json)
        .with_context(|| format!("failed to write automaton dump to {}", path))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let color = args.color.enabled();
    colored::control::set_override(color);

    let mut datasets = match &args.input {
        Some(path) => load_sequences(path)?,
        None => Vec::new(),
    };
    if datasets.is_empty() {
        datasets = if args.dot_bracket { rna_smoke_set() } else { dna_smoke_set() };
    }

    let spec = PatternSpec::new(&args.pattern)
        .datasets(datasets)
        .mismatch_budget(args.k)
        .mode(args.mode)
        .dot_bracket(args.dot_bracket)
        .structure(args.structure.clone())
        .trace(args.trace);
    let kind = spec.kind();

    println!("{}", "\n╔══════════ Automata Simulator ══════════╗".bright_cyan());
    println!("{}{}", "Pattern: ".bold(), spec.pattern);
    println!("{}{} sequence(s)", "Datasets: ".bold(), spec.datasets.len());
    println!("{}{}\n", "Automaton Mode: ".bold(), kind.to_string().bright_magenta());

    let runner = spec
        .build()
        .with_context(|| format!("failed to build {} for pattern {:?}", kind, spec.pattern))?;
    if let Some(path) = &args.dump_automaton {
        dump(runner.automaton(), path)?;
    }

    let mut reporter = Reporter::default();
    let mut metrics = MetricsAggregator::default();
    for (index, sequence) in spec.datasets.iter().enumerate() {
        let label = format!("Sequence #{}", index + 1);
        println!("{} (len={})", label.bright_yellow(), sequence.len());

        let result = runner.run(sequence);
        metrics.record(&result);
        if spec.trace {
            print!("{}", format_trace(&result));
        }
        if result.matches.is_empty() {
            println!("{}", "  No matches found.".red());
        } else {
            let intervals: Vec<String> =
                result.matches.iter().map(|(start, end)| format!("[{},{})", start, end)).collect();
            println!("{}{}", "  Matches: ".green(), intervals.join(" "));
            println!("  {}", highlight(sequence, &result.matches, color));
        }
        if kind == AutomatonKind::Pda {
            println!(
                "  States visited: {} | Max stack depth: {}\n",
                result.states_visited, result.max_stack_depth
            );
        } else {
            println!("  States visited: {}\n", result.states_visited);
        }
        reporter.add(sequence, &result);
    }

    let summary = reporter.summary(&metrics);
    if metrics.all_accepted() {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
    log::info!("processed {} sequences with the {}", reporter.reports().len(), kind);
    Ok(())
}
