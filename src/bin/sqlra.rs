//! sqlra — SQL to relational algebra
//!
//! # Usage
//!
//! ```bash
//! # Translate a query
//! sqlra "SELECT Name FROM EMPLOYEE WHERE Salary > 1000"
//!
//! # Indented tree, or JSON with the extracted clauses
//! sqlra "SELECT * FROM A, B" --pretty
//! sqlra -f query.sql --format json
//!
//! # Show what was extracted
//! sqlra explain "SELECT Department, COUNT(*) FROM EMPLOYEE GROUP BY Department"
//! ```

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlra::config::{Config, OutputFormat, ReplConfig};
use sqlra::glossary::{self, SYMBOLS};
use sqlra::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlra")]
#[command(version)]
#[command(about = "Translate SQL SELECT statements into relational algebra", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlra 'SELECT Name, Salary FROM EMPLOYEE WHERE Salary > 1000'
    sqlra 'SELECT * FROM A JOIN B ON A.id = B.a_id' --pretty
    echo 'SELECT * FROM A, B' | sqlra --format json")]
struct Cli {
    /// The SQL SELECT statement to translate
    query: Option<String>,

    /// Read the statement from a file
    #[arg(short, long, conflicts_with = "query")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Print the algebra as an indented tree
    #[arg(short, long)]
    pretty: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Also write the rendered algebra to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: ./sqlra.toml, then the user config dir)
    #[arg(long, env = "SQLRA_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the extracted clauses and the resulting algebra
    Explain {
        /// The SQL SELECT statement to explain
        query: String,
    },
    /// Interactive REPL mode
    Repl,
    /// Show the symbol reference
    Symbols {
        /// Describe a single symbol, e.g. `⟕`
        glyph: Option<String>,
    },
}

/// Output settings after merging config file and flags.
struct Settings {
    format: OutputFormat,
    pretty: bool,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        let format = match cli.format {
            Some(Format::Text) => OutputFormat::Text,
            Some(Format::Json) => OutputFormat::Json,
            None => config.output.format,
        };
        Self {
            format,
            pretty: cli.pretty || config.output.pretty,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sqlra=debug")
    } else {
        EnvFilter::try_from_env("SQLRA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }
    let settings = Settings::resolve(cli, &config);

    match &cli.command {
        Some(Commands::Explain { query }) => explain_query(query),
        Some(Commands::Repl) => {
            run_repl(&config.repl, settings.pretty);
            Ok(())
        }
        Some(Commands::Symbols { glyph: None }) => {
            show_symbols();
            Ok(())
        }
        Some(Commands::Symbols { glyph: Some(glyph) }) => describe_symbol(glyph),
        None => match read_query(cli)? {
            Some(query) => translate_query(&query, cli, &settings),
            None => {
                println!("{}", "sqlra — SQL to relational algebra".cyan().bold());
                println!();
                println!("Usage: sqlra <QUERY> [OPTIONS]");
                println!();
                println!("Try: sqlra --help");
                Ok(())
            }
        },
    }
}

/// The query from the argument, `--file`, or piped stdin.
fn read_query(cli: &Cli) -> anyhow::Result<Option<String>> {
    if let Some(query) = &cli.query {
        return Ok(Some(query.clone()));
    }
    if let Some(path) = &cli.file {
        let query = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Some(query));
    }
    if std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut query = String::new();
    std::io::stdin().read_to_string(&mut query)?;
    Ok(Some(query))
}

fn render_output(query: &ParsedQuery, pretty: bool) -> String {
    let expr = query.to_expr();
    if pretty {
        sqlra::fmt::pretty(&expr).trim_end().to_string()
    } else {
        expr.to_string()
    }
}

fn translate_query(input: &str, cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    tracing::debug!("Input: {}", input.trim());

    let parsed = sqlra::parse(input)?;
    let algebra = render_output(&parsed, settings.pretty);

    match settings.format {
        OutputFormat::Text => println!("{}", algebra.white().bold()),
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "query": input.trim(),
                "parsed": parsed,
                "algebra": algebra,
            });
            println!("{}", serde_json::to_string_pretty(&doc).map_err(SqlraError::from)?);
        }
    }

    if let Some(path) = &cli.output {
        std::fs::write(path, format!("{algebra}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote algebra to {}", path.display());
        eprintln!("{} Wrote algebra to {}", "✓".green(), path.display().to_string().cyan());
    }

    Ok(())
}

fn explain_query(query: &str) -> anyhow::Result<()> {
    println!("{}", "sqlra Query Explanation".cyan().bold());
    println!();
    println!("{} {}", "Query:".dimmed(), query.trim().yellow());
    println!();

    let parsed = sqlra::parse(query)?;

    println!("{}", "Extracted Clauses:".green().bold());
    println!("  {} {}", "Operation:".dimmed(), parsed.operation.to_string().cyan());
    if parsed.distinct {
        println!(
            "  {} {}",
            "Distinct:".dimmed(),
            "yes (not represented in the algebra)".yellow()
        );
    }
    print_list("Tables:", &parsed.tables);
    print_list("Columns:", &parsed.columns);

    if !parsed.joins.is_empty() {
        println!("  {}", "Joins:".dimmed());
        for join in &parsed.joins {
            println!(
                "    • {} {} {} {}",
                join.kind.to_string().cyan(),
                join.table.white(),
                "ON".dimmed(),
                join.condition.yellow()
            );
        }
    }

    print_list("Where:", &parsed.conditions);
    print_list("Group By:", &parsed.group_by);
    print_list("Having:", &parsed.having);

    if !parsed.order_by.is_empty() {
        println!("  {}", "Order By:".dimmed());
        for item in &parsed.order_by {
            println!("    • {} {}", item.column.white(), item.direction.to_string().cyan());
        }
    }

    let expr = parsed.to_expr();
    let algebra = expr.to_string();

    println!();
    println!("{}", "Relational Algebra:".green().bold());
    println!("  {}", algebra.white().bold());
    println!();
    println!("{} {}", "Operators:".dimmed(), expr.depth().to_string().cyan());
    println!();
    println!("{}", "Tree:".green().bold());
    for line in sqlra::fmt::pretty(&expr).lines() {
        println!("  {line}");
    }

    let used = glossary::used_in(&algebra);
    if !used.is_empty() {
        println!();
        println!("{}", "Legend:".green().bold());
        for symbol in used {
            println!("  {}  {}", symbol.glyph.cyan().bold(), symbol.name.white());
        }
    }

    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {}", label.dimmed());
    for item in items {
        println!("    • {}", item.white());
    }
}

/// Run the interactive REPL mode.
fn run_repl(config: &ReplConfig, mut pretty: bool) {
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    println!("{}", "sqlra REPL — Interactive Mode".cyan().bold());
    println!("{}", "Type SELECT statements to see their algebra. Commands:".dimmed());
    println!("  {}    - Exit the REPL", ".exit".yellow());
    println!("  {}    - Show help", ".help".yellow());
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{} {}", "Failed to initialize REPL:".red(), e);
            return;
        }
    };

    let history_path = config.history_path();
    if let Some(path) = &history_path
        && path.exists()
        && let Err(e) = rl.load_history(path)
    {
        tracing::warn!("Could not load history from {}: {}", path.display(), e);
    }

    loop {
        let prompt = config.prompt.cyan().bold().to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    ".exit" | ".quit" | "exit" | "quit" => {
                        println!("{}", "Goodbye!".green());
                        break;
                    }
                    ".help" | "help" => {
                        show_repl_help();
                        continue;
                    }
                    ".clear" | "clear" => {
                        print!("\x1B[2J\x1B[1;1H");
                        continue;
                    }
                    ".symbols" | "symbols" => {
                        show_symbols();
                        continue;
                    }
                    ".pretty" => {
                        pretty = !pretty;
                        let state = if pretty { "on" } else { "off" };
                        println!("{} {}", "Tree layout:".dimmed(), state.cyan());
                        continue;
                    }
                    _ => {}
                }

                match sqlra::parse(line) {
                    Ok(parsed) => {
                        let algebra = render_output(&parsed, pretty);
                        if pretty {
                            println!("{}", algebra.white().bold());
                        } else {
                            println!("{} {}", "→".green(), algebra.white().bold());
                        }
                        println!();
                    }
                    Err(e) => {
                        eprintln!("{} {}", "✗".red(), e.to_string().red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".red(), err);
                break;
            }
        }
    }

    if let Some(path) = &history_path
        && let Err(e) = rl.save_history(path)
    {
        tracing::warn!("Could not save history to {}: {}", path.display(), e);
    }
}

fn show_repl_help() {
    println!("{}", "sqlra REPL Commands:".cyan().bold());
    println!("  {}     - Exit the REPL", ".exit".yellow());
    println!("  {}     - Show this help", ".help".yellow());
    println!("  {}    - Clear screen", ".clear".yellow());
    println!("  {}  - Show symbol reference", ".symbols".yellow());
    println!("  {}   - Toggle tree layout", ".pretty".yellow());
    println!();
    println!("{}", "Query Examples:".cyan().bold());
    println!("  SELECT * FROM EMPLOYEE");
    println!("  SELECT Name FROM EMPLOYEE WHERE Salary > 1000 ORDER BY Name DESC");
    println!("  SELECT e.Name, d.Name FROM EMPLOYEE e LEFT JOIN DEPARTMENT d ON e.DeptID = d.ID");
    println!("  SELECT Department, COUNT(*) FROM EMPLOYEE GROUP BY Department HAVING COUNT(*) > 3");
    println!();
}

fn describe_symbol(glyph: &str) -> anyhow::Result<()> {
    let symbol = glossary::lookup(glyph.trim())
        .with_context(|| format!("Unknown symbol '{glyph}' (see `sqlra symbols`)"))?;
    println!("{} {}", symbol.glyph.cyan().bold(), symbol.name.yellow().bold());
    println!("  {} {}", "SQL:".dimmed(), symbol.sql.white());
    println!("  {} {}", "Meaning:".dimmed(), symbol.meaning);
    Ok(())
}

fn show_symbols() {
    println!("{}", "sqlra Symbol Reference".cyan().bold());
    println!();

    println!(
        "{:8} {:20} {:22} {}",
        "Symbol".white().bold(),
        "Name".white().bold(),
        "SQL".white().bold(),
        "Meaning".white().bold()
    );
    println!("{}", "─".repeat(90).dimmed());

    for symbol in SYMBOLS {
        println!(
            "{:8} {:20} {:22} {}",
            symbol.glyph.cyan().bold(),
            symbol.name.yellow(),
            symbol.sql.white(),
            symbol.meaning.dimmed()
        );
    }
}
