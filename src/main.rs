use clap::{Parser, Subcommand};
use colored::*;
use openeo_processes::{
    call, get_process, process_ids, value_from_json, Config, OutputFormat, Value, CONFIG_FILE,
    DEFAULT_CONFIG,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value as Json;
use std::fs;
use toon_format::encode_default;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "openeo-proc")]
#[command(version = "0.1")]
#[command(about = "openEO processes over scalars, dense, labelled and lazy arrays", long_about = None)]
struct Cli {
    /// Log every dispatch decision (overrides the configured level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start REPL (default)
    Repl {
        /// Output format: 'display', 'json' or 'toon'
        #[arg(long)]
        format: Option<String>,
    },
    /// List all registered processes
    List,
    /// Show the parameters and supported data of a process
    Describe {
        /// Process id, e.g. 'sum'
        id: String,
    },
    /// Run a single process
    Run {
        /// Process id, e.g. 'sum'
        id: String,
        /// Positional arguments as a JSON array
        #[arg(long, default_value = "[]")]
        args: String,
        /// Named arguments as a JSON object
        #[arg(long, default_value = "{}")]
        kwargs: String,
        /// Output format: 'display', 'json' or 'toon'
        #[arg(long)]
        format: Option<String>,
    },
    /// Write a default configuration file
    Init,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config, cli.verbose)?;

    match cli.command {
        Some(Commands::List) => handle_list(),
        Some(Commands::Describe { id }) => handle_describe(&id)?,
        Some(Commands::Run {
            id,
            args,
            kwargs,
            format,
        }) => {
            let format = output_format(&config, format.as_deref())?;
            let positional = parse_positional(&args)?;
            let named = parse_named(&kwargs)?;
            match call(&id, positional, named) {
                Ok(value) => println!("{}", render(&value, format, config.output.precision)),
                Err(e) => {
                    eprintln!("{}: {}", "Error".red(), e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Init) => handle_init()?,
        Some(Commands::Repl { format }) => {
            let format = output_format(&config, format.as_deref())?;
            run_repl(&config, format)?;
        }
        None => run_repl(&config, config.output.format)?,
    }

    Ok(())
}

fn init_logging(config: &Config, verbose: bool) -> CliResult<()> {
    let level = if verbose { Level::DEBUG } else { config.log_level()? };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn output_format(config: &Config, flag: Option<&str>) -> CliResult<OutputFormat> {
    match flag {
        Some(name) => Ok(name.parse::<OutputFormat>()?),
        None => Ok(config.output.format),
    }
}

fn render(value: &Value, format: OutputFormat, precision: Option<usize>) -> String {
    match format {
        OutputFormat::Display => match precision {
            Some(p) => format!("{:.*}", p, value),
            None => format!("{}", value),
        },
        OutputFormat::Json => serde_json::to_string(value)
            .unwrap_or_else(|e| format!("Error encoding JSON: {}", e)),
        OutputFormat::Toon => {
            encode_default(value).unwrap_or_else(|e| format!("Error encoding TOON: {}", e))
        }
    }
}

fn parse_positional(text: &str) -> CliResult<Vec<Value>> {
    match serde_json::from_str::<Json>(text)? {
        Json::Array(items) => Ok(items
            .iter()
            .map(value_from_json)
            .collect::<Result<Vec<_>, _>>()?),
        other => Err(format!("positional arguments must be a JSON array, got {}", other).into()),
    }
}

fn parse_named(text: &str) -> CliResult<Vec<(String, Value)>> {
    match serde_json::from_str::<Json>(text)? {
        Json::Object(entries) => {
            let mut named = Vec::with_capacity(entries.len());
            for (name, json) in &entries {
                named.push((name.clone(), value_from_json(json)?));
            }
            Ok(named)
        }
        other => Err(format!("named arguments must be a JSON object, got {}", other).into()),
    }
}

fn handle_list() {
    for id in process_ids() {
        let summary = get_process(id).map(|p| p.summary).unwrap_or_default();
        println!("{:<24} {}", id.green(), summary);
    }
}

fn handle_describe(id: &str) -> CliResult<()> {
    let Some(def) = get_process(id) else {
        return Err(format!("Process '{}' does not exist.", id).into());
    };
    println!("{} {}", def.id.bold().blue(), def.summary);
    println!("  parameters: {}", def.params.join(", "));
    println!("  kind:       {:?}", def.kind);
    let categories: Vec<String> = def.categories().iter().map(|c| c.to_string()).collect();
    println!("  data:       {}", categories.join(", ").yellow());
    Ok(())
}

fn handle_init() -> CliResult<()> {
    if !std::path::Path::new(CONFIG_FILE).exists() {
        fs::write(CONFIG_FILE, DEFAULT_CONFIG)?;
        println!("Created default configuration: {}", CONFIG_FILE.green());
    } else {
        println!("Configuration file already exists: {}", CONFIG_FILE.yellow());
    }

    println!("{}", "Initialization complete.".bold().blue());
    Ok(())
}

/// Runs one REPL line of the form `<id> [positional...] {named...}`.
fn execute_line(line: &str) -> CliResult<Option<Value>> {
    let (id, rest) = match line.split_once(char::is_whitespace) {
        Some((id, rest)) => (id, rest.trim()),
        None => (line, ""),
    };

    match id {
        "list" => {
            handle_list();
            return Ok(None);
        }
        "describe" => {
            handle_describe(rest)?;
            return Ok(None);
        }
        _ => {}
    }

    let (positional, named) = if rest.is_empty() {
        (Vec::new(), Vec::new())
    } else if rest.starts_with('{') {
        (Vec::new(), parse_named(rest)?)
    } else {
        // a positional array optionally followed by a named object
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Json>();
        let positional = match stream.next().transpose()? {
            Some(json) => parse_positional(&json.to_string())?,
            None => Vec::new(),
        };
        let named = match stream.next().transpose()? {
            Some(json) => parse_named(&json.to_string())?,
            None => Vec::new(),
        };
        (positional, named)
    };

    Ok(Some(call(id, positional, named)?))
}

fn bracket_balance(text: &str) -> i32 {
    text.chars().fold(0, |balance, c| match c {
        '[' | '{' => balance + 1,
        ']' | '}' => balance - 1,
        _ => balance,
    })
}

fn run_repl(config: &Config, format: OutputFormat) -> CliResult<()> {
    let mut rl = DefaultEditor::new()?;
    let history_path = ".openeo_history";

    if rl.load_history(history_path).is_err() {
        // No history yet
    }

    println!("{}", "openEO processes REPL v0.1".bold().blue());
    println!("Output format: {}", format!("{:?}", format).yellow());
    println!("Type 'list', 'describe <id>' or '<id> [args] {{kwargs}}'. 'exit' or Ctrl-D quits.");

    let mut current_cmd = String::new();
    let mut balance = 0;

    loop {
        let prompt = if balance == 0 { ">_>  " } else { " ..  " };
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if current_cmd.is_empty() && trimmed.eq_ignore_ascii_case("exit") {
                    break;
                }

                rl.add_history_entry(trimmed)?;

                if !current_cmd.is_empty() {
                    current_cmd.push(' ');
                }
                current_cmd.push_str(trimmed);
                balance += bracket_balance(trimmed);

                if balance <= 0 {
                    match execute_line(&current_cmd) {
                        Ok(Some(value)) => {
                            println!("{}", render(&value, format, config.output.precision))
                        }
                        Ok(None) => {}
                        Err(e) => eprintln!("{}: {}", "Error".red(), e),
                    }
                    current_cmd.clear();
                    balance = 0;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                current_cmd.clear();
                balance = 0;
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_path);
    Ok(())
}
