// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! CLI shell for experimenting with bucketed hash tables

use bucket_hash::{
    config::{DEFAULT_MAX_LOAD_FACTOR, DEFAULT_NUM_BUCKETS},
    CapacityPolicy, Config, HashTable, Strategy,
};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use rustyline::DefaultEditor;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

macro_rules! die {
    ($fmt:literal, $($arg:tt)*) => {{
        eprintln!($fmt, $($arg)*);
        std::process::exit(1);
    }};

    ($msg:literal) => {{
        eprintln!($msg);
        std::process::exit(1);
    }};
}

use tracing::{debug, info};

pub fn init_tracing(quiet: bool, verbose: u8) -> (bool, LevelFilter) {
    let is_verbose = !quiet && verbose > 0;

    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // The library logs through the log crate
    tracing_log::LogTracer::init().expect("Failed to set log tracer");

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("BHASH_LOG")
        .from_env_lossy()
        .add_directive(
            "rustyline=warn"
                .parse()
                .expect("Failed to parse rustyline directive"),
        );

    let subscriber = Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        die!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing_panic::panic_hook(info);
        prev_hook(info); // daisy-chain to old panic hook
    }));

    (is_verbose, level_filter)
}

fn parse_strategy(s: &str) -> bucket_hash::Result<Strategy> {
    s.parse()
}

/// Table layout options, shared by the command line and `configure`
#[derive(clap::Args, Debug, Clone)]
struct TableArgs {
    /// Collision strategy (chaining, linear, chained-linear, overflow, double, extensible)
    #[arg(short, long, default_value = "chaining", value_parser = parse_strategy)]
    strategy: Strategy,

    /// Number of buckets
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_BUCKETS)]
    buckets: usize,

    /// Entries per bucket
    #[arg(short, long, default_value_t = 1)]
    capacity: usize,

    /// Size of the overflow area (separate overflow strategy only)
    #[arg(short, long)]
    overflow: Option<usize>,

    /// Grow the table once the load factor is exceeded
    #[arg(short, long)]
    dynamic: bool,

    /// Load factor threshold of dynamic tables
    #[arg(long, default_value_t = DEFAULT_MAX_LOAD_FACTOR)]
    max_load_factor: f64,
}

impl TableArgs {
    /// Integer keys hash to themselves, so collisions are easy to provoke.
    fn config(&self) -> Config<i64> {
        let policy = if self.dynamic {
            CapacityPolicy::Dynamic {
                max_load_factor: self.max_load_factor,
            }
        } else {
            CapacityPolicy::Static
        };

        let config = Config::new(self.strategy, |k: &i64| *k)
            .secondary_hash(|k: &i64| 1 + k.rem_euclid(7))
            .num_buckets(self.buckets)
            .bucket_capacity(self.capacity)
            .capacity_policy(policy);

        match self.overflow {
            Some(n) => config.overflow_size(n),
            None => config,
        }
    }
}

/// CLI shell for experimenting with bucketed hash tables
#[derive(Parser, Debug)]
#[command(name = "bhash")]
#[command(about = "CLI shell for experimenting with bucketed hash tables")]
struct ToolArgs {
    /// Suppress all output except for errors. This overrides the -v flag.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Turn on verbose output. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    table: TableArgs,

    /// Command to run (if omitted, starts interactive shell)
    #[command(subcommand)]
    command: Option<ToolCommand>,
}

#[derive(Subcommand, Debug, Clone)]
enum ToolCommand {
    /// Insert or update a key
    #[command(visible_alias = "set")]
    Insert {
        /// The key to insert
        #[arg(allow_negative_numbers = true)]
        key: i64,
        /// The value to store
        value: String,
    },
    /// Get the value for a key
    Get {
        /// The key to look up
        #[arg(allow_negative_numbers = true)]
        key: i64,
    },
    /// Delete a key
    #[command(visible_alias = "rm")]
    Del {
        /// The key to delete
        #[arg(allow_negative_numbers = true)]
        key: i64,
    },
    /// Insert the keys `start..end`, using the key as value
    Fill {
        /// First key (inclusive)
        #[arg(allow_negative_numbers = true)]
        start: i64,
        /// Last key (exclusive)
        #[arg(allow_negative_numbers = true)]
        end: i64,
    },
    /// Remove all entries
    Clear,
    /// Show table statistics
    Info,
    /// Print the bucket layout
    #[command(visible_alias = "ls")]
    Dump,
}

// Internal shell commands, include all external tool commands
#[derive(Parser, Debug)]
#[command(name = "")]
#[command(no_binary_name = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "
Available Commands:

{subcommands}

Use `help COMMAND` or `COMMAND --help` for more details.

")]
struct ShellArgs {
    #[command(subcommand)]
    command: ShellCommand,
}

// Shell commands (including ones not available from CLI)
#[derive(Subcommand, Debug, Clone)]
enum ShellCommand {
    #[command(flatten)]
    ToolCmd(ToolCommand),

    /// Rebuild the table with a new layout, keeping all entries that fit
    Configure(TableArgs),

    /// Exit the current shell
    #[command(visible_alias = "quit")]
    Exit,
}

struct Session {
    table: HashTable<i64, String>,
}

impl Session {
    fn open(args: &TableArgs) -> bucket_hash::Result<Self> {
        let table = args.config().open()?;
        debug!("opened {table:?}");
        Ok(Self { table })
    }
}

fn print_info(session: &Session) {
    let table = &session.table;
    let snapshot = table.snapshot();

    println!("Strategy: {}", table.strategy());
    println!("Buckets: {}", table.num_buckets());
    println!("Bucket capacity: {}", table.bucket_capacity());
    println!("Items: {}", table.len());
    println!("Load factor: {:.3}", table.load_factor());

    match table.capacity_policy() {
        CapacityPolicy::Static => println!("Capacity policy: static"),
        CapacityPolicy::Dynamic { max_load_factor } => {
            println!("Capacity policy: dynamic (max load factor {max_load_factor})");
        }
    }

    if table.strategy().uses_tombstones() {
        println!("Tombstones: {}", snapshot.tombstone_count());
    }
    println!("Chains: {}", snapshot.chain_count());

    if !snapshot.overflow.is_empty() {
        let used = snapshot.overflow.iter().flatten().count();
        println!("Overflow slots: {used}/{}", snapshot.overflow.len());
    }

    if let Some(depth) = snapshot.global_depth {
        println!("Global depth: {depth}");
    }
}

fn handle_insert(session: &mut Session, key: i64, value: String) {
    let existed = session.table.contains_key(&key);

    if !session.table.insert(key, value) {
        eprintln!("Error: table is full, {key} was not inserted");
    } else if existed {
        println!("OK (updated)");
    } else {
        println!("OK (created)");
    }
}

fn handle_get(session: &Session, key: i64) {
    match session.table.search(&key) {
        Some(value) => println!("{value}"),
        None => println!("(not found)"),
    }
}

fn handle_del(session: &mut Session, key: i64) {
    if session.table.delete(&key) {
        println!("OK");
    } else {
        println!("(not found)");
    }
}

fn handle_fill(session: &mut Session, start: i64, end: i64) {
    let mut count = 0;

    for key in start..end {
        if !session.table.insert(key, key.to_string()) {
            eprintln!("Error: table is full, stopped at {key}");
            break;
        }
        count += 1;
    }

    println!("OK ({count} items)");
}

fn handle_configure(session: &mut Session, args: &TableArgs) {
    match session.table.configure(args.config()) {
        Ok(rejected) => {
            for (key, value) in &rejected {
                println!("dropped {key} = {value}");
            }
            println!("OK (reconfigured, {} dropped)", rejected.len());
        }
        Err(e) => eprintln!("Error: {e}"),
    }
}

/// Result of executing a command
enum CommandResult {
    Continue,
    Exit,
}

/// Execute a parsed command
fn execute_command(session: &mut Session, cmd: ToolCommand) -> CommandResult {
    match cmd {
        ToolCommand::Insert { key, value } => handle_insert(session, key, value),
        ToolCommand::Get { key } => handle_get(session, key),
        ToolCommand::Del { key } => handle_del(session, key),
        ToolCommand::Fill { start, end } => handle_fill(session, start, end),
        ToolCommand::Clear => {
            session.table.clear();
            println!("OK (cleared)");
        }
        ToolCommand::Info => print_info(session),
        ToolCommand::Dump => print!("{}", session.table.snapshot()),
    }
    CommandResult::Continue
}

/// Execute a shell-only command
fn execute_shell_command(session: &mut Session, cmd: ShellCommand) -> CommandResult {
    match cmd {
        ShellCommand::ToolCmd(tool_cmd) => execute_command(session, tool_cmd),
        ShellCommand::Configure(args) => {
            handle_configure(session, &args);
            CommandResult::Continue
        }
        ShellCommand::Exit => CommandResult::Exit,
    }
}

/// Parse and run a shell command line
fn run_shell_command(session: &mut Session, line: &str) -> CommandResult {
    let line = line.trim();
    if line.is_empty() {
        return CommandResult::Continue;
    }

    let tokens = match shlex::split(line) {
        Some(t) if !t.is_empty() => t,
        Some(_) => return CommandResult::Continue,
        None => {
            eprintln!("error: unclosed quote");
            return CommandResult::Continue;
        }
    };

    match ShellArgs::try_parse_from(&tokens) {
        Ok(args) => execute_shell_command(session, args.command),
        Err(e) => {
            // Print clap's error message
            eprintln!("{e}");
            CommandResult::Continue
        }
    }
}

fn run_shell(session: &mut Session) {
    if io::stdin().is_terminal() {
        run_shell_interactive(session);
    } else {
        run_shell_non_interactive(session);
    }
}

fn run_shell_interactive(session: &mut Session) {
    println!("Welcome to the bucket hash shell");
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error initializing line editor: {e}");
            return;
        }
    };

    loop {
        match rl.readline("bhash> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                if let CommandResult::Exit = run_shell_command(session, &line) {
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ignore Ctrl+C, just show a new prompt
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        }
    }
}

fn run_shell_non_interactive(session: &mut Session) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if stdout.flush().is_err() {
            die!("can't flush stdout");
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // EOF
                break;
            }
            Ok(_) => {
                if let CommandResult::Exit = run_shell_command(session, &line) {
                    break;
                }
            }
            Err(e) => {
                die!("Error reading input: {}", e);
            }
        }
    }
}

fn main() {
    let args = ToolArgs::parse();
    let (verbose, level_filter) = init_tracing(args.quiet, args.verbose);

    let cmd = ToolArgs::command();

    info!(
        "starting {} ({} {}), log level: {level_filter}",
        cmd.get_name(),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let mut session = match Session::open(&args.table) {
        Ok(s) => s,
        Err(e) => {
            let note = if verbose {
                ""
            } else {
                ". Note: Use -v (one or multiple times) for more information"
            };
            die!("Error opening table: {}{}", e, note);
        }
    };

    match args.command {
        Some(cmd) => {
            execute_command(&mut session, cmd);
        }
        None => run_shell(&mut session),
    }
}
