use crate::clock::{Clock, SystemClock, TimestampIds};
use crate::config::{Config, ConfigArgs};
use crate::enums::ColorWhen;
use crate::error::Result;
use crate::habits::cli::{Context, HabitCommands};
use crate::habits::{Habit, HabitStore};
use crate::reminders::{default_notifier, RemindArgs};
use crate::storage::FileStore;
use crate::theme::ThemeArgs;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use menva::read_env_file;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

#[derive(Debug, Parser)]
#[command(name = "habits", version)]
#[command(about = "Build habits one day at a time")]
pub struct Cli {
    /// Load environment variables from this file first
    #[arg(short, long, global = true)]
    env: Option<String>,

    /// Configuration file, defaults to the platform config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the stored habits
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Color the cards: `habits list --color=never`
    #[arg(
        long,
        global = true,
        require_equals = true,
        value_name = "WHEN",
        num_args = 0..=1,
        default_value_t = ColorWhen::Auto,
        default_missing_value = "always",
        value_enum
    )]
    color: ColorWhen,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(flatten)]
    Habit(HabitCommands),
    /// Reminder times and notifications
    #[command(arg_required_else_help = true)]
    Remind(RemindArgs),
    /// Light or dark
    Theme(ThemeArgs),
    /// Inspect or write the configuration file
    #[command(arg_required_else_help = true)]
    Config(ConfigArgs),
    /// Print shell completions
    #[command(arg_required_else_help = true)]
    Completions { shell: Shell },
}

fn confirm_on_stdin(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

impl Cli {
    /// Parses arguments, sets up logging and runs the command. Returns the
    /// process exit code.
    pub fn handle() -> i32 {
        let cli = Cli::parse();
        if let Some(env) = cli.env.as_ref() {
            read_env_file(env);
        }
        let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
        let config = match Config::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {err}");
                return err.exit_code();
            },
        };
        let _guard = crate::logging::init(&config, cli.verbose);

        match cli.run(&config, config_path) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
                0
            },
            Err(err) => {
                tracing::debug!(?err, "command failed");
                eprintln!("Error: {err}");
                err.exit_code()
            },
        }
    }

    fn run(self, config: &Config, config_path: PathBuf) -> Result<String> {
        let data_dir = config.data_dir(self.data_dir.as_deref());
        tracing::debug!(data_dir = %data_dir.display(), "using data directory");
        let clock = SystemClock;
        let style = self.color.style();

        match self.command {
            Commands::Config(args) => args.command.handle_commands(config, &config_path),
            Commands::Completions { shell } => {
                let mut command = Cli::command();
                let mut out = Vec::new();
                clap_complete::generate(shell, &mut command, "habits", &mut out);
                Ok(String::from_utf8_lossy(&out).trim_end().to_string())
            },
            Commands::Theme(args) => {
                let mut storage = FileStore::open(&data_dir)?;
                Ok(args.run(&mut storage)?.to_string())
            },
            Commands::Remind(args) => {
                let mut store = HabitStore::load(FileStore::open(&data_dir)?, TimestampIds);
                let mut notifier = default_notifier();
                let mut reload = || -> Result<Vec<Habit>> {
                    let store = HabitStore::load(FileStore::open(&data_dir)?, TimestampIds);
                    Ok(store.all().to_vec())
                };
                args.command
                    .run(&mut store, &mut notifier, &clock, &mut reload)
            },
            Commands::Habit(command) => {
                let mut store = HabitStore::load(FileStore::open(&data_dir)?, TimestampIds);
                let mut confirm = confirm_on_stdin;
                let mut ctx = Context {
                    today: clock.today(),
                    style,
                    default_color: config.default_color,
                    confirm: &mut confirm,
                };
                command.handle_commands(&mut store, &mut ctx)
            },
        }
    }
}
