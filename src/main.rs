mod app;
mod domain;
mod error;
mod focus;
mod input;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{
    format_countdown, mode_badge, priority_stars, suggest_subject, MistakeDraft, MistakeId,
    StudyMode, Task, TaskDraft, TaskId,
};
use focus::{FocusController, FocusSession, TerminalWindow};
use persistence::{
    config_file, ensure_data_dir, init_local_data_dir, load_config, log_file, mistakes_file,
    save_config, tasks_file, AppConfig, JsonMistakeStore, JsonTaskStore, TaskRepository,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studylock")]
#[command(about = "A terminal study manager with a focus mode that locks until the work is done", long_about = None)]
struct Cli {
    /// Data directory to use instead of the local .studylock / ~/.studylock lookup
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .studylock directory in the current directory
    Init,
    /// Add a task
    Add {
        subject: String,
        content: String,
        /// Deadline (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        deadline: Option<String>,
        /// Priority from 1 to 5
        #[arg(short, long, default_value_t = 1)]
        priority: u8,
        /// Task mode: normal or focus (a focus task carries a required work time)
        #[arg(long, default_value = "normal")]
        mode: String,
        /// Required work time in minutes (focus tasks only)
        #[arg(short, long, default_value_t = 30)]
        minutes: i64,
    },
    /// List tasks with their full ids
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Start the timer of a focus task
    Start { id: TaskId },
    /// Mark a task complete (focus tasks only once their time is up)
    Complete { id: TaskId },
    /// Delete a task
    Delete { id: TaskId },
    /// Show completion statistics
    Stats {
        /// Number of days to look back
        #[arg(short, long, default_value_t = report::DEFAULT_STATS_DAYS)]
        days: i64,
        /// Also write the report to this markdown file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage the mistake log
    #[command(subcommand)]
    Mistake(MistakeCommands),
}

#[derive(Subcommand)]
enum MistakeCommands {
    /// Log a wrong answer
    Add {
        question: String,
        /// The correct answer
        answer: String,
        /// What went wrong
        mistake: String,
        /// Subject; guessed from the question when omitted
        #[arg(short, long)]
        subject: Option<String>,
        /// Knowledge point
        #[arg(short, long, default_value = "")]
        category: String,
    },
    /// List logged mistakes
    List {
        /// Only this subject
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Count one more review of a mistake
    Review { id: MistakeId },
    /// Delete a mistake
    Delete { id: MistakeId },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(command) => {
            init_logging(None, "warn")?;
            run_command(command, cli.data_dir.as_deref())
        }
        None => {
            let data_dir = ensure_data_dir(cli.data_dir.as_deref())?;
            init_logging(Some(&log_file(&data_dir)), "info")?;
            run_tui(&data_dir)
        }
    }
}

/// Log to a file while the TUI owns the terminal, to stderr otherwise
fn init_logging(log_path: Option<&Path>, default_level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }
    Ok(())
}

/// Headless controller for one-shot subcommands
fn open_controller(data_dir: Option<&Path>) -> Result<app::Controller> {
    let data_dir = ensure_data_dir(data_dir)?;
    let config = load_config(config_file(&data_dir))?;
    let store = JsonTaskStore::open(tasks_file(&data_dir))?;
    Ok(FocusController::new(
        store,
        TerminalWindow::default(),
        FocusSession::new(),
        &config,
    ))
}

fn run_command(command: Commands, data_dir: Option<&Path>) -> Result<()> {
    let now = Local::now();

    match command {
        Commands::Init => {
            let data_dir = init_local_data_dir()?;
            let config_path = config_file(&data_dir);
            if !config_path.exists() {
                save_config(&config_path, &AppConfig::default())?;
            }
            println!("Initialized studylock directory: {}", data_dir.display());
            println!();
            println!("Studylock will now use this local directory for task storage.");
            println!("Edit {} to change the unlock secret.", config_path.display());
            println!("Run 'studylock' to start studying.");
        }
        Commands::Add {
            subject,
            content,
            deadline,
            priority,
            mode,
            minutes,
        } => {
            let mode = StudyMode::from_tag(&mode)
                .with_context(|| format!("Unknown mode '{}'. Use normal or focus", mode))?;
            let deadline = match deadline {
                Some(deadline) => {
                    NaiveDate::parse_from_str(&deadline, "%Y-%m-%d").map_err(|e| {
                        anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e)
                    })?;
                    deadline
                }
                None => now.format("%Y-%m-%d").to_string(),
            };
            let draft = match mode {
                StudyMode::Focus => {
                    TaskDraft::focus(&subject, &content, &deadline, priority, minutes)
                }
                StudyMode::Normal => TaskDraft::normal(&subject, &content, &deadline, priority),
            };
            let mut controller = open_controller(data_dir)?;
            let task = controller.repository_mut().create(draft, now)?;
            println!("Added {} {}", task.id, mode_badge(&task));
        }
        Commands::List { all } => {
            let controller = open_controller(data_dir)?;
            let repo = controller.repository();
            let tasks: Vec<&Task> = if all { repo.list().iter().collect() } else { repo.pending() };
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks {
                let done = if task.completed { "✓" } else { " " };
                println!(
                    "{} {}  {} {} · {}  {}  due {}",
                    done,
                    task.id,
                    mode_badge(task),
                    task.subject,
                    task.content,
                    priority_stars(task.priority),
                    task.deadline
                );
            }
        }
        Commands::Start { id } => {
            let mut controller = open_controller(data_dir)?;
            controller.start_task(id, now)?;
            println!(
                "Started {}: {} of work left",
                id,
                format_countdown(controller.remaining_time(now))
            );
        }
        Commands::Complete { id } => {
            let mut controller = open_controller(data_dir)?;
            controller.complete_task(id, now)?;
            println!("Completed {}", id);
        }
        Commands::Delete { id } => {
            let mut controller = open_controller(data_dir)?;
            if controller.delete_task(id)? {
                println!("Deleted {}", id);
            } else {
                anyhow::bail!("Task {} not found", id);
            }
        }
        Commands::Stats { days, output } => {
            let controller = open_controller(data_dir)?;
            let mistakes = open_mistakes(data_dir)?;
            let content = report::generate_report(
                controller.repository().list(),
                mistakes.list(),
                days,
                now,
            );
            print!("{}", content);
            if let Some(path) = output {
                report::write_report(&path, &content)?;
                println!();
                println!("Report written: {}", path.display());
            }
        }
        Commands::Mistake(command) => run_mistake_command(command, data_dir)?,
    }
    Ok(())
}

fn open_mistakes(data_dir: Option<&Path>) -> Result<JsonMistakeStore> {
    let data_dir = ensure_data_dir(data_dir)?;
    JsonMistakeStore::open(mistakes_file(&data_dir))
}

fn run_mistake_command(command: MistakeCommands, data_dir: Option<&Path>) -> Result<()> {
    let now = Local::now();
    let mut mistakes = open_mistakes(data_dir)?;

    match command {
        MistakeCommands::Add {
            question,
            answer,
            mistake,
            subject,
            category,
        } => {
            let subject = subject
                .or_else(|| suggest_subject(&question).map(str::to_string))
                .context("Could not guess a subject from the question. Pass --subject")?;
            let draft = MistakeDraft::new(&subject, &question, &answer, &mistake, &category);
            let logged = mistakes.add(draft, now)?;
            println!("Logged {} [{}] {}", logged.id, logged.subject, logged.category_label());
        }
        MistakeCommands::List { subject } => {
            let subject = subject.unwrap_or_default();
            let entries = mistakes.by_subject(&subject);
            if entries.is_empty() {
                println!("No mistakes.");
                let subjects = mistakes.subjects();
                if !subject.is_empty() && !subjects.is_empty() {
                    println!("Logged subjects: {}", subjects.join(", "));
                }
            }
            for entry in entries {
                println!(
                    "{}  {} [{}] {}  reviewed {}x",
                    entry.id,
                    entry.subject,
                    entry.category_label(),
                    entry.question,
                    entry.review_count
                );
                println!("    answer: {}  mistake: {}", entry.answer, entry.mistake);
            }
        }
        MistakeCommands::Review { id } => match mistakes.review(id, now)? {
            Some(count) => println!("Reviewed {} ({} so far)", id, count),
            None => anyhow::bail!("Mistake {} not found", id),
        },
        MistakeCommands::Delete { id } => {
            if mistakes.delete(id)? {
                println!("Deleted {}", id);
            } else {
                anyhow::bail!("Mistake {} not found", id);
            }
        }
    }
    Ok(())
}

fn run_tui(data_dir: &Path) -> Result<()> {
    eprintln!("Using studylock directory: {}", data_dir.display());

    let config = load_config(config_file(data_dir))?;
    let store = JsonTaskStore::open(tasks_file(data_dir))?;
    let mistakes = JsonMistakeStore::open(mistakes_file(data_dir))?;
    let (width, height) = crossterm::terminal::size()?;
    let mut app = AppState::open(
        store,
        mistakes,
        TerminalWindow::new(width, height),
        &config,
        report::DEFAULT_STATS_DAYS,
    );
    info!(tasks = %app.controller.repository().path().display(), "studylock started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("studylock closed");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app, Local::now()))?;

        // Wait for input, but no longer than the next scheduled callback
        let timeout = ticker::poll_timeout(app.controller.next_due(), Local::now());
        if event::poll(timeout)? {
            match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if input::handle_key(app, key, Local::now()) {
                        return Ok(());
                    }
                }
                Event::Resize(width, height) => {
                    app.controller.window_mut().observe_size(width, height);
                }
                _ => {}
            }
        }

        // Input is handled before due callbacks fire
        app.tick(Local::now());
    }
}
