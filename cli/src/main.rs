use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use quill_core::Section;
use quill_core::export::ExportFormat;
use quill_core::types::{NoteColor, Theme};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Keep notes with pins, labels, archive and trash")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "QUILL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in; changes to notes need an active session
    Login {
        email: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Create a note
    New {
        title: String,

        #[arg(long, short, default_value = "")]
        content: String,

        /// Due date, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },

    /// Edit a note's title or content
    Edit {
        id: String,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        content: Option<String>,
    },

    /// List notes in a section
    List {
        #[arg(long, short, default_value_t = Section::Notes)]
        section: Section,

        /// Case-insensitive text to look for in titles, content and labels
        #[arg(long, short)]
        query: Option<String>,

        /// Label to filter by (labels section only)
        #[arg(long, short)]
        label: Option<String>,
    },

    /// Print a note in full
    Show {
        id: String,
    },

    /// Pin or unpin a note
    Pin {
        id: String,
    },

    /// Archive or unarchive a note
    Archive {
        id: String,
    },

    /// Move a note to the trash
    Delete {
        id: String,
    },

    /// Take a note out of the trash
    Restore {
        id: String,
    },

    /// Permanently remove everything in the trash
    EmptyTrash,

    /// Set a note's color
    Color {
        id: String,
        color: NoteColor,
    },

    /// Label commands
    #[command(subcommand)]
    Label(LabelCommands),

    /// Set or clear a note's due date
    Due {
        id: String,

        /// RFC 3339 or YYYY-MM-DD
        #[arg(required_unless_present = "clear", conflicts_with = "clear")]
        date: Option<String>,

        #[arg(long)]
        clear: bool,
    },

    /// Attach a local file to a note
    Attach {
        id: String,
        path: PathBuf,
    },

    /// Remove an attachment from a note
    Detach {
        id: String,
        attachment_id: String,
    },

    /// Export one note, or every note outside the trash
    Export {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<String>,

        #[arg(long)]
        all: bool,

        #[arg(long, short, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,

        /// Output file or directory (defaults to stdout)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Show or set the color theme
    Theme {
        value: Option<Theme>,
    },
}

#[derive(Subcommand, Debug)]
enum LabelCommands {
    /// Replace a note's labels
    Set {
        id: String,
        labels: Vec<String>,
    },

    /// List every label in use
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("could not determine the platform data directory; pass --data-dir")?
            .join("quill"),
    };
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let mut ctx = commands::Context::open(&data_dir)
        .with_context(|| format!("failed to open notes in {}", data_dir.display()))?;
    commands::run(&mut ctx, cli.command, &mut std::io::stdout().lock())
}
