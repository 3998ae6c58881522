//! Command execution against an opened data directory.

use crate::{Commands, LabelCommands};
use anyhow::{Context as _, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, Utc};
use quill_core::export;
use quill_core::types::{AppConfig, Attachment, Config, Note, NoteDraft, NoteId};
use quill_core::view::{self, ViewFilter};
use quill_core::{NoteStore, Persistence, RedbSlot, Session};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;
use tracing::{info, warn};

/// Everything a command needs: config, session and the opened store.
pub struct Context {
    config_path: PathBuf,
    pub(crate) config: AppConfig,
    pub(crate) session: Rc<Session>,
    pub(crate) store: NoteStore,
}

impl Context {
    pub fn open(data_dir: &Path) -> quill_core::Result<Self> {
        let core_config = Config {
            base_path: data_dir.to_path_buf(),
        };
        let config_path = core_config.app_config_path();

        let config = AppConfig::load(&config_path)?;
        let problems = config.validate();
        let config = if problems.is_empty() {
            config
        } else {
            for problem in &problems {
                warn!(%problem, "invalid config value, falling back to default");
            }
            config.with_defaults_for_invalid()
        };

        let session = Rc::new(match &config.session.user {
            Some(email) => Session::signed_in(email.clone()),
            None => Session::signed_out(),
        });

        let slot = RedbSlot::open(&core_config, config.storage.slot.clone())?;
        let store = NoteStore::open(Persistence::new(slot), session.clone());

        Ok(Self {
            config_path,
            config,
            session,
            store,
        })
    }

    fn save_config(&self) -> Result<()> {
        self.config
            .save(&self.config_path)
            .with_context(|| format!("failed to write {}", self.config_path.display()))
    }

    /// Resolves a full id or unique prefix to a note id.
    fn resolve(&self, prefix: &str) -> Result<NoteId> {
        self.store
            .resolve_prefix(prefix)
            .map(|note| note.id.clone())
            .ok_or_else(|| anyhow!("no single note matches id `{prefix}`"))
    }

    fn note(&self, id: &NoteId) -> Result<&Note> {
        self.store
            .get(id)
            .ok_or_else(|| anyhow!("note {id} disappeared"))
    }
}

pub fn run(ctx: &mut Context, command: Commands, out: &mut impl Write) -> Result<()> {
    let now = SystemTime::now();

    match command {
        Commands::Login { email } => {
            let email = email.trim().to_string();
            if email.is_empty() {
                bail!("email must not be empty");
            }
            ctx.session.sign_in(email.clone());
            ctx.config.session.user = Some(email.clone());
            ctx.save_config()?;
            info!(%email, "signed in");
            writeln!(out, "Signed in as {email}")?;
        }
        Commands::Logout => {
            ctx.session.sign_out();
            ctx.config.session.user = None;
            ctx.save_config()?;
            writeln!(out, "Signed out")?;
        }
        Commands::Whoami => match ctx.session.user() {
            Some(user) => writeln!(out, "{}", user.email)?,
            None => writeln!(out, "Not signed in")?,
        },
        Commands::New {
            title,
            content,
            due,
        } => {
            let draft = NoteDraft {
                title,
                content,
                due_date: due.as_deref().map(parse_date).transpose()?,
                attachments: vec![],
            };
            match ctx.store.commit_draft(None, draft, now)? {
                Some(id) => writeln!(out, "{id}")?,
                None => writeln!(out, "Nothing to save: title and content are empty")?,
            }
        }
        Commands::Edit { id, title, content } => {
            let id = ctx.resolve(&id)?;
            let note = ctx.note(&id)?;
            let draft = NoteDraft {
                title: title.unwrap_or_else(|| note.title.clone()),
                content: content.unwrap_or_else(|| note.content.clone()),
                due_date: note.due_date,
                attachments: note.attachments.clone(),
            };
            if draft.is_blank() {
                bail!("a note needs a title or content");
            }
            if ctx.store.commit_draft(Some(&id), draft, now)?.is_none() {
                bail!("note {id} is in the trash; restore it before editing");
            }
            writeln!(out, "Saved {id}")?;
        }
        Commands::List {
            section,
            query,
            label,
        } => {
            let mut filter = ViewFilter::section(section);
            if let Some(query) = query {
                filter = filter.with_query(query);
            }
            if let Some(label) = label {
                filter = filter.with_label(label);
            }
            for note in view::derive(ctx.store.notes(), &filter) {
                writeln!(out, "{}", summary_line(note))?;
            }
        }
        Commands::Show { id } => {
            let id = ctx.resolve(&id)?;
            write_details(out, ctx.note(&id)?)?;
        }
        Commands::Pin { id } => {
            let id = ctx.resolve(&id)?;
            ctx.store.toggle_pin(&id)?;
            let state = if ctx.note(&id)?.is_pinned { "Pinned" } else { "Unpinned" };
            writeln!(out, "{state} {id}")?;
        }
        Commands::Archive { id } => {
            let id = ctx.resolve(&id)?;
            ctx.store.toggle_archive(&id)?;
            let state = if ctx.note(&id)?.is_archived {
                "Archived"
            } else {
                "Unarchived"
            };
            writeln!(out, "{state} {id}")?;
        }
        Commands::Delete { id } => {
            let id = ctx.resolve(&id)?;
            ctx.store.soft_delete(&id)?;
            writeln!(out, "Moved {id} to the trash")?;
        }
        Commands::Restore { id } => {
            let id = ctx.resolve(&id)?;
            ctx.store.restore(&id)?;
            writeln!(out, "Restored {id}")?;
        }
        Commands::EmptyTrash => {
            let purged = ctx.store.purge()?;
            writeln!(out, "Permanently deleted {purged} note(s)")?;
        }
        Commands::Color { id, color } => {
            let id = ctx.resolve(&id)?;
            ctx.store.set_color(&id, color)?;
            writeln!(out, "Set {id} to {color}")?;
        }
        Commands::Label(LabelCommands::Set { id, labels }) => {
            let id = ctx.resolve(&id)?;
            ctx.store.set_labels(&id, labels)?;
            writeln!(out, "Labels: {}", ctx.note(&id)?.labels.join(", "))?;
        }
        Commands::Label(LabelCommands::List) => {
            for label in view::label_index(ctx.store.notes()) {
                writeln!(out, "{label}")?;
            }
        }
        Commands::Due { id, date, clear } => {
            let id = ctx.resolve(&id)?;
            let due = if clear {
                None
            } else {
                let date = date.context("a date or --clear is required")?;
                Some(parse_date(&date)?)
            };
            ctx.store.set_due_date(&id, due)?;
            match due {
                Some(due) => writeln!(out, "Due {}", format_time(due))?,
                None => writeln!(out, "Cleared due date")?,
            }
        }
        Commands::Attach { id, path } => {
            let id = ctx.resolve(&id)?;
            let attachment = attachment_for(&path)?;
            let mut attachments = ctx.note(&id)?.attachments.clone();
            let attachment_id = attachment.id.clone();
            attachments.push(attachment);
            ctx.store.set_attachments(&id, attachments)?;
            writeln!(out, "{attachment_id}")?;
        }
        Commands::Detach { id, attachment_id } => {
            let id = ctx.resolve(&id)?;
            let mut attachments = ctx.note(&id)?.attachments.clone();
            let before = attachments.len();
            attachments.retain(|a| a.id.as_str() != attachment_id.trim());
            if attachments.len() == before {
                bail!("note {id} has no attachment `{attachment_id}`");
            }
            ctx.store.set_attachments(&id, attachments)?;
            writeln!(out, "Removed {attachment_id}")?;
        }
        Commands::Export {
            id,
            all,
            format,
            out: target,
        } => {
            let (name, body) = match id {
                Some(id) if !all => {
                    let note = ctx.note(&ctx.resolve(&id)?)?;
                    (export::file_name(note, format), export::render_note(note, format))
                }
                _ => (
                    format!("notes.{}", format.extension()),
                    export::render_collection(ctx.store.notes(), format),
                ),
            };
            write_export(out, target, &name, &body)?;
        }
        Commands::Theme { value } => match value {
            Some(theme) => {
                ctx.config.general.theme = theme;
                ctx.save_config()?;
                writeln!(out, "Theme set to {theme}")?;
            }
            None => writeln!(out, "{}", ctx.config.general.theme)?,
        },
    }

    Ok(())
}

/// Parses an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_date(input: &str) -> Result<SystemTime> {
    let input = input.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.into());
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("invalid date `{input}`; use YYYY-MM-DD or RFC 3339"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("midnight is always a valid time")?;
    Ok(midnight.and_utc().into())
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y-%m-%d %H:%M").to_string()
}

fn short_id(id: &NoteId) -> &str {
    id.as_str().get(..8).unwrap_or(id.as_str())
}

fn summary_line(note: &Note) -> String {
    let mut line = format!("{}  ", short_id(&note.id));
    if note.is_pinned {
        line.push_str("* ");
    }
    line.push_str(if note.title.is_empty() {
        "(untitled)"
    } else {
        &note.title
    });
    if !note.labels.is_empty() {
        line.push_str(&format!("  [{}]", note.labels.join(", ")));
    }
    if let Some(due) = note.due_date {
        line.push_str(&format!("  due {}", format_time(due)));
    }
    line
}

fn write_details(out: &mut impl Write, note: &Note) -> Result<()> {
    writeln!(out, "id:       {}", note.id)?;
    writeln!(out, "title:    {}", note.title)?;
    writeln!(out, "color:    {}", note.color)?;
    let mut flags = Vec::new();
    if note.is_pinned {
        flags.push("pinned");
    }
    if note.is_archived {
        flags.push("archived");
    }
    if note.is_deleted {
        flags.push("in trash");
    }
    if !flags.is_empty() {
        writeln!(out, "state:    {}", flags.join(", "))?;
    }
    if !note.labels.is_empty() {
        writeln!(out, "labels:   {}", note.labels.join(", "))?;
    }
    writeln!(out, "created:  {}", format_time(note.created_at))?;
    writeln!(out, "updated:  {}", format_time(note.updated_at))?;
    if let Some(due) = note.due_date {
        writeln!(out, "due:      {}", format_time(due))?;
    }
    for attachment in &note.attachments {
        writeln!(
            out,
            "attached: {} {} ({} KB, {}) {}",
            attachment.id,
            attachment.name,
            attachment.size_kib(),
            attachment.kind,
            attachment.url
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}", note.content)?;
    Ok(())
}

fn attachment_for(path: &Path) -> Result<Attachment> {
    let path = path
        .canonicalize()
        .with_context(|| format!("cannot read {}", path.display()))?;
    let metadata = std::fs::metadata(&path)?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_type_for(&path);
    Ok(Attachment::from_upload(
        name,
        mime_type,
        format!("file://{}", path.display()),
        metadata.len(),
    ))
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("pdf") => "application/pdf",
        Some("txt" | "md") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn write_export(
    out: &mut impl Write,
    target: Option<PathBuf>,
    name: &str,
    body: &str,
) -> Result<()> {
    let Some(target) = target else {
        writeln!(out, "{body}")?;
        return Ok(());
    };
    let path = if target.is_dir() {
        target.join(name)
    } else {
        target
    };
    std::fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "exported notes");
    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}
