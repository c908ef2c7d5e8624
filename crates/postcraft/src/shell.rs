// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postcraft shell` command implementation.
//!
//! A readline REPL that runs messages through the same pipeline as the web
//! app and keeps the local schedule list. Scheduling here only records a
//! reminder; nothing is published when the time comes.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use colored::Colorize;
use postcraft_agent::prompts::excerpt;
use postcraft_agent::{AssembledReply, Pipeline};
use postcraft_config::PostcraftConfig;
use postcraft_core::types::{
    Attachment, AttachmentKind, InboundEvent, MediaData, MediaKind, MediaPayload,
};
use postcraft_core::{PostcraftError, ScheduleBook, ScheduledContentType, ScheduledPost, SenderId};
use postcraft_gateway::web_capabilities;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::serve::build_components;

const CHANNEL: &str = "cli";
const LOCAL_SENDER: &str = "local";
const PREVIEW_CHARS: usize = 80;

const HELP: &str = "\
/attach <url|file>   attach an image to your next message
/schedule <when>     remember the last reply for later (RFC 3339 or YYYY-MM-DD HH:MM)
/scheduled           list remembered posts
/unschedule <id>     forget one entry
/clear-scheduled     forget every entry
/quit                leave";

/// One line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    Help,
    Attach(&'a str),
    Schedule(&'a str),
    Scheduled,
    Unschedule(&'a str),
    ClearScheduled,
    Unknown(&'a str),
    Message(&'a str),
}

fn parse_command(line: &str) -> ShellCommand<'_> {
    let line = line.trim();
    if !line.starts_with('/') {
        return ShellCommand::Message(line);
    }
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };
    match name {
        "/quit" | "/exit" => ShellCommand::Quit,
        "/help" => ShellCommand::Help,
        "/attach" => ShellCommand::Attach(arg),
        "/schedule" => ShellCommand::Schedule(arg),
        "/scheduled" => ShellCommand::Scheduled,
        "/unschedule" => ShellCommand::Unschedule(arg),
        "/clear-scheduled" => ShellCommand::ClearScheduled,
        other => ShellCommand::Unknown(other),
    }
}

/// Parses a schedule time: RFC 3339, or `YYYY-MM-DD HH:MM` in local time.
fn parse_when(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .map_err(|_| format!("can't read `{input}` as a time; use YYYY-MM-DD HH:MM"))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| format!("`{input}` is ambiguous or skipped in local time"))
}

/// Content category for a reply: its first attachment, else text.
fn content_type(reply: &AssembledReply) -> ScheduledContentType {
    match reply.attachments.first().map(|a| a.kind) {
        Some(MediaKind::Image) => ScheduledContentType::Image,
        Some(MediaKind::Video) => ScheduledContentType::Video,
        Some(MediaKind::Audio) => ScheduledContentType::Audio,
        None => ScheduledContentType::Text,
    }
}

/// Builds the schedule entry for a reply produced by event `message_ref`.
fn schedule_entry(
    message_ref: &str,
    reply: &AssembledReply,
    when: DateTime<Utc>,
) -> ScheduledPost {
    let text = reply.full_text();
    let payload = serde_json::to_value(reply).unwrap_or(serde_json::Value::Null);
    ScheduledPost::new(
        message_ref,
        when,
        content_type(reply),
        excerpt(&text, PREVIEW_CHARS),
        payload,
    )
}

/// Turns `/attach` input into an image attachment. Files are inlined as
/// `data:` URIs.
fn attachment_from(arg: &str) -> Result<Attachment, String> {
    if arg.is_empty() {
        return Err("usage: /attach <url|file>".to_string());
    }
    let url = if arg.starts_with("http://") || arg.starts_with("https://") || arg.starts_with("data:")
    {
        arg.to_string()
    } else {
        let path = Path::new(arg);
        let bytes = std::fs::read(path).map_err(|e| format!("can't read {arg}: {e}"))?;
        let mime = image_mime(path);
        MediaPayload::inline(mime, STANDARD.encode(&bytes))
            .to_data_uri()
            .ok_or_else(|| format!("can't inline {arg}"))?
    };
    Ok(Attachment {
        kind: AttachmentKind::Image,
        url,
        mime_type: None,
    })
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

fn print_reply(reply: &AssembledReply) {
    for media in &reply.attachments {
        let location = match &media.media.data {
            MediaData::Inline(data) => format!("{} base64 chars inline", data.len()),
            MediaData::Url(url) => url.clone(),
        };
        println!(
            "{}",
            format!("[{} {} ({location})]", media.kind, media.media.mime_type).cyan()
        );
    }
    for chunk in &reply.text {
        println!("{chunk}");
    }
    if !reply.quick_replies.is_empty() {
        let titles: Vec<&str> = reply.quick_replies.iter().map(|q| q.title.as_str()).collect();
        println!("{}", titles.join(" | ").dimmed());
    }
}

fn print_book(book: &ScheduleBook) {
    if book.is_empty() {
        println!("{}", "nothing scheduled".dimmed());
        return;
    }
    let now = Utc::now();
    for post in book.upcoming() {
        let when = post.scheduled_for.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let marker = if post.scheduled_for < now { " (past)" } else { "" };
        println!(
            "{}  {when}{marker}  [{}]  {}",
            post.id.yellow(),
            post.content_type,
            post.preview
        );
    }
}

/// Local shell state between lines.
struct Shell {
    pipeline: Option<std::sync::Arc<Pipeline>>,
    schedule_path: PathBuf,
    book: ScheduleBook,
    attachment: Option<Attachment>,
    last_reply: Option<(String, AssembledReply)>,
}

impl Shell {
    async fn message(&mut self, text: &str) -> Result<(), PostcraftError> {
        let pipeline = self.pipeline.as_ref().ok_or_else(|| {
            PostcraftError::Config(
                "gemini.api_key is not set; only schedule commands are available".into(),
            )
        })?;
        let mut event = InboundEvent::text(CHANNEL, SenderId::from(LOCAL_SENDER), text);
        if let Some(attachment) = self.attachment.take() {
            event = event.with_attachment(attachment);
        }
        let handled = pipeline.respond(&event, &web_capabilities()).await;
        print_reply(&handled.reply);
        self.last_reply = Some((event.id.clone(), handled.reply));
        Ok(())
    }

    fn schedule(&mut self, when: &str) -> Result<(), String> {
        let (message_ref, reply) = self
            .last_reply
            .as_ref()
            .ok_or_else(|| "generate something first, then schedule it".to_string())?;
        let at = parse_when(when)?;
        let entry = schedule_entry(message_ref, reply, at);
        let id = entry.id.clone();
        self.book.add(entry);
        self.save()?;
        println!("scheduled {}", id.yellow());
        Ok(())
    }

    fn unschedule(&mut self, id: &str) -> Result<(), String> {
        if !self.book.remove(id) {
            return Err(format!("no scheduled post with id {id}"));
        }
        self.save()?;
        println!("removed {}", id.yellow());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), String> {
        let removed = self.book.clear();
        self.save()?;
        println!("removed {removed} scheduled post(s)");
        Ok(())
    }

    fn save(&self) -> Result<(), String> {
        self.book
            .save(&self.schedule_path)
            .map_err(|e| format!("couldn't save the schedule list: {e}"))
    }
}

/// Runs the `postcraft shell` REPL.
pub async fn run_shell(config: PostcraftConfig) -> Result<(), PostcraftError> {
    let components = build_components(&config)?;
    let schedule_path = PathBuf::from(&config.client.schedule_path);
    let book = ScheduleBook::load(&schedule_path)?;

    let mut shell = Shell {
        pipeline: components.pipeline,
        schedule_path,
        book,
        attachment: None,
        last_reply: None,
    };

    let mut rl = DefaultEditor::new()
        .map_err(|e| PostcraftError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "postcraft shell".bold().green());
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", "postcraft".green());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(&line);

        let outcome = match parse_command(&line) {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            ShellCommand::Attach(arg) => attachment_from(arg).map(|attachment| {
                shell.attachment = Some(attachment);
                println!("{}", "image attached to your next message".dimmed());
            }),
            ShellCommand::Schedule(when) => shell.schedule(when),
            ShellCommand::Scheduled => {
                print_book(&shell.book);
                Ok(())
            }
            ShellCommand::Unschedule(id) => shell.unschedule(id),
            ShellCommand::ClearScheduled => shell.clear(),
            ShellCommand::Unknown(name) => Err(format!("unknown command {name}; try /help")),
            ShellCommand::Message(text) => shell.message(text).await.map_err(|e| e.to_string()),
        };
        if let Err(message) = outcome {
            eprintln!("{}: {message}", "error".red());
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use postcraft_agent::AttachedMedia;
    use postcraft_core::types::QuickReply;

    fn reply_with(text: &str, attachments: Vec<AttachedMedia>) -> AssembledReply {
        AssembledReply {
            text: vec![text.to_string()],
            attachments,
            quick_replies: vec![QuickReply {
                title: "Chat".into(),
                payload: "FEATURE_CHAT".into(),
            }],
            ..AssembledReply::default()
        }
    }

    #[test]
    fn parses_commands_and_messages() {
        assert_eq!(parse_command("/quit"), ShellCommand::Quit);
        assert_eq!(
            parse_command("/schedule 2026-11-01 09:30"),
            ShellCommand::Schedule("2026-11-01 09:30")
        );
        assert_eq!(parse_command("/unschedule abc"), ShellCommand::Unschedule("abc"));
        assert_eq!(parse_command("/clear-scheduled"), ShellCommand::ClearScheduled);
        assert_eq!(parse_command("/scheduled"), ShellCommand::Scheduled);
        assert_eq!(parse_command("/bogus x"), ShellCommand::Unknown("/bogus"));
        assert_eq!(
            parse_command("  daily post funny "),
            ShellCommand::Message("daily post funny")
        );
    }

    #[test]
    fn parses_rfc3339_and_local_times() {
        let at = parse_when("2026-11-01T09:30:00Z").unwrap();
        assert_eq!(at.to_rfc3339(), "2026-11-01T09:30:00+00:00");

        let local = parse_when("2026-11-01 09:30").unwrap();
        let expected = Local
            .with_ymd_and_hms(2026, 11, 1, 9, 30, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(local, expected);

        assert!(parse_when("next tuesday").is_err());
    }

    #[test]
    fn schedule_entry_uses_first_attachment_kind() {
        let image = AttachedMedia {
            kind: MediaKind::Image,
            media: MediaPayload::inline("image/png", "aW1hZ2U="),
        };
        let reply = reply_with("A cozy autumn story", vec![image]);
        let when = Utc::now();

        let entry = schedule_entry("evt-1", &reply, when);
        assert_eq!(entry.message_ref, "evt-1");
        assert_eq!(entry.content_type, ScheduledContentType::Image);
        assert_eq!(entry.preview, "A cozy autumn story");
        assert_eq!(entry.scheduled_for, when);
        assert_eq!(entry.payload["text"][0], "A cozy autumn story");
    }

    #[test]
    fn schedule_entry_preview_is_truncated() {
        let long = "x".repeat(200);
        let entry = schedule_entry("evt-2", &reply_with(&long, Vec::new()), Utc::now());
        assert_eq!(entry.content_type, ScheduledContentType::Text);
        assert_eq!(entry.preview.chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn attach_inlines_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"image").unwrap();

        let attachment = attachment_from(path.to_str().unwrap()).unwrap();
        assert_eq!(attachment.kind, AttachmentKind::Image);
        assert_eq!(attachment.url, "data:image/png;base64,aW1hZ2U=");

        let remote = attachment_from("https://cdn.example.com/a.jpg").unwrap();
        assert_eq!(remote.url, "https://cdn.example.com/a.jpg");
        assert!(attachment_from("").is_err());
    }

    #[test]
    fn schedule_requires_a_previous_reply_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        let mut shell = Shell {
            pipeline: None,
            schedule_path: path.clone(),
            book: ScheduleBook::default(),
            attachment: None,
            last_reply: None,
        };

        assert!(shell.schedule("2026-11-01T09:30:00Z").is_err());

        shell.last_reply = Some(("evt-3".into(), reply_with("Draft", Vec::new())));
        shell.schedule("2026-11-01T09:30:00Z").unwrap();
        let saved = ScheduleBook::load(&path).unwrap();
        assert_eq!(saved.len(), 1);

        let id = saved.upcoming()[0].id.clone();
        shell.unschedule(&id).unwrap();
        assert!(shell.unschedule(&id).is_err());
        assert!(ScheduleBook::load(&path).unwrap().is_empty());
    }

    #[tokio::test]
    async fn messages_need_a_generation_backend() {
        let mut shell = Shell {
            pipeline: None,
            schedule_path: PathBuf::from("unused.json"),
            book: ScheduleBook::default(),
            attachment: None,
            last_reply: None,
        };
        let err = shell.message("hello").await.unwrap_err();
        assert!(matches!(err, PostcraftError::Config(_)));
    }

    #[tokio::test]
    async fn messages_run_through_the_pipeline() {
        let harness = postcraft_test_utils::TestHarness::new().unwrap();
        harness.generator.push_text("Here's your daily post.").await;
        let mut shell = Shell {
            pipeline: Some(harness.pipeline.clone()),
            schedule_path: PathBuf::from("unused.json"),
            book: ScheduleBook::default(),
            attachment: None,
            last_reply: None,
        };

        shell.message("daily post").await.unwrap();
        let (_, reply) = shell.last_reply.as_ref().unwrap();
        assert!(reply.full_text().contains("Here's your daily post."));
    }
}
