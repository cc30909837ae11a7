//! ui::render
//!
//! Turns engine events into terminal text.
//!
//! [`render`] is pure: it maps one [`Event`] to leveled lines, so wording
//! can be tested without capturing stdout. [`TerminalSink`] prints those
//! lines through the [`output`](super::output) helpers as events arrive.

use std::fmt::Write as _;

use crate::core::queue::QueueRecord;
use crate::engine::{Event, EventSink, QueueReason, StatusSummary, Unpushed};

use super::output::{self, Verbosity};

/// How a line is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// One line of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub level: Level,
    pub text: String,
}

impl Line {
    fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Render one event.
pub fn render(event: &Event) -> Vec<Line> {
    match event {
        Event::OutsideWorkHours { now, window } => vec![Line::new(
            Level::Warn,
            format!(
                "outside scheduled work hours ({}), it is {}; proceeding anyway",
                window,
                now.time_of_day()
            ),
        )],

        Event::Pushed { at, message } => vec![Line::new(
            Level::Success,
            format!("{} - Committed & pushed: {}", at.time_of_day(), message.summary()),
        )],

        Event::Queued {
            record,
            reason,
            pending,
        } => {
            let why = match reason {
                QueueReason::Offline => "offline".to_string(),
                QueueReason::Backlog => "waiting behind queued commits".to_string(),
                QueueReason::PushFailed(failure) => format!("committed locally, push failed: {}", failure),
            };
            vec![Line::new(
                Level::Warn,
                format!(
                    "Commit queued ({}): {} [{} pending]",
                    why,
                    record.message().summary(),
                    pending
                ),
            )]
        }

        Event::CommitFailed { message, error } => vec![Line::new(
            Level::Error,
            format!("could not commit '{}': {}", message.summary(), error),
        )],

        Event::DrainSkippedOffline { pending } => vec![Line::new(
            Level::Warn,
            format!("offline; {} queued commit(s) left for the next run", pending),
        )],

        Event::ReplayNothingToCommit { record } => vec![Line::new(
            Level::Warn,
            format!(
                "queued commit '{}' had no changes left to commit; pushing only",
                record.message().summary()
            ),
        )],

        Event::ReplayPushed { record } => vec![Line::new(
            Level::Success,
            format!(
                "{} - Pushed queued commit: {}",
                record.enqueued_at(),
                record.message().summary()
            ),
        )],

        Event::DrainHalted {
            record,
            reason,
            remaining,
        } => vec![Line::new(
            Level::Warn,
            format!(
                "stopped replaying at '{}': {}; {} commit(s) still queued",
                record.message().summary(),
                reason,
                remaining
            ),
        )],

        Event::DrainCompleted { pushed } => vec![Line::new(
            Level::Success,
            format!("Queue drained: {} commit(s) pushed", pushed),
        )],

        Event::QueueListing { records } => {
            if records.is_empty() {
                vec![Line::new(Level::Success, "No queued commits")]
            } else {
                vec![Line::new(Level::Info, queue_table(records))]
            }
        }

        Event::Status(summary) => render_status(summary),

        Event::RepositoryInitialized { path } => vec![Line::new(
            Level::Success,
            format!("Initialized new Git repo in {}", path.display()),
        )],

        Event::RepositoryAlreadyExists { path } => vec![Line::new(
            Level::Info,
            format!("Git repo already exists at {}", path.display()),
        )],
    }
}

fn render_status(summary: &StatusSummary) -> Vec<Line> {
    if summary.is_fully_synced() {
        return vec![Line::new(Level::Success, "All changes fully pushed to remote")];
    }

    let mut lines = Vec::new();

    if !summary.uncommitted.is_empty() {
        lines.push(Line::new(
            Level::Warn,
            format!(
                "Changed but not committed:\n{}",
                output::format_list(&summary.uncommitted, "  ")
            ),
        ));
    }

    match &summary.unpushed {
        Unpushed::Known(commits) if commits.is_empty() => {}
        Unpushed::Known(commits) => {
            let items: Vec<String> = commits
                .iter()
                .map(|c| format!("{} {}", c.oid.short(7), c.summary))
                .collect();
            lines.push(Line::new(
                Level::Warn,
                format!("Commits not pushed:\n{}", output::format_list(&items, "  ")),
            ));
        }
        Unpushed::FetchFailed(failure) => lines.push(Line::new(
            Level::Error,
            format!(
                "Failed to fetch remote ({}); unpushed commits unknown. Check network or remote URL",
                failure
            ),
        )),
    }

    if !summary.queued.is_empty() {
        let items: Vec<&str> = summary
            .queued
            .iter()
            .map(|r| r.message().summary())
            .collect();
        lines.push(Line::new(
            Level::Warn,
            format!("Queued commits (offline):\n{}", output::format_list(&items, "  ")),
        ));
    }

    lines
}

/// Tabular dump of the queue: time, message and comma-joined files.
pub fn queue_table(records: &[QueueRecord]) -> String {
    const HEADERS: [&str; 3] = ["Time", "Message", "Files"];

    let rows: Vec<[String; 3]> = records
        .iter()
        .map(|r| {
            let files: Vec<&str> = r.files().iter().map(|f| f.as_str()).collect();
            [
                r.enqueued_at().to_string(),
                r.message().summary().to_string(),
                files.join(", "),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::from("Queued Commits (Offline)\n");
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    // drop the final newline; callers print with println
    out.pop();
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize; 3]) {
    let last = cells.len() - 1;
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            let _ = write!(out, "{}", cell);
        } else {
            let _ = write!(out, "{:<width$}  ", cell, width = width);
        }
    }
    out.push('\n');
}

/// Prints events to the terminal as they are emitted.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSink {
    verbosity: Verbosity,
}

impl TerminalSink {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl EventSink for TerminalSink {
    fn emit(&mut self, event: Event) {
        output::debug(format!("{:?}", event), self.verbosity);
        for line in render(&event) {
            match line.level {
                Level::Info => output::print(&line.text, self.verbosity),
                Level::Success => output::success(&line.text, self.verbosity),
                Level::Warn => output::warn(&line.text, self.verbosity),
                Level::Error => output::error(&line.text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CommitMessage, Oid, QueueTimestamp, RepoPath};
    use crate::git::{CommitSummary, FailureKind, RemoteFailure};

    fn record(message: &str, files: &[&str]) -> QueueRecord {
        QueueRecord::new(
            CommitMessage::new(message).unwrap(),
            files.iter().map(|f| RepoPath::new(*f).unwrap()).collect(),
            QueueTimestamp::parse("2025-02-10 09:30:00").unwrap(),
        )
        .unwrap()
    }

    fn texts(event: &Event) -> Vec<String> {
        render(event).into_iter().map(|l| l.text).collect()
    }

    #[test]
    fn queued_and_pushed_are_distinguishable() {
        let pushed = render(&Event::Pushed {
            at: QueueTimestamp::parse("2025-02-10 10:00:00").unwrap(),
            message: CommitMessage::new("fix bug").unwrap(),
        });
        let queued = render(&Event::Queued {
            record: record("fix bug", &["a.py"]),
            reason: QueueReason::Offline,
            pending: 1,
        });

        assert_eq!(pushed[0].level, Level::Success);
        assert_eq!(pushed[0].text, "10:00:00 - Committed & pushed: fix bug");
        assert_eq!(queued[0].level, Level::Warn);
        assert!(queued[0].text.contains("queued (offline)"));
    }

    #[test]
    fn push_failure_reason_is_shown() {
        let lines = texts(&Event::Queued {
            record: record("B", &["y"]),
            reason: QueueReason::PushFailed(RemoteFailure::new(FailureKind::Auth, "denied")),
            pending: 2,
        });
        assert!(lines[0].contains("auth failure: denied"));
        assert!(lines[0].contains("2 pending"));
    }

    #[test]
    fn backlog_reason_is_shown() {
        let lines = texts(&Event::Queued {
            record: record("C", &["z"]),
            reason: QueueReason::Backlog,
            pending: 3,
        });
        assert_eq!(
            lines,
            vec!["Commit queued (waiting behind queued commits): C [3 pending]"]
        );
    }

    #[test]
    fn empty_queue_listing() {
        assert_eq!(
            texts(&Event::QueueListing { records: vec![] }),
            vec!["No queued commits"]
        );
    }

    #[test]
    fn queue_table_aligns_columns() {
        let table = queue_table(&[record("fix bug", &["a.py", "b.py"]), record("B", &["y"])]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Queued Commits (Offline)");
        assert_eq!(lines[1], "Time                 Message  Files");
        assert_eq!(lines[3], "2025-02-10 09:30:00  fix bug  a.py, b.py");
        assert_eq!(lines[4], "2025-02-10 09:30:00  B        y");
    }

    #[test]
    fn synced_status() {
        let summary = StatusSummary {
            uncommitted: vec![],
            unpushed: Unpushed::Known(vec![]),
            queued: vec![],
        };
        assert_eq!(
            texts(&Event::Status(summary)),
            vec!["All changes fully pushed to remote"]
        );
    }

    #[test]
    fn status_enumerates_each_nonempty_set() {
        let summary = StatusSummary {
            uncommitted: vec![RepoPath::new("a.py").unwrap()],
            unpushed: Unpushed::Known(vec![CommitSummary {
                oid: Oid::new("abcdef1234567890abcdef1234567890abcdef12").unwrap(),
                summary: "local work".to_string(),
            }]),
            queued: vec![record("offline work", &["b.py"])],
        };

        let lines = texts(&Event::Status(summary));
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("a.py"));
        assert!(lines[1].contains("abcdef1 local work"));
        assert!(lines[2].contains("offline work"));
    }

    #[test]
    fn fetch_failure_is_an_error_line() {
        let summary = StatusSummary {
            uncommitted: vec![],
            unpushed: Unpushed::FetchFailed(RemoteFailure::new(FailureKind::Network, "no route")),
            queued: vec![],
        };
        let lines = render(&Event::Status(summary));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, Level::Error);
        assert!(lines[0].text.contains("Failed to fetch remote"));
    }
}
