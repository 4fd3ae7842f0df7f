//! Text, markdown and JSON rendering of snapshot views.
//!
//! Rendering is pure: nothing here mutates a snapshot or touches the store.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::engine::{CompletionOutcome, DailySummary, FeedbackOutcome, FeedbackReportEntry};
use crate::error::{CoreError, Result};
use crate::habit::{FeedbackEntry, FeedbackKind, HabitRecord};

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl FromStr for ReportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown format '{other}', expected one of: text, markdown, json"
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Text => "text",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        })
    }
}

/// One habit as listed by the JSON status view. Records read from sparse
/// files still report every field here.
#[derive(Debug, Serialize)]
struct StatusRow<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    frequency: &'a str,
    weight: f64,
    streak: u32,
    last_completed: Option<DateTime<Utc>>,
    positive: u32,
    negative: u32,
}

impl<'a> From<&'a HabitRecord> for StatusRow<'a> {
    fn from(h: &'a HabitRecord) -> Self {
        Self {
            id: &h.id,
            name: &h.name,
            description: &h.description,
            frequency: h.frequency.as_str(),
            weight: h.weight,
            streak: h.streak,
            last_completed: h.last_completed,
            positive: h.feedback.positive,
            negative: h.feedback.negative,
        }
    }
}

/// Renders views in one format, showing timestamps at a fixed offset.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    format: ReportFormat,
    utc_offset: FixedOffset,
}

impl ReportRenderer {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            utc_offset: Utc.fix(),
        }
    }

    pub fn with_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn timestamp(&self, ts: Option<DateTime<Utc>>) -> String {
        ts.map(|ts| ts.with_timezone(&self.utc_offset).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string())
    }

    /// Habits in the given order (callers pass them heaviest first).
    pub fn render_status(&self, habits: &[&HabitRecord]) -> Result<String> {
        match self.format {
            ReportFormat::Json => {
                let rows: Vec<StatusRow<'_>> = habits.iter().map(|h| StatusRow::from(*h)).collect();
                Self::json(&rows)
            }
            ReportFormat::Text => {
                if habits.is_empty() {
                    return Ok("No habits tracked yet.".to_string());
                }
                let mut lines = vec![format!("Habits ({})", habits.len())];
                for h in habits {
                    lines.push(format!(
                        "  {:>4.2}  {:<20} streak {:<4} last {:<16}  {}",
                        h.weight,
                        h.id,
                        h.streak,
                        self.timestamp(h.last_completed),
                        h.name
                    ));
                }
                Ok(lines.join("\n"))
            }
            ReportFormat::Markdown => {
                let mut lines = vec![
                    "## Habits".to_string(),
                    String::new(),
                    "| Habit | Frequency | Weight | Streak | Last completed |".to_string(),
                    "|-------|-----------|--------|--------|----------------|".to_string(),
                ];
                for h in habits {
                    lines.push(format!(
                        "| {} (`{}`) | {} | {:.2} | {} | {} |",
                        h.name,
                        h.id,
                        h.frequency,
                        h.weight,
                        h.streak,
                        self.timestamp(h.last_completed)
                    ));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    pub fn render_summary(&self, summary: &DailySummary) -> Result<String> {
        let leader = summary
            .streak_leader
            .as_ref()
            .map(|l| format!("{} ({}) with {}", l.name, l.id, l.streak))
            .unwrap_or_else(|| "none".to_string());

        match self.format {
            ReportFormat::Json => Self::json(summary),
            ReportFormat::Text => Ok([
                format!("Daily summary for {}", summary.date),
                format!(
                    "  Completion rate: {:.1}% ({}/{} daily habits)",
                    summary.completion_percent(),
                    summary.completed_today,
                    summary.daily_habits
                ),
                format!("  Average weight:  {:.2}", summary.average_weight),
                format!("  Streak leader:   {leader}"),
                format!("  Habits tracked:  {}", summary.total_habits),
            ]
            .join("\n")),
            ReportFormat::Markdown => Ok([
                format!("## Daily summary ({})", summary.date),
                String::new(),
                format!(
                    "- **Completion rate:** {:.1}% ({}/{})",
                    summary.completion_percent(),
                    summary.completed_today,
                    summary.daily_habits
                ),
                format!("- **Average weight:** {:.2}", summary.average_weight),
                format!("- **Streak leader:** {leader}"),
                format!("- **Habits tracked:** {}", summary.total_habits),
            ]
            .join("\n")),
        }
    }

    fn feedback_line(&self, entry: &FeedbackEntry) -> String {
        let sign = match entry.kind {
            FeedbackKind::Positive => "+",
            FeedbackKind::Negative => "-",
        };
        match &entry.note {
            Some(note) => format!("{sign} {} {note}", self.timestamp(Some(entry.timestamp))),
            None => format!("{sign} {}", self.timestamp(Some(entry.timestamp))),
        }
    }

    pub fn render_feedback_report(&self, entries: &[FeedbackReportEntry]) -> Result<String> {
        match self.format {
            ReportFormat::Json => Self::json(entries),
            ReportFormat::Text => {
                if entries.is_empty() {
                    return Ok("No feedback recorded yet.".to_string());
                }
                let mut lines = vec!["Feedback report".to_string()];
                for e in entries {
                    lines.push(format!(
                        "  {} ({}): +{} / -{}  score {:+.2}  weight {:.2}",
                        e.name, e.id, e.positive, e.negative, e.score, e.weight
                    ));
                    for recent in &e.recent {
                        lines.push(format!("      {}", self.feedback_line(recent)));
                    }
                }
                Ok(lines.join("\n"))
            }
            ReportFormat::Markdown => {
                let mut lines = vec!["## Feedback report".to_string()];
                if entries.is_empty() {
                    lines.push(String::new());
                    lines.push("_No feedback recorded yet._".to_string());
                }
                for e in entries {
                    lines.push(String::new());
                    lines.push(format!("### {} (`{}`)", e.name, e.id));
                    lines.push(String::new());
                    lines.push(format!(
                        "Positive: {} | Negative: {} | Score: {:+.2} | Weight: {:.2}",
                        e.positive, e.negative, e.score, e.weight
                    ));
                    if !e.recent.is_empty() {
                        lines.push(String::new());
                        for recent in &e.recent {
                            lines.push(format!("- {}", self.feedback_line(recent)));
                        }
                    }
                }
                Ok(lines.join("\n"))
            }
        }
    }

    pub fn render_completion(&self, outcome: &CompletionOutcome) -> Result<String> {
        match self.format {
            ReportFormat::Json => Self::json(outcome),
            ReportFormat::Text | ReportFormat::Markdown => Ok(format!(
                "Completed {} ({}): streak {}, weight {:.2}",
                outcome.name, outcome.id, outcome.streak, outcome.weight
            )),
        }
    }

    pub fn render_feedback(&self, outcome: &FeedbackOutcome) -> Result<String> {
        match self.format {
            ReportFormat::Json => Self::json(outcome),
            ReportFormat::Text | ReportFormat::Markdown => Ok(format!(
                "Logged {} feedback for {} ({}): weight {:.2}, score {:+.2} ({:.0}% positive)",
                outcome.kind,
                outcome.name,
                outcome.id,
                outcome.weight,
                outcome.score,
                (outcome.score + 1.0) * 50.0
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HabitEngine, StreakLeader};
    use crate::snapshot::Snapshot;
    use chrono::{NaiveDate, TimeZone};

    fn summary() -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            total_habits: 10,
            daily_habits: 10,
            completed_today: 3,
            completion_rate: 0.3,
            average_weight: 1.234,
            streak_leader: Some(StreakLeader {
                id: "diary".into(),
                name: "Diary".into(),
                streak: 4,
            }),
        }
    }

    #[test]
    fn parses_formats() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!(matches!(
            "html".parse::<ReportFormat>(),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn summary_text_shows_rate_and_leader() {
        let text = ReportRenderer::new(ReportFormat::Text).render_summary(&summary()).unwrap();
        assert!(text.contains("Completion rate: 30.0% (3/10 daily habits)"));
        assert!(text.contains("Average weight:  1.23"));
        assert!(text.contains("Diary (diary) with 4"));
    }

    #[test]
    fn summary_markdown_uses_heading() {
        let md = ReportRenderer::new(ReportFormat::Markdown).render_summary(&summary()).unwrap();
        assert!(md.starts_with("## Daily summary (2026-10-19)"));
        assert!(md.contains("- **Completion rate:** 30.0% (3/10)"));
    }

    #[test]
    fn summary_json_is_parseable() {
        let json = ReportRenderer::new(ReportFormat::Json).render_summary(&summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["completed_today"], 3);
        assert_eq!(value["streak_leader"]["id"], "diary");
    }

    #[test]
    fn status_lists_habits_in_given_order() {
        let mut snapshot = Snapshot::new();
        let mut heavy = HabitRecord::new("heavy", "Heavy habit");
        heavy.weight = 2.5;
        heavy.last_completed = Some(Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap());
        snapshot.insert_habit(HabitRecord::new("light", "Light habit")).unwrap();
        snapshot.insert_habit(heavy).unwrap();

        let view = HabitEngine::new().status_view(&snapshot);
        let text = ReportRenderer::new(ReportFormat::Text).render_status(&view).unwrap();
        let heavy_pos = text.find("heavy").unwrap();
        let light_pos = text.find("light").unwrap();
        assert!(heavy_pos < light_pos);
        assert!(text.contains("2026-10-19 08:30"));

        let shifted = ReportRenderer::new(ReportFormat::Markdown)
            .with_offset(FixedOffset::east_opt(3600).unwrap())
            .render_status(&view)
            .unwrap();
        assert!(shifted.contains("| Heavy habit (`heavy`) | daily | 2.50 | 0 | 2026-10-19 09:30 |"));
    }

    #[test]
    fn status_json_includes_ids_of_sparse_records() {
        let mut snapshot: Snapshot =
            serde_json::from_str(r#"{"habits":{"diary":{"name":"Diary","weight":1.5}}}"#).unwrap();
        snapshot.fill_missing_ids();

        let view = HabitEngine::new().status_view(&snapshot);
        let json = ReportRenderer::new(ReportFormat::Json).render_status(&view).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows[0]["id"], "diary");
        assert_eq!(rows[0]["frequency"], "daily");
        assert_eq!(rows[0]["weight"], 1.5);
    }

    #[test]
    fn empty_views_render_placeholders() {
        let renderer = ReportRenderer::new(ReportFormat::Text);
        assert_eq!(renderer.render_status(&[]).unwrap(), "No habits tracked yet.");
        assert_eq!(renderer.render_feedback_report(&[]).unwrap(), "No feedback recorded yet.");
        assert_eq!(
            ReportRenderer::new(ReportFormat::Json).render_status(&[]).unwrap(),
            "[]"
        );
    }

    #[test]
    fn feedback_report_includes_recent_notes() {
        let engine = HabitEngine::new();
        let mut snapshot = Snapshot::new();
        snapshot.insert_habit(HabitRecord::new("memory-check", "Memory check")).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        engine
            .log_feedback(&mut snapshot, "memory-check", FeedbackKind::Negative, Some("forgot".into()), now)
            .unwrap();

        let report = engine.feedback_report(&snapshot);
        let text = ReportRenderer::new(ReportFormat::Text).render_feedback_report(&report).unwrap();
        assert!(text.contains("Memory check (memory-check): +0 / -1  score -1.00  weight 0.90"));
        assert!(text.contains("- 2026-10-19 09:00 forgot"));
    }
}
