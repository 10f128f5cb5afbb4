//! Weekly board, digest, overdue list and meeting log.

use super::context::BotContext;
use super::error::HandlerResult;
use super::feedback::{Effect, FeedbackLog};
use super::keyboards;
use super::listing::TaskLine;
use crate::conversation::domain::Reply;
use crate::directory::domain::ExternalUserId;
use crate::task::domain::{ChatId, TaskStatus};
use crate::task::ports::TaskFilter;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use minijinja::context;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusGroup {
    emoji: &'static str,
    label: &'static str,
    tasks: Vec<TaskLine>,
}

#[derive(Debug, Serialize)]
struct MeetingLine {
    held_at: String,
    summary: String,
}

/// Start of the ISO week containing `now`: Monday 00:00 UTC.
#[must_use]
pub(super) fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let offset = Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (today - offset).and_time(NaiveTime::MIN).and_utc()
}

const fn group_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "TODO",
        TaskStatus::Doing => "В работе",
        TaskStatus::Blocked => "Заблокировано",
        TaskStatus::Done => "Готово",
    }
}

impl BotContext {
    /// Answers `/week`, `/digest`, `/overdue`, `/meeting` and `/meetings`.
    pub(super) async fn handle_planning(
        &self,
        chat_id: ChatId,
        author: ExternalUserId,
        name: &str,
        args: &str,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let (text, effect) = match name {
            "week" => (self.weekly_board().await?, Effect::ReportShown),
            "digest" => (self.weekly_digest().await?, Effect::ReportShown),
            "overdue" => (self.overdue_report().await?, Effect::ReportShown),
            "meetings" => (self.meeting_history().await?, Effect::ReportShown),
            "meeting" if args.trim().is_empty() => (
                self.templates.render("meeting.usage", context! {})?,
                Effect::ReportShown,
            ),
            "meeting" => {
                let meeting = self.meetings.record(args, Some(author)).await?;
                let text = self
                    .templates
                    .render("meeting.recorded", context! { summary => meeting.summary() })?;
                (text, Effect::MeetingRecorded(meeting.id()))
            }
            _ => return Ok(Effect::Ignored),
        };
        log.send(chat_id, &Reply::text(text)).await;
        Ok(effect)
    }

    async fn weekly_board(&self) -> HandlerResult<String> {
        let since = week_start(self.clock.utc());
        let tasks = self
            .tasks
            .list(&TaskFilter::all().created_since(since))
            .await?;
        let groups: Vec<StatusGroup> = TaskStatus::ALL
            .into_iter()
            .map(|status| StatusGroup {
                emoji: keyboards::status_emoji(status),
                label: group_label(status),
                tasks: tasks
                    .iter()
                    .filter(|task| task.status() == status)
                    .map(TaskLine::from_task)
                    .collect(),
            })
            .filter(|group| !group.tasks.is_empty())
            .collect();
        Ok(self.templates.render(
            "planning.week",
            context! { since => since.format("%d.%m").to_string(), groups => groups },
        )?)
    }

    async fn weekly_digest(&self) -> HandlerResult<String> {
        let now = self.clock.utc();
        let since = week_start(now);
        let this_week = self
            .tasks
            .list(&TaskFilter::all().created_since(since))
            .await?;
        let count = |status: TaskStatus| {
            this_week
                .iter()
                .filter(|task| task.status() == status)
                .count()
        };
        let overdue = self
            .tasks
            .list(&TaskFilter::all())
            .await?
            .iter()
            .filter(|task| task.is_overdue(now))
            .count();
        Ok(self.templates.render(
            "planning.digest",
            context! {
                since => since.format("%d.%m").to_string(),
                created => this_week.len(),
                done => count(TaskStatus::Done),
                doing => count(TaskStatus::Doing),
                blocked => count(TaskStatus::Blocked),
                overdue => overdue,
            },
        )?)
    }

    async fn overdue_report(&self) -> HandlerResult<String> {
        let now = self.clock.utc();
        let lines: Vec<TaskLine> = self
            .tasks
            .list(&TaskFilter::all())
            .await?
            .iter()
            .filter(|task| task.is_overdue(now))
            .map(TaskLine::from_task)
            .collect();
        Ok(self
            .templates
            .render("planning.overdue", context! { tasks => lines })?)
    }

    async fn meeting_history(&self) -> HandlerResult<String> {
        let meetings: Vec<MeetingLine> = self
            .meetings
            .recent(self.config.listing.recent_meetings)
            .await?
            .iter()
            .map(|meeting| MeetingLine {
                held_at: meeting.held_at().format("%d.%m.%Y %H:%M").to_string(),
                summary: meeting.summary().to_owned(),
            })
            .collect();
        Ok(self
            .templates
            .render("meeting.list", context! { meetings => meetings })?)
    }
}

#[cfg(test)]
mod tests {
    use super::week_start;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    #[case(Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0))]
    #[case(Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0))]
    #[case(Utc.with_ymd_and_hms(2026, 3, 15, 23, 59, 59))]
    fn week_starts_on_monday_midnight(
        #[case] timestamp: chrono::LocalResult<chrono::DateTime<Utc>>,
    ) {
        let now = timestamp.single().expect("valid timestamp");
        let expected = Utc
            .with_ymd_and_hms(2026, 3, 9, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(week_start(now), expected);
    }
}
