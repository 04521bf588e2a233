//! Daily trigger.
//!
//! The cycle runs every day at the configured local time. On Saturdays and
//! Sundays the result is kept but nobody is notified.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Weekday};

use crate::bot::{Channel, SharedContext, send_all};

/// Today's date in the local time zone.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Next instant strictly after `now` whose wall-clock time is `time`.
///
/// Days where `time` does not exist (DST gap) are skipped.
pub fn next_trigger<Tz: TimeZone>(now: &DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    for offset in 0..=2 {
        let Some(date) = today.checked_add_days(Days::new(offset)) else {
            break;
        };
        if let Some(candidate) = tz.from_local_datetime(&date.and_time(time)).earliest() {
            if candidate > *now {
                return candidate;
            }
        }
    }

    now.clone() + TimeDelta::days(1)
}

/// Whether a cycle run on `date` should notify the channel.
#[must_use]
pub fn is_notification_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Run one cycle for `today` under the context lock, then notify if the day allows it.
///
/// Returns whether the notification went out.
pub async fn run_scheduled_cycle(ctx: &SharedContext, channel: &dyn Channel, today: NaiveDate) -> bool {
    let (messages, limit) = {
        let mut guard = ctx.lock().await;
        let messages = guard.fetch(today).await;
        (messages, guard.settings().message_limit)
    };

    if !is_notification_day(today) {
        tracing::info!(%today, "Weekend, notification suppressed");
        return false;
    }

    send_all(channel, &messages, limit).await;
    true
}

/// Sleep until each daily trigger and run the cycle; never returns.
pub async fn run_daily(ctx: SharedContext, channel: Arc<dyn Channel>, time: NaiveTime) {
    loop {
        let now = Local::now();
        let next = next_trigger(&now, time);
        let wait = (next - now).to_std().unwrap_or_default();

        tracing::info!(next = %next.to_rfc3339(), wait_secs = wait.as_secs(), "Next fetch scheduled");
        tokio::time::sleep(wait).await;

        run_scheduled_cycle(&ctx, channel.as_ref(), next.date_naive()).await;
    }
}
