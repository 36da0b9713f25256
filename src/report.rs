use crate::models::RankedRecommendation;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

/// Render a kickoff time in `tz`, e.g. `2024-01-01 12:00 UTC`
pub fn format_kickoff<Tz>(kickoff: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match kickoff {
        Some(k) => k.with_timezone(tz).format("%Y-%m-%d %H:%M %Z").to_string(),
        None => "time TBD".to_string(),
    }
}

/// One output line per recommendation
pub fn render_line<Tz>(rec: &RankedRecommendation, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let fixture = &rec.fixture;
    let mut details = vec![fixture.competition.clone(), fixture.sport.to_string()];
    if !fixture.importance.is_empty() && fixture.importance != fixture.competition {
        details.push(fixture.importance.clone());
    }

    format!(
        "{:>2}. [{:>3.0}] {} | {} | {} | {}",
        rec.rank,
        rec.score,
        rec.teams,
        details.join(" / "),
        format_kickoff(fixture.kickoff, tz),
        rec.reason,
    )
}

/// Render the full report in the configured time zone
pub fn render_report(recommendations: &[RankedRecommendation], local_time: bool) -> Vec<String> {
    if local_time {
        recommendations.iter().map(|r| render_line(r, &Local)).collect()
    } else {
        recommendations.iter().map(|r| render_line(r, &Utc)).collect()
    }
}

/// Print the report to stdout
pub fn output_report(recommendations: &[RankedRecommendation], local_time: bool) {
    for line in render_report(recommendations, local_time) {
        println!("{}", line);
    }
}
