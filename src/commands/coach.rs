use chrono::NaiveDate;
use serde::Serialize;

use super::{HealthContext, JournalError};
use crate::analysis::{current_streak, trained_yesterday};
use crate::clock::Clock;
use crate::coach::{coach_message, health_explain_text, stats_line, suggestion_line, ToneInputs};
use crate::db::{Journal, KeyValueStore};
use crate::history::HistoryInsights;
use crate::models::{CheckIn, Decision};
use crate::suggestion::{suggest, HealthSignals, Suggestion, SuggestionInput};

/// Everything shown after a check-in
#[derive(Debug, Clone, Serialize)]
pub struct CoachResponse {
  pub suggestion: Suggestion,
  pub suggestion_line: String,
  pub coach_message: String,
  pub stats_line: String,
  pub insights: HistoryInsights,
}

/// ---------------------------------------------------------------------------
/// Recommendation
/// ---------------------------------------------------------------------------

/// Turn a check-in and the user's exercise/rest choice into a plan plus the
/// supporting text. Entries and health data are only read; a missing profile
/// is written with defaults on the way.
pub async fn recommend<S: KeyValueStore>(
  journal: &Journal<S>,
  clock: &dyn Clock,
  decision: Decision,
  check_in: &CheckIn,
  window_days: u32,
) -> Result<CoachResponse, JournalError> {
  let profile = journal.profile().await?;
  let entries = journal.entries().await?;
  let health = journal.health().await?;

  let today = clock.today();
  let selected = check_in.date.unwrap_or(today);
  let ctx = HealthContext::resolve(&health, selected, window_days);

  let streak = current_streak(&entries, today);
  let yesterday = trained_yesterday(&entries, today);

  let input = SuggestionInput::build(
    profile.goal_category,
    check_in,
    HealthSignals {
      today: ctx.today.as_ref(),
      yesterday: ctx.yesterday.as_ref(),
      window: ctx.window.as_ref(),
    },
    streak,
    yesterday,
  );
  let suggestion = suggest(decision, &input);

  let insights = HistoryInsights::compute(&entries, today, ctx.used_date(), ctx.window.as_ref());
  let tone = ToneInputs {
    decision,
    style: profile.support_style,
    mood: check_in.mood,
    motivation: check_in.motivation,
    streak,
    delta_days: insights.delta_days,
  };

  let explain = health_explain_text(ctx.anchor, ctx.window.as_ref(), profile.goal_category);

  tracing::info!(
    ?decision,
    goal = profile.goal_category.as_str(),
    reason = ?suggestion.reason,
    streak,
    "Suggestion ready"
  );

  Ok(CoachResponse {
    suggestion_line: suggestion_line(&profile, suggestion.plan, &explain),
    coach_message: coach_message(&format!("Today plan: {}", suggestion.plan), &tone),
    stats_line: stats_line(&insights),
    suggestion,
    insights,
  })
}

/// ---------------------------------------------------------------------------
/// Insights
/// ---------------------------------------------------------------------------

pub async fn insights<S: KeyValueStore>(
  journal: &Journal<S>,
  clock: &dyn Clock,
  selected: Option<NaiveDate>,
  window_days: u32,
) -> Result<HistoryInsights, JournalError> {
  let entries = journal.entries().await?;
  let health = journal.health().await?;

  let today = clock.today();
  let ctx = HealthContext::resolve(&health, selected.unwrap_or(today), window_days);

  Ok(HistoryInsights::compute(&entries, today, ctx.used_date(), ctx.window.as_ref()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{ENTRIES_KEY, HEALTH_KEY, PROFILE_KEY};
  use crate::models::{GoalCategory, HealthStore, Mood, Profile, SupportStyle};
  use crate::suggestion::{recovery_plan, SuggestionReason};
  use crate::test_utils::{date, exercised_entry, fixed_clock, health_day, memory_journal};

  #[tokio::test]
  async fn test_rest_request_returns_recovery_plan() {
    let journal = memory_journal();
    let clock = fixed_clock("2025-04-10");

    let response = recommend(&journal, &clock, Decision::Rest, &CheckIn::default(), 7)
      .await
      .unwrap();

    assert_eq!(response.suggestion.reason, SuggestionReason::RestRequested);
    assert_eq!(response.suggestion.plan, recovery_plan(GoalCategory::LookFit));
    assert_eq!(response.suggestion_line, response.suggestion.plan);
    assert!(response
      .coach_message
      .ends_with("Resting today is valid. You are still building progress through recovery."));
  }

  #[tokio::test]
  async fn test_recommend_only_writes_a_missing_profile() {
    let journal = memory_journal();
    let clock = fixed_clock("2025-04-10");

    recommend(&journal, &clock, Decision::Exercise, &CheckIn::default(), 7)
      .await
      .unwrap();

    assert!(journal.store().get(PROFILE_KEY).await.unwrap().is_some());
    assert!(journal.store().get(ENTRIES_KEY).await.unwrap().is_none());
    assert!(journal.store().get(HEALTH_KEY).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_poor_sleep_forces_recovery() {
    let journal = memory_journal();
    let clock = fixed_clock("2025-04-10");
    let check_in = CheckIn {
      sleep_hours: Some(5.0),
      energy: Some(8.0),
      ..CheckIn::default()
    };

    let response = recommend(&journal, &clock, Decision::Exercise, &check_in, 7)
      .await
      .unwrap();
    assert!(matches!(response.suggestion.reason, SuggestionReason::Recovery(_)));
  }

  #[tokio::test]
  async fn test_response_text_uses_profile_and_health() {
    let journal = memory_journal();
    journal
      .set_profile(&Profile {
        name: "Ana".to_string(),
        goal_category: GoalCategory::HalfMarathon,
        support_style: SupportStyle::Direct,
        ..Profile::default()
      })
      .await
      .unwrap();

    let mut health = HealthStore::new();
    health.insert(date("2025-04-09"), health_day(7000.0, 0.0, 0, 0.0));
    journal.set_health(&health).await.unwrap();
    journal
      .set_entries(&[exercised_entry("2025-04-09", 40), exercised_entry("2025-04-10", 30)])
      .await
      .unwrap();

    let clock = fixed_clock("2025-04-10");
    let check_in = CheckIn {
      date: Some(date("2025-04-10")),
      sleep_hours: Some(8.0),
      energy: Some(7.0),
      soreness: Some(2.0),
      mood: Mood::Good,
      motivation: 8.0,
    };

    let response = recommend(&journal, &clock, Decision::Exercise, &check_in, 7)
      .await
      .unwrap();

    assert!(response.suggestion_line.starts_with("Ana, "));
    assert!(response.suggestion_line.contains(
      " Using latest imported date 2025-04-09 (no data on selected date 2025-04-10). Goal: Run Half Marathon / 半马. Last 7d avg steps: 1000; workout minutes: 0."
    ));
    assert!(response.coach_message.starts_with("Today plan: "));
    assert!(response
      .coach_message
      .ends_with("You are ready. Execute the plan and keep the quality high."));
    assert_eq!(response.insights.streak, 2);
    assert!(response.stats_line.ends_with("Streak: 2 day(s)."));
  }

  #[tokio::test]
  async fn test_insights_without_health_only_report_streak() {
    let journal = memory_journal();
    journal
      .set_entries(&[exercised_entry("2025-04-10", 30)])
      .await
      .unwrap();

    let result = insights(&journal, &fixed_clock("2025-04-10"), None, 7).await.unwrap();
    assert_eq!(result.streak, 1);
    assert_eq!(result.last7.days, 0);
    assert_eq!(result.delta_minutes, 0.0);
  }

  #[tokio::test]
  async fn test_insights_compare_weeks() {
    let journal = memory_journal();
    let mut health = HealthStore::new();
    health.insert(date("2025-04-14"), health_day(7000.0, 30.0, 1, 30.0));
    journal.set_health(&health).await.unwrap();
    journal
      .set_entries(&[
        exercised_entry("2025-04-14", 30),
        exercised_entry("2025-04-12", 45),
        exercised_entry("2025-04-05", 20),
      ])
      .await
      .unwrap();

    let result = insights(&journal, &fixed_clock("2025-04-14"), None, 7).await.unwrap();
    assert_eq!(result.last7.days, 2);
    assert_eq!(result.last7.minutes, 75.0);
    assert_eq!(result.prev7.days, 1);
    assert_eq!(result.delta_days, 1);
    assert_eq!(result.delta_minutes, 55.0);
    assert_eq!(result.avg_steps, 1000);
    assert_eq!(result.run_min, 30);
  }
}
