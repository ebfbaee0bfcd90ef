//! Rule-based exercise/rest suggestion engine
//!
//! A fixed, auditable table rather than a model:
//! - Rest requested -> the goal's recovery plan.
//! - Exercise requested -> recovery guards are evaluated in priority order and
//!   the first one that fires routes to the same recovery plan. Recovery always
//!   outranks training, whatever the goal.
//! - Otherwise the goal's training table is walked top to bottom; first match
//!   wins, and every table ends in an unconditional fallback.
//!
//! Every function here is total. Missing inputs arrive as 0, which simply
//! keeps the corresponding guard from firing.

use serde::Serialize;

use crate::analysis::WindowSummary;
use crate::models::health::finite_or_zero;
use crate::models::{CheckIn, Decision, GoalCategory, HealthDay};

/// ---------------------------------------------------------------------------
/// Inputs
/// ---------------------------------------------------------------------------

/// Everything the rule table looks at, already coerced to plain numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionInput {
  pub goal: GoalCategory,
  pub sleep_hours: f64,
  pub energy: f64,
  pub soreness: f64,
  pub streak: u32,
  pub trained_yesterday: bool,
  pub steps_today: f64,
  pub yesterday_workout_min: f64,
  pub recent_avg_steps: f64,
  pub recent_workout_min: f64,
  pub recent_workout_days: u32,
  pub recent_run_min: f64,
}

/// Health data available for a suggestion; every piece may be absent
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthSignals<'a> {
  pub today: Option<&'a HealthDay>,
  pub yesterday: Option<&'a HealthDay>,
  pub window: Option<&'a WindowSummary>,
}

impl SuggestionInput {
  pub fn build(
    goal: GoalCategory,
    check_in: &CheckIn,
    health: HealthSignals<'_>,
    streak: u32,
    trained_yesterday: bool,
  ) -> Self {
    let coerce = |v: Option<f64>| v.map(finite_or_zero).unwrap_or(0.0);

    Self {
      goal,
      sleep_hours: coerce(check_in.sleep_hours),
      energy: coerce(check_in.energy),
      soreness: coerce(check_in.soreness),
      streak,
      trained_yesterday,
      steps_today: health.today.map(HealthDay::steps).unwrap_or(0.0),
      yesterday_workout_min: health.yesterday.map(HealthDay::workout_min).unwrap_or(0.0),
      recent_avg_steps: coerce(health.window.map(|w| w.avg_steps)),
      recent_workout_min: coerce(health.window.map(|w| w.total_workout_min)),
      recent_workout_days: health.window.map(|w| w.workout_days).unwrap_or(0),
      recent_run_min: coerce(health.window.map(|w| w.total_run_min)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Recovery Guards
/// ---------------------------------------------------------------------------

/// A condition that forces a recovery plan on an exercise day
pub struct RecoveryGuard {
  /// 1 = evaluated first
  pub priority: u8,
  pub name: &'static str,
  pub applies: fn(&SuggestionInput) -> bool,
}

pub static RECOVERY_GUARDS: &[RecoveryGuard] = &[
  RecoveryGuard {
    priority: 1,
    name: "poor_sleep",
    applies: |i| i.sleep_hours > 0.0 && i.sleep_hours < 6.0,
  },
  RecoveryGuard {
    priority: 2,
    name: "high_soreness",
    applies: |i| i.soreness >= 7.0,
  },
  RecoveryGuard {
    priority: 3,
    name: "low_energy",
    applies: |i| i.energy > 0.0 && i.energy <= 4.0,
  },
  RecoveryGuard {
    priority: 4,
    name: "active_streak",
    applies: |i| i.streak >= 3,
  },
  RecoveryGuard {
    priority: 5,
    name: "heavy_recent_load",
    applies: |i| {
      i.yesterday_workout_min >= 50.0
        || (i.recent_workout_min >= 210.0 && i.recent_workout_days >= 4)
    },
  },
];

/// Recovery plan for a goal; used for rest days and for every fired guard
pub fn recovery_plan(goal: GoalCategory) -> &'static str {
  match goal {
    GoalCategory::HalfMarathon => {
      "Run-focus recovery: 20-30 min easy walk or very easy jog, then calf/hip mobility."
    }
    GoalCategory::GainMuscle => {
      "Muscle-focus recovery: 25-35 min light pump or mobility, keep 3-4 reps in reserve."
    }
    GoalCategory::LookFit => "Fit/line recovery: 20-30 min incline walk + 10 min core and mobility.",
    GoalCategory::General => {
      "Recovery day: 20-30 min easy walk + mobility, then prioritize sleep and food."
    }
  }
}

/// ---------------------------------------------------------------------------
/// Training Tables
/// ---------------------------------------------------------------------------

pub struct TrainingRule {
  pub priority: u8,
  pub name: &'static str,
  pub applies: fn(&SuggestionInput) -> bool,
  pub plan: &'static str,
}

/// Ordered rules for one goal plus the plan used when none match
pub struct TrainingTable {
  pub rules: &'static [TrainingRule],
  pub fallback_name: &'static str,
  pub fallback_plan: &'static str,
}

static HALF_MARATHON_TABLE: TrainingTable = TrainingTable {
  rules: &[
    TrainingRule {
      priority: 1,
      name: "half_marathon_base",
      applies: |i| i.recent_run_min < 60.0,
      plan: "Half-marathon build: easy run 35-50 min at conversational pace.",
    },
    TrainingRule {
      priority: 2,
      name: "half_marathon_tempo",
      applies: |i| i.recent_run_min < 120.0,
      plan: "Half-marathon progression: 10 min warm-up, then 3 x 8 min tempo with 3 min easy between.",
    },
  ],
  fallback_name: "half_marathon_long_run",
  fallback_plan: "Half-marathon endurance: long easy run 70-90 min, keep effort controlled.",
};

static GAIN_MUSCLE_TABLE: TrainingTable = TrainingTable {
  rules: &[TrainingRule {
    priority: 1,
    name: "gain_muscle_full_body",
    applies: |i| !i.trained_yesterday,
    plan: "Hypertrophy day: 55-75 min full-body (squat/hinge/push/pull), 8-12 reps, 2-4 hard sets each.",
  }],
  fallback_name: "gain_muscle_split",
  fallback_plan: "Split day: 45-65 min upper/lower focus + 10 min accessory work (arms/shoulders/core).",
};

static LOOK_FIT_TABLE: TrainingTable = TrainingTable {
  rules: &[TrainingRule {
    priority: 1,
    name: "look_fit_low_steps",
    applies: |i| i.steps_today < 6000.0,
    plan: "Fit/line focus: 30-40 min full-body circuit + 15 min brisk walk.",
  }],
  fallback_name: "look_fit_strength_conditioning",
  fallback_plan: "Fit/line focus: 40-55 min strength + conditioning finisher (8-12 min intervals).",
};

static GENERAL_TABLE: TrainingTable = TrainingTable {
  rules: &[
    TrainingRule {
      priority: 1,
      name: "general_full_body",
      applies: |i| !i.trained_yesterday && i.recent_workout_days <= 2,
      plan: "General fitness: 40-55 min full-body strength + 10 min zone-2 cardio.",
    },
    TrainingRule {
      priority: 2,
      name: "general_low_steps",
      applies: |i| i.recent_avg_steps < 5000.0,
      plan: "General fitness: cardio day 30-45 min zone-2 jog, bike, or brisk walk.",
    },
    TrainingRule {
      priority: 3,
      name: "general_high_volume",
      applies: |i| i.recent_workout_min >= 210.0,
      plan: "General fitness: moderate day 30-40 min mixed mobility + light strength.",
    },
  ],
  fallback_name: "general_balanced",
  fallback_plan: "General fitness: balanced 30-45 min mixed training (mobility + strength/cardio).",
};

pub fn training_table(goal: GoalCategory) -> &'static TrainingTable {
  match goal {
    GoalCategory::HalfMarathon => &HALF_MARATHON_TABLE,
    GoalCategory::GainMuscle => &GAIN_MUSCLE_TABLE,
    GoalCategory::LookFit => &LOOK_FIT_TABLE,
    GoalCategory::General => &GENERAL_TABLE,
  }
}

/// ---------------------------------------------------------------------------
/// Evaluation
/// ---------------------------------------------------------------------------

/// Which row of the table produced the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rule", rename_all = "snake_case")]
pub enum SuggestionReason {
  RestRequested,
  Recovery(&'static str),
  Training(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
  pub plan: &'static str,
  pub reason: SuggestionReason,
}

impl std::fmt::Display for Suggestion {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.plan)
  }
}

/// Resolve a decision into a plan. Never fails.
pub fn suggest(decision: Decision, input: &SuggestionInput) -> Suggestion {
  if !decision.wants_exercise() {
    return Suggestion {
      plan: recovery_plan(input.goal),
      reason: SuggestionReason::RestRequested,
    };
  }

  if let Some(guard) = RECOVERY_GUARDS.iter().find(|g| (g.applies)(input)) {
    tracing::debug!(guard = guard.name, priority = guard.priority, "Recovery guard fired");
    return Suggestion {
      plan: recovery_plan(input.goal),
      reason: SuggestionReason::Recovery(guard.name),
    };
  }

  let table = training_table(input.goal);
  match table.rules.iter().find(|r| (r.applies)(input)) {
    Some(rule) => {
      tracing::debug!(rule = rule.name, priority = rule.priority, "Training rule matched");
      Suggestion {
        plan: rule.plan,
        reason: SuggestionReason::Training(rule.name),
      }
    }
    None => Suggestion {
      plan: table.fallback_plan,
      reason: SuggestionReason::Training(table.fallback_name),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Inputs where no recovery guard fires
  fn fresh(goal: GoalCategory) -> SuggestionInput {
    SuggestionInput {
      goal,
      sleep_hours: 8.0,
      energy: 7.0,
      soreness: 2.0,
      steps_today: 3000.0,
      recent_avg_steps: 6000.0,
      ..Default::default()
    }
  }

  const ALL_GOALS: [GoalCategory; 4] = [
    GoalCategory::LookFit,
    GoalCategory::HalfMarathon,
    GoalCategory::GainMuscle,
    GoalCategory::General,
  ];

  #[test]
  fn test_rest_returns_goal_recovery() {
    for goal in ALL_GOALS {
      let s = suggest(Decision::Rest, &fresh(goal));
      assert_eq!(s.plan, recovery_plan(goal));
      assert_eq!(s.reason, SuggestionReason::RestRequested);
    }
  }

  #[test]
  fn test_poor_sleep_beats_half_marathon_training() {
    let input = SuggestionInput {
      sleep_hours: 5.0,
      ..fresh(GoalCategory::HalfMarathon)
    };
    let s = suggest(Decision::Exercise, &input);
    assert_eq!(
      s.plan,
      "Run-focus recovery: 20-30 min easy walk or very easy jog, then calf/hip mobility."
    );
    assert_eq!(s.reason, SuggestionReason::Recovery("poor_sleep"));
  }

  #[test]
  fn test_zero_sleep_means_not_reported() {
    let input = SuggestionInput {
      sleep_hours: 0.0,
      energy: 0.0,
      ..fresh(GoalCategory::LookFit)
    };
    let s = suggest(Decision::Exercise, &input);
    assert!(matches!(s.reason, SuggestionReason::Training(_)));
  }

  #[test]
  fn test_guard_priority_order() {
    // Every guard true: the first one wins
    let input = SuggestionInput {
      sleep_hours: 4.0,
      soreness: 9.0,
      energy: 2.0,
      streak: 5,
      yesterday_workout_min: 80.0,
      ..fresh(GoalCategory::General)
    };
    assert_eq!(
      suggest(Decision::Exercise, &input).reason,
      SuggestionReason::Recovery("poor_sleep")
    );

    let input = SuggestionInput {
      soreness: 7.0,
      energy: 4.0,
      ..fresh(GoalCategory::General)
    };
    assert_eq!(
      suggest(Decision::Exercise, &input).reason,
      SuggestionReason::Recovery("high_soreness")
    );

    let input = SuggestionInput {
      energy: 4.0,
      streak: 3,
      ..fresh(GoalCategory::General)
    };
    assert_eq!(
      suggest(Decision::Exercise, &input).reason,
      SuggestionReason::Recovery("low_energy")
    );

    let input = SuggestionInput {
      streak: 3,
      ..fresh(GoalCategory::General)
    };
    assert_eq!(
      suggest(Decision::Exercise, &input).reason,
      SuggestionReason::Recovery("active_streak")
    );
  }

  #[test]
  fn test_heavy_recent_load() {
    let yesterday_heavy = SuggestionInput {
      yesterday_workout_min: 50.0,
      ..fresh(GoalCategory::GainMuscle)
    };
    assert_eq!(
      suggest(Decision::Exercise, &yesterday_heavy).reason,
      SuggestionReason::Recovery("heavy_recent_load")
    );

    let week_heavy = SuggestionInput {
      recent_workout_min: 210.0,
      recent_workout_days: 4,
      ..fresh(GoalCategory::GainMuscle)
    };
    assert_eq!(
      suggest(Decision::Exercise, &week_heavy).plan,
      recovery_plan(GoalCategory::GainMuscle)
    );

    // Volume alone on few days is not enough
    let few_days = SuggestionInput {
      recent_workout_min: 300.0,
      recent_workout_days: 3,
      ..fresh(GoalCategory::GainMuscle)
    };
    assert!(matches!(
      suggest(Decision::Exercise, &few_days).reason,
      SuggestionReason::Training(_)
    ));
  }

  #[test]
  fn test_gain_muscle_branches() {
    let s = suggest(Decision::Exercise, &fresh(GoalCategory::GainMuscle));
    assert_eq!(
      s.plan,
      "Hypertrophy day: 55-75 min full-body (squat/hinge/push/pull), 8-12 reps, 2-4 hard sets each."
    );

    let input = SuggestionInput {
      trained_yesterday: true,
      ..fresh(GoalCategory::GainMuscle)
    };
    assert_eq!(
      suggest(Decision::Exercise, &input).reason,
      SuggestionReason::Training("gain_muscle_split")
    );
  }

  #[test]
  fn test_half_marathon_tiers() {
    let tier = |run_min: f64| {
      let input = SuggestionInput {
        recent_run_min: run_min,
        ..fresh(GoalCategory::HalfMarathon)
      };
      suggest(Decision::Exercise, &input).reason
    };
    assert_eq!(tier(0.0), SuggestionReason::Training("half_marathon_base"));
    assert_eq!(tier(59.9), SuggestionReason::Training("half_marathon_base"));
    assert_eq!(tier(60.0), SuggestionReason::Training("half_marathon_tempo"));
    assert_eq!(tier(119.0), SuggestionReason::Training("half_marathon_tempo"));
    assert_eq!(tier(120.0), SuggestionReason::Training("half_marathon_long_run"));
  }

  #[test]
  fn test_look_fit_by_steps_today() {
    let low = suggest(Decision::Exercise, &fresh(GoalCategory::LookFit));
    assert_eq!(low.reason, SuggestionReason::Training("look_fit_low_steps"));

    let input = SuggestionInput {
      steps_today: 6000.0,
      ..fresh(GoalCategory::LookFit)
    };
    assert_eq!(
      suggest(Decision::Exercise, &input).reason,
      SuggestionReason::Training("look_fit_strength_conditioning")
    );
  }

  #[test]
  fn test_general_cascade() {
    let run = |input: SuggestionInput| suggest(Decision::Exercise, &input).reason;
    let base = fresh(GoalCategory::General);

    assert_eq!(run(base.clone()), SuggestionReason::Training("general_full_body"));

    let trained = SuggestionInput {
      trained_yesterday: true,
      recent_avg_steps: 4000.0,
      ..base.clone()
    };
    assert_eq!(run(trained), SuggestionReason::Training("general_low_steps"));

    // Three workout days skips the first rule and keeps the load guard off
    let volume = SuggestionInput {
      recent_workout_days: 3,
      recent_workout_min: 215.0,
      ..base.clone()
    };
    assert_eq!(run(volume), SuggestionReason::Training("general_high_volume"));

    let balanced = SuggestionInput {
      recent_workout_days: 3,
      recent_workout_min: 120.0,
      ..base
    };
    assert_eq!(run(balanced), SuggestionReason::Training("general_balanced"));
  }

  #[test]
  fn test_build_coerces_missing_and_non_finite() {
    let check_in = CheckIn {
      sleep_hours: Some(f64::NAN),
      energy: None,
      ..Default::default()
    };
    let input = SuggestionInput::build(
      GoalCategory::General,
      &check_in,
      HealthSignals::default(),
      0,
      false,
    );
    assert_eq!(input.sleep_hours, 0.0);
    assert_eq!(input.energy, 0.0);
    assert_eq!(input.steps_today, 0.0);
    assert_eq!(input.recent_workout_days, 0);
  }

  #[test]
  fn test_guard_table_is_ordered() {
    let priorities: Vec<u8> = RECOVERY_GUARDS.iter().map(|g| g.priority).collect();
    assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
    for goal in ALL_GOALS {
      let table = training_table(goal);
      assert!(table.rules.windows(2).all(|w| w[0].priority < w[1].priority));
    }
  }
}
