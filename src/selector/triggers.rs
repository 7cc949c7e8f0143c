//! Named conditions under which the statistical shortlist is distrusted
//!
//! Each [`FallbackTrigger`] is a predicate over a [`TriggerContext`]. The
//! [`FallbackPolicy`] checks them in order and the engine fallback runs if
//! any fires.

use crate::core::FallbackConfig;
use std::fmt;

/// Outcome of scoring the shortlist, as seen by the triggers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerContext {
    /// Candidates that were actually scored
    pub evaluated: usize,
    /// Best candidate score, `None` when nothing was scored
    pub top_score: Option<f64>,
    /// Heuristic value of the position before moving
    pub before: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackTrigger {
    /// Too few candidates to compare
    InsufficientCandidates,
    /// The best candidate loses ground relative to the current position
    RelativeDrop,
    /// The best candidate barely improves a position that is already poor
    AbsoluteFloor,
}

impl FallbackTrigger {
    pub const ALL: [FallbackTrigger; 3] = [
        FallbackTrigger::InsufficientCandidates,
        FallbackTrigger::RelativeDrop,
        FallbackTrigger::AbsoluteFloor,
    ];

    pub fn fires(self, context: &TriggerContext, config: &FallbackConfig) -> bool {
        match self {
            FallbackTrigger::InsufficientCandidates => context.evaluated < config.min_candidates,
            FallbackTrigger::RelativeDrop => context
                .top_score
                .is_some_and(|top| top < context.before * (1.0 - config.relative_drop)),
            FallbackTrigger::AbsoluteFloor => context.top_score.is_some_and(|top| {
                context.before <= top && top < context.before + config.margin && top < config.floor
            }),
        }
    }
}

impl fmt::Display for FallbackTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FallbackTrigger::InsufficientCandidates => "insufficient-candidates",
            FallbackTrigger::RelativeDrop => "relative-drop",
            FallbackTrigger::AbsoluteFloor => "absolute-floor",
        };
        f.write_str(name)
    }
}

/// Ordered set of triggers with their thresholds
#[derive(Debug, Clone)]
pub struct FallbackPolicy {
    config: FallbackConfig,
    triggers: Vec<FallbackTrigger>,
}

impl FallbackPolicy {
    /// Policy checking every trigger
    pub fn new(config: FallbackConfig) -> Self {
        Self::with_triggers(config, FallbackTrigger::ALL.to_vec())
    }

    pub fn with_triggers(config: FallbackConfig, triggers: Vec<FallbackTrigger>) -> Self {
        Self { config, triggers }
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Triggers that fire for `context`, in policy order
    pub fn fired(&self, context: &TriggerContext) -> Vec<FallbackTrigger> {
        self.triggers
            .iter()
            .copied()
            .filter(|trigger| trigger.fires(context, &self.config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(evaluated: usize, top: f64, before: f64) -> TriggerContext {
        TriggerContext {
            evaluated,
            top_score: Some(top),
            before,
        }
    }

    #[test]
    fn test_insufficient_candidates() {
        let config = FallbackConfig::default();
        let trigger = FallbackTrigger::InsufficientCandidates;
        assert!(trigger.fires(&context(1, 0.6, 0.5), &config));
        assert!(trigger.fires(
            &TriggerContext {
                evaluated: 0,
                top_score: None,
                before: 0.5
            },
            &config
        ));
        assert!(!trigger.fires(&context(2, 0.6, 0.5), &config));
    }

    #[test]
    fn test_relative_drop() {
        let config = FallbackConfig::default();
        let trigger = FallbackTrigger::RelativeDrop;
        // 5% below 0.5 is 0.475
        assert!(trigger.fires(&context(3, 0.47, 0.5), &config));
        assert!(!trigger.fires(&context(3, 0.48, 0.5), &config));
        assert!(!trigger.fires(&context(3, 0.6, 0.5), &config));
    }

    #[test]
    fn test_absolute_floor() {
        let config = FallbackConfig::default();
        let trigger = FallbackTrigger::AbsoluteFloor;
        // Marginal gain on a poor position
        assert!(trigger.fires(&context(3, 0.405, 0.40), &config));
        assert!(trigger.fires(&context(3, 0.40, 0.40), &config));
        // Clear gain
        assert!(!trigger.fires(&context(3, 0.42, 0.40), &config));
        // Marginal gain on a healthy position
        assert!(!trigger.fires(&context(3, 0.505, 0.50), &config));
        // Loss is not a marginal gain
        assert!(!trigger.fires(&context(3, 0.39, 0.40), &config));
    }

    #[test]
    fn test_policy_reports_every_fired_trigger_in_order() {
        let policy = FallbackPolicy::new(FallbackConfig::default());
        assert_eq!(
            policy.fired(&context(1, 0.40, 0.40)),
            vec![
                FallbackTrigger::InsufficientCandidates,
                FallbackTrigger::AbsoluteFloor
            ]
        );
        assert!(policy.fired(&context(4, 0.55, 0.50)).is_empty());
    }

    #[test]
    fn test_policy_can_disable_triggers() {
        let policy = FallbackPolicy::with_triggers(
            FallbackConfig::default(),
            vec![FallbackTrigger::RelativeDrop],
        );
        assert!(policy.fired(&context(0, 0.40, 0.40)).is_empty());
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let config = FallbackConfig {
            floor: 0.6,
            ..FallbackConfig::default()
        };
        assert!(FallbackTrigger::AbsoluteFloor.fires(&context(3, 0.505, 0.50), &config));
    }
}
