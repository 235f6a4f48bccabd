//! Scoring and streak rules for a single resolved question.

use crate::models::Question;

/// Result of scoring one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub correct: bool,
    pub points: u32,
    /// Streak after this answer: prior + 1 when correct, otherwise 0.
    pub streak: u32,
}

/// Scores `selected` against `question`.
///
/// The streak bonus uses the streak held *before* this answer, so the
/// first correct answer of a run earns only the base points. A timeout is
/// passed as `None` and scores like a wrong answer.
pub fn score_answer(
    question: &Question,
    selected: Option<usize>,
    prior_streak: u32,
    streak_bonus_per_level: u32,
) -> Award {
    let correct = selected.is_some_and(|option| question.is_correct(option));

    if correct {
        let bonus = prior_streak.saturating_mul(streak_bonus_per_level);
        Award {
            correct,
            points: question.points.saturating_add(bonus),
            streak: prior_streak.saturating_add(1),
        }
    } else {
        Award {
            correct,
            points: 0,
            streak: 0,
        }
    }
}

/// Player progress after a correct answer, capped at 100.
pub fn advance_progress(progress: f64, step: f64) -> f64 {
    (progress + step).min(100.0)
}
