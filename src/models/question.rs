use serde::{Deserialize, Serialize};

/// How hard a question is rated by its content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// A single multiple-choice question. Never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub subject: String,
    pub difficulty: Difficulty,
    pub points: u32,
}

impl Question {
    /// Checks the structural rules every question in a bank must satisfy.
    ///
    /// Returns `Ok(())` if valid, or `Err` with a reason.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.options.len() < 2 {
            return Err("question must have at least two options");
        }

        if self.correct_answer >= self.options.len() {
            return Err("correct answer index is out of bounds");
        }

        if self.points == 0 {
            return Err("point value must be positive");
        }

        Ok(())
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct_answer: usize, points: u32) -> Question {
        Question {
            id: 1,
            text: "Pick one".to_string(),
            options: (0..options).map(|i| format!("option {}", i)).collect(),
            correct_answer,
            subject: "General".to_string(),
            difficulty: Difficulty::Easy,
            points,
        }
    }

    #[test]
    fn test_validate() {
        assert!(question(4, 3, 100).validate().is_ok());
        assert!(question(2, 0, 1).validate().is_ok());
        assert!(question(1, 0, 100).validate().is_err());
        assert!(question(4, 4, 100).validate().is_err());
        assert!(question(4, 0, 0).validate().is_err());
    }

    #[test]
    fn test_difficulty_deserializes_from_label() {
        let difficulty: Difficulty = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(difficulty, Difficulty::Medium);
        assert_eq!(difficulty.to_string(), "Medium");
    }
}
