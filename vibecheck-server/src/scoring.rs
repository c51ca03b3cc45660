//! Answer tokens and submission scoring
//!
//! Submitted answer values are matched against a closed token set. Anything
//! outside it (unknown strings, numbers, null, nested values) normalizes to
//! `None`, scores zero, and is stored as NULL.

use serde::{Deserialize, Serialize};

/// Accepted answer tokens with fixed point values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerValue {
    Topp,
    Flash,
}

impl AnswerValue {
    pub const ALL: [AnswerValue; 2] = [AnswerValue::Topp, AnswerValue::Flash];

    /// Points this token contributes to a submission's score
    pub fn points(&self) -> i64 {
        match self {
            AnswerValue::Topp => 2,
            AnswerValue::Flash => 3,
        }
    }
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerValue::Topp => write!(f, "topp"),
            AnswerValue::Flash => write!(f, "flash"),
        }
    }
}

impl std::str::FromStr for AnswerValue {
    type Err = String;

    // Tokens match exactly; no case folding
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topp" => Ok(AnswerValue::Topp),
            "flash" => Ok(AnswerValue::Flash),
            _ => Err(format!("Unknown answer value: {}", s)),
        }
    }
}

/// Normalize a submitted answer to an accepted token
pub fn normalize(value: &serde_json::Value) -> Option<AnswerValue> {
    value.as_str().and_then(|s| s.parse().ok())
}

/// Total score for a submission's normalized answers
pub fn total_points<I>(answers: I) -> i64
where
    I: IntoIterator<Item = Option<AnswerValue>>,
{
    answers.into_iter().flatten().map(|a| a.points()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepted_tokens_parse_and_score() {
        assert_eq!("topp".parse::<AnswerValue>().unwrap().points(), 2);
        assert_eq!("flash".parse::<AnswerValue>().unwrap().points(), 3);
        assert!("bogus".parse::<AnswerValue>().is_err());
        assert!("TOPP".parse::<AnswerValue>().is_err());
        assert!(" flash".parse::<AnswerValue>().is_err());
    }

    #[test]
    fn tokens_round_trip_through_display() {
        for token in AnswerValue::ALL {
            assert_eq!(token.to_string().parse::<AnswerValue>().unwrap(), token);
        }
    }

    #[test]
    fn normalize_accepts_only_known_string_tokens() {
        assert_eq!(normalize(&json!("topp")), Some(AnswerValue::Topp));
        assert_eq!(normalize(&json!("flash")), Some(AnswerValue::Flash));
        assert_eq!(normalize(&json!("bogus")), None);
        assert_eq!(normalize(&json!(3)), None);
        assert_eq!(normalize(&json!(null)), None);
        assert_eq!(normalize(&json!(["topp"])), None);
        assert_eq!(normalize(&json!({ "value": "flash" })), None);
    }

    #[test]
    fn scores_sum_over_recognized_answers() {
        let answers = [Some(AnswerValue::Topp), Some(AnswerValue::Flash), None];
        assert_eq!(total_points(answers), 5);
        assert_eq!(total_points([None, None]), 0);
        assert_eq!(total_points([]), 0);
    }
}
