use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Number of questions the generation prompt asks for.
pub const EXPECTED_QUESTION_COUNT: usize = 10;

/// Expected questions per DOK level 1, 2 and 3.
pub const EXPECTED_DOK_DISTRIBUTION: [usize; 3] = [3, 3, 4];

/// One generated question. Fields the model leaves out default to empty, and
/// keys outside the contract are kept in `extra` and returned unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    #[serde(default)]
    pub question: String,
    /// 1 recall, 2 skill/concept, 3 strategic thinking. 0 when the model gave
    /// nothing readable.
    #[serde(default, deserialize_with = "deserialize_dok_level")]
    pub dok_level: u8,
    #[serde(default)]
    pub focus_points: Vec<String>,
    #[serde(default)]
    pub model_answer: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            extra: Map::new(),
        }
    }
}

// Accepts 2, 2.0, "2" and "DOK 2". Anything else reads as 0.
fn deserialize_dok_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let level = match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => s
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse::<u64>()
            .ok(),
        _ => None,
    };

    Ok(level.and_then(|l| u8::try_from(l).ok()).unwrap_or(0))
}

impl QuestionSet {
    /// Count of questions at DOK 1, 2 and 3. Levels outside that range are not
    /// counted.
    pub fn dok_distribution(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for question in &self.questions {
            if let 1..=3 = question.dok_level {
                counts[usize::from(question.dok_level) - 1] += 1;
            }
        }
        counts
    }

    /// Ways this set departs from the generation contract. The model output is
    /// not rejected for any of these; callers log them.
    pub fn policy_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.questions.len() != EXPECTED_QUESTION_COUNT {
            violations.push(format!(
                "expected {} questions, got {}",
                EXPECTED_QUESTION_COUNT,
                self.questions.len()
            ));
        }

        for (index, question) in self.questions.iter().enumerate() {
            if !(1..=3).contains(&question.dok_level) {
                violations.push(format!(
                    "question {} has dok_level {} outside 1-3",
                    index + 1,
                    question.dok_level
                ));
            }
        }

        let distribution = self.dok_distribution();
        if distribution != EXPECTED_DOK_DISTRIBUTION {
            violations.push(format!(
                "expected DOK distribution {:?}, got {:?}",
                EXPECTED_DOK_DISTRIBUTION, distribution
            ));
        }

        violations
    }
}
