use serde::{Deserialize, Deserializer, Serialize};

use crate::models::common::{Exercise, FitnessLevel, Goal, PreferredTime, Weekday};

/// Everything the program generator knows about a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_known_level")]
    pub fitness_level: Option<FitnessLevel>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub available_days: Vec<Weekday>,
    #[serde(default)]
    pub session_duration: Option<u32>,
    #[serde(default)]
    pub preferred_time: Option<PreferredTime>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
}

impl ClientProfile {
    /// Sessions per week: one per available day, three when none are listed.
    pub fn days_per_week(&self) -> u32 {
        match self.available_days.len() {
            0 => 3,
            n => n as u32,
        }
    }
}

// Unknown levels are treated like a missing level rather than rejected.
fn deserialize_known_level<'de, D>(deserializer: D) -> Result<Option<FitnessLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(FitnessLevel::parse))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Workouts are scheduled by position, so a weekday name or any other
// non-index value here only loses the sequence number.
fn lenient_day<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw
        .as_u64()
        .and_then(|day| u32::try_from(day).ok())
        .unwrap_or(0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProgram {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub frequency: Option<u32>,
    pub workouts: Vec<GeneratedWorkout>,
    #[serde(rename = "generatedByAI", default)]
    pub generated_by_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedWorkout {
    #[serde(default, deserialize_with = "lenient_day")]
    pub day: u32, // 1-based sequence index, not a weekday
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}
