use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::common::{Exercise, Weekday};
use crate::models::{ClientRef, ProgramRef, ValidationError, dates, required_text};
use crate::store::Document;

pub const DEFAULT_FREQUENCY: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Flexibility,
    #[default]
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    Draft,
    #[default]
    Active,
    Completed,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Days,
    #[default]
    Weeks,
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDuration {
    pub value: u32,
    #[serde(default)]
    pub unit: DurationUnit,
}

impl ProgramDuration {
    pub fn weeks(value: u32) -> Self {
        Self {
            value,
            unit: DurationUnit::Weeks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub day: Weekday,
    pub name: String,
    #[serde(rename = "type", default)]
    pub workout_type: WorkoutType,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub warmup: Option<String>,
    #[serde(default)]
    pub cooldown: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramProgressEntry {
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub created_by: Uuid,
    pub duration: ProgramDuration,
    pub frequency: u32,
    pub workouts: Vec<Workout>,
    pub status: ProgramStatus,
    #[serde(rename = "generatedByAI")]
    pub generated_by_ai: bool,
    pub ai_model: Option<String>,
    pub progress: Vec<ProgramProgressEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    pub fn reference(&self) -> ProgramRef {
        ProgramRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl Document for Program {
    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Uuid {
        self.created_by
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// A program as returned to callers, with its client summary embedded.
#[derive(Debug, Serialize)]
pub struct ProgramView {
    #[serde(flatten)]
    pub program: Program,
    pub client: Option<ClientRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProgramRequest {
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub client_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<ProgramDuration>,
    pub frequency: Option<u32>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
    pub status: Option<ProgramStatus>,
}

impl CreateProgramRequest {
    pub fn into_program(self, client_id: Uuid, owner: Uuid) -> Result<Program, ValidationError> {
        let name = required_text(self.name, "Le nom du programme est requis")?;
        let now = Utc::now();

        Ok(Program {
            id: Uuid::new_v4(),
            name,
            description: self.description,
            client_id,
            created_by: owner,
            duration: self
                .duration
                .unwrap_or_else(|| ProgramDuration::weeks(4)),
            frequency: self.frequency.unwrap_or(DEFAULT_FREQUENCY),
            workouts: self.workouts,
            status: self.status.unwrap_or_default(),
            generated_by_ai: false,
            ai_model: None,
            progress: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<ProgramDuration>,
    pub frequency: Option<u32>,
    pub workouts: Option<Vec<Workout>>,
    pub status: Option<ProgramStatus>,
}

impl UpdateProgramRequest {
    pub fn apply(self, program: &mut Program) -> Result<(), ValidationError> {
        if self.name.is_some() {
            program.name = required_text(self.name, "Le nom du programme est requis")?;
        }
        if let Some(description) = self.description {
            program.description = Some(description);
        }
        if let Some(duration) = self.duration {
            program.duration = duration;
        }
        if let Some(frequency) = self.frequency {
            program.frequency = frequency;
        }
        if let Some(workouts) = self.workouts {
            program.workouts = workouts;
        }
        if let Some(status) = self.status {
            program.status = status;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressEntryRequest {
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

impl ProgressEntryRequest {
    pub fn into_entry(self) -> ProgramProgressEntry {
        ProgramProgressEntry {
            date: self.date.unwrap_or_else(Utc::now),
            notes: self.notes,
            completed: self.completed.unwrap_or(false),
        }
    }
}
