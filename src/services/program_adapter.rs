use chrono::Utc;
use uuid::Uuid;

use crate::models::client::{Client, DEFAULT_SESSION_DURATION};
use crate::models::common::Weekday;
use crate::models::generation::{GeneratedProgram, GeneratedWorkout};
use crate::models::program::{
    DEFAULT_FREQUENCY, Program, ProgramDuration, ProgramStatus, Workout, WorkoutType,
};

pub const DEFAULT_DURATION_WEEKS: u32 = 4;
pub const WARMUP: &str = "Échauffement : 5-10 minutes de cardio léger";
pub const COOLDOWN: &str = "Retour au calme : étirements 5-10 minutes";

/// Turns generated workouts into scheduled ones. Days are assigned by
/// position (Monday first, wrapping after Sunday); the generator's own
/// `day` index is not used.
pub fn adapt_workouts(workouts: &[GeneratedWorkout], session_duration: Option<u32>) -> Vec<Workout> {
    let duration = session_duration
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_SESSION_DURATION);

    workouts
        .iter()
        .enumerate()
        .map(|(index, workout)| Workout {
            day: Weekday::cyclic(index),
            name: workout.name.clone(),
            workout_type: WorkoutType::Mixed,
            duration: Some(duration),
            exercises: workout.exercises.clone(),
            warmup: Some(WARMUP.to_string()),
            cooldown: Some(COOLDOWN.to_string()),
        })
        .collect()
}

/// Builds the stored program for `client`, owned by `owner`.
pub fn into_program(generated: GeneratedProgram, client: &Client, owner: Uuid) -> Program {
    let workouts = adapt_workouts(&generated.workouts, Some(client.session_duration));
    let now = Utc::now();

    Program {
        id: Uuid::new_v4(),
        name: generated.name,
        description: Some(generated.description).filter(|d| !d.is_empty()),
        client_id: client.id,
        created_by: owner,
        duration: ProgramDuration::weeks(
            generated
                .duration
                .filter(|weeks| *weeks > 0)
                .unwrap_or(DEFAULT_DURATION_WEEKS),
        ),
        frequency: generated
            .frequency
            .filter(|per_week| *per_week > 0)
            .unwrap_or(DEFAULT_FREQUENCY),
        workouts,
        status: ProgramStatus::Active,
        generated_by_ai: generated.generated_by_ai,
        ai_model: generated.ai_model,
        progress: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}
