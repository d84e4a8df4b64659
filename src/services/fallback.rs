//! Deterministic program generator used whenever the remote model is
//! unavailable. Output depends only on the client profile.

use crate::models::common::{Exercise, FitnessLevel};
use crate::models::generation::{ClientProfile, GeneratedProgram, GeneratedWorkout};

pub const TECHNIQUE_NOTE: &str = "Assurez-vous d'avoir une bonne technique";
pub const FALLBACK_FOCUS: &str = "Corps entier";

struct TemplateExercise {
    name: &'static str,
    sets: u32,
    reps: &'static str,
    rest: u32,
}

const fn template(name: &'static str, sets: u32, reps: &'static str, rest: u32) -> TemplateExercise {
    TemplateExercise {
        name,
        sets,
        reps,
        rest,
    }
}

const BEGINNER: &[TemplateExercise] = &[
    template("Squats au poids du corps", 3, "10-12", 60),
    template("Pompes (genoux au sol si nécessaire)", 3, "8-10", 60),
    template("Planche", 3, "20-30 secondes", 45),
    template("Fentes alternées", 3, "10 par jambe", 60),
    template("Étirements", 1, "5 minutes", 0),
];

const INTERMEDIATE: &[TemplateExercise] = &[
    template("Squats avec poids", 4, "12-15", 60),
    template("Pompes standard", 4, "12-15", 60),
    template("Planche avec variations", 3, "45 secondes", 45),
    template("Burpees", 3, "10", 90),
    template("Mountain climbers", 3, "20", 60),
    template("Étirements dynamiques", 1, "5 minutes", 0),
];

const ADVANCED: &[TemplateExercise] = &[
    template("Squats jump", 4, "15", 90),
    template("Pompes diamant", 4, "15", 60),
    template("Planche avec levée de jambe", 4, "60 secondes", 45),
    template("Burpees avec saut", 4, "15", 90),
    template("Sprint sur place", 4, "30 secondes", 60),
    template("Gainage latéral", 3, "45 secondes par côté", 60),
];

/// The level whose template is used: missing levels get the intermediate set.
pub fn effective_level(level: Option<FitnessLevel>) -> FitnessLevel {
    level.unwrap_or(FitnessLevel::Intermediate)
}

pub fn exercise_template(level: Option<FitnessLevel>) -> Vec<Exercise> {
    let templates = match effective_level(level) {
        FitnessLevel::Beginner => BEGINNER,
        FitnessLevel::Intermediate => INTERMEDIATE,
        FitnessLevel::Advanced => ADVANCED,
    };

    templates
        .iter()
        .map(|t| Exercise {
            name: t.name.to_string(),
            sets: t.sets,
            reps: t.reps.to_string(),
            duration: None,
            rest: t.rest,
            notes: Some(TECHNIQUE_NOTE.to_string()),
        })
        .collect()
}

pub fn generate_fallback_program(profile: &ClientProfile) -> GeneratedProgram {
    let days_per_week = profile.days_per_week();
    let level = effective_level(profile.fitness_level);
    let exercises = exercise_template(profile.fitness_level);

    let goal = profile
        .goals
        .first()
        .map(|goal| goal.as_str())
        .unwrap_or("Fitness");

    let workouts = (1..=days_per_week)
        .map(|day| GeneratedWorkout {
            day,
            name: format!("Séance {} - Full Body", day),
            focus: Some(FALLBACK_FOCUS.to_string()),
            exercises: exercises.clone(),
        })
        .collect();

    GeneratedProgram {
        name: format!("Programme {} pour {}", goal, profile.name),
        description: format!(
            "Programme d'entraînement personnalisé basé sur votre niveau {}",
            level.as_str()
        ),
        duration: Some(days_per_week * 4),
        frequency: Some(days_per_week),
        workouts,
        generated_by_ai: false,
        ai_model: None,
    }
}
