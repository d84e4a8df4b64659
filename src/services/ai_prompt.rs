use crate::models::client::DEFAULT_SESSION_DURATION;
use crate::models::generation::ClientProfile;

pub const SYSTEM_INSTRUCTION: &str = "Tu es un coach sportif expert qui crée des programmes d'entraînement personnalisés. Réponds toujours en JSON valide.";

const UNSPECIFIED: &str = "non spécifié";

fn join_or<T>(items: &[T], label: impl Fn(&T) -> &str, default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items.iter().map(label).collect::<Vec<_>>().join(", ")
    }
}

fn or_unspecified<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => UNSPECIFIED.to_string(),
    }
}

fn format_medical_conditions(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("- Conditions médicales: {}\n", conditions.join(", "))
    }
}

pub fn build_program_prompt(profile: &ClientProfile) -> String {
    let days_per_week = profile.days_per_week();
    let weeks = days_per_week * 4;

    format!(
        r#"
Crée un programme d'entraînement personnalisé pour un client avec les caractéristiques suivantes:

- Nom: {}
- Âge: {}
- Poids: {}
- Taille: {}
- Niveau de fitness: {}
- Objectifs: {}
- Disponibilité: {} jours/semaine ({}), {} minutes/session
- Moment préféré: {}
- Équipement disponible: {}
{}
Génère un programme d'entraînement structuré sur {} semaines avec:
1. Un nom de programme accrocheur
2. Une description détaillée
3. Des séances d'entraînement pour chaque jour disponible
4. Pour chaque séance, liste 5-8 exercices avec:
   - Nom de l'exercice
   - Nombre de séries
   - Nombre de répétitions (ou durée en secondes)
   - Temps de repos entre les séries
   - Notes et conseils d'exécution

Format de réponse JSON:
{{
  "name": "Nom du programme",
  "description": "Description détaillée",
  "duration": {},
  "frequency": {},
  "workouts": [
    {{
      "day": 1,
      "name": "Nom de la séance",
      "focus": "Zone ciblée",
      "exercises": [
        {{
          "name": "Nom de l'exercice",
          "sets": 3,
          "reps": "10-12",
          "rest": 60,
          "notes": "Conseils d'exécution"
        }}
      ]
    }}
  ]
}}
"#,
        profile.name,
        or_unspecified(profile.age, " ans"),
        or_unspecified(profile.weight, " kg"),
        or_unspecified(profile.height, " cm"),
        profile
            .fitness_level
            .map(|level| level.as_str())
            .unwrap_or(UNSPECIFIED),
        join_or(&profile.goals, |goal| goal.as_str(), "Fitness général"),
        days_per_week,
        join_or(&profile.available_days, |day| day.as_str(), UNSPECIFIED),
        profile.session_duration.unwrap_or(DEFAULT_SESSION_DURATION),
        profile
            .preferred_time
            .map(|time| time.as_str())
            .unwrap_or("morning"),
        join_or(&profile.equipment, |item| item.as_str(), "bodyweight"),
        format_medical_conditions(&profile.medical_conditions),
        weeks,
        weeks,
        days_per_week,
    )
}
