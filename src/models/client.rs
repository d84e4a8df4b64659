use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::common::{FitnessLevel, Goal, PreferredTime, Weekday};
use crate::models::generation::ClientProfile;
use crate::models::{ClientRef, ValidationError, required_text};
use crate::store::Document;

pub const DEFAULT_SESSION_DURATION: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: u32,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub fitness_level: FitnessLevel,
    pub goals: Vec<Goal>,
    pub medical_conditions: Vec<String>,
    pub available_days: Vec<Weekday>,
    pub session_duration: u32,
    pub preferred_time: PreferredTime,
    pub equipment: Vec<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Projects the stored record onto the generator's input.
    pub fn profile(&self) -> ClientProfile {
        ClientProfile {
            name: self.name.clone(),
            age: Some(self.age),
            weight: self.weight,
            height: self.height,
            fitness_level: Some(self.fitness_level),
            goals: self.goals.clone(),
            available_days: self.available_days.clone(),
            session_duration: Some(self.session_duration),
            preferred_time: Some(self.preferred_time),
            equipment: self.equipment.clone(),
            medical_conditions: self.medical_conditions.clone(),
        }
    }

    pub fn reference(&self) -> ClientRef {
        ClientRef {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl Document for Client {
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

fn validate_age(age: u32) -> Result<u32, ValidationError> {
    if age < 1 {
        return Err(ValidationError("L'âge doit être supérieur à 0".to_string()));
    }
    Ok(age)
}

fn dedup_days(days: Vec<Weekday>) -> Vec<Weekday> {
    let mut unique = Vec::with_capacity(days.len());
    for day in days {
        if !unique.contains(&day) {
            unique.push(day);
        }
    }
    unique
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub fitness_level: Option<FitnessLevel>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub available_days: Vec<Weekday>,
    pub session_duration: Option<u32>,
    pub preferred_time: Option<PreferredTime>,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub notes: Option<String>,
}

impl CreateClientRequest {
    pub fn into_client(self, owner: Uuid) -> Result<Client, ValidationError> {
        let name = required_text(self.name, "Le nom est requis")?;
        let email = required_text(self.email, "L'email est requis")?;
        let age = validate_age(
            self.age
                .ok_or_else(|| ValidationError("L'âge est requis".to_string()))?,
        )?;
        let fitness_level = self
            .fitness_level
            .ok_or_else(|| ValidationError("Le niveau de fitness est requis".to_string()))?;

        let now = Utc::now();
        Ok(Client {
            id: Uuid::new_v4(),
            name,
            email,
            phone: self.phone.map(|p| p.trim().to_string()),
            age,
            weight: self.weight,
            height: self.height,
            fitness_level,
            goals: self.goals,
            medical_conditions: self.medical_conditions,
            available_days: dedup_days(self.available_days),
            session_duration: self.session_duration.unwrap_or(DEFAULT_SESSION_DURATION),
            preferred_time: self.preferred_time.unwrap_or_default(),
            equipment: self.equipment,
            notes: self.notes,
            created_by: owner,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub fitness_level: Option<FitnessLevel>,
    pub goals: Option<Vec<Goal>>,
    pub medical_conditions: Option<Vec<String>>,
    pub available_days: Option<Vec<Weekday>>,
    pub session_duration: Option<u32>,
    pub preferred_time: Option<PreferredTime>,
    pub equipment: Option<Vec<String>>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateClientRequest {
    pub fn apply(self, client: &mut Client) -> Result<(), ValidationError> {
        if self.name.is_some() {
            client.name = required_text(self.name, "Le nom est requis")?;
        }
        if self.email.is_some() {
            client.email = required_text(self.email, "L'email est requis")?;
        }
        if let Some(age) = self.age {
            client.age = validate_age(age)?;
        }
        if let Some(phone) = self.phone {
            client.phone = Some(phone.trim().to_string());
        }
        if let Some(weight) = self.weight {
            client.weight = Some(weight);
        }
        if let Some(height) = self.height {
            client.height = Some(height);
        }
        if let Some(level) = self.fitness_level {
            client.fitness_level = level;
        }
        if let Some(goals) = self.goals {
            client.goals = goals;
        }
        if let Some(conditions) = self.medical_conditions {
            client.medical_conditions = conditions;
        }
        if let Some(days) = self.available_days {
            client.available_days = dedup_days(days);
        }
        if let Some(duration) = self.session_duration {
            client.session_duration = duration;
        }
        if let Some(time) = self.preferred_time {
            client.preferred_time = time;
        }
        if let Some(equipment) = self.equipment {
            client.equipment = equipment;
        }
        if let Some(notes) = self.notes {
            client.notes = Some(notes);
        }
        if let Some(active) = self.is_active {
            client.is_active = active;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateClientRequest {
        CreateClientRequest {
            name: Some(" Alex ".to_string()),
            email: Some("alex@example.com".to_string()),
            age: Some(31),
            fitness_level: Some(FitnessLevel::Beginner),
            goals: vec![Goal::WeightLoss],
            available_days: vec![Weekday::Monday, Weekday::Friday, Weekday::Monday],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_applies_defaults() {
        let owner = Uuid::new_v4();
        let client = create_request().into_client(owner).unwrap();

        assert_eq!(client.name, "Alex");
        assert_eq!(client.session_duration, DEFAULT_SESSION_DURATION);
        assert_eq!(client.preferred_time, PreferredTime::Morning);
        assert_eq!(client.available_days, vec![Weekday::Monday, Weekday::Friday]);
        assert_eq!(client.created_by, owner);
        assert!(client.is_active);
    }

    #[test]
    fn test_create_requires_fitness_level_and_age() {
        let mut request = create_request();
        request.fitness_level = None;
        assert!(request.into_client(Uuid::new_v4()).is_err());

        let mut request = create_request();
        request.age = Some(0);
        assert!(request.into_client(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_unknown_goal_is_rejected_at_deserialization() {
        let parsed: Result<CreateClientRequest, _> =
            serde_json::from_str(r#"{"name":"A","goals":["yoga"]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_update_is_partial() {
        let mut client = create_request().into_client(Uuid::new_v4()).unwrap();
        let update = UpdateClientRequest {
            session_duration: Some(45),
            name: Some("Alexandra".to_string()),
            ..Default::default()
        };

        update.apply(&mut client).unwrap();

        assert_eq!(client.session_duration, 45);
        assert_eq!(client.name, "Alexandra");
        assert_eq!(client.email, "alex@example.com");
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let mut client = create_request().into_client(Uuid::new_v4()).unwrap();
        let update = UpdateClientRequest {
            name: Some("  ".to_string()),
            ..Default::default()
        };

        assert!(update.apply(&mut client).is_err());
    }

    #[test]
    fn test_profile_projection() {
        let client = create_request().into_client(Uuid::new_v4()).unwrap();
        let profile = client.profile();

        assert_eq!(profile.name, "Alex");
        assert_eq!(profile.fitness_level, Some(FitnessLevel::Beginner));
        assert_eq!(profile.session_duration, Some(60));
        assert_eq!(profile.days_per_week(), 2);
    }
}
