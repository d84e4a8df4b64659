use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ClientRef, ProgramRef, ValidationError, check_range, dates};
use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressType {
    Measurement,
    Photo,
    Performance,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excellent,
    Good,
    Neutral,
    Tired,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrition {
    Excellent,
    Good,
    Average,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoAngle {
    Front,
    Back,
    Side,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub arms: Option<f64>,
    pub thighs: Option<f64>,
    pub calves: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub exercise_name: Option<String>,
    pub max_weight: Option<f64>,
    pub max_reps: Option<u32>,
    pub total_volume: Option<f64>,
    pub personal_record: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    #[serde(rename = "type", default)]
    pub angle: Option<PhotoAngle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: Uuid,
    pub client_id: Uuid,
    pub program_id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub progress_type: ProgressType,
    pub measurements: Option<Measurements>,
    pub performance: Option<Performance>,
    pub photos: Vec<Photo>,
    pub notes: Option<String>,
    pub mood: Option<Mood>,
    pub energy: Option<u8>,
    pub sleep: Option<f64>,
    pub nutrition: Option<Nutrition>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Progress {
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

#[derive(Debug, Serialize)]
pub struct ProgressView {
    #[serde(flatten)]
    pub progress: Progress,
    pub client: Option<ClientRef>,
    pub program: Option<ProgramRef>,
}

fn check_wellness(energy: Option<u8>, sleep: Option<f64>) -> Result<(), ValidationError> {
    check_range("energy", energy, 1, 10)?;
    check_range("sleep", sleep, 0.0, 24.0)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressRequest {
    pub client_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub progress_type: Option<ProgressType>,
    pub measurements: Option<Measurements>,
    pub performance: Option<Performance>,
    pub photos: Option<Vec<Photo>>,
    pub notes: Option<String>,
    pub mood: Option<Mood>,
    pub energy: Option<u8>,
    pub sleep: Option<f64>,
    pub nutrition: Option<Nutrition>,
}

impl CreateProgressRequest {
    pub fn into_progress(
        self,
        client_id: Uuid,
        program_id: Uuid,
        owner: Uuid,
    ) -> Result<Progress, ValidationError> {
        let progress_type = self
            .progress_type
            .ok_or_else(|| ValidationError("Le type de progression est requis".to_string()))?;
        check_wellness(self.energy, self.sleep)?;

        let now = Utc::now();
        Ok(Progress {
            id: Uuid::new_v4(),
            client_id,
            program_id,
            date: self.date.unwrap_or(now),
            progress_type,
            measurements: self.measurements,
            performance: self.performance,
            photos: self.photos.unwrap_or_default(),
            notes: self.notes.map(|n| n.trim().to_string()),
            mood: self.mood,
            energy: self.energy,
            sleep: self.sleep,
            nutrition: self.nutrition,
            created_by: owner,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
    pub measurements: Option<Measurements>,
    pub performance: Option<Performance>,
    pub photos: Option<Vec<Photo>>,
    pub notes: Option<String>,
    pub mood: Option<Mood>,
    pub energy: Option<u8>,
    pub sleep: Option<f64>,
    pub nutrition: Option<Nutrition>,
}

impl UpdateProgressRequest {
    pub fn apply(self, progress: &mut Progress) -> Result<(), ValidationError> {
        check_wellness(self.energy, self.sleep)?;

        if let Some(date) = self.date {
            progress.date = date;
        }
        if let Some(measurements) = self.measurements {
            progress.measurements = Some(measurements);
        }
        if let Some(performance) = self.performance {
            progress.performance = Some(performance);
        }
        if let Some(photos) = self.photos {
            progress.photos = photos;
        }
        if let Some(notes) = self.notes {
            progress.notes = Some(notes.trim().to_string());
        }
        if let Some(mood) = self.mood {
            progress.mood = Some(mood);
        }
        if let Some(energy) = self.energy {
            progress.energy = Some(energy);
        }
        if let Some(sleep) = self.sleep {
            progress.sleep = Some(sleep);
        }
        if let Some(nutrition) = self.nutrition {
            progress.nutrition = Some(nutrition);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(progress_type: Option<ProgressType>) -> CreateProgressRequest {
        CreateProgressRequest {
            progress_type,
            measurements: Some(Measurements {
                weight: Some(82.5),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_type_is_required() {
        assert!(
            create(None)
                .into_progress(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
                .is_err()
        );
    }

    #[test]
    fn test_create_defaults_date_to_now() {
        let before = Utc::now();
        let progress = create(Some(ProgressType::Measurement))
            .into_progress(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        assert!(progress.date >= before);
        assert!(progress.photos.is_empty());
    }

    #[test]
    fn test_wellness_ranges() {
        let mut request = create(Some(ProgressType::Note));
        request.energy = Some(11);
        assert!(
            request
                .into_progress(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
                .is_err()
        );

        let mut progress = create(Some(ProgressType::Note))
            .into_progress(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .unwrap();
        let patch = UpdateProgressRequest {
            sleep: Some(25.0),
            ..Default::default()
        };
        assert!(patch.apply(&mut progress).is_err());
    }

    #[test]
    fn test_wire_names() {
        let request: CreateProgressRequest = serde_json::from_str(
            r#"{"type":"performance","performance":{"exerciseName":"Squat","maxWeight":100,"personalRecord":true},"photos":[{"url":"u","type":"side"}]}"#,
        )
        .unwrap();

        assert_eq!(request.progress_type, Some(ProgressType::Performance));
        let performance = request.performance.unwrap();
        assert_eq!(performance.exercise_name.as_deref(), Some("Squat"));
        assert_eq!(performance.personal_record, Some(true));
        assert_eq!(
            request.photos.unwrap()[0].angle,
            Some(PhotoAngle::Side)
        );
    }
}
