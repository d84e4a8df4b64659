use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    ClientRef, ProgramRef, ValidationError, check_range, dates, required_text,
};
use crate::store::Document;

const MIN_DURATION: u32 = 15;
const MAX_DURATION: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    Missed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
    VeryHard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExercise {
    pub name: String,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub client_id: Uuid,
    pub program_id: Uuid,
    pub workout_id: Option<String>,
    pub workout_name: String,
    pub scheduled_date: DateTime<Utc>,
    pub start_time: Option<String>,
    pub duration: u32,
    pub status: SessionStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub exercises: Vec<SessionExercise>,
    pub rating: Option<u8>,
    pub difficulty: Option<Difficulty>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Session {
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
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub client: Option<ClientRef>,
    pub program: Option<ProgramRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub client_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    pub workout_id: Option<String>,
    pub workout_name: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub scheduled_date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub duration: Option<u32>,
    pub exercises: Option<Vec<SessionExercise>>,
    pub notes: Option<String>,
}

impl CreateSessionRequest {
    /// `client_duration` is the client's usual session length, used when the
    /// request does not name one.
    pub fn into_session(
        self,
        client_id: Uuid,
        program_id: Uuid,
        client_duration: u32,
        owner: Uuid,
    ) -> Result<Session, ValidationError> {
        let workout_name = required_text(self.workout_name, "Le nom de la séance est requis")?;
        let scheduled_date = self.scheduled_date.ok_or_else(|| {
            ValidationError("La date de planification est requise".to_string())
        })?;
        let duration = self.duration.unwrap_or(client_duration);
        check_range("duration", Some(duration), MIN_DURATION, MAX_DURATION)?;

        let now = Utc::now();
        Ok(Session {
            id: Uuid::new_v4(),
            client_id,
            program_id,
            workout_id: self.workout_id,
            workout_name,
            scheduled_date,
            start_time: self.start_time,
            duration,
            status: SessionStatus::Scheduled,
            completed_at: None,
            notes: self.notes.map(|n| n.trim().to_string()),
            exercises: self.exercises.unwrap_or_default(),
            rating: None,
            difficulty: None,
            created_by: owner,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Fields a coach may change after scheduling. Anything else in the body is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub scheduled_date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub duration: Option<u32>,
    pub status: Option<SessionStatus>,
    pub notes: Option<String>,
    pub exercises: Option<Vec<SessionExercise>>,
    pub rating: Option<u8>,
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl UpdateSessionRequest {
    pub fn apply(self, session: &mut Session) -> Result<(), ValidationError> {
        check_range("duration", self.duration, MIN_DURATION, MAX_DURATION)?;
        check_range("rating", self.rating, 1, 5)?;

        if let Some(date) = self.scheduled_date {
            session.scheduled_date = date;
        }
        if let Some(start_time) = self.start_time {
            session.start_time = Some(start_time);
        }
        if let Some(duration) = self.duration {
            session.duration = duration;
        }
        if let Some(notes) = self.notes {
            session.notes = Some(notes.trim().to_string());
        }
        if let Some(exercises) = self.exercises {
            session.exercises = exercises;
        }
        if let Some(rating) = self.rating {
            session.rating = Some(rating);
        }
        if let Some(difficulty) = self.difficulty {
            session.difficulty = Some(difficulty);
        }
        if let Some(completed_at) = self.completed_at {
            session.completed_at = Some(completed_at);
        }
        if let Some(status) = self.status {
            session.status = status;
            if status == SessionStatus::Completed && session.completed_at.is_none() {
                session.completed_at = Some(Utc::now());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scheduled() -> Session {
        CreateSessionRequest {
            workout_name: Some("Séance 1 - Full Body".to_string()),
            scheduled_date: Some(Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()),
            ..Default::default()
        }
        .into_session(Uuid::new_v4(), Uuid::new_v4(), 45, Uuid::new_v4())
        .unwrap()
    }

    #[test]
    fn test_create_uses_client_duration() {
        let session = scheduled();
        assert_eq!(session.duration, 45);
        assert_eq!(session.status, SessionStatus::Scheduled);
    }

    #[test]
    fn test_create_requires_date_and_name() {
        let missing_date = CreateSessionRequest {
            workout_name: Some("A".to_string()),
            ..Default::default()
        };
        assert!(
            missing_date
                .into_session(Uuid::new_v4(), Uuid::new_v4(), 60, Uuid::new_v4())
                .is_err()
        );

        let missing_name = CreateSessionRequest {
            scheduled_date: Some(Utc::now()),
            ..Default::default()
        };
        assert!(
            missing_name
                .into_session(Uuid::new_v4(), Uuid::new_v4(), 60, Uuid::new_v4())
                .is_err()
        );
    }

    #[test]
    fn test_create_rejects_out_of_range_duration() {
        let request = CreateSessionRequest {
            workout_name: Some("A".to_string()),
            scheduled_date: Some(Utc::now()),
            duration: Some(200),
            ..Default::default()
        };
        assert!(
            request
                .into_session(Uuid::new_v4(), Uuid::new_v4(), 60, Uuid::new_v4())
                .is_err()
        );
    }

    #[test]
    fn test_completing_stamps_completed_at_once() {
        let mut session = scheduled();
        UpdateSessionRequest {
            status: Some(SessionStatus::Completed),
            rating: Some(4),
            ..Default::default()
        }
        .apply(&mut session)
        .unwrap();

        let stamped = session.completed_at.expect("completion time recorded");
        assert_eq!(session.rating, Some(4));

        UpdateSessionRequest {
            status: Some(SessionStatus::Completed),
            ..Default::default()
        }
        .apply(&mut session)
        .unwrap();
        assert_eq!(session.completed_at, Some(stamped));
    }

    #[test]
    fn test_explicit_completed_at_wins() {
        let mut session = scheduled();
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        UpdateSessionRequest {
            status: Some(SessionStatus::Completed),
            completed_at: Some(at),
            ..Default::default()
        }
        .apply(&mut session)
        .unwrap();

        assert_eq!(session.completed_at, Some(at));
    }

    #[test]
    fn test_patch_ignores_unknown_fields_and_rejects_bad_rating() {
        let patch: UpdateSessionRequest =
            serde_json::from_str(r#"{"clientId":"nope","rating":9}"#).unwrap();
        let mut session = scheduled();

        assert!(patch.apply(&mut session).is_err());
        assert_eq!(session.rating, None);
    }

    #[test]
    fn test_difficulty_wire_name() {
        let patch: UpdateSessionRequest =
            serde_json::from_str(r#"{"difficulty":"very_hard"}"#).unwrap();
        assert_eq!(patch.difficulty, Some(Difficulty::VeryHard));
    }
}
