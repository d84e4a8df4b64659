use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::models::generation::GeneratedProgram;

static JSON_FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```json\s*").expect("json fence pattern compiles"));
static BARE_FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```\s*").expect("bare fence pattern compiles"));
static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*$").expect("closing fence pattern compiles"));

/// Removes a surrounding ```json or ``` fence, if any. Unfenced text is only trimmed.
pub fn strip_code_fences(response: &str) -> String {
    let content = response.trim();

    let opened = if JSON_FENCE_OPEN.is_match(content) {
        JSON_FENCE_OPEN.replace(content, "")
    } else if content.starts_with("```") {
        BARE_FENCE_OPEN.replace(content, "")
    } else {
        return content.to_string();
    };

    FENCE_CLOSE.replace(&opened, "").trim().to_string()
}

pub fn parse_program_response(response: &str) -> Result<GeneratedProgram> {
    let json_content = strip_code_fences(response);

    let program: GeneratedProgram = serde_json::from_str(&json_content)
        .map_err(|e| anyhow::anyhow!("Failed to parse program JSON: {}", e))?;

    if program.workouts.is_empty() {
        return Err(anyhow::anyhow!("Program response contains no workouts"));
    }

    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM_JSON: &str = r#"{
  "name": "Force & Cardio",
  "description": "Huit semaines pour progresser",
  "duration": 8,
  "frequency": 2,
  "workouts": [
    {
      "day": 1,
      "name": "Haut du corps",
      "focus": "Poitrine et dos",
      "exercises": [
        {"name": "Développé couché", "sets": 4, "reps": "8-10", "rest": 90, "notes": "Contrôler la descente"}
      ]
    }
  ]
}"#;

    #[test]
    fn test_strip_json_fence() {
        let fenced = format!("```json\n{}\n```", PROGRAM_JSON);
        assert_eq!(strip_code_fences(&fenced), PROGRAM_JSON);
    }

    #[test]
    fn test_strip_json_fence_is_case_insensitive() {
        let fenced = format!("```JSON  \n{}\n```  \n", PROGRAM_JSON);
        assert_eq!(strip_code_fences(&fenced), PROGRAM_JSON);
    }

    #[test]
    fn test_strip_bare_fence() {
        let fenced = format!("  ```\n{}\n```", PROGRAM_JSON);
        assert_eq!(strip_code_fences(&fenced), PROGRAM_JSON);
    }

    #[test]
    fn test_strip_leaves_unfenced_text() {
        assert_eq!(strip_code_fences(&format!("\n{}\n", PROGRAM_JSON)), PROGRAM_JSON);
    }

    #[test]
    fn test_strip_is_idempotent() {
        for input in [
            format!("```json\n{}\n```", PROGRAM_JSON),
            format!("```\n{}\n```", PROGRAM_JSON),
            PROGRAM_JSON.to_string(),
        ] {
            let once = strip_code_fences(&input);
            assert_eq!(strip_code_fences(&once), once);
        }
    }

    #[test]
    fn test_fenced_and_plain_parse_to_same_program() {
        let plain = parse_program_response(PROGRAM_JSON).unwrap();
        let json_fenced =
            parse_program_response(&format!("```json\n{}\n```", PROGRAM_JSON)).unwrap();
        let bare_fenced = parse_program_response(&format!("```\n{}\n```", PROGRAM_JSON)).unwrap();

        assert_eq!(plain, json_fenced);
        assert_eq!(plain, bare_fenced);
        assert_eq!(plain.name, "Force & Cardio");
        assert_eq!(plain.workouts[0].focus.as_deref(), Some("Poitrine et dos"));
        assert!(!plain.generated_by_ai);
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_program_response("Voici votre programme : ...").is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(parse_program_response(r#"{"title": "no name field"}"#).is_err());
        assert!(parse_program_response(r#"{"name": "Vide", "workouts": []}"#).is_err());
    }

    #[test]
    fn test_parse_accepts_named_weekday() {
        let program = parse_program_response(
            r#"{"name":"P","workouts":[{"day":"Lundi","name":"A","exercises":[{"name":"Squat","sets":3,"reps":"10","rest":60}]}]}"#,
        )
        .unwrap();

        assert_eq!(program.workouts[0].day, 0);
        assert_eq!(program.workouts[0].name, "A");
        assert_eq!(program.workouts[0].exercises[0].name, "Squat");
    }

    #[test]
    fn test_parse_accepts_null_description() {
        let program = parse_program_response(
            r#"{"name":"P","description":null,"workouts":[{"day":1,"name":"A","exercises":[]}]}"#,
        )
        .unwrap();

        assert_eq!(program.description, "");
        assert_eq!(program.workouts[0].day, 1);
    }
}
