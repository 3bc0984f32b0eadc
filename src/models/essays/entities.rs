use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Essay lifecycle status.
//
// An essay only ever moves forward: uploaded -> transcribed -> evaluated.
// The single backward transition (evaluated -> transcribed) happens when
// an evaluation is deleted to allow re-evaluation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub enum EssayStatus {
    Uploaded,
    Transcribed,
    Evaluated,
}

impl EssayStatus {
    /// Whether the given forward/backward transition is part of the
    /// essay lifecycle.
    pub fn can_transition_to(&self, next: EssayStatus) -> bool {
        matches!(
            (self, next),
            (EssayStatus::Uploaded, EssayStatus::Transcribed)
                | (EssayStatus::Transcribed, EssayStatus::Evaluated)
                | (EssayStatus::Evaluated, EssayStatus::Transcribed)
        )
    }
}

impl<'de> Deserialize<'de> for EssayStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "uploaded" => Ok(EssayStatus::Uploaded),
            "transcribed" => Ok(EssayStatus::Transcribed),
            "evaluated" => Ok(EssayStatus::Evaluated),
            _ => Err(serde::de::Error::custom(format!(
                "invalid essay status: '{s}'. supported: uploaded, transcribed, evaluated"
            ))),
        }
    }
}

impl std::fmt::Display for EssayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EssayStatus::Uploaded => write!(f, "uploaded"),
            EssayStatus::Transcribed => write!(f, "transcribed"),
            EssayStatus::Evaluated => write!(f, "evaluated"),
        }
    }
}

impl std::str::FromStr for EssayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploaded" => Ok(EssayStatus::Uploaded),
            "transcribed" => Ok(EssayStatus::Transcribed),
            "evaluated" => Ok(EssayStatus::Evaluated),
            _ => Err(format!("Invalid essay status: {s}")),
        }
    }
}

// Essay entity
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct Essay {
    pub id: i64,
    // Owner; every read and write is scoped by it
    pub user_id: i64,
    pub title: String,
    pub theme: Option<String>,
    // Object store path of the source image, immutable after creation
    pub image_path: String,
    // Public URL of the source image, immutable after creation
    pub image_url: String,
    // Unedited OCR output, written once by the transcription step
    pub raw_transcription: Option<String>,
    // Reconstructed text, written by the transcription step only
    pub transcription: Option<String>,
    pub status: EssayStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Essay {
    /// True when the transcription field holds usable text.
    pub fn has_transcription(&self) -> bool {
        self.transcription
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_forward_transitions() {
        assert!(EssayStatus::Uploaded.can_transition_to(EssayStatus::Transcribed));
        assert!(EssayStatus::Transcribed.can_transition_to(EssayStatus::Evaluated));
    }

    #[test]
    fn test_status_no_skipping() {
        assert!(!EssayStatus::Uploaded.can_transition_to(EssayStatus::Evaluated));
        assert!(!EssayStatus::Transcribed.can_transition_to(EssayStatus::Uploaded));
        assert!(!EssayStatus::Evaluated.can_transition_to(EssayStatus::Uploaded));
    }

    #[test]
    fn test_status_reevaluation_escape_hatch() {
        assert!(EssayStatus::Evaluated.can_transition_to(EssayStatus::Transcribed));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            EssayStatus::Uploaded,
            EssayStatus::Transcribed,
            EssayStatus::Evaluated,
        ] {
            assert_eq!(status.to_string().parse::<EssayStatus>(), Ok(status));
        }
        assert!("graded".parse::<EssayStatus>().is_err());
    }

    #[test]
    fn test_has_transcription() {
        let mut essay = Essay {
            id: 1,
            user_id: 1,
            title: "Redação Teste".to_string(),
            theme: None,
            image_path: "1/a.png".to_string(),
            image_url: "https://x/files/1/a.png".to_string(),
            raw_transcription: None,
            transcription: None,
            status: EssayStatus::Uploaded,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!(!essay.has_transcription());

        essay.transcription = Some("   ".to_string());
        assert!(!essay.has_transcription());

        essay.transcription = Some("O Brasil enfrenta...".to_string());
        assert!(essay.has_transcription());
    }
}
