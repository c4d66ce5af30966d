use crate::types::StudentId;
use crate::validation::rules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[schema(value_type = String)]
    pub id: StudentId,
    pub name: String,
    pub rrn: String,
    pub guardian_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn new(name: String, rrn: String, guardian_email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StudentId::new(),
            name,
            rrn,
            guardian_email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request body for `POST /add-student`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudent {
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub rrn: String,
    #[serde(default, alias = "GuardianGmail")]
    #[validate(email)]
    pub guardian_email: Option<String>,
}

impl CreateStudent {
    pub fn into_student(self) -> Student {
        Student::new(
            self.name.trim().to_string(),
            self.rrn.trim().to_string(),
            normalize_email(self.guardian_email),
        )
    }
}

/// Request body for `PUT /update-student/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    #[serde(default)]
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub rrn: Option<String>,
    /// An empty string clears the stored address.
    #[serde(default, alias = "GuardianGmail")]
    #[validate(custom(function = "rules::validate_optional_email"))]
    pub guardian_email: Option<String>,
}

impl UpdateStudent {
    /// `None` leaves the address untouched, `Some(None)` clears it.
    pub fn guardian_email_change(&self) -> Option<Option<String>> {
        self.guardian_email
            .as_ref()
            .map(|email| normalize_email(Some(email.clone())))
    }
}

/// Body returned by `DELETE /delete-student/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStudentResponse {
    pub message: String,
    pub deleted_student: Student,
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_student_accepts_legacy_guardian_field() {
        let payload: CreateStudent = serde_json::from_value(json!({
            "name": "Asha",
            "rrn": "21CS001",
            "GuardianGmail": "parent@example.com"
        }))
        .unwrap();
        assert_eq!(payload.guardian_email.as_deref(), Some("parent@example.com"));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn create_student_requires_name_and_rrn() {
        let payload: CreateStudent =
            serde_json::from_value(json!({ "name": " ", "rrn": "" })).unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("rrn"));
    }

    #[test]
    fn create_student_rejects_malformed_email() {
        let payload: CreateStudent = serde_json::from_value(json!({
            "name": "Asha",
            "rrn": "21CS001",
            "guardianEmail": "not-an-email"
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn into_student_trims_fields() {
        let student = CreateStudent {
            name: " Asha ".into(),
            rrn: " 21CS001".into(),
            guardian_email: Some("  ".into()),
        }
        .into_student();
        assert_eq!(student.name, "Asha");
        assert_eq!(student.rrn, "21CS001");
        assert!(student.guardian_email.is_none());
    }

    #[test]
    fn update_student_blank_email_means_clear() {
        let untouched = UpdateStudent {
            name: Some("Asha K".into()),
            ..UpdateStudent::default()
        };
        assert_eq!(untouched.guardian_email_change(), None);

        let cleared = UpdateStudent {
            guardian_email: Some("".into()),
            ..UpdateStudent::default()
        };
        assert!(cleared.validate().is_ok());
        assert_eq!(cleared.guardian_email_change(), Some(None));

        let replaced = UpdateStudent {
            guardian_email: Some(" new@b.test ".into()),
            ..UpdateStudent::default()
        };
        assert_eq!(
            replaced.guardian_email_change(),
            Some(Some("new@b.test".to_string()))
        );
    }

    #[test]
    fn update_student_validates_present_fields_only() {
        assert!(UpdateStudent::default().validate().is_ok());

        let payload = UpdateStudent {
            guardian_email: Some("broken".into()),
            ..UpdateStudent::default()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn student_serializes_camel_case() {
        let student = Student::new("Asha".into(), "21CS001".into(), None);
        let value = serde_json::to_value(&student).unwrap();
        assert!(value.get("guardianEmail").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["rrn"], "21CS001");
    }
}
