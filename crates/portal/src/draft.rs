//! Form drafts: the editable, not-yet-saved shape of each resource.

use serde::{Deserialize, Serialize};

use campus_core::{require_filled, Course, DomainResult, Entity, Student, Teacher, TeacherId};

/// Draft of a resource as held by an open create/edit form.
pub trait FormDraft: Clone + Default + Serialize + Send + Sync {
    type Item: Entity;

    /// Copy an existing item field-by-field into a draft.
    fn from_item(item: &Self::Item) -> Self;

    /// `(wire name, value)` of every field that must not be blank.
    fn required_fields(&self) -> Vec<(&'static str, &str)>;

    /// Local validation performed before any network call.
    fn validate(&self) -> DomainResult<()> {
        require_filled(&self.required_fields())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl FormDraft for StudentDraft {
    type Item = Student;

    fn from_item(item: &Student) -> Self {
        Self {
            full_name: item.full_name.clone(),
            email: item.email.clone(),
            phone_number: item.phone_number.clone(),
        }
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("fullName", self.full_name.as_str()), ("email", self.email.as_str())]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDraft {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

impl FormDraft for TeacherDraft {
    type Item = Teacher;

    fn from_item(item: &Teacher) -> Self {
        Self {
            full_name: item.full_name.clone(),
            email: item.email.clone(),
            specialization: item.specialization.clone(),
        }
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("fullName", self.full_name.as_str()), ("email", self.email.as_str())]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<TeacherId>,
}

impl FormDraft for CourseDraft {
    type Item = Course;

    fn from_item(item: &Course) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            teacher_id: item.teacher_id,
        }
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("title", self.title.as_str())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::{CourseId, StudentId};

    #[test]
    fn edit_draft_copies_every_field() {
        let student = Student {
            id: StudentId::new(3),
            full_name: "Omar Ali".into(),
            email: "omar@campus.io".into(),
            phone_number: Some("555".into()),
        };
        let draft = StudentDraft::from_item(&student);
        assert_eq!(draft.full_name, "Omar Ali");
        assert_eq!(draft.email, "omar@campus.io");
        assert_eq!(draft.phone_number.as_deref(), Some("555"));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn blank_title_fails_course_validation() {
        let course = Course {
            id: CourseId::new(1),
            title: "  ".into(),
            description: String::new(),
            teacher_id: None,
            teacher_name: None,
        };
        assert!(CourseDraft::from_item(&course).validate().is_err());
    }

    #[test]
    fn draft_serializes_camel_case_body() {
        let draft = TeacherDraft {
            full_name: "Dina".into(),
            email: "dina@campus.io".into(),
            specialization: None,
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"fullName": "Dina", "email": "dina@campus.io"})
        );
    }
}
