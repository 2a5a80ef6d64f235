//! In-memory backends shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use campus_auth::Session;
use campus_core::{
    Course, CourseId, Enrollment, NewEnrollment, PageRequest, PagedResponse, Student, StudentId,
};

use crate::api::{ApiError, EnrollmentApi};
use crate::draft::CourseDraft;
use crate::endpoint::{Noun, PagedEndpoint};

/// Unsigned credential carrying `claims`.
pub fn token(claims: Value) -> String {
    format!("h.{}.s", URL_SAFE_NO_PAD.encode(claims.to_string()))
}

pub fn session_with(claims: Value) -> Session {
    let session = Session::in_memory();
    session.login(&token(claims)).unwrap();
    session
}

pub fn student_session(id: i64) -> Session {
    session_with(serde_json::json!({ "nameid": id, "role": "Student" }))
}

pub fn course(id: i64) -> Course {
    Course {
        id: CourseId::new(id),
        title: format!("Course {id}"),
        description: String::new(),
        teacher_id: None,
        teacher_name: None,
    }
}

fn failure(flag: &Mutex<bool>) -> Result<(), ApiError> {
    if *flag.lock().unwrap() {
        Err(ApiError::Api(500, "boom".into()))
    } else {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeEnrollments {
    pub rows: Arc<Mutex<Vec<Enrollment>>>,
    pub creates: Arc<Mutex<Vec<NewEnrollment>>>,
    pub rosters: Arc<Mutex<Vec<(CourseId, Student)>>>,
    pub fail: Arc<Mutex<bool>>,
}

impl FakeEnrollments {
    /// `(student, course)` pairs.
    pub fn with(pairs: &[(i64, i64)]) -> Self {
        let fake = Self::default();
        *fake.rows.lock().unwrap() = pairs
            .iter()
            .map(|&(s, c)| Enrollment {
                id: None,
                student_id: StudentId::new(s),
                course_id: CourseId::new(c),
                enrollment_date: None,
            })
            .collect();
        fake
    }

    pub fn create_count(&self) -> usize {
        self.creates.lock().unwrap().len()
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl EnrollmentApi for FakeEnrollments {
    async fn list_enrollments(&self) -> Result<Vec<Enrollment>, ApiError> {
        failure(&self.fail)?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn enrollments_by_student(
        &self,
        student: StudentId,
    ) -> Result<Vec<Enrollment>, ApiError> {
        failure(&self.fail)?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.student_id == student)
            .cloned()
            .collect())
    }

    async fn course_roster(&self, course: CourseId) -> Result<Vec<Student>, ApiError> {
        failure(&self.fail)?;
        Ok(self
            .rosters
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == course)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<(), ApiError> {
        self.creates.lock().unwrap().push(enrollment);
        failure(&self.fail)
    }
}

/// Course collection answering paged reads from memory.
#[derive(Clone, Default)]
pub struct FakeCourses {
    pub rows: Arc<Mutex<Vec<Course>>>,
    pub lists: Arc<Mutex<Vec<PageRequest>>>,
    pub deletes: Arc<Mutex<Vec<CourseId>>>,
    pub fail: Arc<Mutex<bool>>,
}

impl FakeCourses {
    pub fn with_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let fake = Self::default();
        *fake.rows.lock().unwrap() = ids.into_iter().map(course).collect();
        fake
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn last_list(&self) -> Option<PageRequest> {
        self.lists.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl PagedEndpoint for FakeCourses {
    type Item = Course;
    type Draft = CourseDraft;

    fn noun(&self) -> Noun {
        Noun::COURSE
    }

    async fn list(&self, page: PageRequest) -> Result<PagedResponse<Course>, ApiError> {
        self.lists.lock().unwrap().push(page);
        failure(&self.fail)?;
        let rows = self.rows.lock().unwrap();
        Ok(PagedResponse::new(page.slice(&rows).to_vec(), rows.len() as u64, page))
    }

    async fn create(&self, _draft: &CourseDraft) -> Result<Value, ApiError> {
        failure(&self.fail)?;
        Ok(Value::Null)
    }

    async fn update(&self, _id: CourseId, _draft: &CourseDraft) -> Result<(), ApiError> {
        failure(&self.fail)
    }

    async fn delete(&self, id: CourseId) -> Result<(), ApiError> {
        self.deletes.lock().unwrap().push(id);
        failure(&self.fail)?;
        self.rows.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}
