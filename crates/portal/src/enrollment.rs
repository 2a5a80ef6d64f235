//! Courses the signed-in student is enrolled in.
//!
//! Enrolling adds the course locally on success without re-fetching. The set
//! can drift from the server (a concurrent unenroll elsewhere is not seen)
//! until the next [`EnrollmentSet::refresh`].

use std::collections::BTreeSet;

use thiserror::Error;

use campus_auth::Session;
use campus_core::{CourseId, NewEnrollment, StudentId};

use crate::api::{ApiError, EnrollmentApi};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrollError {
    #[error("already enrolled in course {0}")]
    AlreadyEnrolled(CourseId),
    #[error("Student ID not found in token.")]
    NoStudent,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct EnrollmentSet<A> {
    api: A,
    session: Session,
    courses: BTreeSet<CourseId>,
}

impl<A: EnrollmentApi> EnrollmentSet<A> {
    pub fn new(api: A, session: Session) -> Self {
        Self {
            api,
            session,
            courses: BTreeSet::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn is_enrolled(&self, course: CourseId) -> bool {
        self.courses.contains(&course)
    }

    pub fn course_ids(&self) -> impl Iterator<Item = CourseId> + '_ {
        self.courses.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Replace the set with the enrollments of `student`.
    ///
    /// On failure the previous set is kept.
    pub async fn refresh(&mut self, student: StudentId) -> Result<(), ApiError> {
        let all = self.api.list_enrollments().await?;
        self.courses = all
            .into_iter()
            .filter(|e| e.student_id == student)
            .map(|e| e.course_id)
            .collect();
        tracing::debug!(%student, enrolled = self.courses.len(), "enrollments refreshed");
        Ok(())
    }

    /// Refresh for the student currently in the session.
    pub async fn refresh_current(&mut self) -> Result<(), EnrollError> {
        let student = self.session.student_id().ok_or(EnrollError::NoStudent)?;
        self.refresh(student).await?;
        Ok(())
    }

    /// Enroll the session's student in `course`.
    ///
    /// Rejected locally, without a network call, when already enrolled or
    /// when the session carries no student id.
    pub async fn enroll(&mut self, course: CourseId) -> Result<(), EnrollError> {
        if self.is_enrolled(course) {
            return Err(EnrollError::AlreadyEnrolled(course));
        }
        let student = self.session.student_id().ok_or(EnrollError::NoStudent)?;

        self.api
            .create_enrollment(NewEnrollment {
                student_id: student,
                course_id: course,
            })
            .await?;

        self.courses.insert(course);
        tracing::info!(%student, %course, "enrolled");
        Ok(())
    }
}
