use std::collections::HashSet;

use campus_auth::Session;
use campus_core::{Course, CourseId, PageRequest};

use crate::api::{ApiClient, EnrollmentApi};
use crate::endpoint::{self, CourseEndpoint, PagedEndpoint};

/// Upper bound of the single course fetch; enrolled courses are picked out
/// of this window.
pub const COURSE_WINDOW: u32 = 200;

/// Courses the student is enrolled in, paged on the client.
pub struct MyCourses<C = CourseEndpoint, A = ApiClient>
where
    C: PagedEndpoint<Item = Course>,
    A: EnrollmentApi,
{
    courses: C,
    enrollments: A,
    session: Session,
    all: Vec<Course>,
    page: PageRequest,
    error: Option<String>,
}

impl MyCourses {
    pub fn connect(client: &ApiClient, page_size: u32) -> Self {
        Self::new(
            endpoint::courses(client.clone()),
            client.clone(),
            client.session().clone(),
            page_size,
        )
    }
}

impl<C, A> MyCourses<C, A>
where
    C: PagedEndpoint<Item = Course>,
    A: EnrollmentApi,
{
    pub fn new(courses: C, enrollments: A, session: Session, page_size: u32) -> Self {
        Self {
            courses,
            enrollments,
            session,
            all: Vec::new(),
            page: PageRequest::new(1, page_size),
            error: None,
        }
    }

    /// Every enrolled course.
    pub fn all(&self) -> &[Course] {
        &self.all
    }

    /// The visible slice.
    pub fn page_items(&self) -> &[Course] {
        self.page.slice(&self.all)
    }

    pub fn total_items(&self) -> usize {
        self.all.len()
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Resolve the student, pick their enrollments, then fetch courses and
    /// keep the enrolled ones. Failures leave the previous list in place.
    pub async fn load(&mut self) {
        self.error = None;

        let Some(student) = self.session.student_id() else {
            self.error = Some("Student ID not found in token.".to_string());
            return;
        };

        let enrolled: HashSet<CourseId> = match self.enrollments.list_enrollments().await {
            Ok(all) => all
                .into_iter()
                .filter(|e| e.student_id == student)
                .map(|e| e.course_id)
                .collect(),
            Err(err) => {
                tracing::warn!(%student, "error loading enrollments: {err}");
                self.error = Some("Error loading enrollments.".to_string());
                return;
            }
        };

        if enrolled.is_empty() {
            self.all.clear();
            return;
        }

        match self.courses.list(PageRequest::new(1, COURSE_WINDOW)).await {
            Ok(res) => {
                self.all = res
                    .items
                    .into_iter()
                    .filter(|c| enrolled.contains(&c.id))
                    .collect();
            }
            Err(err) => {
                tracing::warn!(%student, "error loading courses data: {err}");
                self.error = Some("Error loading courses data.".to_string());
            }
        }
    }

    /// Paginator event; re-slices without touching the network.
    pub fn change_page(&mut self, page_index: u32, page_size: u32) {
        self.page = PageRequest::from_index(page_index, page_size);
    }
}
