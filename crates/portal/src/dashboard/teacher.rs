use campus_auth::Session;
use campus_core::{Course, CourseId, DomainError, Student, TeacherId};

use crate::api::{ApiClient, EnrollmentApi};
use crate::endpoint::{self, CourseEndpoint, PagedEndpoint};
use crate::paged::PagedResource;

/// Students enrolled in one course, shown as a modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    pub open: bool,
    pub course: Option<CourseId>,
    pub students: Vec<Student>,
}

impl RosterView {
    pub fn has_students(&self) -> bool {
        !self.students.is_empty()
    }
}

/// Courses taught by the signed-in teacher plus a per-course roster.
pub struct TeacherDashboard<C = CourseEndpoint, A = ApiClient>
where
    C: PagedEndpoint<Item = Course>,
    A: EnrollmentApi,
{
    teacher: TeacherId,
    pub courses: PagedResource<C>,
    enrollments: A,
    roster: RosterView,
}

impl TeacherDashboard {
    /// Dashboard for the teacher in the client's session.
    pub fn connect(client: &ApiClient, page_size: u32) -> Result<Self, DomainError> {
        let teacher = teacher_of(client.session())?;
        Ok(Self::new(
            teacher,
            endpoint::teacher_courses(client.clone(), teacher),
            client.clone(),
            page_size,
        ))
    }
}

/// Teacher id of the session; sessions without one cannot open the dashboard.
pub fn teacher_of(session: &Session) -> Result<TeacherId, DomainError> {
    session.teacher_id().ok_or(DomainError::Unauthorized)
}

impl<C, A> TeacherDashboard<C, A>
where
    C: PagedEndpoint<Item = Course>,
    A: EnrollmentApi,
{
    pub fn new(teacher: TeacherId, courses: C, enrollments: A, page_size: u32) -> Self {
        Self {
            teacher,
            courses: PagedResource::with_page_size(courses, page_size),
            enrollments,
            roster: RosterView::default(),
        }
    }

    pub fn teacher(&self) -> TeacherId {
        self.teacher
    }

    pub fn roster(&self) -> &RosterView {
        &self.roster
    }

    /// Load the roster of `course`. The view opens only when the load
    /// succeeds; on failure the list stays empty.
    pub async fn view_students(&mut self, course: CourseId) {
        self.roster.course = Some(course);
        self.roster.students.clear();

        match self.enrollments.course_roster(course).await {
            Ok(students) => {
                self.roster.students = students;
                self.roster.open = true;
            }
            Err(err) => {
                tracing::warn!(%course, "error loading students for course: {err}");
            }
        }
    }

    pub fn close_students(&mut self) {
        self.roster.open = false;
        self.roster.students.clear();
    }
}
