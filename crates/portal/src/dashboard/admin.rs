use campus_core::{Course, Student, Teacher};

use crate::api::ApiClient;
use crate::endpoint::{self, CourseEndpoint, PagedEndpoint, StudentEndpoint, TeacherEndpoint};
use crate::paged::PagedResource;

/// Students, teachers and courses side by side, each paged on its own.
pub struct AdminDashboard<S = StudentEndpoint, T = TeacherEndpoint, C = CourseEndpoint>
where
    S: PagedEndpoint<Item = Student>,
    T: PagedEndpoint<Item = Teacher>,
    C: PagedEndpoint<Item = Course>,
{
    pub students: PagedResource<S>,
    pub teachers: PagedResource<T>,
    pub courses: PagedResource<C>,
}

impl AdminDashboard {
    pub fn connect(client: &ApiClient, page_size: u32) -> Self {
        Self::new(
            endpoint::students(client.clone()),
            endpoint::teachers(client.clone()),
            endpoint::courses(client.clone()),
            page_size,
        )
    }
}

impl<S, T, C> AdminDashboard<S, T, C>
where
    S: PagedEndpoint<Item = Student>,
    T: PagedEndpoint<Item = Teacher>,
    C: PagedEndpoint<Item = Course>,
{
    pub fn new(students: S, teachers: T, courses: C, page_size: u32) -> Self {
        Self {
            students: PagedResource::with_page_size(students, page_size),
            teachers: PagedResource::with_page_size(teachers, page_size),
            courses: PagedResource::with_page_size(courses, page_size),
        }
    }

    /// Load the first page of all three lists concurrently. One failing list
    /// does not affect the others.
    pub async fn init(&mut self) {
        tokio::join!(self.students.load(), self.teachers.load(), self.courses.load());
    }
}
