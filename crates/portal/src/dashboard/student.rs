use campus_core::{Course, CourseId};

use crate::api::{ApiClient, EnrollmentApi};
use crate::endpoint::{self, CourseEndpoint, PagedEndpoint};
use crate::enrollment::{EnrollError, EnrollmentSet};
use crate::paged::PagedResource;
use crate::prompt::Notifier;

/// Read-only course catalog with per-course enrollment.
pub struct StudentDashboard<C = CourseEndpoint, A = ApiClient>
where
    C: PagedEndpoint<Item = Course>,
    A: EnrollmentApi,
{
    pub catalog: PagedResource<C>,
    pub enrollments: EnrollmentSet<A>,
}

impl StudentDashboard {
    pub fn connect(client: &ApiClient, page_size: u32) -> Self {
        Self::new(
            endpoint::courses(client.clone()),
            EnrollmentSet::new(client.clone(), client.session().clone()),
            page_size,
        )
    }
}

impl<C, A> StudentDashboard<C, A>
where
    C: PagedEndpoint<Item = Course>,
    A: EnrollmentApi,
{
    pub fn new(catalog: C, enrollments: EnrollmentSet<A>, page_size: u32) -> Self {
        Self {
            catalog: PagedResource::with_page_size(catalog, page_size),
            enrollments,
        }
    }

    /// Load the first catalog page and the student's current enrollments.
    pub async fn init(&mut self) {
        let (_, refreshed) = tokio::join!(self.catalog.load(), self.enrollments.refresh_current());
        if let Err(err) = refreshed {
            tracing::warn!("could not load enrollments: {err}");
        }
    }

    /// Enroll in `course` and report the outcome as a notification.
    pub async fn enroll<N>(&mut self, course: CourseId, notifier: &N) -> Result<(), EnrollError>
    where
        N: Notifier + ?Sized,
    {
        let outcome = self.enrollments.enroll(course).await;
        match &outcome {
            Ok(()) => notifier.success("Enrolled successfully"),
            Err(EnrollError::NoStudent) => notifier.error("Student ID not found in token."),
            Err(EnrollError::AlreadyEnrolled(_)) => {
                notifier.error("Already enrolled in this course.")
            }
            Err(EnrollError::Api(err)) => {
                tracing::warn!(%course, "enroll error: {err}");
                notifier.error("Failed to enroll");
            }
        }
        outcome
    }
}
