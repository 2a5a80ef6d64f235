//! Role dashboards composed from paged controllers.

mod admin;
mod my_courses;
mod student;
mod teacher;

pub use admin::AdminDashboard;
pub use my_courses::MyCourses;
pub use student::StudentDashboard;
pub use teacher::{RosterView, TeacherDashboard};

use crate::api::ApiError;
use crate::endpoint::{ItemId, PagedEndpoint};
use crate::paged::{DeleteOutcome, PagedResource};
use crate::prompt::{Confirm, Notifier};

/// Confirm, delete and report the outcome as a notification.
pub async fn delete_with_notice<E, C, N>(
    resource: &mut PagedResource<E>,
    id: ItemId<E>,
    confirm: &C,
    notifier: &N,
) -> Result<DeleteOutcome, ApiError>
where
    E: PagedEndpoint,
    C: Confirm + ?Sized,
    N: Notifier + ?Sized,
{
    let noun = resource.noun();
    let outcome = resource.delete(id, confirm).await;
    match &outcome {
        Ok(DeleteOutcome::Deleted) => {
            notifier.success(&format!("{} deleted successfully", noun.title()))
        }
        Ok(DeleteOutcome::Cancelled) => {}
        Err(_) => notifier.error(&format!("Failed to delete {}", noun.singular)),
    }
    outcome
}
