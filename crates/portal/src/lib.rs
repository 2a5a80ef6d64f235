//! `campus-portal`
//!
//! **Responsibility:** Role-based client for the campus API.
//!
//! This crate provides:
//! - The HTTP boundary (bearer credential on every request)
//! - One generic paged-resource controller reused by every list
//! - Enrollment tracking for the signed-in student
//! - Login, the app shell header, and the three role dashboards
//!
//! The API is the authority; the client keeps no durable state besides the
//! credential.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod draft;
pub mod endpoint;
pub mod enrollment;
pub mod login;
pub mod paged;
pub mod prompt;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError, Authenticator, EnrollmentApi, LoginRequest};
pub use config::{ConfigError, PortalConfig};
pub use dashboard::{AdminDashboard, MyCourses, RosterView, StudentDashboard, TeacherDashboard};
pub use draft::{CourseDraft, FormDraft, StudentDraft, TeacherDraft};
pub use endpoint::{Noun, PagedEndpoint, RestEndpoint};
pub use enrollment::{EnrollError, EnrollmentSet};
pub use login::{LoginError, LoginForm, ShellState};
pub use paged::{DeleteOutcome, FormState, LoadState, PagedResource, SubmitError, Submitted};
pub use prompt::{AutoConfirm, Confirm, LogNotifier, Notifier, StdinConfirm};
