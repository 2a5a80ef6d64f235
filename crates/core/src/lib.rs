//! `campus-core`: shared records and primitives for the campus portal.
//!
//! This crate contains **pure** types (no IO, no transport). Everything the
//! portal exchanges with the remote API is described here.

pub mod entity;
pub mod error;
pub mod id;
pub mod paging;
pub mod records;

pub use entity::Entity;
pub use error::{require_filled, DomainError, DomainResult};
pub use id::{CourseId, EnrollmentId, StudentId, TeacherId};
pub use paging::{PageRequest, PagedResponse, DEFAULT_PAGE_SIZE};
pub use records::{Course, Enrollment, NewEnrollment, Student, Teacher};
