//! The seam between a paged controller and the network.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use campus_core::{Course, Entity, PageRequest, PagedResponse, Student, Teacher, TeacherId};

use crate::api::{ApiClient, ApiError};
use crate::draft::{CourseDraft, FormDraft, StudentDraft, TeacherDraft};

pub type ItemId<E> = <<E as PagedEndpoint>::Item as Entity>::Id;

/// Human names of a resource, used in every message a controller produces.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Noun {
    pub singular: &'static str,
    pub plural: &'static str,
}

impl Noun {
    pub const STUDENT: Noun = Noun { singular: "student", plural: "students" };
    pub const TEACHER: Noun = Noun { singular: "teacher", plural: "teachers" };
    pub const COURSE: Noun = Noun { singular: "course", plural: "courses" };

    /// `"student"` → `"Student"`.
    pub fn title(&self) -> String {
        let mut chars = self.singular.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// List, create, update and delete for one resource.
#[async_trait]
pub trait PagedEndpoint: Send + Sync {
    type Item: Entity + Clone + Send + Sync;
    type Draft: FormDraft<Item = Self::Item>;

    fn noun(&self) -> Noun;

    async fn list(&self, page: PageRequest) -> Result<PagedResponse<Self::Item>, ApiError>;

    /// Returns the created entity verbatim; it may carry server-issued
    /// default credentials for new accounts.
    async fn create(&self, draft: &Self::Draft) -> Result<Value, ApiError>;

    async fn update(
        &self,
        id: <Self::Item as Entity>::Id,
        draft: &Self::Draft,
    ) -> Result<(), ApiError>;

    async fn delete(&self, id: <Self::Item as Entity>::Id) -> Result<(), ApiError>;
}

/// REST binding: `POST /{Resource}`, `PUT|DELETE /{Resource}/{id}`, and a
/// paged read at `list_path`.
#[derive(Debug, Clone)]
pub struct RestEndpoint<I, D> {
    client: ApiClient,
    resource: &'static str,
    list_path: String,
    noun: Noun,
    _marker: PhantomData<fn() -> (I, D)>,
}

impl<I, D> RestEndpoint<I, D> {
    /// Endpoint whose paged read lives at `/{resource}/paged`.
    pub fn new(client: ApiClient, resource: &'static str, noun: Noun) -> Self {
        Self {
            client,
            resource,
            list_path: format!("{resource}/paged"),
            noun,
            _marker: PhantomData,
        }
    }

    pub fn with_list_path(mut self, list_path: impl Into<String>) -> Self {
        self.list_path = list_path.into();
        self
    }

    pub fn list_path(&self) -> &str {
        &self.list_path
    }
}

pub type StudentEndpoint = RestEndpoint<Student, StudentDraft>;
pub type TeacherEndpoint = RestEndpoint<Teacher, TeacherDraft>;
pub type CourseEndpoint = RestEndpoint<Course, CourseDraft>;

pub fn students(client: ApiClient) -> StudentEndpoint {
    RestEndpoint::new(client, "Student", Noun::STUDENT)
}

pub fn teachers(client: ApiClient) -> TeacherEndpoint {
    RestEndpoint::new(client, "Teacher", Noun::TEACHER)
}

/// The course collection serves its paged read at the collection root.
pub fn courses(client: ApiClient) -> CourseEndpoint {
    RestEndpoint::new(client, "Course", Noun::COURSE).with_list_path("Course")
}

/// Courses taught by one teacher.
pub fn teacher_courses(client: ApiClient, teacher: TeacherId) -> CourseEndpoint {
    RestEndpoint::new(client, "Course", Noun::COURSE)
        .with_list_path(format!("Course/ByTeacher/{teacher}"))
}

#[async_trait]
impl<I, D> PagedEndpoint for RestEndpoint<I, D>
where
    I: Entity + Clone + DeserializeOwned + Send + Sync,
    D: FormDraft<Item = I>,
{
    type Item = I;
    type Draft = D;

    fn noun(&self) -> Noun {
        self.noun
    }

    async fn list(&self, page: PageRequest) -> Result<PagedResponse<I>, ApiError> {
        self.client.get_page(&self.list_path, page).await
    }

    async fn create(&self, draft: &D) -> Result<Value, ApiError> {
        self.client.post_json(self.resource, draft).await
    }

    async fn update(&self, id: I::Id, draft: &D) -> Result<(), ApiError> {
        self.client
            .put_json(&format!("{}/{}", self.resource, id), draft)
            .await
    }

    async fn delete(&self, id: I::Id) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", self.resource, id)).await
    }
}
