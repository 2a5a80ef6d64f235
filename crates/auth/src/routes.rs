use crate::Role;

/// Anonymous entry point; every rejected navigation lands here.
pub const ENTRY_POINT: &str = "/";

/// Navigable screens of the portal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `""`: forwards to the student dashboard.
    Root,
    StudentDashboard,
    StudentCourses,
    TeacherDashboard,
    AdminDashboard,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Root,
        Route::StudentDashboard,
        Route::StudentCourses,
        Route::TeacherDashboard,
        Route::AdminDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "",
            Route::StudentDashboard => "student",
            Route::StudentCourses => "student/my-courses",
            Route::TeacherDashboard => "teacher",
            Route::AdminDashboard => "admin",
        }
    }

    /// Match a path, ignoring leading and trailing slashes.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim_matches('/');
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Follow the redirect of `Root`; other routes resolve to themselves.
    pub fn resolve(self) -> Route {
        match self {
            Route::Root => Route::StudentDashboard,
            other => other,
        }
    }

    /// Role a session must hold to enter the (resolved) route.
    pub fn required_role(&self) -> Role {
        match self.resolve() {
            Route::StudentDashboard | Route::StudentCourses => Role::Student,
            Route::TeacherDashboard => Role::Teacher,
            Route::AdminDashboard => Role::Admin,
            Route::Root => Role::Student,
        }
    }
}
