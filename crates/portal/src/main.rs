//! `campus` command-line client.
//!
//! ```bash
//! campus login admin@campus.io 'secret'
//! campus whoami
//! campus list students --page 2 --size 10
//! campus delete course 4
//! campus enroll 7
//! campus my-courses
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use campus_auth::{AccessGuard, FileCredentialStore, RecordingNavigator, Role, Session};
use campus_core::{CourseId, StudentId, TeacherId};
use campus_observability::LogFormat;
use campus_portal::dashboard::delete_with_notice;
use campus_portal::{
    AdminDashboard, ApiClient, AutoConfirm, Confirm, LogNotifier, LoginForm, MyCourses,
    PagedEndpoint, PagedResource, PortalConfig, ShellState, StdinConfirm, StudentDashboard,
    TeacherDashboard,
};

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus portal client", long_about = None)]
#[command(version)]
struct Cli {
    /// Human-readable logs instead of JSON
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, ValueEnum)]
enum Resource {
    Students,
    Teachers,
    Courses,
}

#[derive(Copy, Clone, ValueEnum)]
enum Kind {
    Student,
    Teacher,
    Course,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the credential for later commands
    Login { email: String, password: String },

    /// Forget the stored credential
    Logout,

    /// Show who the stored credential belongs to
    Whoami,

    /// Show one page of a list
    List {
        resource: Resource,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Page size (defaults to CAMPUS_PAGE_SIZE)
        #[arg(long)]
        size: Option<u32>,
    },

    /// Delete a student, teacher or course (admin; teachers may delete courses)
    Delete {
        kind: Kind,
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Students enrolled in one of your courses (teacher)
    Roster { course_id: i64 },

    /// Enroll in a course (student)
    Enroll { course_id: i64 },

    /// Courses you are enrolled in (student)
    MyCourses {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        size: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    campus_observability::init(if cli.pretty {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    });

    let config = PortalConfig::from_env().context("invalid configuration")?;
    let store = FileCredentialStore::new(&config.store_path);
    let session = Session::new(Arc::new(store));
    let client = ApiClient::new(config.api_url.clone(), session.clone());

    match cli.command {
        Commands::Login { email, password } => {
            let mut form = LoginForm::new(email, password);
            let outcome = form.submit(&client, &session).await;
            println!("{}", form.message());
            outcome?;
            let shell = ShellState::from_session(&session);
            if let Some(home) = shell.home() {
                println!("home: /{}", home.path());
            }
        }
        Commands::Logout => {
            ShellState::from_session(&session).logout(&session)?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let Some(principal) = session.principal() else {
                bail!("not logged in");
            };
            print_json(&principal)?;
        }
        Commands::List { resource, page, size } => {
            let size = size.unwrap_or(config.page_size);
            list(&client, &session, resource, page, size).await?;
        }
        Commands::Delete { kind, id, yes } => {
            let confirm: Box<dyn Confirm> = if yes {
                Box::new(AutoConfirm(true))
            } else {
                Box::new(StdinConfirm)
            };
            delete(&client, &session, kind, id, confirm.as_ref(), config.page_size).await?;
        }
        Commands::Roster { course_id } => {
            require(&session, Role::Teacher)?;
            let mut dash = TeacherDashboard::connect(&client, config.page_size)?;
            dash.view_students(CourseId::new(course_id)).await;
            if !dash.roster().open {
                bail!("could not load the roster of course {course_id}");
            }
            print_json(&dash.roster().students)?;
        }
        Commands::Enroll { course_id } => {
            require(&session, Role::Student)?;
            let mut dash = StudentDashboard::connect(&client, config.page_size);
            dash.enrollments.refresh_current().await?;
            dash.enroll(CourseId::new(course_id), &LogNotifier).await?;
            println!("Enrolled successfully");
        }
        Commands::MyCourses { page, size } => {
            require(&session, Role::Student)?;
            let mut mine = MyCourses::connect(&client, config.page_size);
            mine.load().await;
            if let Some(msg) = mine.error_message() {
                bail!("{msg}");
            }
            mine.change_page(page.saturating_sub(1), size.unwrap_or(config.page_size));
            println!("page {} ({} enrolled)", mine.page().page_number, mine.total_items());
            print_json(&mine.page_items())?;
        }
    }

    Ok(())
}

/// Route guard for a command; denied sessions are told to sign in again.
fn require(session: &Session, role: Role) -> Result<()> {
    let navigator = RecordingNavigator::new();
    if AccessGuard::new(role, session.clone(), &navigator).can_enter() {
        Ok(())
    } else {
        bail!("this command requires the {role} role; sign in with `campus login`")
    }
}

async fn list(
    client: &ApiClient,
    session: &Session,
    resource: Resource,
    page: u32,
    size: u32,
) -> Result<()> {
    let index = page.saturating_sub(1);
    match (resource, session.role()) {
        (Resource::Students, _) => {
            require(session, Role::Admin)?;
            let mut dash = AdminDashboard::connect(client, size);
            show(&mut dash.students, index, size).await
        }
        (Resource::Teachers, _) => {
            require(session, Role::Admin)?;
            let mut dash = AdminDashboard::connect(client, size);
            show(&mut dash.teachers, index, size).await
        }
        (Resource::Courses, Some(Role::Teacher)) => {
            let mut dash = TeacherDashboard::connect(client, size)?;
            show(&mut dash.courses, index, size).await
        }
        (Resource::Courses, Some(Role::Student)) => {
            let mut dash = StudentDashboard::connect(client, size);
            show(&mut dash.catalog, index, size).await
        }
        (Resource::Courses, _) => {
            require(session, Role::Admin)?;
            let mut dash = AdminDashboard::connect(client, size);
            show(&mut dash.courses, index, size).await
        }
    }
}

async fn show<E>(resource: &mut PagedResource<E>, index: u32, size: u32) -> Result<()>
where
    E: PagedEndpoint,
    E::Item: Serialize,
{
    resource.change_page(index, size).await;
    if let Some(msg) = resource.error_message() {
        bail!("{msg}");
    }
    println!(
        "{} page {}/{} ({} total)",
        resource.noun().plural,
        resource.page_number(),
        resource.total_pages().max(1),
        resource.total_items()
    );
    print_json(&resource.items())
}

async fn delete(
    client: &ApiClient,
    session: &Session,
    kind: Kind,
    id: i64,
    confirm: &dyn Confirm,
    page_size: u32,
) -> Result<()> {
    let outcome = match (kind, session.role()) {
        (Kind::Course, Some(Role::Teacher)) => {
            let mut dash = TeacherDashboard::connect(client, page_size)?;
            delete_with_notice(&mut dash.courses, CourseId::new(id), confirm, &LogNotifier).await?
        }
        (Kind::Student, _) => {
            require(session, Role::Admin)?;
            let mut dash = AdminDashboard::connect(client, page_size);
            delete_with_notice(&mut dash.students, StudentId::new(id), confirm, &LogNotifier).await?
        }
        (Kind::Teacher, _) => {
            require(session, Role::Admin)?;
            let mut dash = AdminDashboard::connect(client, page_size);
            delete_with_notice(&mut dash.teachers, TeacherId::new(id), confirm, &LogNotifier).await?
        }
        (Kind::Course, _) => {
            require(session, Role::Admin)?;
            let mut dash = AdminDashboard::connect(client, page_size);
            delete_with_notice(&mut dash.courses, CourseId::new(id), confirm, &LogNotifier).await?
        }
    };
    println!("{outcome:?}");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
