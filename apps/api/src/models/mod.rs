pub mod application;
pub mod job_url;
pub mod preferences;

pub use application::{
    Application, ApplicationStatus, ApplicationUpdate, NewApplication,
};
pub use job_url::{JobUrl, JobUrlStatus, NewJobUrl};
pub use preferences::{NewUserPreferences, UserPreferences};
