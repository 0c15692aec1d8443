pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail};
pub use job::{Job, JobDetail, JobListing, JobSummary};
pub use user::{User, UserDetail};
