pub mod check_email;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod results;

pub use check_email::check_email_page;
pub use dashboard::{dashboard_page, DashboardVm};
pub use home::home_page;
pub use login::login_page;
pub use results::{results_page, ResultsVm};
