pub mod admin;
pub mod dashboard;
pub mod home;
pub mod login;

pub use admin::AdminPage;
pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use login::LoginPage;
