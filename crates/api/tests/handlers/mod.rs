mod attendance_test;
mod auth_test;
mod children_test;
mod entries_test;
mod export_test;
mod middleware_test;
