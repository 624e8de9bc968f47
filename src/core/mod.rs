pub mod attendance;
pub mod business_day;
pub mod calendar;
pub mod checkin;
pub mod log;
pub mod member;
pub mod report;
