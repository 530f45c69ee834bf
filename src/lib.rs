// Library for tests to access modules

pub mod capture;
pub mod config;
pub mod models;
pub mod version;
pub mod worker;
