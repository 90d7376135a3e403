pub mod dashboard;
pub mod fetch;
pub mod i18n;
pub mod logging;
pub mod prefs;
pub mod providers;
pub mod settings;
