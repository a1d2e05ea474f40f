//! Provider registry and factory
//!
//! This module provides:
//! - Central registration of all supported job boards
//! - A factory function to resolve providers by name
//!
//! All board-specific logic lives in the provider modules. The collector
//! interacts exclusively through the `VacancyProvider` trait.

pub mod adapter;
pub mod headhunter;
pub mod superjob;

use std::sync::Arc;

use crate::config::Config;
use adapter::VacancyProvider;

/// Returns a provider instance by name, or `None` if unknown.
///
/// CONTRACT:
/// - `name` must match an entry of `Config::providers`
/// - Names are lowercase and stable
pub fn get_provider(name: &str, config: &Config) -> Option<Arc<dyn VacancyProvider>> {
    match name {
        "headhunter" => Some(Arc::new(headhunter::HeadHunterProvider::new(
            config.headhunter.clone(),
        ))),
        "superjob" => Some(Arc::new(superjob::SuperJobProvider::new(
            config.superjob.clone(),
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        let config = Config::default();
        assert_eq!(
            get_provider("headhunter", &config).map(|p| p.name()),
            Some("headhunter")
        );
        assert_eq!(
            get_provider("superjob", &config).map(|p| p.name()),
            Some("superjob")
        );
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert!(get_provider("linkedin", &Config::default()).is_none());
    }
}
