//! Process-wide, read-only state: the parsed catalog plus configuration.
//! Built once before any request and shared by reference afterwards.

use crate::catalog::{load_catalog_file, load_techniques_file, Catalog, CatalogError, TechniqueCatalog};
use crate::compose::{compose, Character, ComposeError, Rng};
use crate::config::AppConfig;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub techniques: TechniqueCatalog,
}

impl AppContext {
    /// Any catalog error is fatal; the technique appendix is optional.
    pub fn load(config: AppConfig) -> Result<Self, CatalogError> {
        let catalog = load_catalog_file(&config.catalog_path)?;
        let techniques = match load_techniques_file(&config.techniques_path)? {
            Some(techniques) => techniques,
            None => {
                tracing::warn!(
                    path = %config.techniques_path.display(),
                    "technique file not found, relevant techniques will be empty"
                );
                TechniqueCatalog::default()
            }
        };
        tracing::info!(
            path = %config.catalog_path.display(),
            archetypes = catalog.len(),
            techniques = techniques.len(),
            "catalog loaded"
        );
        Ok(Self {
            config,
            catalog,
            techniques,
        })
    }

    pub fn new(config: AppConfig, catalog: Catalog, techniques: TechniqueCatalog) -> Self {
        Self {
            config,
            catalog,
            techniques,
        }
    }

    /// Compose with a freshly seeded generator.
    pub fn character<S: AsRef<str>>(&self, names: &[S]) -> Result<Character<'_>, ComposeError> {
        self.character_with(names, &mut Rng::from_entropy())
    }

    pub fn character_with<S: AsRef<str>>(
        &self,
        names: &[S],
        rng: &mut Rng,
    ) -> Result<Character<'_>, ComposeError> {
        compose(&self.catalog, names, &self.config.archetype_counts, rng)
    }
}
