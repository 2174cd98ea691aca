//! In-memory aggregate of a project and its loaded language dictionaries

use std::collections::HashMap;

use crate::error::{Result, TranslateError};
use crate::models::project::{Dict, Project};
use crate::utils::dict::to_canonical_json;

/// A project together with one dictionary per loaded language.
///
/// Languages keep the order they were loaded in. The aggregate owns
/// formatting the dictionaries back to the canonical JSON text that is
/// committed to the repository.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub project: Project,
    langs: Vec<String>,
    dicts: HashMap<String, Dict>,
}

impl LoadedProject {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            langs: Vec::new(),
            dicts: HashMap::new(),
        }
    }

    pub fn with_dicts(project: Project, dicts: Vec<(String, Dict)>) -> Self {
        let mut loaded = Self::new(project);
        for (lang, dict) in dicts {
            loaded.set_dict(&lang, dict);
        }
        loaded
    }

    /// Add or replace one language's dictionary
    pub fn set_dict(&mut self, lang: &str, dict: Dict) {
        if !self.dicts.contains_key(lang) {
            self.langs.push(lang.to_string());
        }
        self.dicts.insert(lang.to_string(), dict);
    }

    /// Loaded languages, in load order
    pub fn languages(&self) -> &[String] {
        &self.langs
    }

    pub fn dict(&self, lang: &str) -> Option<&Dict> {
        self.dicts.get(lang)
    }

    pub fn dict_mut(&mut self, lang: &str) -> Option<&mut Dict> {
        self.dicts.get_mut(lang)
    }

    /// Canonical JSON text of one language's dictionary, pretty-printed with
    /// the project's indent width
    pub fn to_json(&self, lang: &str) -> Result<String> {
        let dict = self
            .dicts
            .get(lang)
            .ok_or_else(|| TranslateError::InvalidInput(format!("language not loaded: {lang}")))?;
        to_canonical_json(dict, self.project.indent)
    }
}
