//! Sigil Library
//!
//! Ordered collection of sigils loaded from a JSON document.

use serde_json::Value;
use sigil_path::{SamplerConfig, Vec3, generate_points};

use crate::ShowError;

/// A phrase and the drawing script that renders it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sigil {
    pub phrase: String,
    pub code: String,
}

impl Sigil {
    pub fn new(phrase: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            code: code.into(),
        }
    }

    /// Sample this sigil's drawing script
    pub fn points(&self, count: usize, config: &SamplerConfig) -> Vec<Vec3> {
        generate_points(&self.code, count, config)
    }
}

/// Sigil library
#[derive(Debug, Clone, Default)]
pub struct SigilLibrary {
    sigils: Vec<Sigil>,
}

impl SigilLibrary {
    pub fn new(sigils: Vec<Sigil>) -> Self {
        Self { sigils }
    }

    /// Load every sigil found in a JSON document.
    ///
    /// Any object with a string `sigilPhrase` contributes a sigil, taking its
    /// script from `sigilCode`, or from `drawCalls` when `sigilCode` is absent.
    /// Objects are visited depth-first in document order.
    pub fn from_json(json: &str) -> Result<Self, ShowError> {
        let root: Value = serde_json::from_str(json)?;
        let mut sigils = Vec::new();
        collect_sigils(&root, &mut sigils);

        if sigils.is_empty() {
            tracing::warn!("No sigil data found in JSON document");
        } else {
            tracing::debug!("Loaded {} sigils", sigils.len());
        }
        Ok(Self { sigils })
    }

    pub fn len(&self) -> usize {
        self.sigils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sigils.is_empty()
    }

    pub fn first(&self) -> Option<&Sigil> {
        self.sigils.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sigil> {
        self.sigils.iter()
    }

    /// Wrap any index, negative ones counting from the end
    pub fn wrap(&self, index: i64) -> Option<usize> {
        if self.sigils.is_empty() {
            return None;
        }
        Some(index.rem_euclid(self.sigils.len() as i64) as usize)
    }

    /// Get sigil at a wrapped index
    pub fn get(&self, index: i64) -> Option<&Sigil> {
        self.wrap(index).map(|i| &self.sigils[i])
    }

    /// Sample the sigil at a wrapped index; zero points when empty
    pub fn points_for(&self, index: i64, count: usize, config: &SamplerConfig) -> Vec<Vec3> {
        match self.get(index) {
            Some(sigil) => sigil.points(count, config),
            None => vec![Vec3::zeros(); count.max(1)],
        }
    }
}

fn collect_sigils(value: &Value, out: &mut Vec<Sigil>) {
    match value {
        Value::Object(map) => {
            if let Some(phrase) = map.get("sigilPhrase").and_then(Value::as_str) {
                let code = map
                    .get("sigilCode")
                    .and_then(Value::as_str)
                    .or_else(|| map.get("drawCalls").and_then(Value::as_str));
                match code {
                    Some(code) => out.push(Sigil::new(phrase, code)),
                    None => tracing::debug!("Sigil '{}' has no drawing script", phrase),
                }
            }
            for child in map.values() {
                collect_sigils(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_sigils(item, out);
            }
        }
        _ => {}
    }
}

/// Points for the first sigil of a JSON document.
///
/// Never fails: malformed JSON or an empty library yields `count` zero points.
pub fn extract_points(json: &str, count: usize, config: &SamplerConfig) -> Vec<Vec3> {
    match SigilLibrary::from_json(json) {
        Ok(library) => library.points_for(0, count, config),
        Err(e) => {
            tracing::error!("Failed to parse sigil JSON: {}", e);
            vec![Vec3::zeros(); count.max(1)]
        }
    }
}
