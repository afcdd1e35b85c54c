//! Pipeline configuration.
//!
//! Defaults reproduce the documented extraction and boost constants. A TOML
//! file can override any subset of fields; `with_env_overrides` applies a small
//! set of environment overrides on top.

use serde::{Deserialize, Serialize};

use crate::network::BoostConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sentences at or below this many characters are discarded.
    pub min_sentence_chars: usize,
    /// Hard cap on entity pairs examined per sentence.
    pub max_pairs_per_sentence: usize,
    /// Maximum length of the `source_context` snippet stored on entities.
    pub context_snippet_chars: usize,
    /// Added to a relationship's confidence on strong corroboration language.
    pub strong_corroboration_bonus: f64,
    pub max_relationship_confidence: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_sentence_chars: 20,
            max_pairs_per_sentence: 10,
            context_snippet_chars: 200,
            strong_corroboration_bonus: 0.15,
            max_relationship_confidence: 0.95,
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_pairs_per_sentence == 0 {
            return Err(crate::Error::Config(
                "max_pairs_per_sentence must be greater than 0".into(),
            ));
        }
        if self.context_snippet_chars == 0 {
            return Err(crate::Error::Config(
                "context_snippet_chars must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_relationship_confidence) {
            return Err(crate::Error::Config(
                "max_relationship_confidence must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extraction: ExtractionConfig,
    pub boosts: BoostConfig,
}

impl PipelineConfig {
    /// Fewer pairs, longer sentences: trades recall for precision.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            extraction: ExtractionConfig {
                min_sentence_chars: 40,
                max_pairs_per_sentence: 5,
                ..ExtractionConfig::default()
            },
            boosts: BoostConfig::default(),
        }
    }

    #[must_use]
    pub fn lenient() -> Self {
        Self {
            extraction: ExtractionConfig {
                min_sentence_chars: 10,
                max_pairs_per_sentence: 20,
                context_snippet_chars: 400,
                ..ExtractionConfig::default()
            },
            boosts: BoostConfig::default(),
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.extraction.validate()?;
        self.boosts.validate()
    }

    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Defaults with `KGWEAVE_*` overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `KGWEAVE_*` environment overrides. Unparseable values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_usize("KGWEAVE_MAX_PAIRS") {
            self.extraction.max_pairs_per_sentence = v;
        }
        if let Some(v) = env_usize("KGWEAVE_MIN_SENTENCE_CHARS") {
            self.extraction.min_sentence_chars = v;
        }
        self
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction.max_pairs_per_sentence, 10);
        assert_eq!(config.extraction.min_sentence_chars, 20);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(PipelineConfig::strict().validate().is_ok());
        assert!(PipelineConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml(
            r"
            [extraction]
            max_pairs_per_sentence = 4

            [boosts]
            authority = [40.0, 20.0]
            ",
        )
        .unwrap();

        assert_eq!(config.extraction.max_pairs_per_sentence, 4);
        assert_eq!(config.extraction.min_sentence_chars, 20);
        assert_eq!(config.boosts.authority, vec![40.0, 20.0]);
        assert_eq!(config.boosts.confidence, BoostConfig::default().confidence);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let result = PipelineConfig::from_toml("[extraction]\nmax_pairs_per_sentence = 0\n");
        assert!(matches!(result, Err(crate::Error::Config(_))));

        let result = PipelineConfig::from_toml("extraction = 3");
        assert!(matches!(result, Err(crate::Error::Toml(_))));
    }

    #[test]
    fn test_env_overrides_keep_unset_fields() {
        // Variables are unset in the test environment unless a caller exports them.
        let config = PipelineConfig::strict().with_env_overrides();
        if std::env::var("KGWEAVE_MAX_PAIRS").is_err() {
            assert_eq!(config.extraction.max_pairs_per_sentence, 5);
        }
        assert_eq!(
            PipelineConfig::from_env().boosts,
            BoostConfig::default()
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::lenient();
        let text = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&text).unwrap(), config);
    }
}
