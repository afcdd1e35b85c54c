use std::sync::LazyLock;

use regex::Regex;

use super::extractor::{EntityMatcher, MetricMatcher};
use crate::claim::{Claim, Evidence, EvidenceType, Temporal};
use crate::entity::Entity;

static INDICATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:according to|research (?:shows|suggests|finds|found)|studies (?:show|suggest|find|found)|study (?:shows|found|finds)|proven to|data (?:shows|show|suggests|indicates)|survey (?:found|shows)|reports? (?:that|shows?)|evidence (?:shows|suggests)|statistics show|experts? (?:say|says|agree)|demonstrated|confirmed that|it is estimated)\b",
    )
    .expect("valid regex")
});

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[\d+\]|\([A-Z][A-Za-z'-]+(?:\s+et al\.?)?(?:\s+(?:and|&)\s+[A-Z][A-Za-z'-]+)?,?\s+(?:19|20)\d{2}\)",
    )
    .expect("valid regex")
});

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:[.,]\d+)*%?").expect("valid regex"));

static EXPERT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\bDr\.|\bProfessor|\bProf\.|\bCEO)\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?")
        .expect("valid regex")
});

static CASE_STUDY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcase stud(?:y|ies)\b").expect("valid regex"));

static VALID_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:since|as of|from)\s+((?:19|20)\d{2})\b").expect("valid regex")
});

static VALID_UNTIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:until|through|till)\s+((?:19|20)\d{2})\b").expect("valid regex")
});

/// Flags sentences that read as factual claims and attaches entities and
/// evidence found in them.
#[derive(Debug, Default)]
pub struct ClaimExtractor;

impl ClaimExtractor {
    #[must_use]
    pub fn is_claim(sentence: &str) -> bool {
        INDICATOR.is_match(sentence) || !MetricMatcher.find(sentence).is_empty()
    }

    #[must_use]
    pub fn evidence(sentence: &str) -> Vec<Evidence> {
        let mut evidence: Vec<Evidence> = CITATION
            .find_iter(sentence)
            .map(|m| Evidence::new(EvidenceType::Citation, m.as_str().to_string()))
            .collect();

        // Citation markers carry digits of their own.
        let without_citations = CITATION.replace_all(sentence, " ");
        for m in NUMERIC.find_iter(&without_citations) {
            let token = m.as_str().to_string();
            if !evidence.iter().any(|e| e.source == token) {
                evidence.push(Evidence::new(EvidenceType::Data, token));
            }
        }

        evidence.extend(
            EXPERT
                .find_iter(sentence)
                .map(|m| Evidence::new(EvidenceType::ExpertOpinion, m.as_str().to_string())),
        );

        if let Some(m) = CASE_STUDY.find(sentence) {
            evidence.push(Evidence::new(EvidenceType::CaseStudy, m.as_str().to_string()));
        }

        evidence
    }

    #[must_use]
    pub fn temporal(sentence: &str) -> Temporal {
        let year = |re: &Regex| {
            re.captures(sentence)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        };
        Temporal {
            valid_from: year(&VALID_FROM),
            valid_until: year(&VALID_UNTIL),
        }
    }

    #[must_use]
    pub fn extract(&self, sentences: &[String], entities: &[Entity]) -> Vec<Claim> {
        let mut claims = Vec::new();

        for sentence in sentences {
            if !Self::is_claim(sentence) {
                continue;
            }

            let mut mentioned = Vec::new();
            for entity in entities {
                if sentence.contains(entity.name.as_str()) && !mentioned.contains(&entity.id) {
                    mentioned.push(entity.id);
                }
            }

            let evidence = Self::evidence(sentence);
            if mentioned.is_empty() && evidence.is_empty() {
                continue;
            }

            let confidence = if evidence.is_empty() { 0.5 } else { 0.8 };
            claims.push(
                Claim::new(sentence.clone())
                    .with_entities(mentioned)
                    .with_evidence(evidence)
                    .with_confidence(confidence)
                    .with_temporal(Self::temporal(sentence)),
            );
        }

        tracing::debug!(claims = claims.len(), "extracted claims");
        claims
    }
}
