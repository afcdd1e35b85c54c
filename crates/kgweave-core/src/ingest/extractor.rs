use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ExtractionConfig;
use crate::entity::{Entity, EntityData, EntityType, MetricData};

/// Single-word brands that resolve to a homepage. Anything else gets no URL.
const KNOWN_BRANDS: &[(&str, &str)] = &[
    ("OpenAI", "https://openai.com"),
    ("Anthropic", "https://www.anthropic.com"),
    ("Google", "https://www.google.com"),
    ("Microsoft", "https://www.microsoft.com"),
    ("Apple", "https://www.apple.com"),
    ("Amazon", "https://www.amazon.com"),
    ("Meta", "https://about.meta.com"),
    ("Netflix", "https://www.netflix.com"),
    ("Tesla", "https://www.tesla.com"),
    ("Nvidia", "https://www.nvidia.com"),
    ("NVIDIA", "https://www.nvidia.com"),
    ("IBM", "https://www.ibm.com"),
    ("Intel", "https://www.intel.com"),
    ("Oracle", "https://www.oracle.com"),
    ("Salesforce", "https://www.salesforce.com"),
    ("Adobe", "https://www.adobe.com"),
    ("Spotify", "https://www.spotify.com"),
    ("Uber", "https://www.uber.com"),
    ("Airbnb", "https://www.airbnb.com"),
    ("GitHub", "https://github.com"),
    ("Stripe", "https://stripe.com"),
    ("Shopify", "https://www.shopify.com"),
    ("LinkedIn", "https://www.linkedin.com"),
    ("Wikipedia", "https://www.wikipedia.org"),
];

const ORG_STOP_WORDS: &[&str] = &[
    "the group",
    "our group",
    "this group",
    "the company",
    "our company",
    "the university",
    "the foundation",
    "the institute",
    "the agency",
    "the department",
];

const NAME_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "our", "their", "its", "his", "her",
    "we", "they", "it", "according", "however", "in", "on", "at", "for", "from", "with", "by",
    "after", "before", "during", "today", "yesterday", "tomorrow", "monday", "tuesday",
    "wednesday", "thursday", "friday", "saturday", "sunday", "january", "february", "march",
    "april", "may", "june", "july", "august", "september", "october", "november", "december",
    "read", "learn", "more", "contact", "about", "home", "click", "see", "why", "how", "what",
    "when", "where", "who", "new", "chief", "senior", "executive", "officer", "president",
    "director", "united", "states", "north", "south", "east", "west", "inc", "corp", "ltd",
    "group", "privacy", "policy", "terms", "service", "copyright", "all", "rights", "meanwhile",
    "also", "last", "next", "both", "each", "every", "some", "many", "most", "if", "as", "but",
    "and", "or", "so", "then", "now", "here", "there",
];

/// Role nouns that mark the neighbouring capitalized phrase as a person.
const PERSON_ROLES: &[&str] = &[
    "ceo", "cto", "cfo", "coo", "founder", "co-founder", "cofounder", "president", "chairman",
    "chairwoman", "chair", "director", "chief", "head", "professor", "prof", "dr", "mr", "mrs",
    "ms", "spokesperson", "spokesman", "spokeswoman", "analyst", "author", "researcher",
    "engineer", "manager", "editor", "reporter", "economist", "scientist",
];

/// Verbs that, directly after a capitalized phrase, mark it as a person.
const PERSON_VERBS: &[&str] = &[
    "said", "says", "told", "tells", "wrote", "writes", "works", "worked", "joined", "explained",
    "argued", "noted", "added", "spoke", "met", "believes", "thinks",
];

const ABBREVIATIONS: &[&str] = &["dr", "prof", "mr", "mrs", "ms", "st", "jr", "sr", "vs", "mt"];

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid regex"));

static ORG_LEGAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\p{Lu}[\w&'-]*\s+){0,4}\p{Lu}[\w&'-]*\s+(?:Inc|LLC|Corp|Ltd|Group|AG|GmbH)\b")
        .expect("valid regex")
});

static ORG_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:\p{Lu}[\w&'-]*\s+){1,4}(?:Company|Corporation|University|Institute|Foundation|Association|Agency|Labs|Laboratories|Technologies|Systems|Partners|Holdings|Bank|Capital|Ventures|Solutions|Software|Media|Council|Commission|Department|Ministry|Society|Alliance)\b",
    )
    .expect("valid regex")
});

static ORG_BRAND: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<&str> = KNOWN_BRANDS.iter().map(|(name, _)| *name).collect();
    Regex::new(&format!(r"\b(?:{})\b", names.join("|"))).expect("valid regex")
});

static ORG_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\p{Lu}[\w&'-]*(?:\s+\p{Lu}[\w&'-]*){1,4}\b").expect("valid regex")
});

static ARTICLE_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:The|A|An|This|That|These|Those|Our|Their|Its|Your)\s+\S+$")
        .expect("valid regex")
});

static PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+){1,3}\b").expect("valid regex")
});

static METRIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(?P<cur>[$€£])\s?)?\b(?P<num>\d+(?:[.,]\d+)*)\s?(?P<unit>%|percent\b|million\b|billion\b|trillion\b|thousand\b|bn\b|[kmb]\b|x\b)?(?:\s(?P<trend>increase|decrease|growth|decline|reduction|improvement|rise|drop|gain|boost|faster|higher|lower)\b)?",
    )
    .expect("valid regex")
});

static CONCEPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\"(?P<dq>[^\"]{4,120})\"|\u{201c}(?P<cq>[^\u{201d}]{4,120})\u{201d}|`(?P<bt>[^`]{4,120})`")
        .expect("valid regex")
});

static PRODUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:\b(?:launch(?:ed|es)?|releas(?:ed|es|e)|introduc(?:ed|es|e)|unveil(?:ed|s)?|ship(?:ped|s)?)\s+(?:(?:the|its|their|a|an|new)\s+)*)(?P<name>\p{Lu}[\w-]*(?:\s+(?:\p{Lu}[\w.-]*|\d[\w.]*)){0,3})",
    )
    .expect("valid regex")
});

/// Homepage for a well-known single-word brand. Exact, case-sensitive lookup.
#[must_use]
pub fn known_homepage(name: &str) -> Option<&'static str> {
    KNOWN_BRANDS
        .iter()
        .find(|(brand, _)| *brand == name)
        .map(|(_, url)| *url)
}

/// Split normalized text into sentences on `.`, `!` and `?`.
///
/// Terminators must be followed by whitespace or end of text, so decimals such
/// as `3.5` stay intact. A period after an honorific or a single initial does
/// not end a sentence. Fragments of `min_chars` characters or fewer are dropped.
#[must_use]
pub fn split_sentences(text: &str, min_chars: usize) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    let mut push = |fragment: &str| {
        let trimmed = fragment.trim();
        if trimmed.chars().count() > min_chars {
            sentences.push(trimmed.to_string());
        }
    };

    for m in SENTENCE_END.find_iter(text) {
        let candidate = &text[start..m.start()];
        if m.as_str().trim_end() == "." && ends_with_abbreviation(candidate) {
            continue;
        }
        push(candidate);
        start = m.end();
    }
    push(&text[start..]);

    sentences
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    let Some(last) = fragment.split_whitespace().last() else {
        return false;
    };
    let mut chars = last.chars();
    let is_initial = chars.next().is_some_and(char::is_uppercase) && chars.next().is_none();
    is_initial || ABBREVIATIONS.contains(&last.to_lowercase().as_str())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub sentence: usize,
}

impl TextSpan {
    #[must_use]
    pub const fn new(text: String, start: usize, end: usize, sentence: usize) -> Self {
        Self {
            text,
            start,
            end,
            sentence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub entity: Entity,
    pub span: TextSpan,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub sentences: Vec<String>,
    pub entities: Vec<ExtractedEntity>,
}

impl ExtractionOutput {
    #[must_use]
    pub fn into_entities(self) -> Vec<Entity> {
        self.entities.into_iter().map(|e| e.entity).collect()
    }
}

/// One hit of a matcher inside a sentence. Offsets are byte offsets into the
/// sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub data: EntityData,
    pub url: Option<&'static str>,
}

impl PatternMatch {
    fn new(name: String, start: usize, end: usize, data: EntityData) -> Self {
        Self {
            name,
            start,
            end,
            data,
            url: None,
        }
    }
}

/// A typed pattern matcher. Implementations can be swapped for a statistical
/// model without touching the rest of the pipeline.
pub trait EntityMatcher: Send + Sync {
    fn entity_type(&self) -> EntityType;

    fn confidence(&self) -> f64;

    fn find(&self, sentence: &str) -> Vec<PatternMatch>;
}

pub struct OrganizationMatcher;

impl OrganizationMatcher {
    /// Returns the accepted name, a suffix of `raw` with leading sentence
    /// words such as articles or dates removed.
    fn accept(raw: &str) -> Option<&str> {
        if ORG_STOP_WORDS.contains(&raw.to_lowercase().as_str()) || ARTICLE_NOUN.is_match(raw) {
            return None;
        }
        let name = trim_leading_stop_words(raw);
        if name.len() != raw.len() && name.split_whitespace().count() < 2 {
            return None;
        }
        Some(name)
    }

    /// A bare capitalized phrase names a person when a role or honorific sits
    /// next to it (`CEO Jane Smith`, `Jane Smith, CEO`) or a speech or
    /// employment verb is adjacent (`Jane Smith said`, `said Jane Smith`).
    fn in_person_context(sentence: &str, start: usize, end: usize) -> bool {
        let is_role = |word: &str| {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-');
            PERSON_ROLES.contains(&word.to_lowercase().as_str())
        };

        let is_verb = |word: &str| PERSON_VERBS.contains(&word.to_lowercase().as_str());

        if sentence[start..end].split_whitespace().next().is_some_and(is_role) {
            return true;
        }
        if sentence[..start]
            .split_whitespace()
            .last()
            .is_some_and(|w| is_role(w) || is_verb(w))
        {
            return true;
        }

        let after = &sentence[end..];
        if let Some(rest) = after.trim_start().strip_prefix(',') {
            return rest
                .split_whitespace()
                .find(|w| {
                    !matches!(
                        w.to_lowercase().as_str(),
                        "a" | "an" | "the" | "its" | "their"
                    )
                })
                .is_some_and(is_role);
        }
        after.split_whitespace().next().is_some_and(is_verb)
    }

    /// The phrase is the object of a launch verb, which the product matcher owns.
    fn is_launched_product(sentence: &str, start: usize, end: usize) -> bool {
        PRODUCT
            .captures_iter(sentence)
            .filter_map(|caps| caps.name("name"))
            .any(|m| m.start() < end && start < m.end())
    }

    fn bare_phrases(sentence: &str, taken: &[PatternMatch]) -> Vec<PatternMatch> {
        let mut found: Vec<PatternMatch> = Vec::new();
        for m in ORG_PHRASE.find_iter(sentence) {
            let Some(name) = Self::accept(m.as_str()) else {
                continue;
            };
            let mut words = name.split_whitespace();
            if words.clone().count() < 2 || words.any(is_name_stop_word) {
                continue;
            }
            let start = m.end() - name.len();
            let end = m.end();
            if taken.iter().chain(&found).any(|h| h.start < end && start < h.end)
                || Self::in_person_context(sentence, start, end)
                || Self::is_launched_product(sentence, start, end)
            {
                continue;
            }
            found.push(PatternMatch::new(
                name.to_string(),
                start,
                end,
                EntityData::Organization,
            ));
        }
        found
    }
}

fn is_name_stop_word(word: &str) -> bool {
    NAME_STOP_WORDS.contains(&word.to_lowercase().as_str())
}

/// Drop leading stop words, never the final word.
fn trim_leading_stop_words(raw: &str) -> &str {
    let mut rest = raw.trim_start();
    loop {
        let Some(word_end) = rest.find(char::is_whitespace) else {
            return rest;
        };
        if !is_name_stop_word(&rest[..word_end]) {
            return rest;
        }
        rest = rest[word_end..].trim_start();
    }
}

impl EntityMatcher for OrganizationMatcher {
    fn entity_type(&self) -> EntityType {
        EntityType::Organization
    }

    fn confidence(&self) -> f64 {
        0.7
    }

    fn find(&self, sentence: &str) -> Vec<PatternMatch> {
        let mut matches = Vec::new();

        for re in [&*ORG_LEGAL, &*ORG_KEYWORD, &*ORG_BRAND] {
            for m in re.find_iter(sentence) {
                let Some(name) = Self::accept(m.as_str()) else {
                    continue;
                };
                let start = m.end() - name.len();
                let mut hit = PatternMatch::new(
                    name.to_string(),
                    start,
                    m.end(),
                    EntityData::Organization,
                );
                hit.url = known_homepage(&hit.name);
                matches.push(hit);
            }
        }

        // Phrases without a legal suffix, keyword noun or brand come last so
        // the stronger patterns keep their spans.
        let bare = Self::bare_phrases(sentence, &matches);
        matches.extend(bare);
        matches
    }
}

pub struct PersonMatcher;

impl EntityMatcher for PersonMatcher {
    fn entity_type(&self) -> EntityType {
        EntityType::Person
    }

    fn confidence(&self) -> f64 {
        0.6
    }

    fn find(&self, sentence: &str) -> Vec<PatternMatch> {
        let mut matches = Vec::new();

        for m in PERSON.find_iter(sentence) {
            let mut words: Vec<(usize, &str)> = Vec::new();
            let mut offset = m.start();
            for word in m.as_str().split_whitespace() {
                let pos = sentence[offset..].find(word).map_or(offset, |p| offset + p);
                words.push((pos, word));
                offset = pos + word.len();
            }

            while words.first().is_some_and(|(_, w)| is_name_stop_word(w)) {
                words.remove(0);
            }
            while words.last().is_some_and(|(_, w)| is_name_stop_word(w)) {
                words.pop();
            }

            if words.len() < 2 || words.iter().any(|(_, w)| is_name_stop_word(w)) {
                continue;
            }

            let (start, _) = words[0];
            let (last_pos, last_word) = words[words.len() - 1];
            let end = last_pos + last_word.len();
            let name = &sentence[start..end];
            if name.len() >= 40 {
                continue;
            }

            matches.push(PatternMatch::new(name.to_string(), start, end, EntityData::Person));
        }

        matches
    }
}

pub struct MetricMatcher;

impl MetricMatcher {
    fn parse(caps: &regex::Captures<'_>) -> Option<MetricData> {
        let currency = caps.name("cur").map(|m| m.as_str());
        let unit = caps.name("unit").map(|m| m.as_str().to_lowercase());
        if currency.is_none() && unit.is_none() {
            return None;
        }

        let value: f64 = caps.name("num")?.as_str().replace(',', "").parse().ok()?;
        let unit = match (currency, unit.as_deref()) {
            (Some(cur), Some(scale)) => format!("{cur} {scale}"),
            (Some(cur), None) => cur.to_string(),
            (None, Some("percent" | "%")) => "%".to_string(),
            (None, Some(other)) => other.to_string(),
            (None, None) => return None,
        };

        Some(MetricData { value, unit })
    }
}

impl EntityMatcher for MetricMatcher {
    fn entity_type(&self) -> EntityType {
        EntityType::Metric
    }

    fn confidence(&self) -> f64 {
        0.9
    }

    fn find(&self, sentence: &str) -> Vec<PatternMatch> {
        METRIC
            .captures_iter(sentence)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let data = Self::parse(&caps)?;
                let name = whole.as_str().trim();
                let start = whole.start() + (whole.as_str().len() - whole.as_str().trim_start().len());
                Some(PatternMatch::new(
                    name.to_string(),
                    start,
                    start + name.len(),
                    EntityData::Metric(data),
                ))
            })
            .collect()
    }
}

pub struct ConceptMatcher;

impl EntityMatcher for ConceptMatcher {
    fn entity_type(&self) -> EntityType {
        EntityType::Concept
    }

    fn confidence(&self) -> f64 {
        0.5
    }

    fn find(&self, sentence: &str) -> Vec<PatternMatch> {
        CONCEPT
            .captures_iter(sentence)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let inner = caps
                    .name("dq")
                    .or_else(|| caps.name("cq"))
                    .or_else(|| caps.name("bt"))?;
                let name = inner.as_str().trim();
                if name.chars().count() <= 3 {
                    return None;
                }
                Some(PatternMatch::new(
                    name.to_string(),
                    whole.start(),
                    whole.end(),
                    EntityData::Concept,
                ))
            })
            .collect()
    }
}

pub struct ProductMatcher;

impl EntityMatcher for ProductMatcher {
    fn entity_type(&self) -> EntityType {
        EntityType::Product
    }

    fn confidence(&self) -> f64 {
        0.6
    }

    fn find(&self, sentence: &str) -> Vec<PatternMatch> {
        PRODUCT
            .captures_iter(sentence)
            .filter_map(|caps| {
                let m = caps.name("name")?;
                let name = m.as_str().trim_end_matches(['.', '-']);
                Some(PatternMatch::new(
                    name.to_string(),
                    m.start(),
                    m.start() + name.len(),
                    EntityData::Product,
                ))
            })
            .collect()
    }
}

pub trait Extractor: Send + Sync {
    fn extract(&self, text: &str, source_url: &str) -> ExtractionOutput;
}

/// Pattern-based extractor. Matchers run in registration order and a later
/// matcher never claims a span overlapping an earlier hit in the same sentence.
///
/// Same-name entities within one document are deliberately kept apart; the
/// graph merger is where names collapse.
pub struct RuleBasedExtractor {
    matchers: Vec<Box<dyn EntityMatcher>>,
    config: ExtractionConfig,
}

impl RuleBasedExtractor {
    #[must_use]
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            matchers: Vec::new(),
            config,
        }
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn EntityMatcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    #[must_use]
    pub fn with_default_matchers(config: ExtractionConfig) -> Self {
        Self::new(config)
            .with_matcher(Box::new(MetricMatcher))
            .with_matcher(Box::new(ConceptMatcher))
            .with_matcher(Box::new(OrganizationMatcher))
            .with_matcher(Box::new(ProductMatcher))
            .with_matcher(Box::new(PersonMatcher))
    }

    fn snippet(&self, sentence: &str) -> String {
        sentence.chars().take(self.config.context_snippet_chars).collect()
    }

    fn extract_sentence(
        &self,
        sentence: &str,
        index: usize,
        source_url: &str,
    ) -> Vec<ExtractedEntity> {
        let mut hits: Vec<(PatternMatch, f64)> = Vec::new();

        for matcher in &self.matchers {
            for hit in matcher.find(sentence) {
                if hits
                    .iter()
                    .any(|(h, _)| h.start < hit.end && hit.start < h.end)
                {
                    continue;
                }
                hits.push((hit, matcher.confidence()));
            }
        }

        hits.sort_by_key(|(h, _)| h.start);

        let context = self.snippet(sentence);
        hits.into_iter()
            .map(|(hit, confidence)| {
                let mut entity = Entity::new(hit.name.clone(), hit.data)
                    .with_confidence(confidence)
                    .with_source(source_url.to_string(), context.clone());
                if let Some(url) = hit.url {
                    entity = entity.with_url(url.to_string());
                }
                ExtractedEntity {
                    entity,
                    span: TextSpan::new(hit.name, hit.start, hit.end, index),
                }
            })
            .collect()
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::with_default_matchers(ExtractionConfig::default())
    }
}

impl Extractor for RuleBasedExtractor {
    fn extract(&self, text: &str, source_url: &str) -> ExtractionOutput {
        let sentences = split_sentences(text, self.config.min_sentence_chars);
        let entities = sentences
            .iter()
            .enumerate()
            .flat_map(|(i, s)| self.extract_sentence(s, i, source_url))
            .collect::<Vec<_>>();

        tracing::debug!(
            sentences = sentences.len(),
            entities = entities.len(),
            "extracted entities"
        );

        ExtractionOutput {
            sentences,
            entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(output: &ExtractionOutput, ty: EntityType) -> Vec<String> {
        output
            .entities
            .iter()
            .filter(|e| e.entity.entity_type() == ty)
            .map(|e| e.entity.name.clone())
            .collect()
    }

    #[test]
    fn test_split_sentences_drops_short_fragments() {
        let text = "Short one. This sentence is definitely long enough! Tiny? Another sentence that is long enough";
        let sentences = split_sentences(text, 20);
        assert_eq!(
            sentences,
            vec![
                "This sentence is definitely long enough",
                "Another sentence that is long enough"
            ]
        );
    }

    #[test]
    fn test_split_sentences_keeps_decimals_and_honorifics() {
        let text = "Dr. Jane Doe reported a 3.5% rise in output this year. The second sentence is here too.";
        let sentences = split_sentences(text, 20);
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].starts_with("Dr. Jane Doe"));
        assert!(sentences[0].contains("3.5%"));
    }

    #[test]
    fn test_scenario_entities() {
        let extractor = RuleBasedExtractor::default();
        let text = "Jane Smith, CEO of Acme Inc, announced a 30% increase in revenue according to Acme Inc's Q3 report.";
        let output = extractor.extract(text, "https://acme.example/news");

        assert_eq!(names(&output, EntityType::Person), vec!["Jane Smith"]);
        assert_eq!(names(&output, EntityType::Metric), vec!["30% increase"]);
        // Repeated mentions are not collapsed within a document.
        assert_eq!(
            names(&output, EntityType::Organization),
            vec!["Acme Inc", "Acme Inc"]
        );

        let metric = output
            .entities
            .iter()
            .find_map(|e| e.entity.metric())
            .unwrap();
        assert!((metric.value - 30.0).abs() < f64::EPSILON);
        assert_eq!(metric.unit, "%");

        let person = &output.entities[0].entity;
        assert!((person.confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(person.source_url, "https://acme.example/news");
        assert!(person.source_context.starts_with("Jane Smith, CEO"));
    }

    #[test]
    fn test_organization_urls_only_for_known_brands() {
        let extractor = RuleBasedExtractor::default();
        let output = extractor.extract(
            "OpenAI and Northwind Labs signed a research agreement last week.",
            "https://example.com",
        );

        let openai = output
            .entities
            .iter()
            .find(|e| e.entity.name == "OpenAI")
            .unwrap();
        assert_eq!(openai.entity.url.as_deref(), Some("https://openai.com"));
        assert_eq!(openai.entity.entity_type(), EntityType::Organization);

        let northwind = output
            .entities
            .iter()
            .find(|e| e.entity.name == "Northwind Labs")
            .unwrap();
        assert!(northwind.entity.url.is_none());
    }

    #[test]
    fn test_article_noun_organizations_rejected() {
        let matcher = OrganizationMatcher;
        assert!(matcher.find("The Company reported strong numbers").is_empty());

        let hits = matcher.find("Yesterday The Acme Group opened an office");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Acme Group");
    }

    #[test]
    fn test_bare_capitalized_phrases_are_organizations() {
        let extractor = RuleBasedExtractor::default();
        let output = extractor.extract(
            "Northwind Traders announced a partnership with Contoso Retail today.",
            "https://example.com",
        );

        assert_eq!(
            names(&output, EntityType::Organization),
            vec!["Northwind Traders", "Contoso Retail"]
        );
        assert!(names(&output, EntityType::Person).is_empty());
        assert!(output.entities.iter().all(|e| e.entity.url.is_none()));
    }

    #[test]
    fn test_person_cues_keep_phrases_as_people() {
        let extractor = RuleBasedExtractor::default();
        let output = extractor.extract(
            "Bob Jones works at Contoso Retail, said CEO Mary Major on Monday.",
            "https://example.com",
        );

        assert_eq!(
            names(&output, EntityType::Person),
            vec!["Bob Jones", "Mary Major"]
        );
        assert_eq!(names(&output, EntityType::Organization), vec!["Contoso Retail"]);
    }

    #[test]
    fn test_non_ascii_names_are_extracted() {
        let extractor = RuleBasedExtractor::default();
        let output = extractor.extract(
            "Ünïcödé Çompany Ltd reported 50% growth since 2019, said Zoë Łukasz.",
            "https://example.com",
        );

        assert_eq!(
            names(&output, EntityType::Organization),
            vec!["Ünïcödé Çompany Ltd"]
        );
        assert_eq!(names(&output, EntityType::Person), vec!["Zoë Łukasz"]);
        assert_eq!(names(&output, EntityType::Metric), vec!["50% growth"]);
    }

    #[test]
    fn test_person_matcher_trims_stop_words() {
        let hits = PersonMatcher.find("Today Jane Smith met Robert Brown in Paris");
        let found: Vec<_> = hits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(found, vec!["Jane Smith", "Robert Brown"]);
    }

    #[test]
    fn test_metric_variants() {
        let hits = MetricMatcher.find("Sales hit $5 million, up 12 percent, and a 2x boost in 2023");
        let found: Vec<_> = hits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(found, vec!["$5 million", "12 percent", "2x boost"]);
        assert!(hits.iter().all(|h| h.name != "2023"));
    }

    #[test]
    fn test_concepts_from_quotes() {
        let hits = ConceptMatcher.find(r#"The "zero trust" model and `AI` and "edge computing" paradigm"#);
        let found: Vec<_> = hits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(found, vec!["zero trust", "edge computing"]);
    }

    #[test]
    fn test_product_after_launch_verb() {
        let extractor = RuleBasedExtractor::default();
        let output = extractor.extract(
            "Acme Inc launched the Widget Pro to enterprise customers.",
            "https://example.com",
        );
        assert_eq!(names(&output, EntityType::Product), vec!["Widget Pro"]);
        assert!(names(&output, EntityType::Person).is_empty());
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        let output = RuleBasedExtractor::default().extract("", "https://example.com");
        assert!(output.sentences.is_empty());
        assert!(output.entities.is_empty());
    }
}
