//! Named Entity Recognition (NER) module
//!
//! Rule-based recognizer for English letters:
//! - Regex patterns for dates, times, money, quantities and numbers
//! - Titled-person patterns and a capitalized-name heuristic
//! - Dictionary (gazetteer) matching for places, groups and institutions
//!
//! Labels follow the OntoNotes scheme used by common pretrained English
//! pipelines, so output can be compared with theirs.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::gazetteer::Gazetteer;
use crate::{EntityExtractor, ExtractedEntity};
use tner_core::{NerConfig, Result, TnerError};

// ============================================================================
// Entity Labels
// ============================================================================

/// Entity labels recognized by the NER system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Person,
    Norp,
    Fac,
    Org,
    Gpe,
    Loc,
    Product,
    Event,
    WorkOfArt,
    Law,
    Language,
    Date,
    Time,
    Percent,
    Money,
    Quantity,
    Ordinal,
    Cardinal,
}

impl EntityLabel {
    pub const ALL: [EntityLabel; 18] = [
        Self::Person,
        Self::Norp,
        Self::Fac,
        Self::Org,
        Self::Gpe,
        Self::Loc,
        Self::Product,
        Self::Event,
        Self::WorkOfArt,
        Self::Law,
        Self::Language,
        Self::Date,
        Self::Time,
        Self::Percent,
        Self::Money,
        Self::Quantity,
        Self::Ordinal,
        Self::Cardinal,
    ];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Norp => "NORP",
            Self::Fac => "FAC",
            Self::Org => "ORG",
            Self::Gpe => "GPE",
            Self::Loc => "LOC",
            Self::Product => "PRODUCT",
            Self::Event => "EVENT",
            Self::WorkOfArt => "WORK_OF_ART",
            Self::Law => "LAW",
            Self::Language => "LANGUAGE",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Percent => "PERCENT",
            Self::Money => "MONEY",
            Self::Quantity => "QUANTITY",
            Self::Ordinal => "ORDINAL",
            Self::Cardinal => "CARDINAL",
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityLabel {
    type Err = TnerError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == upper)
            .ok_or_else(|| TnerError::Model(format!("Unknown entity label: {s}")))
    }
}

// ============================================================================
// Pattern Vocabulary
// ============================================================================

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";
const MONTH_ABBREVIATIONS: &str = "Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec";
const WEEKDAYS: &str = "Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday";

/// Words that never start or belong to a heuristic person name
const NAME_STOPWORDS: &[&str] = &[
    "Dear", "My", "Sir", "Madam", "Yours", "Your", "The", "This", "That", "These", "Those", "I",
    "We", "He", "She", "It", "They", "You", "In", "On", "At", "To", "For", "From", "With", "And",
    "But", "Or", "If", "As", "By", "Of", "Believe", "Pray", "Many", "Most", "Very", "Truly",
    "Sincerely", "Faithfully", "Affectionately", "Ever", "Mr", "Mrs", "Miss", "Dr", "Revd", "Rev",
    "Professor", "Prof", "Lord", "Lady", "Captain", "Capt", "Messrs", "God", "Christmas",
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday",
    "Saturday", "Sunday",
];

fn is_stopword(word: &str) -> bool {
    NAME_STOPWORDS.contains(&word.trim_end_matches('.'))
}

fn starts_with_stopword(candidate: &str) -> bool {
    candidate.split_whitespace().next().is_some_and(is_stopword)
}

// ============================================================================
// Rule-based NER
// ============================================================================

/// Regex rule; when the pattern has a capture group, group 1 is the entity
struct PatternRule {
    regex: Regex,
    label: EntityLabel,
    confidence: f32,
}

/// Dictionary entry for entity matching
#[derive(Debug, Clone)]
pub struct DictionaryEntry {
    pub term: String,
    pub label: EntityLabel,
    pub aliases: Vec<String>,
    matcher: Regex,
}

impl DictionaryEntry {
    fn new(term: &str, label: EntityLabel, aliases: &[String]) -> Option<Self> {
        let mut forms: Vec<&str> = std::iter::once(term)
            .chain(aliases.iter().map(String::as_str))
            .filter(|f| !f.trim().is_empty())
            .collect();
        if forms.is_empty() {
            return None;
        }
        // Longest form first so the regex alternation prefers it
        forms.sort_by_key(|f| std::cmp::Reverse(f.len()));

        let alternation = forms
            .iter()
            .map(|form| {
                let mut pattern = String::new();
                if form.chars().next().is_some_and(char::is_alphanumeric) {
                    pattern.push_str(r"\b");
                }
                pattern.push_str(&regex::escape(form));
                if form.chars().last().is_some_and(char::is_alphanumeric) {
                    pattern.push_str(r"\b");
                }
                pattern
            })
            .collect::<Vec<_>>()
            .join("|");

        let matcher = Regex::new(&format!("(?i)(?:{alternation})")).ok()?;

        Some(Self {
            term: term.to_string(),
            label,
            aliases: aliases.to_vec(),
            matcher,
        })
    }
}

/// Rule-based NER using regex patterns and dictionaries
pub struct RuleBasedNer {
    /// Pattern rules (regex -> label)
    patterns: Vec<PatternRule>,
    /// Dictionary of known terms
    dictionary: Vec<DictionaryEntry>,
    /// Capitalized-name heuristic for PERSON
    name_heuristic: Option<Regex>,
    /// Candidates below this are dropped
    min_confidence: f32,
}

impl RuleBasedNer {
    /// Create a new rule-based NER with the default English rules
    pub fn new() -> Self {
        let mut ner = Self {
            patterns: Vec::new(),
            dictionary: Vec::new(),
            name_heuristic: None,
            min_confidence: 0.5,
        };

        ner.init_patterns();
        ner.init_dictionary();
        ner = ner.with_name_heuristic(true);
        ner
    }

    /// Build from configuration, loading the gazetteer if one is set
    pub fn from_config(config: &NerConfig) -> Result<Self> {
        let mut ner = Self::new()
            .with_name_heuristic(config.name_heuristic)
            .with_threshold(config.min_confidence);

        if let Some(path) = &config.gazetteer_path {
            let gazetteer = Gazetteer::from_file(path)?;
            tracing::info!(
                path = %path.display(),
                entries = gazetteer.entries.len(),
                "Loaded gazetteer"
            );
            ner = ner.with_gazetteer(&gazetteer)?;
        }

        Ok(ner)
    }

    /// Add every entry of a gazetteer to the dictionary
    pub fn with_gazetteer(mut self, gazetteer: &Gazetteer) -> Result<Self> {
        for entry in &gazetteer.entries {
            let label: EntityLabel = entry.label.parse()?;
            let aliases = entry.aliases.iter().map(String::as_str).collect();
            self.add_term(&entry.term, label, aliases);
        }
        Ok(self)
    }

    /// Set confidence threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.min_confidence = threshold.clamp(0.0, 1.0);
        self
    }

    /// Enable or disable the capitalized-name heuristic
    pub fn with_name_heuristic(mut self, enabled: bool) -> Self {
        self.name_heuristic = if enabled {
            Regex::new(r"\b[A-Z][a-z]+(?:[ \t]+(?:[A-Z]\.[ \t]*)*[A-Z][a-z]+)+\b").ok()
        } else {
            None
        };
        self
    }

    /// Number of dictionary entries
    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    /// Initialize regex patterns
    fn init_patterns(&mut self) {
        let month = format!(r"(?:(?:{MONTHS})\b|(?:{MONTH_ABBREVIATIONS})\b\.?)");

        // Dates
        self.add_pattern(
            &format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{month}(?:,?\s+\d{{4}}\b)?"),
            EntityLabel::Date,
            0.95,
        );
        self.add_pattern(
            &format!(r"\b{month}\s+\d{{1,2}}(?:st|nd|rd|th)?\b(?:,?\s+\d{{4}}\b)?"),
            EntityLabel::Date,
            0.95,
        );
        self.add_pattern(&format!(r"\b(?:{MONTHS})\s+\d{{4}}\b"), EntityLabel::Date, 0.9);
        self.add_pattern(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b", EntityLabel::Date, 0.9);
        self.add_pattern(r"\b(?:1[5-9]|20)\d{2}\b", EntityLabel::Date, 0.85);
        self.add_pattern(&format!(r"\b(?:{WEEKDAYS})\b"), EntityLabel::Date, 0.85);
        self.add_pattern(
            r"(?i)\b(?:yesterday|today|tomorrow|(?:last|next|this)\s+(?:week|month|year|summer|winter|spring|autumn))\b",
            EntityLabel::Date,
            0.8,
        );

        // Times
        self.add_pattern(
            r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:a\.m\.|p\.m\.|am\b|pm\b|o'clock|o’clock)",
            EntityLabel::Time,
            0.9,
        );
        self.add_pattern(
            r"(?i)\b(?:this|tomorrow|yesterday)\s+(?:morning|evening|afternoon|night)\b",
            EntityLabel::Time,
            0.85,
        );

        // Money
        self.add_pattern(r"£\s?\d[\d,]*(?:\.\d+)?", EntityLabel::Money, 0.9);
        self.add_pattern(r"\$\d[\d,]*(?:\.\d{2})?", EntityLabel::Money, 0.9);
        self.add_pattern(
            r"(?i)\b\d[\d,]*(?:\.\d+)?\s+(?:pounds?|shillings?|guineas?|pence|dollars?)\b",
            EntityLabel::Money,
            0.9,
        );
        self.add_pattern(r"\b\d+\s*s\.\s*\d+\s*d\.", EntityLabel::Money, 0.9);

        // Percentages and quantities
        self.add_pattern(
            r"(?i)\b\d+(?:\.\d+)?\s*(?:%|per\s?cent\b)",
            EntityLabel::Percent,
            0.9,
        );
        self.add_pattern(
            r"(?i)\b\d+(?:\.\d+)?\s+(?:miles?|yards?|feet|foot|inches?|lbs?|ounces?|oz|acres?|bushels?|gallons?|tons?|grains?)\b",
            EntityLabel::Quantity,
            0.85,
        );

        // Ordinals and cardinals
        self.add_pattern(r"\b\d+(?:st|nd|rd|th)\b", EntityLabel::Ordinal, 0.85);
        self.add_pattern(
            r"(?i)\b(?:first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh|twelfth)\b",
            EntityLabel::Ordinal,
            0.8,
        );
        self.add_pattern(r"\b\d+(?:[.,]\d+)*\b", EntityLabel::Cardinal, 0.6);
        self.add_pattern(
            r"(?i)\b(?:two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|twenty|thirty|forty|fifty|hundred|thousand|dozen)\b",
            EntityLabel::Cardinal,
            0.6,
        );

        // Titled persons: the title itself is not part of the entity
        self.add_pattern(
            r"\b(?:Mr|Mrs|Messrs|Miss|Dr|Revd|Rev|Prof|Professor|Sir|Lord|Lady|Capt|Captain)\.?[ \t]+((?:\p{Lu}\.[ \t]*)*\p{Lu}\p{Ll}+(?:[ \t]+\p{Lu}\p{Ll}+)*)",
            EntityLabel::Person,
            0.85,
        );
    }

    /// Initialize dictionary of common places, groups and institutions
    fn init_dictionary(&mut self) {
        use EntityLabel::*;

        for place in [
            "England", "Scotland", "Ireland", "Wales", "London", "Cambridge", "Oxford",
            "Edinburgh", "Dublin", "Liverpool", "Manchester", "Bristol", "Bath", "Norwich",
            "Ipswich", "York", "Shrewsbury", "Paris", "France", "Germany", "Italy", "Holland",
            "Switzerland", "Spain", "Portugal", "India", "Australia", "Brazil", "Chile", "Peru",
            "Canada",
        ] {
            self.add_term(place, Gpe, vec![]);
        }
        self.add_term("Britain", Gpe, vec!["Great Britain"]);
        self.add_term("United States", Gpe, vec!["America", "United States of America"]);

        for location in [
            "Europe", "Africa", "Asia", "South America", "North America", "Atlantic", "Pacific",
            "Mediterranean", "Thames", "Isle of Wight", "the Alps",
        ] {
            self.add_term(location, Loc, vec![]);
        }

        for group in [
            "English", "British", "French", "German", "Scottish", "Irish", "Welsh", "Italian",
            "Dutch", "American", "Spanish", "Catholic", "Protestant", "Whig", "Tory",
        ] {
            self.add_term(group, Norp, vec![]);
        }

        self.add_term("Royal Society", Org, vec!["Royal Society of London"]);
        self.add_term("Linnean Society", Org, vec!["Linnaean Society"]);
        self.add_term("Geological Society", Org, vec![]);
        self.add_term("Zoological Society", Org, vec![]);
        self.add_term("Cambridge Philosophical Society", Org, vec![]);
        self.add_term("British Museum", Org, vec![]);
        self.add_term(
            "University of Cambridge",
            Org,
            vec!["Cambridge University"],
        );
        self.add_term("University of Oxford", Org, vec!["Oxford University"]);
        self.add_term("St John's College", Org, vec!["St. John's College"]);
        self.add_term("Trinity College", Org, vec![]);
        self.add_term("Christ's College", Org, vec![]);
        self.add_term("Parliament", Org, vec!["House of Commons", "House of Lords"]);
        self.add_term("Admiralty", Org, vec![]);
        self.add_term("East India Company", Org, vec![]);

        self.add_term("Kew Gardens", Fac, vec!["Royal Botanic Gardens"]);
        self.add_term("Botanic Garden", Fac, vec!["Botanical Garden"]);
        self.add_term("Westminster Abbey", Fac, vec![]);

        for language in ["Latin", "Greek", "Hebrew"] {
            self.add_term(language, Language, vec![]);
        }
    }

    /// Add a regex pattern
    fn add_pattern(&mut self, pattern: &str, label: EntityLabel, confidence: f32) {
        match Regex::new(pattern) {
            Ok(regex) => self.patterns.push(PatternRule {
                regex,
                label,
                confidence,
            }),
            Err(e) => tracing::warn!(pattern, error = %e, "Skipping invalid NER pattern"),
        }
    }

    /// Add a dictionary term; a term already present is replaced
    pub fn add_term(&mut self, term: &str, label: EntityLabel, aliases: Vec<&str>) {
        let aliases: Vec<String> = aliases.into_iter().map(str::to_string).collect();
        let Some(entry) = DictionaryEntry::new(term, label, &aliases) else {
            tracing::warn!(term, "Skipping empty dictionary term");
            return;
        };

        self.dictionary
            .retain(|existing| !existing.term.eq_ignore_ascii_case(term));
        self.dictionary.push(entry);
    }

    /// Extract entities using pattern matching
    fn extract_by_patterns(&self, text: &str) -> Vec<ExtractedEntity> {
        let mut entities = Vec::new();

        for rule in &self.patterns {
            let mut pos = 0;
            while let Some(caps) = rule.regex.captures_at(text, pos) {
                let Some(whole) = caps.get(0) else {
                    break;
                };
                let mat = caps.get(1).unwrap_or(whole);
                if whole.end() <= pos {
                    break;
                }
                pos = whole.end();

                if mat.as_str().trim().is_empty() {
                    continue;
                }
                // "Dear Sir The ..." or "Sir Mr. Jones": the word after the
                // title is no name, but it may open another title
                if rule.label == EntityLabel::Person && starts_with_stopword(mat.as_str()) {
                    if mat.start() > whole.start() {
                        pos = mat.start();
                    }
                    continue;
                }
                entities.push(ExtractedEntity {
                    text: mat.as_str().to_string(),
                    entity_type: rule.label.to_string(),
                    start: mat.start(),
                    end: mat.end(),
                    confidence: rule.confidence,
                });
            }
        }

        entities
    }

    /// Extract entities using dictionary lookup
    fn extract_by_dictionary(&self, text: &str) -> Vec<ExtractedEntity> {
        let mut entities = Vec::new();

        for entry in &self.dictionary {
            for mat in entry.matcher.find_iter(text) {
                // Main term scores higher than an alias
                let confidence = if mat.as_str().to_lowercase() == entry.term.to_lowercase() {
                    0.95
                } else {
                    0.9
                };
                entities.push(ExtractedEntity {
                    text: mat.as_str().to_string(),
                    entity_type: entry.label.to_string(),
                    start: mat.start(),
                    end: mat.end(),
                    confidence,
                });
            }
        }

        entities
    }

    /// Propose PERSON for runs of capitalized words
    fn extract_by_names(&self, text: &str) -> Vec<ExtractedEntity> {
        let Some(regex) = &self.name_heuristic else {
            return Vec::new();
        };
        let mut entities = Vec::new();
        for mat in regex.find_iter(text) {
            let candidate = mat.as_str();

            // Drop leading salutation/title words
            let mut offset = 0;
            for word in candidate.split_whitespace() {
                if !is_stopword(word) {
                    break;
                }
                offset = candidate[offset..]
                    .find(word)
                    .map(|pos| offset + pos + word.len())
                    .unwrap_or(candidate.len());
            }
            let trimmed = candidate[offset..].trim_start();
            let start = mat.end() - trimmed.len();

            let words: Vec<&str> = trimmed.split_whitespace().collect();
            let full_words = words.iter().filter(|w| !w.ends_with('.')).count();
            if full_words < 2 || words.iter().any(|w| is_stopword(w)) {
                continue;
            }

            entities.push(ExtractedEntity {
                text: trimmed.to_string(),
                entity_type: EntityLabel::Person.to_string(),
                start,
                end: mat.end(),
                confidence: 0.6,
            });
        }

        entities
    }

    /// Resolve overlapping candidates: highest confidence, then longest,
    /// then earliest wins
    fn resolve_overlaps(&self, mut entities: Vec<ExtractedEntity>) -> Vec<ExtractedEntity> {
        entities.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then(b.len().cmp(&a.len()))
                .then(a.start.cmp(&b.start))
        });

        let mut result: Vec<ExtractedEntity> = Vec::new();
        for entity in entities {
            if !result.iter().any(|kept| kept.overlaps(&entity)) {
                result.push(entity);
            }
        }

        result.sort_by_key(|e| e.start);
        result
    }
}

impl Default for RuleBasedNer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor for RuleBasedNer {
    fn extract(&self, text: &str) -> Result<Vec<ExtractedEntity>> {
        let mut entities = Vec::new();

        entities.extend(self.extract_by_patterns(text));
        entities.extend(self.extract_by_dictionary(text));
        entities.extend(self.extract_by_names(text));

        entities.retain(|e| e.confidence >= self.min_confidence && !e.is_empty());

        Ok(self.resolve_overlaps(entities))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(entities: &'a [ExtractedEntity], text: &str) -> Option<&'a ExtractedEntity> {
        entities.iter().find(|e| e.text == text)
    }

    #[test]
    fn test_dates() {
        let ner = RuleBasedNer::new();
        let entities = ner
            .extract("Written 26 February 1831, posted Feb. 28 and read on Monday.")
            .unwrap();

        assert_eq!(find(&entities, "26 February 1831").unwrap().entity_type, "DATE");
        assert_eq!(find(&entities, "Feb. 28").unwrap().entity_type, "DATE");
        assert_eq!(find(&entities, "Monday").unwrap().entity_type, "DATE");
        // The year inside the full date is not reported separately
        assert!(find(&entities, "1831").is_none());
    }

    #[test]
    fn test_money_and_numbers() {
        let ner = RuleBasedNer::new();
        let entities = ner
            .extract("The box cost £5 and weighed 12 lbs; I sent three of them on the 2nd")
            .unwrap();

        assert_eq!(find(&entities, "£5").unwrap().entity_type, "MONEY");
        assert_eq!(find(&entities, "12 lbs").unwrap().entity_type, "QUANTITY");
        assert_eq!(find(&entities, "three").unwrap().entity_type, "CARDINAL");
        assert_eq!(find(&entities, "2nd").unwrap().entity_type, "ORDINAL");
    }

    #[test]
    fn test_titled_person_excludes_title() {
        let ner = RuleBasedNer::new();
        let text = "I called on Mr. Sowerby and Revd J. S. Henslow.";
        let entities = ner.extract(text).unwrap();

        let sowerby = find(&entities, "Sowerby").unwrap();
        assert_eq!(sowerby.entity_type, "PERSON");
        assert_eq!(&text[sowerby.start..sowerby.end], "Sowerby");
        assert!(find(&entities, "J. S. Henslow").is_some());
    }

    #[test]
    fn test_salutation_after_title_is_not_a_person() {
        let ner = RuleBasedNer::new();

        for text in [
            "My dear Sir Your letter of the 3rd arrived.",
            "Dear Sir The parcel came.",
            "Dear Sir We thank you",
        ] {
            let entities = ner.extract(text).unwrap();
            assert!(
                entities.iter().all(|e| e.entity_type != "PERSON"),
                "{text}: {entities:?}"
            );
        }

        let entities = ner.extract("My dear Sir Your letter of the 3rd arrived.").unwrap();
        assert_eq!(find(&entities, "3rd").unwrap().entity_type, "ORDINAL");
    }

    #[test]
    fn test_title_after_salutation_still_matches() {
        let ner = RuleBasedNer::new();
        let entities = ner.extract("My  Dear\tSir Mr. É. Jones called.").unwrap();

        let people: Vec<&str> = entities
            .iter()
            .filter(|e| e.entity_type == "PERSON")
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(people, vec!["É. Jones"]);
    }

    #[test]
    fn test_name_heuristic_skips_salutations() {
        let ner = RuleBasedNer::new();
        let text = "My Dear Henslow, William Christy sends his regards.";
        let entities = ner.extract(text).unwrap();

        let christy = find(&entities, "William Christy").unwrap();
        assert_eq!(christy.entity_type, "PERSON");
        assert!(entities.iter().all(|e| !e.text.contains("Dear")));

        let without = RuleBasedNer::new().with_name_heuristic(false);
        let entities = without.extract(text).unwrap();
        assert!(find(&entities, "William Christy").is_none());
    }

    #[test]
    fn test_dictionary_prefers_longest_match() {
        let ner = RuleBasedNer::new();
        let text = "He read a paper at the Cambridge Philosophical Society in Cambridge.";
        let entities = ner.extract(text).unwrap();

        let society = find(&entities, "Cambridge Philosophical Society").unwrap();
        assert_eq!(society.entity_type, "ORG");
        let town = entities.iter().find(|e| e.entity_type == "GPE").unwrap();
        assert_eq!(town.text, "Cambridge");
        assert!(town.start > society.end);
    }

    #[test]
    fn test_dictionary_is_case_insensitive_on_word_boundaries() {
        let ner = RuleBasedNer::new();
        let entities = ner.extract("from LONDON to Londonderry").unwrap();

        assert_eq!(find(&entities, "LONDON").unwrap().entity_type, "GPE");
        assert!(find(&entities, "London").is_none());
    }

    #[test]
    fn test_no_overlapping_output() {
        let ner = RuleBasedNer::new();
        let entities = ner
            .extract("On Monday 3rd March 1831 at 10 o'clock Mr. Darwin paid £20 to the Royal Society.")
            .unwrap();

        for pair in entities.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{pair:?}");
        }
    }

    #[test]
    fn test_threshold_drops_weak_candidates() {
        let ner = RuleBasedNer::new().with_threshold(0.7);
        let entities = ner.extract("I have 42 specimens").unwrap();
        assert!(find(&entities, "42").is_none());
    }

    #[test]
    fn test_label_parse_and_display() {
        assert_eq!("gpe".parse::<EntityLabel>().unwrap(), EntityLabel::Gpe);
        assert_eq!(EntityLabel::WorkOfArt.to_string(), "WORK_OF_ART");
        assert!("SPECIES".parse::<EntityLabel>().is_err());
        assert_eq!(
            serde_json::to_string(&EntityLabel::WorkOfArt).unwrap(),
            "\"WORK_OF_ART\""
        );
    }

    #[test]
    fn test_add_term_replaces_existing() {
        let mut ner = RuleBasedNer::new();
        let before = ner.dictionary_len();
        ner.add_term("London", EntityLabel::Loc, vec![]);
        assert_eq!(ner.dictionary_len(), before);

        let entities = ner.extract("London").unwrap();
        assert_eq!(entities[0].entity_type, "LOC");
    }
}
