//! Named-entity extraction over search snippets.
//!
//! Recognition sits behind [`EntityRecognizer`]; the built-in
//! [`HeuristicRecognizer`] is rule based (regex passes plus small gazetteers).
//! [`EntityExtractor`] tallies recognised entities and keeps the most
//! frequent ones. Extraction is best effort: a recogniser error yields an
//! empty list.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ResearchError, Result};

/// Entity categories, named after the common NER label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Org,
    Product,
    Person,
    Gpe,
    Date,
    Event,
    WorkOfArt,
    /// Capitalised span with no stronger signal.
    Misc,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Org => "ORG",
            Self::Product => "PRODUCT",
            Self::Person => "PERSON",
            Self::Gpe => "GPE",
            Self::Date => "DATE",
            Self::Event => "EVENT",
            Self::WorkOfArt => "WORK_OF_ART",
            Self::Misc => "MISC",
        }
    }

    /// Whether entities with this label reach the prompt.
    pub fn is_reported(&self) -> bool {
        !matches!(self, Self::Misc)
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognised entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// An entity with its occurrence count across all snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub entity: Entity,
    pub count: usize,
}

/// Finds entities in a piece of text.
pub trait EntityRecognizer: Send + Sync {
    /// Entities in order of appearance.
    fn recognize(&self, text: &str) -> Result<Vec<Entity>>;
}

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec";

const HONORIFICS: &[&str] = &[
    "Mr", "Mr.", "Mrs", "Mrs.", "Ms", "Ms.", "Dr", "Dr.", "Prof", "Prof.", "Sir", "President",
    "CEO", "Senator", "Sen.", "Judge",
];

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "Inc.", "Corp", "Corp.", "Corporation", "LLC", "Ltd", "Co", "Company",
    "Group", "University", "Institute", "Foundation", "Association", "Labs", "Technologies",
    "Systems", "Agency", "Bank", "Ministry", "Department", "Council", "Committee",
];

const KNOWN_ORGS: &[&str] = &[
    "Google", "Microsoft", "Apple", "Amazon", "Meta", "OpenAI", "Anthropic", "IBM", "Nvidia",
    "NVIDIA", "Intel", "AMD", "Tesla", "Netflix", "Samsung", "Oracle", "Salesforce", "Adobe",
    "DeepMind", "Hugging Face", "Mistral AI", "NASA", "WHO", "UN", "FDA", "MIT", "Stanford",
    "Harvard", "Reuters", "Bloomberg", "Forbes", "TechCrunch", "GitHub", "Reddit", "Wikipedia",
];

const KNOWN_PRODUCTS: &[&str] = &[
    "ChatGPT", "Copilot", "Gemini", "Claude", "Bard", "Siri", "Alexa", "Windows", "Android",
    "Linux", "Chrome", "Firefox", "Photoshop", "Excel", "Slack", "Zoom", "Kubernetes", "Docker",
    "TensorFlow", "PyTorch", "Llama",
];

const PLACES: &[&str] = &[
    "United States", "USA", "U.S.", "US", "America", "United Kingdom", "UK", "Britain",
    "England", "Canada", "Mexico", "Brazil", "China", "India", "Japan", "Korea", "South Korea",
    "Germany", "France", "Italy", "Spain", "Russia", "Ukraine", "Australia", "Israel",
    "Singapore", "Taiwan", "Europe", "Asia", "Africa", "California", "Texas", "New York",
    "Washington", "London", "Paris", "Berlin", "Tokyo", "Beijing", "Shanghai", "San Francisco",
    "Silicon Valley", "Seattle", "Boston", "Toronto", "Sydney", "Dubai",
];

const EVENT_WORDS: &[&str] = &[
    "Conference", "Summit", "Olympics", "War", "Expo", "Festival", "Championship", "Cup",
    "Awards", "Week", "Symposium", "Hackathon", "Election",
];

/// Capitalised words that only start sentences or headlines.
const LEADING_NOISE: &[&str] = &[
    "A", "An", "The", "This", "That", "These", "Those", "It", "Its", "In", "On", "At", "For",
    "And", "But", "Or", "If", "How", "What", "Why", "When", "Where", "Which", "Who", "We",
    "You", "Your", "Our", "They", "Their", "I", "My", "Top", "Best", "New", "Learn", "Read",
    "Find", "Get", "See", "Here", "There", "With", "From", "By", "As", "All", "Some", "Most",
    "More", "Many", "After", "Before", "During", "Today", "Yesterday", "Is", "Are", "Was",
    "Can", "Will", "Should", "Do", "Does", "To", "Of", "Not", "No", "Yes", "Also", "Each",
];

/// Rule-based recogniser.
#[derive(Debug, Clone)]
pub struct HeuristicRecognizer {
    date: Regex,
    quoted: Regex,
    product_code: Regex,
    capitalized: Regex,
}

impl HeuristicRecognizer {
    /// Compile the recogniser's patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Entities`] if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ResearchError::Entities(e.to_string()))
        };
        Ok(Self {
            date: compile(&format!(
                r"\b(?:(?:{MONTHS})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+(?:19|20)\d{{2}})?|\d{{1,2}}\s+(?:{MONTHS})\.?(?:\s+(?:19|20)\d{{2}})?|(?:{MONTHS})\.?\s+(?:19|20)\d{{2}}|(?:19|20)\d{{2}})\b"
            ))?,
            quoted: compile(r#"["“]([A-Z][^"“”\n]{1,80}?)["”]"#)?,
            product_code: compile(
                r"\b(?:i(?:Phone|Pad|OS)|macOS|[A-Z][A-Za-z]*-\d+(?:\.\d+)?[A-Za-z]*)\b",
            )?,
            capitalized: compile(
                r"\b[A-Z][A-Za-z0-9&'.-]*(?:\s+(?:(?:of|for|de|&)\s+)?[A-Z][A-Za-z0-9&'.-]*)*",
            )?,
        })
    }

    fn classify_span(span: &str) -> Option<Entity> {
        let span = span.trim_end_matches(['.', '\'', '-']);
        let mut words: Vec<&str> = span.split_whitespace().collect();

        if let Some(first) = words.first()
            && HONORIFICS.contains(first)
            && words.len() > 1
        {
            return Some(Entity::new(words[1..].join(" "), EntityLabel::Person));
        }

        while words.first().is_some_and(|w| LEADING_NOISE.contains(w)) {
            words.remove(0);
        }
        if words.is_empty() {
            return None;
        }
        let text = words.join(" ");
        let last = words.last().copied().unwrap_or_default();

        let label = if PLACES.contains(&text.as_str()) {
            EntityLabel::Gpe
        } else if KNOWN_ORGS.contains(&text.as_str()) || ORG_SUFFIXES.contains(&last) {
            EntityLabel::Org
        } else if KNOWN_PRODUCTS.contains(&text.as_str()) {
            EntityLabel::Product
        } else if words.len() > 1 && EVENT_WORDS.contains(&last) {
            EntityLabel::Event
        } else if words.len() == 1 && text.len() < 2 {
            return None;
        } else {
            EntityLabel::Misc
        };
        Some(Entity::new(text, label))
    }
}

impl EntityRecognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let mut found: Vec<(usize, usize, Entity)> = Vec::new();
        let overlaps = |found: &[(usize, usize, Entity)], start: usize, end: usize| {
            found.iter().any(|(s, e, _)| start < *e && *s < end)
        };

        for m in self.date.find_iter(text) {
            found.push((m.start(), m.end(), Entity::new(m.as_str(), EntityLabel::Date)));
        }
        for caps in self.quoted.captures_iter(text) {
            if let (Some(whole), Some(title)) = (caps.get(0), caps.get(1))
                && !overlaps(&found, whole.start(), whole.end())
            {
                found.push((
                    whole.start(),
                    whole.end(),
                    Entity::new(title.as_str().trim(), EntityLabel::WorkOfArt),
                ));
            }
        }
        for m in self.product_code.find_iter(text) {
            if !overlaps(&found, m.start(), m.end()) {
                found.push((m.start(), m.end(), Entity::new(m.as_str(), EntityLabel::Product)));
            }
        }
        for m in self.capitalized.find_iter(text) {
            if overlaps(&found, m.start(), m.end()) {
                continue;
            }
            if let Some(entity) = Self::classify_span(m.as_str()) {
                found.push((m.start(), m.end(), entity));
            }
        }

        found.sort_by_key(|(start, _, _)| *start);
        Ok(found.into_iter().map(|(_, _, entity)| entity).collect())
    }
}

/// Counts reported entities across snippets and keeps the most frequent.
#[derive(Clone)]
pub struct EntityExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
    top_n: usize,
}

impl fmt::Debug for EntityExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityExtractor")
            .field("top_n", &self.top_n)
            .finish_non_exhaustive()
    }
}

impl EntityExtractor {
    pub const DEFAULT_TOP_N: usize = 10;

    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            top_n: Self::DEFAULT_TOP_N,
        }
    }

    /// Extractor backed by [`HeuristicRecognizer`].
    ///
    /// # Errors
    ///
    /// Fails only if the recogniser's patterns fail to compile.
    pub fn heuristic() -> Result<Self> {
        Ok(Self::new(Arc::new(HeuristicRecognizer::new()?)))
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Top entities by frequency; ties keep first-seen order.
    ///
    /// A recogniser failure is logged and yields an empty list.
    pub fn extract<'a>(&self, snippets: impl IntoIterator<Item = &'a str>) -> Vec<EntityCount> {
        match self.try_extract(snippets) {
            Ok(counts) => counts,
            Err(e) => {
                tracing::warn!(error = %e, "entity extraction failed, continuing without entities");
                Vec::new()
            }
        }
    }

    fn try_extract<'a>(
        &self,
        snippets: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<EntityCount>> {
        let mut order: Vec<Entity> = Vec::new();
        let mut counts: HashMap<Entity, usize> = HashMap::new();

        for snippet in snippets {
            for entity in self.recognizer.recognize(snippet)? {
                if !entity.label.is_reported() {
                    continue;
                }
                let count = counts.entry(entity.clone()).or_insert(0);
                if *count == 0 {
                    order.push(entity);
                }
                *count += 1;
            }
        }

        let mut ranked: Vec<EntityCount> = order
            .into_iter()
            .map(|entity| {
                let count = counts.get(&entity).copied().unwrap_or_default();
                EntityCount { entity, count }
            })
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(self.top_n);
        tracing::debug!(entities = ranked.len(), "extracted entities");
        Ok(ranked)
    }
}
