use crate::error::FasalError;
use serde::{Deserialize, Serialize};
use std::fmt;

const OFFLINE_GUIDE_JSON: &str = include_str!("../../../../data/offline-guide.json");

const FERTILIZER_WORDS: &[&str] = &["fertilizer", "khad"];
const PEST_WORDS: &[&str] = &["pest", "disease", "insect", "rog"];
const HARVEST_WORDS: &[&str] = &["harvest", "cutting"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Rabi,
    Kharif,
    Zaid,
    #[serde(rename = "All Season")]
    AllSeason,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Rabi => write!(f, "Rabi"),
            Season::Kharif => write!(f, "Kharif"),
            Season::Zaid => write!(f, "Zaid"),
            Season::AllSeason => write!(f, "All Season"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertilizerPlan {
    pub basal: String,
    pub top_dressing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PestAdvice {
    pub symptom: String,
    pub solution: String,
    /// Organic alternative to `solution`.
    pub organic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideEntry {
    /// Lowercase keyword looked for in queries, e.g. "wheat".
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    pub season: Season,
    pub fertilizer: FertilizerPlan,
    pub pests: Vec<PestAdvice>,
    pub harvesting: String,
}

/// Small crop guide answered from when no live advisor is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineGuide {
    pub entries: Vec<GuideEntry>,
}

impl OfflineGuide {
    /// The guide shipped with the binary.
    pub fn builtin() -> Result<Self, FasalError> {
        Self::from_json(OFFLINE_GUIDE_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, FasalError> {
        let guide: OfflineGuide = serde_json::from_str(json)?;
        guide.validate()?;
        Ok(guide)
    }

    pub fn validate(&self) -> Result<(), FasalError> {
        if self.entries.is_empty() {
            return Err(FasalError::CatalogInvalid(
                "offline guide has no entries".into(),
            ));
        }
        for entry in &self.entries {
            if entry.key.trim().is_empty() || entry.key != entry.key.to_lowercase() {
                return Err(FasalError::CatalogInvalid(format!(
                    "guide key '{}' must be a non-empty lowercase keyword",
                    entry.key
                )));
            }
            if entry.pests.is_empty() {
                return Err(FasalError::CatalogInvalid(format!(
                    "guide entry '{}' lists no pests",
                    entry.key
                )));
            }
        }
        Ok(())
    }

    /// First entry whose key or display name appears in the query.
    pub fn find(&self, query: &str) -> Option<&GuideEntry> {
        let q = query.to_lowercase();
        self.entries
            .iter()
            .find(|e| q.contains(&e.key) || q.contains(&e.name.to_lowercase()))
    }

    /// Answer a free-text question from the guide alone. Never fails.
    pub fn answer_offline(&self, query: &str) -> String {
        let q = query.to_lowercase();
        let Some(entry) = self.find(&q) else {
            return self.not_found_message();
        };
        // Validated non-empty at load
        let pest = &entry.pests[0];

        if contains_any(&q, FERTILIZER_WORDS) {
            format!(
                "For {}: Basal dose - {} Top dressing - {}",
                entry.name, entry.fertilizer.basal, entry.fertilizer.top_dressing
            )
        } else if contains_any(&q, PEST_WORDS) {
            format!(
                "Common pest in {} is {}. Solution: {} (Organic: {})",
                entry.name, pest.symptom, pest.solution, pest.organic
            )
        } else if contains_any(&q, HARVEST_WORDS) {
            format!("Harvest {}: {}", entry.name, entry.harvesting)
        } else {
            format!(
                "{} ({}): Needs {} Watch out for {}.",
                entry.name, entry.season, entry.fertilizer.basal, pest.symptom
            )
        }
    }

    pub fn not_found_message(&self) -> String {
        let names: Vec<String> = self.entries.iter().map(|e| capitalize(&e.key)).collect();
        let listed = match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        };
        format!(
            "I couldn't find specific info in my offline database. Please try asking about {listed}."
        )
    }
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide() -> OfflineGuide {
        OfflineGuide::builtin().unwrap()
    }

    #[test]
    fn test_fertilizer_for_wheat() {
        let answer = guide().answer_offline("fertilizer for wheat");
        assert!(answer.contains("Wheat"));
        assert!(answer.contains("Basal"));
        assert!(answer.contains("Top dressing"));
    }

    #[test]
    fn test_khad_is_fertilizer() {
        let answer = guide().answer_offline("Rice ke liye khad?");
        assert!(answer.starts_with("For Rice (Paddy/Dhan): Basal dose"));
    }

    #[test]
    fn test_pest_answer() {
        let answer = guide().answer_offline("Tomato leaf curl disease remedy");
        assert!(answer.contains("Leaf Curl Virus"));
        assert!(answer.contains("Organic: Yellow sticky traps."));
    }

    #[test]
    fn test_harvest_answer() {
        let answer = guide().answer_offline("when to harvest maize");
        assert!(answer.starts_with("Harvest Maize (Makka):"));
    }

    #[test]
    fn test_fertilizer_checked_before_pest() {
        let answer = guide().answer_offline("cotton fertilizer and pest");
        assert!(answer.contains("Basal dose"));
    }

    #[test]
    fn test_generic_summary() {
        let answer = guide().answer_offline("tell me about cotton");
        assert!(answer.starts_with("Cotton (Kapas) (Kharif): Needs"));
        assert!(answer.contains("Pink Bollworm"));
    }

    #[test]
    fn test_first_key_wins() {
        // wheat is listed before rice
        let answer = guide().answer_offline("rice or wheat harvest");
        assert!(answer.starts_with("Harvest Wheat"));
    }

    #[test]
    fn test_display_name_matches() {
        let json = r#"{ "entries": [{
            "key": "gehu", "name": "Wheat", "season": "Rabi",
            "fertilizer": { "basal": "a", "top_dressing": "b" },
            "pests": [{ "symptom": "Rust", "solution": "x", "organic": "o" }],
            "harvesting": "h"
        }] }"#;
        let g = OfflineGuide::from_json(json).unwrap();
        assert!(g.answer_offline("WHEAT pests").starts_with("Common pest in Wheat is Rust"));
    }

    #[test]
    fn test_not_found() {
        let answer = guide().answer_offline("xyz123nonsense");
        assert_eq!(
            answer,
            "I couldn't find specific info in my offline database. \
             Please try asking about Wheat, Rice, Tomato, Maize, or Cotton."
        );
    }

    #[test]
    fn test_empty_query_not_found() {
        let g = guide();
        assert_eq!(g.answer_offline(""), g.not_found_message());
    }

    #[test]
    fn test_uppercase_key_rejected() {
        let json = r#"{ "entries": [{
            "key": "Wheat", "name": "Wheat", "season": "Rabi",
            "fertilizer": { "basal": "a", "top_dressing": "b" },
            "pests": [{ "symptom": "s", "solution": "x", "organic": "o" }],
            "harvesting": "h"
        }] }"#;
        assert!(OfflineGuide::from_json(json).is_err());
    }

    #[test]
    fn test_single_entry_not_found_message() {
        let json = r#"{ "entries": [{
            "key": "wheat", "name": "Wheat", "season": "Rabi",
            "fertilizer": { "basal": "a", "top_dressing": "b" },
            "pests": [{ "symptom": "s", "solution": "x", "organic": "o" }],
            "harvesting": "h"
        }] }"#;
        let g = OfflineGuide::from_json(json).unwrap();
        assert!(g.not_found_message().ends_with("asking about Wheat."));
    }
}
