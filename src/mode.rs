use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::vocabulary::TranslationRecord;

/// Which two fields of a record become the prompt and the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    #[default]
    #[serde(rename = "pinyin-hanzi")]
    PinyinHanzi,
    #[serde(rename = "pinyin-spanish")]
    PinyinSpanish,
    #[serde(rename = "pinyin-english")]
    PinyinEnglish,
    #[serde(rename = "hanzi-spanish")]
    HanziSpanish,
    #[serde(rename = "hanzi-english")]
    HanziEnglish,
    #[serde(rename = "hanzi+pinyin-spanish")]
    HanziPinyinSpanish,
    #[serde(rename = "hanzi+pinyin-english")]
    HanziPinyinEnglish,
}

impl ProjectionMode {
    pub const ALL: [ProjectionMode; 7] = [
        ProjectionMode::PinyinHanzi,
        ProjectionMode::PinyinSpanish,
        ProjectionMode::PinyinEnglish,
        ProjectionMode::HanziSpanish,
        ProjectionMode::HanziEnglish,
        ProjectionMode::HanziPinyinSpanish,
        ProjectionMode::HanziPinyinEnglish,
    ];

    /// Stable identifier used on the command line and in the config file
    pub fn id(&self) -> &'static str {
        match self {
            ProjectionMode::PinyinHanzi => "pinyin-hanzi",
            ProjectionMode::PinyinSpanish => "pinyin-spanish",
            ProjectionMode::PinyinEnglish => "pinyin-english",
            ProjectionMode::HanziSpanish => "hanzi-spanish",
            ProjectionMode::HanziEnglish => "hanzi-english",
            ProjectionMode::HanziPinyinSpanish => "hanzi+pinyin-spanish",
            ProjectionMode::HanziPinyinEnglish => "hanzi+pinyin-english",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectionMode::PinyinHanzi => "Pinyin → Hanzi",
            ProjectionMode::PinyinSpanish => "Pinyin → Spanish",
            ProjectionMode::PinyinEnglish => "Pinyin → English",
            ProjectionMode::HanziSpanish => "Hanzi → Spanish",
            ProjectionMode::HanziEnglish => "Hanzi → English",
            ProjectionMode::HanziPinyinSpanish => "Hanzi + Pinyin → Spanish",
            ProjectionMode::HanziPinyinEnglish => "Hanzi + Pinyin → English",
        }
    }

    /// Split a record into `(prompt, solution)`.
    pub fn project(&self, word: &TranslationRecord) -> (String, String) {
        let combined = || format!("{} ({})", word.hanzi, word.pinyin);
        match self {
            ProjectionMode::PinyinHanzi => (word.pinyin.clone(), word.hanzi.clone()),
            ProjectionMode::PinyinSpanish => (word.pinyin.clone(), word.spanish.clone()),
            ProjectionMode::PinyinEnglish => (word.pinyin.clone(), word.english.clone()),
            ProjectionMode::HanziSpanish => (word.hanzi.clone(), word.spanish.clone()),
            ProjectionMode::HanziEnglish => (word.hanzi.clone(), word.english.clone()),
            ProjectionMode::HanziPinyinSpanish => (combined(), word.spanish.clone()),
            ProjectionMode::HanziPinyinEnglish => (combined(), word.english.clone()),
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.id() == wanted)
            .ok_or_else(|| Error::invalid(format!("unknown projection mode '{s}'")))
    }
}
