use crate::config::CloudConfig;
use crate::domain::model::WordFrequency;
use crate::utils::error::{PipelineError, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};

pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k",
    "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves",
    "out", "over", "own", "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's",
    "should", "shouldn't", "since", "so", "some", "such", "than", "that", "that's", "the",
    "their", "theirs", "them", "themselves", "then", "there", "there's", "therefore", "these",
    "they", "they'd", "they'll", "they're", "they've", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've",
    "were", "weren't", "what", "what's", "when", "when's", "where", "where's", "which", "while",
    "who", "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "www", "you",
    "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// Tokenizes and counts words the way common word-cloud generators do.
pub struct WordCounter {
    token_re: Regex,
    stopwords: HashSet<String>,
    min_word_length: usize,
    include_numbers: bool,
    normalize_plurals: bool,
}

impl WordCounter {
    pub fn new(config: &CloudConfig) -> Result<Self> {
        let token_re = Regex::new(r"\w[\w']+").map_err(|e| PipelineError::ProcessingError {
            message: format!("invalid token pattern: {}", e),
        })?;

        let stopwords = STOPWORDS
            .iter()
            .map(|w| w.to_string())
            .chain(config.stopwords.iter().map(|w| w.to_lowercase()))
            .collect();

        Ok(Self {
            token_re,
            stopwords,
            min_word_length: config.min_word_length,
            include_numbers: config.include_numbers,
            normalize_plurals: config.normalize_plurals,
        })
    }

    pub fn tokens<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.token_re
            .find_iter(text)
            .map(|m| m.as_str())
            .map(strip_possessive)
            .filter(|w| self.include_numbers || !w.chars().all(|c| c.is_ascii_digit()))
            .filter(|w| w.chars().count() >= self.min_word_length)
            .filter(|w| !self.stopwords.contains(&w.to_lowercase()))
            .collect()
    }

    /// 回傳依次數遞減排序的詞頻
    pub fn count(&self, text: &str) -> Vec<WordFrequency> {
        // lowercase key -> 各種大小寫寫法與次數 (保持首次出現順序)
        let mut order: Vec<String> = Vec::new();
        let mut variants: HashMap<String, Vec<(String, usize)>> = HashMap::new();

        for token in self.tokens(text) {
            let key = token.to_lowercase();
            let entry = variants.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            match entry.iter_mut().find(|(spelling, _)| spelling == token) {
                Some((_, count)) => *count += 1,
                None => entry.push((token.to_string(), 1)),
            }
        }

        if self.normalize_plurals {
            merge_plurals(&order, &mut variants);
        }

        let mut frequencies: Vec<WordFrequency> = order
            .iter()
            .filter_map(|key| variants.get(key))
            .map(|spellings| {
                let total = spellings.iter().map(|(_, c)| c).sum();
                // 次數相同時保留最先出現的寫法
                let mut best = &spellings[0];
                for candidate in spellings.iter().skip(1) {
                    if candidate.1 > best.1 {
                        best = candidate;
                    }
                }
                WordFrequency {
                    word: best.0.clone(),
                    count: total,
                }
            })
            .collect();

        frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        frequencies
    }
}

fn strip_possessive(word: &str) -> &str {
    let len = word.len();
    if len > 2 && word.is_char_boundary(len - 2) && word[len - 2..].eq_ignore_ascii_case("'s") {
        &word[..len - 2]
    } else {
        word
    }
}

fn merge_plurals(order: &[String], variants: &mut HashMap<String, Vec<(String, usize)>>) {
    for key in order {
        if !key.ends_with('s') || key.ends_with("ss") {
            continue;
        }
        let singular = &key[..key.len() - 1];
        if !variants.contains_key(singular) {
            continue;
        }
        let Some(plural_spellings) = variants.remove(key) else {
            continue;
        };
        if let Some(singular_spellings) = variants.get_mut(singular) {
            for (spelling, count) in plural_spellings {
                let trimmed = spelling[..spelling.len() - 1].to_string();
                match singular_spellings.iter_mut().find(|(s, _)| *s == trimmed) {
                    Some((_, existing)) => *existing += count,
                    None => singular_spellings.push((trimmed, count)),
                }
            }
        }
    }
}
