//! Multinomial naive Bayes over character bigrams.
//!
//! Used by the classifier when none of its keyword rules fire, so every input
//! still lands in one of the three categories.

use std::collections::{HashMap, HashSet};

use strum::IntoEnumIterator;

use crate::models::Category;

const TRAINING_CORPUS: [(Category, &str); 6] = [
    (Category::Schedule, "금요일 저녁 고객사 방문 약속 잡힘"),
    (Category::Schedule, "다음 달 초 출장 예약 확인"),
    (Category::WorkLog, "버그 수정하고 코드 리뷰 반영"),
    (Category::WorkLog, "배포 스크립트 정리 및 문서 업데이트"),
    (Category::Meeting, "팀원들과 안건 공유 후 의견 수렴"),
    (Category::Meeting, "분기 목표에 대한 협의와 결론 도출"),
];

/// Character bigrams of each whitespace token; one-char tokens count as themselves
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let chars: Vec<char> = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        match chars.len() {
            0 => {}
            1 => tokens.push(chars[0].to_string()),
            _ => tokens.extend(chars.windows(2).map(|pair| pair.iter().collect::<String>())),
        }
    }
    tokens
}

struct ClassModel {
    category: Category,
    doc_count: usize,
    token_counts: HashMap<String, usize>,
    total_tokens: usize,
}

pub struct NaiveBayes {
    classes: Vec<ClassModel>,
    total_docs: usize,
    vocab_size: usize,
}

impl NaiveBayes {
    /// Train on labelled sentences
    pub fn train(corpus: &[(Category, &str)]) -> Self {
        let mut classes: Vec<ClassModel> = Category::iter()
            .map(|category| ClassModel {
                category,
                doc_count: 0,
                token_counts: HashMap::new(),
                total_tokens: 0,
            })
            .collect();
        let mut vocab = HashSet::new();

        for (category, text) in corpus {
            let Some(class) = classes.iter_mut().find(|c| c.category == *category) else {
                continue;
            };
            class.doc_count += 1;
            for token in tokenize(text) {
                class.total_tokens += 1;
                *class.token_counts.entry(token.clone()).or_insert(0) += 1;
                vocab.insert(token);
            }
        }

        Self {
            classes,
            total_docs: corpus.len(),
            vocab_size: vocab.len(),
        }
    }

    /// Model trained on the built-in corpus
    pub fn builtin() -> Self {
        Self::train(&TRAINING_CORPUS)
    }

    /// Most likely category and its normalized posterior. Ties resolve to the
    /// earliest category (schedule, work_log, meeting).
    pub fn predict(&self, text: &str) -> (Category, f32) {
        let tokens = tokenize(text);
        let total_docs = self.total_docs.max(1) as f64;
        let vocab = self.vocab_size.max(1) as f64;

        let log_probs: Vec<(Category, f64)> = self
            .classes
            .iter()
            .map(|class| {
                // +1 keeps an untrained class from collapsing to -inf
                let prior = ((class.doc_count + 1) as f64 / (total_docs + self.classes.len() as f64)).ln();
                let denominator = class.total_tokens as f64 + vocab;
                let likelihood: f64 = tokens
                    .iter()
                    .map(|t| {
                        let count = class.token_counts.get(t).copied().unwrap_or(0) as f64;
                        ((count + 1.0) / denominator).ln()
                    })
                    .sum();
                (class.category, prior + likelihood)
            })
            .collect();

        let mut best = log_probs[0];
        for &candidate in &log_probs[1..] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }

        let normalizer: f64 = log_probs.iter().map(|(_, lp)| (lp - best.1).exp()).sum();
        (best.0, (1.0 / normalizer) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_bigrams() {
        assert_eq!(tokenize("회의록 a"), vec!["회의", "의록", "a"]);
        assert_eq!(tokenize("API!"), vec!["ap", "pi"]);
        assert!(tokenize("  ... ").is_empty());
    }

    #[test]
    fn test_predict_training_sentences() {
        let model = NaiveBayes::builtin();
        for (category, text) in TRAINING_CORPUS {
            assert_eq!(model.predict(text).0, category, "{}", text);
        }
    }

    #[test]
    fn test_empty_text_falls_back_to_first_category() {
        let model = NaiveBayes::builtin();
        let (category, confidence) = model.predict("");
        assert_eq!(category, Category::Schedule);
        assert!((confidence - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_is_a_probability() {
        let model = NaiveBayes::builtin();
        let (_, confidence) = model.predict("코드 리뷰 반영");
        assert!(confidence > 1.0 / 3.0 && confidence <= 1.0);
    }
}
