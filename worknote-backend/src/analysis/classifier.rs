//! Keyword-rule classifier with a naive-Bayes fallback.

use crate::analysis::bayes::NaiveBayes;
use crate::models::{Category, Classification, ClassificationSource};

const RULE_CONFIDENCE: f32 = 0.8;

const MEETING_RULE: [&str; 5] = ["회의", "미팅", "브리핑", "토론", "논의"];
const WORK_RULE: [&str; 11] = [
    "완료", "진행", "작업", "업무", "프로젝트", "개발", "구현", "테스트", "분석", "마쳤", "끝냈",
];
const TIME_RULE: [&str; 9] = ["시", "분", "오전", "오후", "오늘", "내일", "모레", "다음주", "이번주"];
const SCHEDULE_RULE: [&str; 6] = ["일정", "예약", "스케줄", "계획", "발표", "워크샵"];

const SCHEDULE_KEYWORDS: [&str; 19] = [
    "미팅", "회의", "약속", "일정", "스케줄", "예정", "계획", "오전", "오후", "시", "분", "일", "월",
    "년", "주", "내일", "다음주", "이번주", "오늘",
];
const WORK_LOG_KEYWORDS: [&str; 14] = [
    "완료", "진행", "작업", "업무", "프로젝트", "개발", "테스트", "리뷰", "검토", "수정", "개선",
    "버그", "이슈", "해결",
];
const MEETING_KEYWORDS: [&str; 13] = [
    "회의", "미팅", "브리핑", "발표", "토론", "논의", "협의", "참석", "참가", "진행", "안건", "의견",
    "결론",
];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

pub struct ContentClassifier {
    fallback: NaiveBayes,
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentClassifier {
    pub fn new() -> Self {
        Self {
            fallback: NaiveBayes::builtin(),
        }
    }

    pub fn classify(&self, text: &str) -> Classification {
        let rule_hit = if contains_any(text, &MEETING_RULE) {
            Some(Category::Meeting)
        } else if contains_any(text, &WORK_RULE) {
            Some(Category::WorkLog)
        } else if contains_any(text, &TIME_RULE) || contains_any(text, &SCHEDULE_RULE) {
            Some(Category::Schedule)
        } else {
            None
        };

        match rule_hit {
            Some(category) => Classification {
                category,
                confidence: RULE_CONFIDENCE,
                source: ClassificationSource::Rule,
            },
            None => {
                let (category, confidence) = self.fallback.predict(text);
                log::debug!("[CLASSIFIER] No rule matched, fallback chose {} ({:.2})", category, confidence);
                Classification {
                    category,
                    confidence,
                    source: ClassificationSource::Bayes,
                }
            }
        }
    }

    pub fn is_schedule(&self, text: &str) -> bool {
        contains_any(text, &SCHEDULE_KEYWORDS)
    }

    pub fn is_meeting(&self, text: &str) -> bool {
        contains_any(text, &MEETING_KEYWORDS)
    }

    pub fn is_work_log(&self, text: &str) -> bool {
        contains_any(text, &WORK_LOG_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(text: &str) -> Category {
        ContentClassifier::new().classify(text).category
    }

    #[test]
    fn test_rule_priority() {
        assert_eq!(category("내일 오후 2시에 팀 미팅"), Category::Meeting);
        assert_eq!(category("API 개발 작업을 완료했습니다"), Category::WorkLog);
        assert_eq!(category("회의에서 프로젝트 진행 상황 공유"), Category::Meeting);
        assert_eq!(category("내일 오전 10시 치과"), Category::Schedule);
        assert_eq!(category("워크샵 예약"), Category::Schedule);
    }

    #[test]
    fn test_rule_hits_report_fixed_confidence() {
        let result = ContentClassifier::new().classify("보고서 작업");
        assert_eq!(result.source, ClassificationSource::Rule);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_fallback_when_no_rule_matches() {
        let classifier = ContentClassifier::new();

        let result = classifier.classify("버그 수정 코드 리뷰");
        assert_eq!(result.source, ClassificationSource::Bayes);
        assert_eq!(result.category, Category::WorkLog);

        assert_eq!(classifier.classify("안건 의견 수렴").category, Category::Meeting);
    }

    #[test]
    fn test_always_one_of_three_categories() {
        let classifier = ContentClassifier::new();
        for text in ["", "   ", "hello world", "ㅋㅋㅋ", "12345"] {
            let result = classifier.classify(text);
            assert!(matches!(
                result.category,
                Category::Schedule | Category::WorkLog | Category::Meeting
            ));
            assert!(result.confidence > 0.0 && result.confidence <= 1.0);
        }
    }

    #[test]
    fn test_keyword_predicates() {
        let classifier = ContentClassifier::new();
        assert!(classifier.is_schedule("다음주 약속"));
        assert!(classifier.is_meeting("안건 정리"));
        assert!(classifier.is_work_log("버그 해결"));
        assert!(!classifier.is_work_log("점심 메뉴"));
    }
}
