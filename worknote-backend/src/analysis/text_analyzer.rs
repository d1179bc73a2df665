//! Text analysis for free-form work notes.
//!
//! Extracts dates, times, named entities, task sentences and keywords with
//! regex patterns and suffix heuristics, and scores a coarse sentiment.

use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::db::now_local;
use crate::models::{AnalysisSummary, AnalyzedText, Entities, Sentiment};

// Compound week expressions are taken before the short date patterns
static WEEK_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(다음주|이번주)\s*[월화수목금토일]요일").unwrap());
static DATE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d{4}년\s*\d{1,2}월\s*\d{1,2}일",
        r"\d{1,2}월\s*\d{1,2}일",
        r"\d{1,2}/\d{1,2}",
        r"오늘|내일|모레|다음주|다음달",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static COMPOUND_TIME_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"오후\s*\d{1,2}시",
        r"오전\s*\d{1,2}시",
        r"오후\s*\d{1,2}:\d{2}",
        r"오전\s*\d{1,2}:\d{2}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});
static SIMPLE_TIME_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\d{1,2}:\d{2}", r"\d{1,2}시\s*\d{1,2}분", r"\d{1,2}시"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

const HONORIFICS: [&str; 7] = ["님", "씨", "대표", "팀장", "부장", "과장", "사원"];
static PERSON_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    HONORIFICS
        .iter()
        .map(|h| Regex::new(&format!(r"([가-힣]{{2,4}})\s*{}", h)).unwrap())
        .collect()
});

/// Words an honorific can follow that are titles or forms of address, not names
const NON_NAMES: [&str; 9] = ["대표", "팀장", "부장", "과장", "사원", "사장", "고객", "선생", "담당자"];

static TASK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"해야\s*할\s*일",
        r"완료\s*해야\s*함",
        r"진행\s*중",
        r"검토\s*필요",
        r"작업\s*예정",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Trailing particles stripped from tokens, longest first
const PARTICLES: [&str; 20] = [
    "에게서", "으로", "에서", "에게", "한테", "까지", "부터", "이랑", "처럼", "은", "는", "이",
    "가", "을", "를", "에", "와", "과", "로", "도",
];

/// Endings that mark a token as a predicate rather than a noun
const PREDICATE_ENDINGS: [&str; 9] = ["다", "요", "해야", "하고", "하는", "해서", "하며", "하기", "했고"];

/// Suffixes of organization names: (suffix, minimum chars before it)
const ORG_SUFFIXES: [(&str, usize); 4] = [("회사", 1), ("기업", 1), ("그룹", 1), ("팀", 2)];
const ORG_ASCII_SUFFIXES: [&str; 3] = ["inc", "corp", "ltd"];

/// Suffixes of places: (suffix, minimum chars before it)
const LOCATION_SUFFIXES: [(&str, usize); 8] = [
    ("회의실", 0),
    ("사무실", 0),
    ("본사", 0),
    ("지사", 0),
    ("카페", 0),
    ("빌딩", 2),
    ("센터", 2),
    ("역", 2),
];

const POSITIVE_WORDS: [&str; 5] = ["좋다", "성공", "완료", "달성", "만족"];
const NEGATIVE_WORDS: [&str; 5] = ["문제", "지연", "실패", "어려움", "부족"];

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

/// Strip surrounding punctuation and one trailing particle (when at least
/// two characters remain)
fn normalize_token(raw: &str) -> String {
    let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
    for particle in PARTICLES {
        if let Some(stem) = token.strip_suffix(particle) {
            if stem.chars().count() >= 2 {
                return stem.to_string();
            }
        }
    }
    token.to_string()
}

fn has_suffix_with_stem(token: &str, suffix: &str, min_stem: usize) -> bool {
    match token.strip_suffix(suffix) {
        Some(stem) => stem.chars().count() >= min_stem,
        None => false,
    }
}

pub struct TextAnalyzer {
    stop_words: HashSet<String>,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer {
    pub fn new() -> Self {
        let stop_words = stop_words::get(stop_words::LANGUAGE::Korean)
            .iter()
            .chain(stop_words::get(stop_words::LANGUAGE::English).iter())
            .map(|w| w.to_string().to_lowercase())
            .collect();

        Self { stop_words }
    }

    /// Analyze text into structured data. `reference` anchors relative dates.
    pub fn analyze(&self, text: &str, user_id: &str, reference: NaiveDateTime) -> AnalyzedText {
        AnalyzedText {
            original_text: text.to_string(),
            user_id: user_id.to_string(),
            reference,
            dates: self.extract_dates(text),
            times: self.extract_times(text),
            entities: self.extract_entities(text),
            tasks: self.extract_tasks(text),
            keywords: self.extract_keywords(text),
            sentiment: self.analyze_sentiment(text),
            processed_at: now_local(),
        }
    }

    pub fn summarize(&self, text: &str) -> AnalysisSummary {
        AnalysisSummary {
            text_length: text.chars().count(),
            word_count: text.split_whitespace().count(),
            has_dates: !self.extract_dates(text).is_empty(),
            has_times: !self.extract_times(text).is_empty(),
            entity_count: self.extract_entities(text).count(),
            keyword_count: self.extract_keywords(text).len(),
        }
    }

    /// Dates in extraction order. Short patterns overlapping a compound week
    /// expression are skipped and a date contained in a longer one is dropped.
    pub fn extract_dates(&self, text: &str) -> Vec<String> {
        let mut dates: Vec<String> = Vec::new();
        let mut used_spans: Vec<(usize, usize)> = Vec::new();

        for m in WEEK_DAY_RE.find_iter(text) {
            dates.push(m.as_str().to_string());
            used_spans.push((m.start(), m.end()));
        }

        for re in DATE_RES.iter() {
            for m in re.find_iter(text) {
                let overlaps = used_spans
                    .iter()
                    .any(|&(s, e)| (s <= m.start() && m.start() < e) || (s < m.end() && m.end() <= e));
                if !overlaps {
                    dates.push(m.as_str().to_string());
                }
            }
        }

        dates
            .iter()
            .filter(|d| !dates.iter().any(|other| other != *d && other.contains(d.as_str())))
            .cloned()
            .collect()
    }

    /// Times: compound 오전/오후 forms, then bare clock forms, then the bare
    /// 오전/오후 words when no extracted time already carries them.
    pub fn extract_times(&self, text: &str) -> Vec<String> {
        let mut times: Vec<String> = Vec::new();

        for re in COMPOUND_TIME_RES.iter().chain(SIMPLE_TIME_RES.iter()) {
            times.extend(re.find_iter(text).map(|m| m.as_str().to_string()));
        }

        for kw in ["오전", "오후"] {
            if text.contains(kw) && !times.iter().any(|t| t.contains(kw)) {
                times.push(kw.to_string());
            }
        }

        times
    }

    pub fn extract_entities(&self, text: &str) -> Entities {
        let mut entities = Entities::default();

        // "박영희 팀장님" matches both the title and 님; keep the name, in mention order
        let mut mentions: Vec<(usize, &str)> = PERSON_RES
            .iter()
            .flat_map(|re| re.captures_iter(text))
            .filter_map(|caps| caps.get(1))
            .filter(|m| !NON_NAMES.iter().any(|title| m.as_str().ends_with(title)))
            .map(|m| (m.start(), m.as_str()))
            .collect();
        mentions.sort_by_key(|(start, _)| *start);
        for (_, name) in mentions {
            push_unique(&mut entities.persons, name);
        }

        for raw in text.split_whitespace() {
            let token = normalize_token(raw);
            if token.is_empty() {
                continue;
            }
            if entities.persons.iter().any(|p| token.starts_with(p.as_str())) {
                continue;
            }

            let lower = token.to_lowercase();
            let is_org = token.contains('㈜')
                || ORG_SUFFIXES
                    .iter()
                    .any(|(suffix, min)| has_suffix_with_stem(&token, suffix, *min))
                || (token.is_ascii()
                    && ORG_ASCII_SUFFIXES
                        .iter()
                        .any(|suffix| lower.ends_with(suffix) && lower.len() > suffix.len() + 1));

            if is_org {
                push_unique(&mut entities.organizations, &token);
            } else if LOCATION_SUFFIXES
                .iter()
                .any(|(suffix, min)| has_suffix_with_stem(&token, suffix, *min))
            {
                push_unique(&mut entities.locations, &token);
            } else if token.is_ascii()
                && token.len() > 1
                && token.chars().next().is_some_and(|c| c.is_ascii_uppercase())
            {
                push_unique(&mut entities.misc, &token);
            }
        }

        entities
    }

    /// Sentences (split on '.') that mention a pending/ongoing task
    pub fn extract_tasks(&self, text: &str) -> Vec<String> {
        let mut tasks = Vec::new();
        for re in TASK_RES.iter() {
            if !re.is_match(text) {
                continue;
            }
            for sentence in text.split('.') {
                if re.is_match(sentence) {
                    push_unique(&mut tasks, sentence.trim());
                }
            }
        }
        tasks
    }

    /// Noun-like tokens longer than one character, minus stop words,
    /// numbers and predicates, in first-seen order
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        let mut keywords = Vec::new();
        for raw in text.split_whitespace() {
            let token = normalize_token(raw);
            if token.chars().count() <= 1 {
                continue;
            }
            if token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                continue;
            }
            if PREDICATE_ENDINGS.iter().any(|ending| token.ends_with(ending)) {
                continue;
            }
            if self.stop_words.contains(&token.to_lowercase()) {
                continue;
            }
            push_unique(&mut keywords, &token);
        }
        keywords
    }

    pub fn analyze_sentiment(&self, text: &str) -> Sentiment {
        let positive = POSITIVE_WORDS.iter().filter(|w| text.contains(*w)).count();
        let negative = NEGATIVE_WORDS.iter().filter(|w| text.contains(*w)).count();

        if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_analyze_fills_every_field() {
        let analyzer = TextAnalyzer::new();
        let text = "내일 오후 2시에 팀 미팅이 있습니다. 프로젝트 진행상황을 논의하고 다음 단계를 계획해야 합니다.";
        let result = analyzer.analyze(text, "u1", reference());

        assert_eq!(result.original_text, text);
        assert_eq!(result.user_id, "u1");
        assert_eq!(result.dates, vec!["내일"]);
        assert!(result.times.contains(&"오후 2시".to_string()));
        assert!(result.keywords.contains(&"프로젝트".to_string()));
        assert_eq!(result.reference, reference());
    }

    #[test]
    fn test_extract_dates() {
        let analyzer = TextAnalyzer::new();
        assert_eq!(analyzer.extract_dates("내일 미팅"), vec!["내일"]);
        assert_eq!(analyzer.extract_dates("다음주 월요일"), vec!["다음주 월요일"]);
        assert_eq!(analyzer.extract_dates("2024년 1월 15일"), vec!["2024년 1월 15일"]);
        assert_eq!(analyzer.extract_dates("3/15 까지 제출"), vec!["3/15"]);
        assert!(analyzer.extract_dates("미팅이 있습니다").is_empty());
    }

    #[test]
    fn test_extract_dates_drops_contained_dates() {
        let analyzer = TextAnalyzer::new();
        let dates = analyzer.extract_dates("이번주 금요일 그리고 다음달");
        assert_eq!(dates, vec!["이번주 금요일", "다음달"]);
    }

    #[test]
    fn test_extract_times() {
        let analyzer = TextAnalyzer::new();

        assert_eq!(analyzer.extract_times("오후 2시 미팅"), vec!["오후 2시", "2시"]);
        assert_eq!(analyzer.extract_times("14:30에 만남"), vec!["14:30"]);
        assert_eq!(analyzer.extract_times("오전 9시"), vec!["오전 9시", "9시"]);
        assert_eq!(analyzer.extract_times("오후에 전화"), vec!["오후"]);
        assert!(analyzer.extract_times("미팅이 있습니다").is_empty());
    }

    #[test]
    fn test_extract_persons_with_honorifics() {
        let analyzer = TextAnalyzer::new();
        let entities = analyzer.extract_entities("김철수님과 박영희 팀장이 이민호씨를 만났다");
        assert_eq!(entities.persons, vec!["김철수", "박영희", "이민호"]);
    }

    #[test]
    fn test_title_with_honorific_is_not_a_person() {
        let analyzer = TextAnalyzer::new();

        let entities = analyzer.extract_entities("박영희 팀장님과 내일 회의");
        assert_eq!(entities.persons, vec!["박영희"]);
        assert_eq!(entities.first_person(), Some("박영희"));

        let entities = analyzer.extract_entities("박영희팀장님께 보고");
        assert_eq!(entities.persons, vec!["박영희"]);

        let entities = analyzer.extract_entities("고객님 문의 응대");
        assert!(entities.persons.is_empty());
    }

    #[test]
    fn test_extract_organizations_and_locations() {
        let analyzer = TextAnalyzer::new();
        let entities =
            analyzer.extract_entities("개발팀과 에이스회사 담당자가 3층 회의실에서 Acme Inc 건을 논의");
        assert!(entities.organizations.contains(&"개발팀".to_string()));
        assert!(entities.organizations.contains(&"에이스회사".to_string()));
        assert!(!entities.organizations.contains(&"Inc".to_string()));
        assert_eq!(entities.locations, vec!["회의실"]);
        assert!(entities.misc.contains(&"Acme".to_string()));
    }

    #[test]
    fn test_extract_tasks() {
        let analyzer = TextAnalyzer::new();
        let tasks = analyzer.extract_tasks("보고서 검토 필요. 점심 먹음. API 작업 예정");
        assert_eq!(tasks, vec!["보고서 검토 필요", "API 작업 예정"]);
        assert!(analyzer.extract_tasks("아무 일 없음").is_empty());
    }

    #[test]
    fn test_extract_keywords_skips_predicates_and_numbers() {
        let analyzer = TextAnalyzer::new();
        let keywords = analyzer.extract_keywords("프로젝트를 2시에 배포했다. 프로젝트 리뷰");
        assert_eq!(keywords, vec!["프로젝트", "리뷰"]);
    }

    #[test]
    fn test_sentiment() {
        let analyzer = TextAnalyzer::new();
        assert_eq!(analyzer.analyze_sentiment("배포 성공, 목표 달성"), Sentiment::Positive);
        assert_eq!(analyzer.analyze_sentiment("일정 지연 문제 발생"), Sentiment::Negative);
        assert_eq!(analyzer.analyze_sentiment("성공했지만 문제"), Sentiment::Neutral);
        assert_eq!(analyzer.analyze_sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn test_summarize() {
        let analyzer = TextAnalyzer::new();
        let summary = analyzer.summarize("내일 오전 10시 김철수님 미팅");
        assert_eq!(summary.word_count, 5);
        assert!(summary.has_dates);
        assert!(summary.has_times);
        assert_eq!(summary.entity_count, 1);
    }
}
