// Token streams from external parsers flow through matching and annotation

#[path = "integration/mod.rs"]
mod test_utils;

#[path = "integration/fixtures/mod.rs"]
mod fixtures;

use fixtures::*;
use glossa::external::{parse_line_stream, ExternalParseResult};
use glossa::{get_profile, ExternalFormatError, TermId};
use test_utils::pipeline_for;

const CHINESE_VOCABULARY: &str = r#"[
    {"id": 30, "language": "zh", "text": "喜欢", "status": 3, "translation": "to like", "romanization": "xǐhuan"},
    {"id": 31, "language": "zh", "text": "中文", "status": 1, "translation": "Chinese", "romanization": "zhōngwén"}
]"#;

#[test]
fn test_line_stream_is_matched_and_annotated() {
    let chinese = get_profile("zh").unwrap();
    let sentences = parse_line_stream(CHINESE_LINE_STREAM, &chinese);
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].surface(), "我喜欢学习中文。");
    assert_eq!(sentences[1].terminator.as_deref(), Some("？"));

    let (pipeline, _) = pipeline_for("zh", CHINESE_VOCABULARY);
    let view = pipeline.read_tokenized(sentences);
    let document = view.annotation();

    assert_eq!(
        document.line(1),
        Some("我||\t喜欢|to like|xǐhuan\t学习||\t中文|Chinese|zhōngwén")
    );
    assert_eq!(document.line(2), Some("你||\t呢||"));

    let edited = document.to_string().replace("to like|", "like|");
    let fields = view.decode_line(&edited, 1).unwrap();
    let updates = fields.term_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, TermId(30));
}

#[test]
fn test_json_result_keeps_readings_and_gaps() {
    let japanese = get_profile("ja").unwrap();
    let json = r#"{
        "sentences": ["私は 学生です。"],
        "tokens": [
            {"text": "私", "is_word": true, "reading": "わたし"},
            {"text": "は", "is_word": true},
            {"text": "学生", "is_word": true, "reading": "がくせい"},
            {"text": "です", "is_word": true, "reading": ""},
            {"text": "。", "is_word": false}
        ]
    }"#;

    let sentences = ExternalParseResult::from_json(json)
        .unwrap()
        .into_sentences(&japanese)
        .unwrap();
    assert_eq!(sentences.len(), 1);

    let sentence = &sentences[0];
    let readings: Vec<Option<&str>> = sentence.words().map(|(_, w)| w.reading.as_deref()).collect();
    assert_eq!(readings, vec![Some("わたし"), None, Some("がくせい"), None]);
    // The skipped space is dropped for a space-removing profile
    assert_eq!(sentence.surface(), "私は学生です。");
    assert_eq!(sentence.terminator.as_deref(), Some("。"));

    let (pipeline, _) = pipeline_for("ja", JAPANESE_VOCABULARY);
    let view = pipeline.read_tokenized(sentences);
    assert_eq!(view.stats().unknown, 4);

    // Readings fill the romanization column of unknown spans
    assert_eq!(
        view.annotation().line(1),
        Some("私||わたし\tは||\t学生||がくせい\tです||")
    );
    let fields = view.decode_line(&view.annotation().to_string(), 1).unwrap();
    assert!(fields.fields.values().all(|f| !f.changed));
}

#[test]
fn test_json_token_outside_every_sentence() {
    let japanese = get_profile("ja").unwrap();
    let json = r#"{
        "sentences": ["今日は。", "晴れ"],
        "tokens": [
            {"text": "今日", "is_word": true},
            {"text": "雨", "is_word": true}
        ]
    }"#;

    let result = ExternalParseResult::from_json(json).unwrap().into_sentences(&japanese);
    assert!(matches!(
        result,
        Err(ExternalFormatError::Misaligned { ref token, sentence: 0 }) if token == "雨"
    ));
}

#[test]
fn test_misaligned_token_reports_sentence_where_alignment_stopped() {
    let japanese = get_profile("ja").unwrap();
    let json = r#"{
        "sentences": ["今日は。", "晴れ。", "明日も"],
        "tokens": [
            {"text": "今日", "is_word": true},
            {"text": "晴れ", "is_word": true},
            {"text": "雪", "is_word": true}
        ]
    }"#;

    let result = ExternalParseResult::from_json(json).unwrap().into_sentences(&japanese);
    assert!(matches!(
        result,
        Err(ExternalFormatError::Misaligned { ref token, sentence: 1 }) if token == "雪"
    ));
}

#[test]
fn test_unspaced_vocabulary_without_word_count() {
    let (pipeline, _) = pipeline_for("zh", CHINESE_VOCABULARY);
    let view = pipeline.read_text("我喜欢中文。");

    let known: Vec<&str> = view
        .spans()
        .filter(|span| span.is_known())
        .map(|span| span.surface.as_str())
        .collect();
    assert_eq!(known, vec!["喜欢", "中文"]);
    assert_eq!(view.stats().unknown, 1);
    assert_eq!(
        view.annotation().line(1),
        Some("我||\t喜欢|to like|xǐhuan\t中文|Chinese|zhōngwén")
    );
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        ExternalParseResult::from_json("{\"sentences\": 3}"),
        Err(ExternalFormatError::Json(_))
    ));
}
