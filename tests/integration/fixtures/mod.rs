// Test texts and vocabularies
#![allow(dead_code)]

pub const ENGLISH_TEXT: &str = "Mr. Brown looked up the word. He was in the U.S.A. at 3.14 p.m.!\n\
\"Is it late?\" she asked. It was";

pub const ENGLISH_SENTENCES: &[&str] = &[
    "Mr. Brown looked up the word. ",
    "He was in the U.S.A. at 3.14 p.m.!\n",
    "\"Is it late?\" ",
    "she asked. ",
    "It was",
];

pub const ENGLISH_VOCABULARY: &str = r#"[
    {"id": 1, "language": "en", "text": "look up", "status": 3, "translation": "nachschlagen"},
    {"id": 2, "language": "en", "text": "looked up", "status": 2, "translation": "schlug nach", "romanization": "lʊkt ʌp"},
    {"id": 3, "language": "en", "text": "word", "status": 1, "translation": "Wort"},
    {"id": 4, "language": "en", "text": "the", "status": 99},
    {"id": 5, "language": "en", "text": "was", "status": 98},
    {"id": 6, "language": "en", "text": "words", "status": 1},
    {"id": 7, "language": "en", "text": "world", "status": 4},
    {"id": 8, "language": "de", "text": "Wort", "status": 5}
]"#;

pub const JAPANESE_TEXT: &str = "私は日本語を勉強します。毎日、練習！";

pub const JAPANESE_VOCABULARY: &str = r#"[
    {"id": 20, "language": "ja", "text": "日本語", "word_count": 3, "status": 2, "translation": "Japanese", "romanization": "nihongo"},
    {"id": 21, "language": "ja", "text": "勉強", "word_count": 2, "status": 1, "translation": "study", "romanization": "benkyou"},
    {"id": 22, "language": "ja", "text": "毎日", "word_count": 2, "status": 5, "translation": "every day"}
]"#;

pub const CHINESE_LINE_STREAM: &str = "我\n喜欢\n学习\n中文\n。\n\n你\n呢\n？\n";
