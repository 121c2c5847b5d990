pub mod annotation;
pub mod discovery;
pub mod error;
pub mod external;
pub mod incremental;
pub mod matcher;
pub mod parallel_processing;
pub mod pipeline;
pub mod profile;
pub mod reader;
pub mod restart_log;
pub mod sentence_splitter;
pub mod settings;
pub mod similarity;
pub mod span;
pub mod tokenizer;
pub mod vocabulary;

// Engine entry points
pub use annotation::{
    decode_annotation, decode_annotation_line, encode_annotation, AnnotationDocument, FieldUpdate,
    UpdatedFields,
};
pub use error::{AnnotationError, ExternalFormatError, ProfileError};
pub use matcher::{mask_term, match_tokens, status_in_range, MatchedSentence, MatchedSpan};
pub use pipeline::{Pipeline, ReadingView, ViewStats};
pub use profile::{get_profile, LanguageProfile, ProfileConfig, ProfileRegistry, ProfileSource};
pub use sentence_splitter::{decide_boundary, segment, BoundaryDecision, DelimiterMatch, Sentence};
pub use settings::EngineSettings;
pub use similarity::{letter_pairs, rank_similar_terms, similarity, word_letter_pairs, SimilarityRanker};
pub use tokenizer::{tokenize, tokenize_span, Token, WordToken};
pub use vocabulary::{
    InMemoryTermRepository, Term, TermId, TermRepository, TermStatus, TermUpdate, VocabularySnapshot,
};

// Batch processing, used by the CLI
pub use incremental::{aux_file_exists, generate_aux_file_path, read_aux_file};
pub use parallel_processing::{process_files_parallel, FileStats, FileStatus, ProcessingConfig, RunStats};
pub use restart_log::{should_process_file, RestartLog};
