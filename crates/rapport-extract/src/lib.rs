//! # rapport-extract
//!
//! Pure, total text → tag functions. Nothing here performs I/O or fails: absent text
//! is the empty string and yields empty tag sets.
//!
//! ## Modules
//! - `vocabulary`: curated language/framework/technology lists and substring detection
//! - `code_blocks`: fenced and inline code counting
//! - `question`: first-match-wins question type classifier
//! - `complexity`: keyword-priority complexity tiers
//! - `project_name`: ordered project-name patterns
//! - `skills`: one skill mention per detected vocabulary term
//! - `tags`: `TagExtractor`, tying the above into one `Extraction`

pub mod code_blocks;
pub mod complexity;
pub mod project_name;
pub mod question;
pub mod skills;
pub mod tags;
pub mod vocabulary;

pub use code_blocks::count_code_blocks;
pub use complexity::assess_complexity;
pub use project_name::extract_project_name;
pub use question::classify_question_type;
pub use skills::derive_skills;
pub use tags::{extract_tags, Extraction, TagExtractor};
pub use vocabulary::{detect, Vocabulary};
