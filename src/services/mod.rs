pub mod ai_parser;
pub mod ai_prompt;
pub mod fallback;
pub mod program_adapter;
pub mod program_generation;
pub mod progress_stats;
