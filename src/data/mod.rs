mod loader;

pub use loader::{
    default_questions, filter_by_subjects, load_config_from_json, load_questions_from_json,
    parse_questions, LoadError,
};
