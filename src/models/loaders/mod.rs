pub mod toml_loader;

pub use toml_loader::{load_question_bank, save_exam_paper, save_question_bank};
