pub mod exam;
pub mod loaders;
pub mod question;

pub use exam::{ExamEntry, ExamPaper};
pub use loaders::{load_question_bank, save_exam_paper, save_question_bank};
pub use question::{
    AnswerKey, Difficulty, GeneratedQuestion, NewQuestion, PersistedQuestion, QuestionBank,
    ResolvedQuestion,
};
