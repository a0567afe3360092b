pub mod evaluation;
pub mod progress_record;
pub mod question;
pub use evaluation::EvaluationResult;
pub use progress_record::ProgressRecord;
pub use question::{Question, QuestionSet};
