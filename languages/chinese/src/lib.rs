pub mod processor;
pub mod prompt;
pub mod tutor;

pub use processor::ChineseProcessor;
pub use prompt::PromptTemplate;
pub use tutor::ChineseTutor;
