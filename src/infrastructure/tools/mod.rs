mod summarize;
mod today;
mod wikipedia;

pub use summarize::SummarizeTool;
pub use today::TodayTool;
pub use wikipedia::WikipediaTool;
