pub mod arxiv;
pub mod briefing;
pub mod ground;
pub mod interest;
pub mod summaries;
