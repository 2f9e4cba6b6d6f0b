pub mod flow;
pub mod insights;
pub mod report;
pub mod session;
