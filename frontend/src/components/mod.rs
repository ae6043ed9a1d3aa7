pub mod category_chart;
pub mod chatbot;
pub mod dashboard;
pub mod expense_form;
pub mod expense_list;
pub mod financial_summary;
pub mod header;

pub use category_chart::CategoryChart;
pub use chatbot::Chatbot;
pub use dashboard::Dashboard;
pub use expense_form::ExpenseForm;
pub use expense_list::ExpenseList;
pub use financial_summary::FinancialSummary;
pub use header::Header;
