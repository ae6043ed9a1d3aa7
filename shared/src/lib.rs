use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Message typed by the person using the app
    User,
    /// Reply produced by the assistant (or a synthetic assistant message)
    Model,
}

/// A single entry in the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Running financial picture tracked by the assistant.
///
/// Every field is optional: an absent field means "unknown", not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<f64>,
    /// People who owe the user money, by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debts_to_user: Option<BTreeMap<String, f64>>,
    /// People the user owes money to, by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_debts: Option<BTreeMap<String, f64>>,
}

impl FinancialState {
    pub fn total_debts_to_user(&self) -> f64 {
        self.debts_to_user
            .as_ref()
            .map(|debts| debts.values().sum())
            .unwrap_or(0.0)
    }

    pub fn total_user_debts(&self) -> f64 {
        self.user_debts
            .as_ref()
            .map(|debts| debts.values().sum())
            .unwrap_or(0.0)
    }

    pub fn has_debts_to_user(&self) -> bool {
        self.debts_to_user.as_ref().is_some_and(|d| !d.is_empty())
    }

    pub fn has_user_debts(&self) -> bool {
        self.user_debts.as_ref().is_some_and(|d| !d.is_empty())
    }
}

/// Partial update to the financial state, decoded from the JSON footer of a model reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debts_to_user: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_debts: Option<BTreeMap<String, f64>>,
    /// Discard all tracked state and restart the conversation
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reset: bool,
}

/// Request body for sending a chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Everything the chat panel needs to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStateResponse {
    pub transcript: Vec<ChatMessage>,
    pub financial_state: Option<FinancialState>,
    pub awaiting_reply: bool,
    /// True when the server started without an API credential
    pub configuration_missing: bool,
}

/// Expense categories offered by the expense form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[default]
    Groceries,
    Transport,
    Entertainment,
    Utilities,
    Rent,
    Health,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Groceries,
        ExpenseCategory::Transport,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Utilities,
        ExpenseCategory::Rent,
        ExpenseCategory::Health,
        ExpenseCategory::Other,
    ];

    /// Hebrew label shown in the UI
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Groceries => "מצרכים",
            ExpenseCategory::Transport => "תחבורה",
            ExpenseCategory::Entertainment => "בידור",
            ExpenseCategory::Utilities => "חשבונות",
            ExpenseCategory::Rent => "שכר דירה",
            ExpenseCategory::Health => "בריאות",
            ExpenseCategory::Other => "אחר",
        }
    }

    /// Stable identifier used in form values
    pub fn key(&self) -> &'static str {
        match self {
            ExpenseCategory::Groceries => "Groceries",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Other => "Other",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: u64,
    /// Description of the expense (max 256 characters)
    pub description: String,
    /// Always positive
    pub amount: f64,
    pub category: ExpenseCategory,
    /// Creation timestamp (RFC 3339)
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub description: String,
    pub amount: f64,
    pub category: ExpenseCategory,
}

/// Headline numbers for the expense dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_expenses: f64,
    pub transaction_count: usize,
    pub cash_on_hand: f64,
    pub debt_owed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    /// Most recent first
    pub expenses: Vec<Expense>,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpenseResponse {
    pub deleted_id: u64,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdownResponse {
    /// Ordered by first appearance in the expense list
    pub categories: Vec<CategoryTotal>,
}

/// Request body for editing one of the dashboard's editable values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDashboardValueRequest {
    pub value: f64,
}

/// Format an amount as shekels with thousands separators, e.g. `₪1,234.50`
pub fn format_shekels(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("₪{}{}.{}", sign, grouped, fraction)
}
