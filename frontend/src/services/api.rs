use gloo::net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{
    CategoryBreakdownResponse, ChatStateResponse, CreateExpenseRequest, DashboardStats, DeleteExpenseResponse,
    Expense, ExpenseListResponse, SendMessageRequest, UpdateDashboardValueRequest,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// API client for communicating with the backend server
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Decode a successful response, or turn the error body into a message
    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, String> {
        if response.ok() {
            response
                .json::<T>()
                .await
                .map_err(|e| format!("Failed to parse {}: {}", what, e))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(error_text)
        }
    }

    /// Current transcript and financial state
    pub async fn get_chat_state(&self) -> Result<ChatStateResponse, String> {
        match Request::get(&self.url("/chat")).send().await {
            Ok(response) => Self::read_json(response, "chat state").await,
            Err(e) => Err(format!("Failed to fetch chat state: {}", e)),
        }
    }

    /// Send a chat message; resolves once the assistant has replied
    pub async fn send_message(&self, message: String) -> Result<ChatStateResponse, String> {
        let request = SendMessageRequest { message };

        match Request::post(&self.url("/chat/messages"))
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => Self::read_json(response, "chat reply").await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    pub async fn get_expenses(&self) -> Result<ExpenseListResponse, String> {
        match Request::get(&self.url("/expenses")).send().await {
            Ok(response) => Self::read_json(response, "expenses").await,
            Err(e) => Err(format!("Failed to fetch expenses: {}", e)),
        }
    }

    pub async fn create_expense(&self, request: CreateExpenseRequest) -> Result<Expense, String> {
        match Request::post(&self.url("/expenses"))
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => Self::read_json(response, "expense").await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    pub async fn delete_expense(&self, expense_id: u64) -> Result<DeleteExpenseResponse, String> {
        match Request::delete(&self.url(&format!("/expenses/{}", expense_id))).send().await {
            Ok(response) => Self::read_json(response, "delete response").await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    pub async fn get_category_breakdown(&self) -> Result<CategoryBreakdownResponse, String> {
        match Request::get(&self.url("/expenses/categories")).send().await {
            Ok(response) => Self::read_json(response, "category totals").await,
            Err(e) => Err(format!("Failed to fetch category totals: {}", e)),
        }
    }

    pub async fn set_cash_on_hand(&self, value: f64) -> Result<DashboardStats, String> {
        self.put_dashboard_value("/dashboard/cash-on-hand", value).await
    }

    pub async fn set_debt_owed(&self, value: f64) -> Result<DashboardStats, String> {
        self.put_dashboard_value("/dashboard/debt-owed", value).await
    }

    async fn put_dashboard_value(&self, path: &str, value: f64) -> Result<DashboardStats, String> {
        let request = UpdateDashboardValueRequest { value };

        match Request::put(&self.url(path))
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => Self::read_json(response, "dashboard stats").await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}
