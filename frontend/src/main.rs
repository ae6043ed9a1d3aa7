use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::{CategoryChart, Chatbot, Dashboard, ExpenseForm, ExpenseList, FinancialSummary, Header};
use hooks::use_chat::use_chat;
use hooks::use_expenses::use_expenses;
use services::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let api_client = use_memo((), |_| ApiClient::new());

    let chat = use_chat(&api_client);
    let expenses = use_expenses(&api_client);

    html! {
        <div class="app" dir="rtl">
            <Header />

            {if let Some(financial_state) = chat.state.financial_state.clone() {
                html! { <FinancialSummary data={financial_state} /> }
            } else { html! {} }}

            <main class="main-content">
                <section class="chat-panel">
                    <h2>{"שוחח עם Savvy AI"}</h2>
                    {if chat.state.loading {
                        html! { <div class="loading">{"טוען..."}</div> }
                    } else {
                        html! {
                            <Chatbot
                                history={chat.state.transcript.clone()}
                                is_loading={chat.state.awaiting_reply}
                                on_send_message={chat.actions.send_message.clone()}
                                configuration_missing={chat.state.configuration_missing}
                            />
                        }
                    }}
                </section>

                <section class="expenses-panel">
                    <Dashboard
                        stats={expenses.state.stats.clone()}
                        on_set_cash_on_hand={expenses.actions.set_cash_on_hand.clone()}
                        on_set_debt_owed={expenses.actions.set_debt_owed.clone()}
                    />
                    <div class="expenses-grid">
                        <div class="card">
                            <h2>{"הוספת הוצאה"}</h2>
                            <ExpenseForm
                                on_submit={expenses.actions.add_expense.clone()}
                                server_error={expenses.state.error.clone()}
                            />
                        </div>
                        <div class="card">
                            <h2>{"התפלגות לפי קטגוריה"}</h2>
                            <CategoryChart categories={expenses.state.categories.clone()} />
                        </div>
                    </div>
                    <div class="card">
                        <h2>{"הוצאות אחרונות"}</h2>
                        {if expenses.state.loading && expenses.state.expenses.is_empty() {
                            html! { <div class="loading">{"טוען הוצאות..."}</div> }
                        } else {
                            html! {
                                <ExpenseList
                                    expenses={expenses.state.expenses.clone()}
                                    on_delete={expenses.actions.delete_expense.clone()}
                                />
                            }
                        }}
                    </div>
                </section>
            </main>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
