use std::collections::BTreeMap;

use shared::{format_shekels, FinancialState};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FinancialSummaryProps {
    pub data: FinancialState,
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    title: &'static str,
    icon: &'static str,
    children: Children,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="stat-card">
            <div class="stat-icon">{props.icon}</div>
            <div class="stat-body">
                <p class="stat-title">{props.title}</p>
                <div class="stat-value">{props.children.clone()}</div>
            </div>
        </div>
    }
}

fn debt_card(title: &'static str, icon: &'static str, total: f64, debts: &BTreeMap<String, f64>) -> Html {
    html! {
        <StatCard {title} {icon}>
            <p class="stat-amount">{format_shekels(total)}</p>
            <ul class="debt-list">
                {for debts.iter().map(|(person, amount)| html! {
                    <li key={person.clone()}>{format!("{}: {}", person, format_shekels(*amount))}</li>
                })}
            </ul>
        </StatCard>
    }
}

/// Cards for whatever part of the financial state is known
#[function_component(FinancialSummary)]
pub fn financial_summary(props: &FinancialSummaryProps) -> Html {
    let data = &props.data;

    html! {
        <section class="financial-summary">
            {if let Some(cash) = data.cash {
                html! {
                    <StatCard title="מזומן ביד" icon="💵">
                        <p class="stat-amount">{format_shekels(cash)}</p>
                    </StatCard>
                }
            } else { html! {} }}

            {if let Some(bank) = data.bank {
                html! {
                    <StatCard title="בעובר ושב" icon="🏦">
                        <p class="stat-amount">{format_shekels(bank)}</p>
                    </StatCard>
                }
            } else { html! {} }}

            {match &data.debts_to_user {
                Some(debts) if data.has_debts_to_user() => {
                    debt_card("חייבים לי", "🤝", data.total_debts_to_user(), debts)
                }
                _ => html! {},
            }}

            {match &data.user_debts {
                Some(debts) if data.has_user_debts() => {
                    debt_card("אני חייב", "📉", data.total_user_debts(), debts)
                }
                _ => html! {},
            }}
        </section>
    }
}
