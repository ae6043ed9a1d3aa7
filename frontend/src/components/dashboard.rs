use shared::{format_shekels, DashboardStats};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub stats: DashboardStats,
    pub on_set_cash_on_hand: Callback<f64>,
    pub on_set_debt_owed: Callback<f64>,
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    title: &'static str,
    icon: &'static str,
    value: String,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="dashboard-card">
            <div class="stat-icon">{props.icon}</div>
            <div>
                <p class="stat-title">{props.title}</p>
                <p class="dashboard-value">{&props.value}</p>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct EditableStatCardProps {
    title: &'static str,
    icon: &'static str,
    value: f64,
    on_save: Callback<f64>,
}

/// Card whose value can be edited in place; saves on Enter or blur
#[function_component(EditableStatCard)]
fn editable_stat_card(props: &EditableStatCardProps) -> Html {
    let editing = use_state(|| false);
    let input_value = use_state(|| props.value.to_string());

    let save = {
        let editing = editing.clone();
        let input_value = input_value.clone();
        let on_save = props.on_save.clone();
        Callback::from(move |_: ()| {
            // unparseable input keeps the editor open
            if let Ok(value) = input_value.trim().parse::<f64>() {
                if value.is_finite() {
                    on_save.emit(value);
                    editing.set(false);
                }
            }
        })
    };

    let toggle = {
        let editing = editing.clone();
        let input_value = input_value.clone();
        let value = props.value;
        Callback::from(move |_: MouseEvent| {
            if !*editing {
                input_value.set(value.to_string());
            }
            editing.set(!*editing);
        })
    };

    let on_input = {
        let input_value = input_value.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            input_value.set(target.value());
        })
    };

    let on_blur = save.reform(|_: FocusEvent| ());
    let on_keydown = {
        let save = save.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                save.emit(());
            }
        })
    };

    html! {
        <div class="dashboard-card editable">
            <div class="stat-icon">{props.icon}</div>
            <div class="dashboard-card-body">
                <p class="stat-title">{props.title}</p>
                {if *editing {
                    html! {
                        <input
                            type="number"
                            class="dashboard-input"
                            value={(*input_value).clone()}
                            oninput={on_input}
                            onblur={on_blur}
                            onkeydown={on_keydown}
                            autofocus=true
                        />
                    }
                } else {
                    html! { <p class="dashboard-value">{format_shekels(props.value)}</p> }
                }}
            </div>
            <button class="edit-button" onclick={toggle}>
                {if *editing { "✓" } else { "✎" }}
            </button>
        </div>
    }
}

#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let stats = &props.stats;

    html! {
        <div class="dashboard">
            <StatCard
                title="סך הכל הוצאות החודש"
                icon="🧾"
                value={format_shekels(stats.total_expenses)}
            />
            <StatCard
                title="מספר עסקאות"
                icon="#"
                value={stats.transaction_count.to_string()}
            />
            <EditableStatCard
                title="כסף זמין"
                icon="👛"
                value={stats.cash_on_hand}
                on_save={props.on_set_cash_on_hand.clone()}
            />
            <EditableStatCard
                title="חוב מאבא"
                icon="👨"
                value={stats.debt_owed}
                on_save={props.on_set_debt_owed.clone()}
            />
        </div>
    }
}
