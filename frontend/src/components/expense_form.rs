use shared::{CreateExpenseRequest, ExpenseCategory};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

pub const MISSING_FIELDS_MESSAGE: &str = "נא למלא את כל השדות";
pub const INVALID_AMOUNT_MESSAGE: &str = "נא להזין סכום חיובי";

/// Validate the raw form values before anything is sent to the server
pub fn validate_expense_form(
    description: &str,
    amount: &str,
    category: ExpenseCategory,
) -> Result<CreateExpenseRequest, &'static str> {
    if description.trim().is_empty() || amount.trim().is_empty() {
        return Err(MISSING_FIELDS_MESSAGE);
    }

    match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(CreateExpenseRequest {
            description: description.trim().to_string(),
            amount: value,
            category,
        }),
        _ => Err(INVALID_AMOUNT_MESSAGE),
    }
}

#[derive(Properties, PartialEq)]
pub struct ExpenseFormProps {
    pub on_submit: Callback<CreateExpenseRequest>,
    #[prop_or_default]
    pub server_error: Option<String>,
}

#[function_component(ExpenseForm)]
pub fn expense_form(props: &ExpenseFormProps) -> Html {
    let description = use_state(String::new);
    let amount = use_state(String::new);
    let category = use_state(ExpenseCategory::default);
    let form_error = use_state(|| None::<&'static str>);

    let on_description_input = {
        let description = description.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            description.set(target.value());
        })
    };

    let on_amount_input = {
        let amount = amount.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            amount.set(target.value());
        })
    };

    let on_category_change = {
        let category = category.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            if let Some(selected) = ExpenseCategory::from_key(&target.value()) {
                category.set(selected);
            }
        })
    };

    let on_submit = {
        let description = description.clone();
        let amount = amount.clone();
        let category = category.clone();
        let form_error = form_error.clone();
        let on_submit = props.on_submit.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            match validate_expense_form(&description, &amount, *category) {
                Ok(request) => {
                    form_error.set(None);
                    on_submit.emit(request);
                    description.set(String::new());
                    amount.set(String::new());
                    category.set(ExpenseCategory::default());
                }
                Err(message) => form_error.set(Some(message)),
            }
        })
    };

    let error = (*form_error)
        .map(str::to_string)
        .or_else(|| props.server_error.clone());

    html! {
        <form class="expense-form" onsubmit={on_submit}>
            {if let Some(error) = error {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <div class="form-field">
                <label for="description">{"תיאור"}</label>
                <input
                    type="text"
                    id="description"
                    placeholder="למשל, קניות בסופר"
                    value={(*description).clone()}
                    oninput={on_description_input}
                />
            </div>
            <div class="form-field">
                <label for="amount">{"סכום (₪)"}</label>
                <input
                    type="number"
                    id="amount"
                    placeholder="150.00"
                    value={(*amount).clone()}
                    oninput={on_amount_input}
                />
            </div>
            <div class="form-field">
                <label for="category">{"קטגוריה"}</label>
                <select id="category" onchange={on_category_change}>
                    {for ExpenseCategory::ALL.iter().map(|option| html! {
                        <option
                            key={option.key()}
                            value={option.key()}
                            selected={*option == *category}
                        >
                            {option.label()}
                        </option>
                    })}
                </select>
            </div>
            <button type="submit" class="primary-button">{"הוסף הוצאה"}</button>
        </form>
    }
}
