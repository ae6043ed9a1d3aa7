use shared::{ChatMessage, ChatRole};
use web_sys::{HtmlElement, HtmlInputElement, ScrollBehavior, ScrollIntoViewOptions};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ChatbotProps {
    pub history: Vec<ChatMessage>,
    pub is_loading: bool,
    pub on_send_message: Callback<String>,
    pub configuration_missing: bool,
}

#[function_component(ConfigurationError)]
fn configuration_error() -> Html {
    html! {
        <div class="chat-config-error">
            <span class="chat-config-error-icon">{"⚠️"}</span>
            <h3>{"שגיאת תצורה"}</h3>
            <p>{"מפתח ה-API של Gemini חסר. הצ'אט לא יעבוד עד שהמפתח יוגדר בסביבת המשתנים."}</p>
        </div>
    }
}

fn message_bubble(message: &ChatMessage) -> Html {
    let (row_class, bubble_class) = match message.role {
        ChatRole::User => ("chat-row user", "chat-bubble user"),
        ChatRole::Model => ("chat-row model", "chat-bubble model"),
    };

    html! {
        <div class={row_class}>
            <div class={bubble_class}>
                <p class="chat-text">{&message.text}</p>
            </div>
        </div>
    }
}

#[function_component(Chatbot)]
pub fn chatbot(props: &ChatbotProps) -> Html {
    let input = use_state(String::new);
    let chat_end = use_node_ref();

    {
        let chat_end = chat_end.clone();
        use_effect_with((props.history.len(), props.is_loading), move |_| {
            if let Some(element) = chat_end.cast::<HtmlElement>() {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                element.scroll_into_view_with_scroll_into_view_options(&options);
            }
            || ()
        });
    }

    if props.configuration_missing {
        return html! { <ConfigurationError /> };
    }

    let on_input = {
        let input = input.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            input.set(target.value());
        })
    };

    let on_submit = {
        let input = input.clone();
        let is_loading = props.is_loading;
        let on_send_message = props.on_send_message.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !input.trim().is_empty() && !is_loading {
                on_send_message.emit((*input).clone());
                input.set(String::new());
            }
        })
    };

    html! {
        <div class="chatbot">
            <div class="chat-history">
                {for props.history.iter().map(message_bubble)}
                {if props.is_loading {
                    html! {
                        <div class="chat-row model">
                            <div class="chat-bubble model">
                                <div class="typing-indicator">
                                    <span class="dot"></span>
                                    <span class="dot"></span>
                                    <span class="dot"></span>
                                </div>
                            </div>
                        </div>
                    }
                } else { html! {} }}
                <div ref={chat_end}></div>
            </div>
            <form class="chat-form" onsubmit={on_submit}>
                <input
                    type="text"
                    class="chat-input"
                    placeholder="כתוב הודעה..."
                    value={(*input).clone()}
                    oninput={on_input}
                    disabled={props.is_loading}
                />
                <button
                    type="submit"
                    class="chat-send"
                    disabled={props.is_loading || input.trim().is_empty()}
                >
                    {"↑"}
                </button>
            </form>
        </div>
    }
}
