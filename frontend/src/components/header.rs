use yew::prelude::*;

#[function_component(Header)]
pub fn header() -> Html {
    html! {
        <header class="header">
            <div class="container">
                <span class="header-icon">{"💰"}</span>
                <div>
                    <h1>{"AI Money Saver"}</h1>
                    <p class="header-subtitle">{"שוחח עם העוזר הפיננסי האישי שלך"}</p>
                </div>
            </div>
        </header>
    }
}
