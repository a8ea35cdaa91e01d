use crate::components::citas::CitasComponent;
use crate::components::inicio::InicioComponent;
use crate::components::punto_venta::PuntoVentaComponent;
use crate::components::recetas::RecetasComponent;
use yew::{html, Callback, Component, Context, Html};

/// The screens of the portal. Navigation is kept in component state; the
/// portal has no URL routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Inicio,
    Citas,
    PuntoVenta,
    Recetas,
}

impl Screen {
    fn title(&self) -> &'static str {
        match self {
            Screen::Inicio => "Inicio",
            Screen::Citas => "Citas",
            Screen::PuntoVenta => "Punto de venta",
            Screen::Recetas => "Recetas",
        }
    }
}

pub enum Msg {
    Navigate(Screen),
}

pub struct App {
    screen: Screen,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            screen: Screen::Inicio,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(screen) => {
                let changed = self.screen != screen;
                self.screen = screen;
                changed
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_home = link.callback(|_: ()| Msg::Navigate(Screen::Inicio));
        let on_select = link.callback(Msg::Navigate);

        html! {
            <div class="portal">
                <header class="portal-header">
                    <h1>{ "Portal Farmacia" }</h1>
                    <span class="portal-screen">{ self.screen.title() }</span>
                    if self.screen != Screen::Inicio {
                        <button onclick={on_home.reform(|_| ())}>{ "Inicio" }</button>
                    }
                </header>
                <main>
                    {
                        match self.screen {
                            Screen::Inicio => html! { <InicioComponent {on_select} /> },
                            Screen::Citas => html! { <CitasComponent {on_home} /> },
                            Screen::PuntoVenta => html! { <PuntoVentaComponent {on_home} /> },
                            Screen::Recetas => html! { <RecetasComponent {on_home} /> },
                        }
                    }
                </main>
            </div>
        }
    }
}

/// Replaces a screen that cannot continue (unknown worker, wrong role).
pub fn error_panel(message: &str, on_home: &Callback<()>) -> Html {
    html! {
        <div class="error-panel">
            <h2>{ "No es posible continuar" }</h2>
            <p>{ message }</p>
            <button onclick={on_home.reform(|_| ())}>{ "Volver al inicio" }</button>
        </div>
    }
}

/// Inline message under a form; `None` renders nothing.
pub fn inline_message(message: &Option<String>, class: &'static str) -> Html {
    match message {
        Some(text) => html! { <p class={class}>{ text }</p> },
        None => html! {},
    }
}
