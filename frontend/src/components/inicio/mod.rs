//! Landing screen: pick a role, or register as a new patient.
//!
//! Registration shows the generated surecode, which the patient then types
//! on the appointment screen and gives at the counter.

use crate::api;
use crate::app::{inline_message, Screen};
use common::model::paciente::{NuevoPaciente, Paciente};
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct InicioProps {
    pub on_select: Callback<Screen>,
}

#[derive(Clone, Copy)]
pub enum Field {
    Nombre,
    Apellido,
    Email,
    Telefono,
    FechaNacimiento,
}

pub enum Msg {
    SetField(Field, String),
    Register,
    Registered(Result<Paciente, String>),
}

pub struct InicioComponent {
    form: NuevoPaciente,
    registered: Option<Paciente>,
    error: Option<String>,
    sending: bool,
}

impl Component for InicioComponent {
    type Message = Msg;
    type Properties = InicioProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            form: NuevoPaciente::default(),
            registered: None,
            error: None,
            sending: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetField(field, value) => {
                let optional = (!value.trim().is_empty()).then(|| value.clone());
                match field {
                    Field::Nombre => self.form.nombre = value,
                    Field::Apellido => self.form.apellido = value,
                    Field::Email => self.form.email = value,
                    Field::Telefono => self.form.telefono = optional,
                    Field::FechaNacimiento => self.form.fecha_nacimiento = optional,
                }
                true
            }
            Msg::Register => {
                if let Err(message) = self.form.validate() {
                    self.error = Some(message);
                    return true;
                }
                self.error = None;
                self.sending = true;
                let form = self.form.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api::post("/api/pacientes", &form).await;
                    link.send_message(Msg::Registered(result));
                });
                true
            }
            Msg::Registered(result) => {
                self.sending = false;
                match result {
                    Ok(paciente) => {
                        self.form = NuevoPaciente::default();
                        self.registered = Some(paciente);
                    }
                    Err(message) => self.error = Some(message),
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_select = ctx.props().on_select.clone();
        let role = |screen: Screen, label: &'static str| {
            let on_select = on_select.clone();
            html! {
                <button class="role-card" onclick={Callback::from(move |_| on_select.emit(screen))}>
                    { label }
                </button>
            }
        };
        let input = |field: Field, label: &'static str, kind: &'static str, value: String| {
            html! {
                <label>
                    { label }
                    <input
                        type={kind}
                        value={value}
                        oninput={link.callback(move |e: InputEvent| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::SetField(field, input.value())
                        })}
                    />
                </label>
            }
        };

        html! {
            <div class="inicio">
                <section class="roles">
                    <h2>{ "¿Quién eres?" }</h2>
                    { role(Screen::Citas, "Paciente: agendar una cita") }
                    { role(Screen::PuntoVenta, "Farmacéutico: punto de venta") }
                    { role(Screen::Recetas, "Doctor: emitir recetas") }
                </section>

                <section class="registro">
                    <h2>{ "Registro de paciente" }</h2>
                    { input(Field::Nombre, "Nombre", "text", self.form.nombre.clone()) }
                    { input(Field::Apellido, "Apellido", "text", self.form.apellido.clone()) }
                    { input(Field::Email, "Correo electrónico", "email", self.form.email.clone()) }
                    { input(Field::Telefono, "Teléfono", "tel", self.form.telefono.clone().unwrap_or_default()) }
                    { input(Field::FechaNacimiento, "Fecha de nacimiento", "date", self.form.fecha_nacimiento.clone().unwrap_or_default()) }
                    <button disabled={self.sending} onclick={link.callback(|_| Msg::Register)}>
                        { if self.sending { "Registrando..." } else { "Registrarme" } }
                    </button>
                    { inline_message(&self.error, "error") }
                    {
                        match &self.registered {
                            Some(paciente) => html! {
                                <div class="surecode">
                                    <p>{ format!("Bienvenido, {}. Tu surecode es:", paciente.nombre_completo()) }</p>
                                    <strong>{ &paciente.surecode }</strong>
                                    <p>{ "Guárdalo: lo necesitarás para agendar citas y en el mostrador." }</p>
                                </div>
                            },
                            None => html! {},
                        }
                    }
                </section>
            </div>
        }
    }
}
