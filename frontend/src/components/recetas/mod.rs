//! Prescription entry for doctors.
//!
//! The worker id must belong to a `Doctor`; anything else replaces the screen
//! with the error panel. The patient is identified by surecode, after which
//! the form is enabled and the patient's prescriptions are listed with links
//! to their printable PDF.

use crate::api;
use crate::app::{error_panel, inline_message};
use common::model::paciente::Paciente;
use common::model::receta::{NuevaReceta, Receta};
use common::model::trabajador::{Rol, Trabajador};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct RecetasProps {
    pub on_home: Callback<()>,
}

#[derive(Clone, Copy)]
pub enum Field {
    Medicamento,
    Dosis,
    Frecuencia,
    Duracion,
    Indicaciones,
}

pub enum Msg {
    SetDoctorId(String),
    LoadDoctor,
    DoctorLoaded(Result<Trabajador, String>),
    SetSurecode(String),
    LoadPaciente,
    PacienteLoaded(Result<Paciente, String>),
    RecetasLoaded(Result<Vec<Receta>, String>),
    SetField(Field, String),
    Submit,
    Submitted(Result<Receta, String>),
}

pub struct RecetasComponent {
    doctor_id: String,
    doctor: Option<Trabajador>,
    surecode: String,
    paciente: Option<Paciente>,
    form: NuevaReceta,
    recetas: Vec<Receta>,
    fatal: Option<String>,
    error: Option<String>,
    info: Option<String>,
}

impl RecetasComponent {
    fn load_recetas(&self, ctx: &Context<Self>) {
        let Some(paciente) = &self.paciente else {
            return;
        };
        let url = format!("/api/recetas?paciente_id={}", paciente.id);
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::RecetasLoaded(api::get(&url).await));
        });
    }
}

impl Component for RecetasComponent {
    type Message = Msg;
    type Properties = RecetasProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            doctor_id: String::new(),
            doctor: None,
            surecode: String::new(),
            paciente: None,
            form: NuevaReceta::default(),
            recetas: Vec::new(),
            fatal: None,
            error: None,
            info: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetDoctorId(id) => {
                self.doctor_id = id;
                false
            }
            Msg::LoadDoctor => {
                let url = format!("/api/trabajadores/{}", api::encode(self.doctor_id.trim()));
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::DoctorLoaded(api::get(&url).await));
                });
                false
            }
            Msg::DoctorLoaded(result) => {
                match result {
                    Ok(trabajador) if trabajador.rol == Rol::Doctor => {
                        self.form.doctor_id = trabajador.id.clone();
                        self.doctor = Some(trabajador);
                    }
                    Ok(trabajador) => {
                        self.fatal = Some(format!(
                            "{} no es doctor; solo un doctor puede emitir recetas",
                            trabajador.nombre_completo()
                        ));
                    }
                    Err(message) => self.fatal = Some(message),
                }
                true
            }
            Msg::SetSurecode(code) => {
                self.surecode = code;
                false
            }
            Msg::LoadPaciente => {
                let url = format!(
                    "/api/pacientes/surecode/{}",
                    api::encode(&self.surecode.trim().to_uppercase())
                );
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::PacienteLoaded(api::get(&url).await));
                });
                false
            }
            Msg::PacienteLoaded(result) => {
                match result {
                    Ok(paciente) => {
                        self.error = None;
                        self.form.paciente_id = paciente.id.clone();
                        self.paciente = Some(paciente);
                        self.load_recetas(ctx);
                    }
                    Err(message) => self.error = Some(message),
                }
                true
            }
            Msg::RecetasLoaded(result) => {
                match result {
                    Ok(recetas) => self.recetas = recetas,
                    Err(message) => self.error = Some(message),
                }
                true
            }
            Msg::SetField(field, value) => {
                match field {
                    Field::Medicamento => self.form.medicamento = value,
                    Field::Dosis => self.form.dosis = value,
                    Field::Frecuencia => self.form.frecuencia = value,
                    Field::Duracion => self.form.duracion = value,
                    Field::Indicaciones => self.form.indicaciones = Some(value),
                }
                true
            }
            Msg::Submit => {
                if let Err(message) = self.form.validate() {
                    self.error = Some(message);
                    return true;
                }
                let form = self.form.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Submitted(api::post("/api/recetas", &form).await));
                });
                false
            }
            Msg::Submitted(result) => {
                match result {
                    Ok(receta) => {
                        self.error = None;
                        self.info = Some(format!("Receta de {} emitida", receta.medicamento));
                        self.form = NuevaReceta {
                            paciente_id: self.form.paciente_id.clone(),
                            doctor_id: self.form.doctor_id.clone(),
                            ..NuevaReceta::default()
                        };
                        self.load_recetas(ctx);
                    }
                    Err(message) => self.error = Some(message),
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if let Some(message) = &self.fatal {
            return error_panel(message, &ctx.props().on_home);
        }
        let link = ctx.link();

        let Some(doctor) = &self.doctor else {
            return html! {
                <div class="recetas">
                    <h2>{ "Identificación del médico" }</h2>
                    <input
                        placeholder="ID de trabajador"
                        value={self.doctor_id.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::SetDoctorId(input.value())
                        })}
                    />
                    <button onclick={link.callback(|_| Msg::LoadDoctor)}>{ "Entrar" }</button>
                </div>
            };
        };

        html! {
            <div class="recetas">
                <p>{ format!("Dr(a). {} · Cédula {}", doctor.nombre_completo(), doctor.cedula.clone().unwrap_or_default()) }</p>

                <section>
                    <h2>{ "Paciente" }</h2>
                    <input
                        placeholder="Surecode"
                        value={self.surecode.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::SetSurecode(input.value())
                        })}
                    />
                    <button onclick={link.callback(|_| Msg::LoadPaciente)}>{ "Buscar" }</button>
                    {
                        match &self.paciente {
                            Some(p) => html! { <p>{ p.nombre_completo() }</p> },
                            None => html! {},
                        }
                    }
                </section>

                if self.paciente.is_some() {
                    { self.view_form(ctx) }
                    { self.view_recetas() }
                }

                { inline_message(&self.error, "error") }
                { inline_message(&self.info, "info") }
            </div>
        }
    }
}

impl RecetasComponent {
    fn view_form(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let input = |field: Field, label: &'static str, value: &str| {
            html! {
                <label>
                    { label }
                    <input
                        value={value.to_string()}
                        oninput={link.callback(move |e: InputEvent| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::SetField(field, input.value())
                        })}
                    />
                </label>
            }
        };

        html! {
            <section class="receta-form">
                <h2>{ "Nueva receta" }</h2>
                { input(Field::Medicamento, "Medicamento", &self.form.medicamento) }
                { input(Field::Dosis, "Dosis", &self.form.dosis) }
                { input(Field::Frecuencia, "Frecuencia", &self.form.frecuencia) }
                { input(Field::Duracion, "Duración", &self.form.duracion) }
                <label>
                    { "Indicaciones" }
                    <textarea
                        value={self.form.indicaciones.clone().unwrap_or_default()}
                        oninput={link.callback(|e: InputEvent| {
                            let input: HtmlTextAreaElement = e.target_unchecked_into();
                            Msg::SetField(Field::Indicaciones, input.value())
                        })}
                    />
                </label>
                <button onclick={link.callback(|_| Msg::Submit)}>{ "Emitir receta" }</button>
            </section>
        }
    }

    fn view_recetas(&self) -> Html {
        html! {
            <section>
                <h2>{ "Recetas del paciente" }</h2>
                <ul>
                    { for self.recetas.iter().map(|r| html! {
                        <li>
                            { format!("{} · {} {} por {} ({})", r.fecha_emision, r.medicamento, r.dosis, r.duracion, r.estado.as_str()) }
                            <a href={format!("/api/recetas/{}/pdf", r.id)} target="_blank">{ "Imprimir" }</a>
                        </li>
                    }) }
                </ul>
            </section>
        }
    }
}
