//! Patient appointment booking.
//!
//! The patient identifies with a surecode, picks a pharmacy and a day, and
//! books one of the free half-hour slots. The whole day grid comes from the
//! pharmacy's `horario` through `common::schedule`; slots missing from
//! `/api/citas/disponibles` are shown as taken.

use crate::api;
use crate::app::{error_panel, inline_message};
use common::cart::format_centavos;
use common::model::cita::{Cita, EstadoCita, NuevaCita, CONSULTA_CENTAVOS};
use common::model::farmacia::Farmacia;
use common::model::paciente::Paciente;
use common::model::MetodoPago;
use common::payments::PaymentStatus;
use common::requests::{AppointmentPaymentRequest, AvailableSlots, CreateOrderResponse};
use common::schedule::generate_slots;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CitasProps {
    pub on_home: Callback<()>,
}

pub enum Msg {
    SetSurecode(String),
    Identify,
    Identified(Result<Paciente, String>),
    FarmaciasLoaded(Result<Vec<Farmacia>, String>),
    SelectFarmacia(String),
    SetFecha(String),
    SlotsLoaded(Result<AvailableSlots, String>),
    SelectHora(String),
    SetMotivo(String),
    Book,
    Booked(Result<Cita, String>),
    CitasLoaded(Result<Vec<Cita>, String>),
    Cancel(String),
    Cancelled(Result<Cita, String>),
    Pay(String),
    PaymentCreated(Result<CreateOrderResponse, String>),
    PaymentSettled(Result<PaymentStatus, String>),
}

pub struct CitasComponent {
    surecode: String,
    paciente: Option<Paciente>,
    farmacias: Vec<Farmacia>,
    farmacia_id: Option<String>,
    fecha: String,
    day_slots: Vec<String>,
    disponibles: Vec<String>,
    hora: Option<String>,
    motivo: String,
    citas: Vec<Cita>,
    fatal: Option<String>,
    error: Option<String>,
    info: Option<String>,
}

impl CitasComponent {
    fn farmacia(&self) -> Option<&Farmacia> {
        let id = self.farmacia_id.as_ref()?;
        self.farmacias.iter().find(|f| &f.id == id)
    }

    fn load_slots(&mut self, ctx: &Context<Self>) {
        self.hora = None;
        self.disponibles.clear();
        self.day_slots = self
            .farmacia()
            .map(|f| generate_slots(&f.horario))
            .unwrap_or_default();

        let Some(farmacia_id) = self.farmacia_id.clone() else {
            return;
        };
        let url = format!(
            "/api/citas/disponibles?farmacia_id={}&fecha={}",
            farmacia_id, self.fecha
        );
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::SlotsLoaded(api::get(&url).await));
        });
    }

    fn load_citas(&self, ctx: &Context<Self>) {
        let Some(paciente) = &self.paciente else {
            return;
        };
        let url = format!("/api/citas?paciente_id={}", paciente.id);
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::CitasLoaded(api::get(&url).await));
        });
    }
}

impl Component for CitasComponent {
    type Message = Msg;
    type Properties = CitasProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::FarmaciasLoaded(api::get("/api/farmacias").await));
        });

        Self {
            surecode: String::new(),
            paciente: None,
            farmacias: Vec::new(),
            farmacia_id: None,
            fecha: api::today(),
            day_slots: Vec::new(),
            disponibles: Vec::new(),
            hora: None,
            motivo: String::new(),
            citas: Vec::new(),
            fatal: None,
            error: None,
            info: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetSurecode(code) => {
                self.surecode = code;
                false
            }
            Msg::Identify => {
                let code = self.surecode.trim().to_uppercase();
                if code.is_empty() {
                    self.error = Some("Escribe tu surecode".to_string());
                    return true;
                }
                let link = ctx.link().clone();
                spawn_local(async move {
                    let url = format!("/api/pacientes/surecode/{}", api::encode(&code));
                    link.send_message(Msg::Identified(api::get(&url).await));
                });
                false
            }
            Msg::Identified(result) => {
                match result {
                    Ok(paciente) => {
                        self.error = None;
                        self.paciente = Some(paciente);
                        self.load_citas(ctx);
                    }
                    Err(message) => self.error = Some(message),
                }
                true
            }
            Msg::FarmaciasLoaded(result) => {
                match result {
                    Ok(farmacias) if farmacias.is_empty() => {
                        self.fatal = Some("No hay farmacias registradas".to_string());
                    }
                    Ok(farmacias) => {
                        self.farmacia_id = farmacias.first().map(|f| f.id.clone());
                        self.farmacias = farmacias;
                        self.load_slots(ctx);
                    }
                    Err(message) => self.fatal = Some(message),
                }
                true
            }
            Msg::SelectFarmacia(id) => {
                self.farmacia_id = Some(id);
                self.load_slots(ctx);
                true
            }
            Msg::SetFecha(fecha) => {
                self.fecha = fecha;
                self.load_slots(ctx);
                true
            }
            Msg::SlotsLoaded(result) => {
                match result {
                    Ok(slots)
                        if Some(&slots.farmacia_id) == self.farmacia_id.as_ref()
                            && slots.fecha == self.fecha =>
                    {
                        self.disponibles = slots.horas;
                    }
                    Ok(_) => {}
                    Err(message) => self.error = Some(message),
                }
                true
            }
            Msg::SelectHora(hora) => {
                self.hora = Some(hora);
                true
            }
            Msg::SetMotivo(motivo) => {
                self.motivo = motivo;
                false
            }
            Msg::Book => {
                let (Some(paciente), Some(farmacia_id), Some(hora)) =
                    (&self.paciente, &self.farmacia_id, &self.hora)
                else {
                    self.error = Some("Identifícate y elige un horario".to_string());
                    return true;
                };
                let nueva = NuevaCita {
                    paciente_id: paciente.id.clone(),
                    farmacia_id: farmacia_id.clone(),
                    fecha: self.fecha.clone(),
                    hora: hora.clone(),
                    motivo: Some(self.motivo.trim().to_string()).filter(|m| !m.is_empty()),
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Booked(api::post("/api/citas", &nueva).await));
                });
                false
            }
            Msg::Booked(result) => {
                match result {
                    Ok(cita) => {
                        self.error = None;
                        self.info = Some(format!("Cita agendada el {} a las {}", cita.fecha, cita.hora));
                        self.motivo.clear();
                        self.load_citas(ctx);
                    }
                    Err(message) => self.error = Some(message),
                }
                // Refresh either way: a conflict means the grid was stale.
                self.load_slots(ctx);
                true
            }
            Msg::CitasLoaded(result) => {
                match result {
                    Ok(citas) => self.citas = citas,
                    Err(message) => self.error = Some(message),
                }
                true
            }
            Msg::Cancel(id) => {
                let link = ctx.link().clone();
                spawn_local(async move {
                    let url = format!("/api/citas/{}/cancelar", id);
                    link.send_message(Msg::Cancelled(api::post_empty(&url).await));
                });
                false
            }
            Msg::Cancelled(result) => {
                match result {
                    Ok(cita) => {
                        self.info = Some(format!("Cita del {} cancelada", cita.fecha));
                        self.load_citas(ctx);
                        self.load_slots(ctx);
                    }
                    Err(message) => self.error = Some(message),
                }
                true
            }
            Msg::Pay(cita_id) => {
                let request = AppointmentPaymentRequest {
                    monto_centavos: CONSULTA_CENTAVOS,
                    metodo_pago: MetodoPago::Tarjeta,
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    let url = format!("/api/citas/{}/pago", cita_id);
                    link.send_message(Msg::PaymentCreated(api::post(&url, &request).await));
                });
                false
            }
            Msg::PaymentCreated(result) => {
                match result {
                    Ok(orden) => {
                        self.info = Some(format!(
                            "Pago {} en proceso, esperando confirmación...",
                            orden.numero_recibo
                        ));
                        if let Some(url) = &orden.redirect_url {
                            api::open_in_new_tab(url);
                        }
                        let link = ctx.link().clone();
                        spawn_local(async move {
                            let status = api::wait_for_payment(&orden.order_id).await;
                            link.send_message(Msg::PaymentSettled(status));
                        });
                    }
                    Err(message) => self.error = Some(message),
                }
                true
            }
            Msg::PaymentSettled(result) => {
                match result {
                    Ok(PaymentStatus::Confirmado(numero)) => {
                        self.info = Some(format!("Pago confirmado. Recibo {}", numero));
                    }
                    Ok(PaymentStatus::Rechazado(motivo)) => {
                        self.error = Some(format!("Pago rechazado: {}", motivo));
                    }
                    Ok(PaymentStatus::Pendiente) => {}
                    Err(message) => self.error = Some(message),
                }
                self.load_citas(ctx);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if let Some(message) = &self.fatal {
            return error_panel(message, &ctx.props().on_home);
        }
        let link = ctx.link();

        html! {
            <div class="citas">
                <section>
                    <h2>{ "Identifícate" }</h2>
                    <input
                        placeholder="Surecode"
                        value={self.surecode.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::SetSurecode(input.value())
                        })}
                    />
                    <button onclick={link.callback(|_| Msg::Identify)}>{ "Buscar" }</button>
                    {
                        match &self.paciente {
                            Some(p) => html! { <p>{ format!("Paciente: {}", p.nombre_completo()) }</p> },
                            None => html! {},
                        }
                    }
                </section>

                <section>
                    <h2>{ "Nueva cita" }</h2>
                    <select onchange={link.callback(|e: Event| {
                        let select: HtmlSelectElement = e.target_unchecked_into();
                        Msg::SelectFarmacia(select.value())
                    })}>
                        { for self.farmacias.iter().map(|f| html! {
                            <option value={f.id.clone()} selected={Some(&f.id) == self.farmacia_id.as_ref()}>
                                { format!("{} ({})", f.nombre, f.horario) }
                            </option>
                        }) }
                    </select>
                    <input
                        type="date"
                        value={self.fecha.clone()}
                        onchange={link.callback(|e: Event| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::SetFecha(input.value())
                        })}
                    />
                    { self.view_slots(ctx) }
                    <input
                        placeholder="Motivo (opcional)"
                        value={self.motivo.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::SetMotivo(input.value())
                        })}
                    />
                    <button
                        disabled={self.paciente.is_none() || self.hora.is_none()}
                        onclick={link.callback(|_| Msg::Book)}
                    >
                        { "Agendar" }
                    </button>
                </section>

                { inline_message(&self.error, "error") }
                { inline_message(&self.info, "info") }

                { self.view_citas(ctx) }
            </div>
        }
    }
}

impl CitasComponent {
    fn view_slots(&self, ctx: &Context<Self>) -> Html {
        if self.day_slots.is_empty() {
            return html! { <p>{ "La farmacia no tiene horario disponible" }</p> };
        }
        let link = ctx.link();
        html! {
            <div class="slots">
                { for self.day_slots.iter().map(|slot| {
                    let libre = self.disponibles.contains(slot);
                    let selected = self.hora.as_ref() == Some(slot);
                    let hora = slot.clone();
                    html! {
                        <button
                            class={classes!("slot", selected.then_some("selected"))}
                            disabled={!libre}
                            onclick={link.callback(move |_| Msg::SelectHora(hora.clone()))}
                        >
                            { slot }
                        </button>
                    }
                }) }
            </div>
        }
    }

    fn view_citas(&self, ctx: &Context<Self>) -> Html {
        if self.paciente.is_none() {
            return html! {};
        }
        let link = ctx.link();
        html! {
            <section>
                <h2>{ "Mis citas" }</h2>
                if self.citas.is_empty() {
                    <p>{ "Sin citas registradas" }</p>
                }
                <ul>
                    { for self.citas.iter().map(|cita| {
                        let cancel_id = cita.id.clone();
                        let pay_id = cita.id.clone();
                        let activa = matches!(cita.estado, EstadoCita::Programada | EstadoCita::Confirmada);
                        html! {
                            <li>
                                { format!("{} {} - {}", cita.fecha, cita.hora, cita.estado.as_str()) }
                                if activa {
                                    <button onclick={link.callback(move |_| Msg::Cancel(cancel_id.clone()))}>
                                        { "Cancelar" }
                                    </button>
                                }
                                if cita.estado == EstadoCita::Programada {
                                    <button onclick={link.callback(move |_| Msg::Pay(pay_id.clone()))}>
                                        { format!("Pagar {} con tarjeta", format_centavos(CONSULTA_CENTAVOS)) }
                                    </button>
                                }
                            </li>
                        }
                    }) }
                </ul>
            </section>
        }
    }
}
