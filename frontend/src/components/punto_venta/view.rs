//! View rendering for the point-of-sale component.
//!
//! Before a worker is identified only the worker prompt is shown. After that
//! the screen has three panes: patient, inventory search and cart/checkout.

use common::cart::format_centavos;
use common::model::MetodoPago;
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::html::Scope;
use yew::prelude::*;

use super::messages::Msg;
use super::state::PuntoVentaComponent;
use crate::app::{error_panel, inline_message};

pub fn view(component: &PuntoVentaComponent, ctx: &Context<PuntoVentaComponent>) -> Html {
    if let Some(message) = &component.fatal {
        return error_panel(message, &ctx.props().on_home);
    }
    let link = ctx.link();

    let Some(trabajador) = &component.trabajador else {
        return html! {
            <div class="punto-venta">
                <h2>{ "Identificación del farmacéutico" }</h2>
                <input
                    placeholder="ID de trabajador"
                    value={component.trabajador_id.clone()}
                    oninput={text_input(link, Msg::SetTrabajadorId)}
                    onkeydown={on_enter(link, || Msg::LoadTrabajador)}
                />
                <button onclick={link.callback(|_| Msg::LoadTrabajador)}>{ "Entrar" }</button>
            </div>
        };
    };

    html! {
        <div class="punto-venta">
            <p>{ format!("Atiende: {} ({})", trabajador.nombre_completo(), trabajador.rol.as_str()) }</p>
            { build_patient_pane(component, link) }
            { build_search_pane(component, link) }
            { build_cart_pane(component, link) }
            { inline_message(&component.error, "error") }
            { inline_message(&component.info, "info") }
            {
                match &component.ultimo_recibo {
                    Some((venta_id, numero)) => html! {
                        <a href={format!("/api/ventas/{}/recibo", venta_id)} target="_blank">
                            { format!("Imprimir recibo {}", numero) }
                        </a>
                    },
                    None => html! {},
                }
            }
        </div>
    }
}

fn text_input(
    link: &Scope<PuntoVentaComponent>,
    to_msg: fn(String) -> Msg,
) -> Callback<InputEvent> {
    link.callback(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        to_msg(input.value())
    })
}

/// Sends `to_msg()` when Enter is pressed. RFID readers end each tag with it.
fn on_enter(link: &Scope<PuntoVentaComponent>, to_msg: fn() -> Msg) -> Callback<KeyboardEvent> {
    link.batch_callback(move |e: KeyboardEvent| (e.key() == "Enter").then(to_msg))
}

fn build_patient_pane(component: &PuntoVentaComponent, link: &Scope<PuntoVentaComponent>) -> Html {
    html! {
        <section class="paciente">
            <h3>{ "Paciente" }</h3>
            {
                match &component.paciente {
                    Some(p) => html! {
                        <p>
                            { format!("{} · {}", p.nombre_completo(), p.surecode) }
                            <button onclick={link.callback(|_| Msg::ClearPaciente)}>{ "Quitar" }</button>
                        </p>
                    },
                    None => html! {
                        <>
                            <input
                                placeholder="Surecode"
                                value={component.surecode.clone()}
                                oninput={text_input(link, Msg::SetSurecode)}
                                onkeydown={on_enter(link, || Msg::LookupSurecode)}
                            />
                            <input
                                placeholder="Acerque la tarjeta RFID"
                                value={component.rfid.clone()}
                                oninput={text_input(link, Msg::SetRfid)}
                                onkeydown={on_enter(link, || Msg::LookupRfid)}
                            />
                            <small>{ "Opcional: la venta puede hacerse sin paciente." }</small>
                        </>
                    },
                }
            }
        </section>
    }
}

fn build_search_pane(component: &PuntoVentaComponent, link: &Scope<PuntoVentaComponent>) -> Html {
    html! {
        <section class="inventario">
            <h3>{ "Inventario" }</h3>
            <input
                placeholder="Buscar medicamento"
                value={component.query.clone()}
                oninput={text_input(link, Msg::SetQuery)}
                onkeydown={on_enter(link, || Msg::Search)}
            />
            <button onclick={link.callback(|_| Msg::Search)}>{ "Buscar" }</button>
            <table>
                <tr><th>{ "Medicamento" }</th><th>{ "Precio" }</th><th>{ "Disponible" }</th><th></th></tr>
                { for component.resultados.iter().map(|m| {
                    let restante = m.unidades - component.en_carrito(&m.id);
                    let medicamento = m.clone();
                    html! {
                        <tr>
                            <td>{ &m.nombre }</td>
                            <td>{ format_centavos(m.precio_centavos) }</td>
                            <td>{ restante }</td>
                            <td>
                                <button
                                    disabled={restante <= 0}
                                    onclick={link.callback(move |_| Msg::AddToCart(medicamento.clone()))}
                                >
                                    { "Agregar" }
                                </button>
                            </td>
                        </tr>
                    }
                }) }
            </table>
        </section>
    }
}

fn build_cart_pane(component: &PuntoVentaComponent, link: &Scope<PuntoVentaComponent>) -> Html {
    let metodo = |value: MetodoPago, label: &'static str| {
        html! {
            <label>
                <input
                    type="radio"
                    name="metodo_pago"
                    checked={component.metodo_pago == value}
                    onchange={link.callback(move |_| Msg::SetMetodo(value))}
                />
                { label }
            </label>
        }
    };
    let bloqueado = component.enviando || component.pending.is_some();

    html! {
        <section class="carrito">
            <h3>{ "Carrito" }</h3>
            <table>
                { for component.cart.lines().iter().map(|line| {
                    let id_qty = line.item.medicamento_id.clone();
                    let id_remove = line.item.medicamento_id.clone();
                    html! {
                        <tr>
                            <td>{ &line.item.nombre }</td>
                            <td>
                                <input
                                    type="number"
                                    min="0"
                                    max={line.item.disponible.to_string()}
                                    value={line.cantidad.to_string()}
                                    onchange={link.callback(move |e: Event| {
                                        let input: HtmlInputElement = e.target_unchecked_into();
                                        Msg::SetQuantity(id_qty.clone(), input.value().parse().unwrap_or(0))
                                    })}
                                />
                            </td>
                            <td>{ format_centavos(line.subtotal()) }</td>
                            <td>
                                <button onclick={link.callback(move |_| Msg::RemoveLine(id_remove.clone()))}>
                                    { "Quitar" }
                                </button>
                            </td>
                        </tr>
                    }
                }) }
            </table>
            <p class="total">{ format!("Total: {}", format_centavos(component.cart.total())) }</p>
            { metodo(MetodoPago::Efectivo, "Efectivo") }
            { metodo(MetodoPago::Tarjeta, "Tarjeta") }
            <button onclick={link.callback(|_| Msg::ClearCart)} disabled={bloqueado}>{ "Vaciar" }</button>
            <button
                onclick={link.callback(|_| Msg::Checkout)}
                disabled={bloqueado || component.cart.is_empty()}
            >
                { if component.enviando { "Enviando..." } else { "Cobrar" } }
            </button>
            {
                match &component.pending {
                    Some(p) => html! { <p class="pendiente">{ format!("Esperando pago de {}...", p.numero_recibo) }</p> },
                    None => html! {},
                }
            }
        </section>
    }
}
