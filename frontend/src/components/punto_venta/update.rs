//! Update function for the point-of-sale component.
//!
//! Cart changes go through `common::cart::Cart`, so a rejected quantity leaves
//! the cart as it was and only sets the inline error. Remote calls run in
//! `spawn_local` and come back as `*Loaded` / `*Created` messages.

use common::cart::{format_centavos, CartItem};
use common::model::trabajador::Rol;
use common::model::MetodoPago;
use common::payments::PaymentStatus;
use common::requests::{CartItemRequest, CreateOrderRequest};
use gloo_console::log;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::messages::Msg;
use super::state::{PendingPayment, PuntoVentaComponent};
use crate::api;

fn fetch<T, F>(ctx: &Context<PuntoVentaComponent>, url: String, to_msg: F)
where
    T: serde::de::DeserializeOwned + 'static,
    F: FnOnce(Result<T, String>) -> Msg + 'static,
{
    let link = ctx.link().clone();
    spawn_local(async move {
        link.send_message(to_msg(api::get(&url).await));
    });
}

pub fn update(
    component: &mut PuntoVentaComponent,
    ctx: &Context<PuntoVentaComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::SetTrabajadorId(id) => {
            component.trabajador_id = id;
            false
        }
        Msg::LoadTrabajador => {
            let url = format!("/api/trabajadores/{}", api::encode(component.trabajador_id.trim()));
            fetch(ctx, url, Msg::TrabajadorLoaded);
            false
        }
        Msg::TrabajadorLoaded(result) => {
            match result {
                Ok(t) if !matches!(t.rol, Rol::Farmaceutico | Rol::Administrador) => {
                    component.fatal = Some(format!(
                        "{} tiene el rol {} y no puede usar el punto de venta",
                        t.nombre_completo(),
                        t.rol.as_str()
                    ));
                }
                Ok(t) if t.farmacia_id.is_none() => {
                    component.fatal = Some(format!(
                        "{} no tiene una farmacia asignada",
                        t.nombre_completo()
                    ));
                }
                Ok(t) => component.trabajador = Some(t),
                Err(message) => component.fatal = Some(message),
            }
            true
        }
        Msg::SetSurecode(code) => {
            component.surecode = code;
            false
        }
        Msg::LookupSurecode => {
            let code = component.surecode.trim().to_uppercase();
            if code.is_empty() {
                return false;
            }
            fetch(ctx, format!("/api/pacientes/surecode/{}", api::encode(&code)), Msg::PacienteLoaded);
            false
        }
        Msg::SetRfid(tag) => {
            component.rfid = tag;
            false
        }
        Msg::LookupRfid => {
            let tag = component.rfid.trim().to_string();
            if tag.is_empty() {
                return false;
            }
            fetch(ctx, format!("/api/pacientes/rfid/{}", api::encode(&tag)), Msg::PacienteLoaded);
            false
        }
        Msg::PacienteLoaded(result) => {
            match result {
                Ok(paciente) => {
                    component.error = None;
                    component.surecode.clear();
                    component.rfid.clear();
                    component.paciente = Some(paciente);
                }
                Err(message) => component.error = Some(message),
            }
            true
        }
        Msg::ClearPaciente => {
            component.paciente = None;
            true
        }
        Msg::SetQuery(query) => {
            component.query = query;
            false
        }
        Msg::Search => {
            let Some(farmacia_id) = component.farmacia_id() else {
                return false;
            };
            let url = format!(
                "/api/medicamentos?farmacia_id={}&q={}",
                farmacia_id,
                api::encode(component.query.trim())
            );
            fetch(ctx, url, Msg::SearchLoaded);
            false
        }
        Msg::SearchLoaded(result) => {
            match result {
                Ok(resultados) => component.resultados = resultados,
                Err(message) => component.error = Some(message),
            }
            true
        }
        Msg::AddToCart(medicamento) => {
            match component.cart.add(CartItem::from(&medicamento), 1) {
                Ok(()) => component.error = None,
                Err(err) => component.error = Some(err.to_string()),
            }
            true
        }
        Msg::SetQuantity(medicamento_id, cantidad) => {
            match component.cart.set_quantity(&medicamento_id, cantidad) {
                Ok(()) => component.error = None,
                Err(err) => component.error = Some(err.to_string()),
            }
            true
        }
        Msg::RemoveLine(medicamento_id) => {
            component.cart.remove(&medicamento_id);
            true
        }
        Msg::ClearCart => {
            component.cart.clear();
            true
        }
        Msg::SetMetodo(metodo) => {
            component.metodo_pago = metodo;
            true
        }
        Msg::Checkout => {
            let (Some(trabajador), Some(farmacia_id)) =
                (component.trabajador.as_ref(), component.farmacia_id())
            else {
                return false;
            };
            if component.cart.is_empty() || component.enviando || component.pending.is_some() {
                return false;
            }

            let request = CreateOrderRequest {
                monto_centavos: component.cart.total(),
                carrito: component
                    .cart
                    .lines()
                    .iter()
                    .map(|line| CartItemRequest {
                        medicamento_id: line.item.medicamento_id.clone(),
                        cantidad: line.cantidad,
                    })
                    .collect(),
                paciente_id: component.paciente.as_ref().map(|p| p.id.clone()),
                metodo_pago: component.metodo_pago,
                farmacia_id: farmacia_id.to_string(),
                trabajador_id: trabajador.id.clone(),
            };
            component.enviando = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::post("/api/ordenes", &request).await;
                link.send_message(Msg::OrderCreated(result));
            });
            true
        }
        Msg::OrderCreated(result) => {
            component.enviando = false;
            let orden = match result {
                Ok(orden) => orden,
                Err(message) => {
                    // Stock may have changed under us; refresh the results.
                    component.error = Some(message);
                    ctx.link().send_message(Msg::Search);
                    return true;
                }
            };

            component.error = None;
            let total = format_centavos(component.cart.total());
            component.cart.clear();
            component.paciente = None;
            ctx.link().send_message(Msg::Search);

            match component.metodo_pago {
                MetodoPago::Efectivo => {
                    component.info = Some(format!("Venta {} cobrada: {}", orden.numero_recibo, total));
                    component.ultimo_recibo = Some((orden.order_id, orden.numero_recibo));
                }
                MetodoPago::Tarjeta => {
                    component.info = Some(format!(
                        "Venta {} por {}: esperando confirmación del pago con tarjeta",
                        orden.numero_recibo, total
                    ));
                    if let Some(url) = &orden.redirect_url {
                        api::open_in_new_tab(url);
                    }
                    let link = ctx.link().clone();
                    let order_id = orden.order_id.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        let status = api::wait_for_payment(&order_id).await;
                        link.send_message(Msg::PaymentSettled(status));
                    });
                    component.pending = Some(PendingPayment {
                        order_id: orden.order_id,
                        numero_recibo: orden.numero_recibo,
                    });
                }
            }
            true
        }
        Msg::PaymentSettled(result) => {
            let Some(pending) = component.pending.take() else {
                return false;
            };
            match result {
                Ok(PaymentStatus::Confirmado(numero)) => {
                    log!(format!("Payment {} confirmed", pending.order_id));
                    component.info = Some(format!("Pago confirmado. Recibo {}", numero));
                    component.ultimo_recibo = Some((pending.order_id, numero));
                }
                Ok(PaymentStatus::Rechazado(motivo)) => {
                    component.info = None;
                    component.error = Some(format!(
                        "El pago de la venta {} fue rechazado: {}",
                        pending.numero_recibo, motivo
                    ));
                    ctx.link().send_message(Msg::Search);
                }
                Ok(PaymentStatus::Pendiente) => component.pending = Some(pending),
                Err(message) => {
                    component.error = Some(format!("{} ({})", message, pending.numero_recibo));
                }
            }
            true
        }
    }
}
