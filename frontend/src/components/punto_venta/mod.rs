//! Point of sale: root module wiring the Yew `Component` implementation with
//! submodules for state, update logic and view rendering.
//!
//! Flow
//! - The pharmacist enters a worker id; an unknown id or a role other than
//!   pharmacist/administrator replaces the screen with the error panel.
//! - A patient can be attached by surecode or by RFID (the reader types the
//!   tag into a field and sends Enter).
//! - Inventory search results are added to a `common::cart::Cart`, which
//!   rejects quantities above the on-hand count before anything is sent.
//! - Checkout posts the cart to `/api/ordenes`. Card orders open the gateway
//!   link and poll `/api/pagos/{id}/estado` until the payment settles.

use yew::prelude::*;

mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::PuntoVentaComponent;

#[derive(Properties, PartialEq, Clone)]
pub struct PuntoVentaProps {
    pub on_home: Callback<()>,
}

impl Component for PuntoVentaComponent {
    type Message = Msg;
    type Properties = PuntoVentaProps;

    fn create(_ctx: &Context<Self>) -> Self {
        PuntoVentaComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
