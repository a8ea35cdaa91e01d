//! State of the point-of-sale screen.

use common::cart::Cart;
use common::model::medicamento::Medicamento;
use common::model::paciente::Paciente;
use common::model::trabajador::Trabajador;
use common::model::MetodoPago;

/// A card order waiting for the gateway.
pub struct PendingPayment {
    pub order_id: String,
    pub numero_recibo: String,
}

pub struct PuntoVentaComponent {
    /// Worker id as typed.
    pub trabajador_id: String,

    /// The identified pharmacist or administrator. The sale is made in their
    /// pharmacy.
    pub trabajador: Option<Trabajador>,

    pub surecode: String,
    pub rfid: String,
    pub paciente: Option<Paciente>,

    pub query: String,
    pub resultados: Vec<Medicamento>,

    pub cart: Cart,
    pub metodo_pago: MetodoPago,

    /// Set while an order is being created; blocks a second checkout.
    pub enviando: bool,
    pub pending: Option<PendingPayment>,

    /// Receipt of the last completed sale: (sale id, receipt number).
    pub ultimo_recibo: Option<(String, String)>,

    /// Unrecoverable error; the screen shows the error panel.
    pub fatal: Option<String>,
    pub error: Option<String>,
    pub info: Option<String>,
}

impl PuntoVentaComponent {
    pub fn new() -> Self {
        Self {
            trabajador_id: String::new(),
            trabajador: None,
            surecode: String::new(),
            rfid: String::new(),
            paciente: None,
            query: String::new(),
            resultados: Vec::new(),
            cart: Cart::new(),
            metodo_pago: MetodoPago::Efectivo,
            enviando: false,
            pending: None,
            ultimo_recibo: None,
            fatal: None,
            error: None,
            info: None,
        }
    }

    pub fn farmacia_id(&self) -> Option<&str> {
        self.trabajador.as_ref()?.farmacia_id.as_deref()
    }

    /// Units of `medicamento_id` already in the cart.
    pub fn en_carrito(&self, medicamento_id: &str) -> i64 {
        self.cart
            .lines()
            .iter()
            .find(|line| line.item.medicamento_id == medicamento_id)
            .map_or(0, |line| line.cantidad)
    }
}
