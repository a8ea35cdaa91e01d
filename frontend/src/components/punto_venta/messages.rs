use common::model::medicamento::Medicamento;
use common::model::paciente::Paciente;
use common::model::trabajador::Trabajador;
use common::model::MetodoPago;
use common::payments::PaymentStatus;
use common::requests::CreateOrderResponse;

pub enum Msg {
    SetTrabajadorId(String),
    LoadTrabajador,
    TrabajadorLoaded(Result<Trabajador, String>),
    SetSurecode(String),
    LookupSurecode,
    SetRfid(String),
    LookupRfid,
    PacienteLoaded(Result<Paciente, String>),
    ClearPaciente,
    SetQuery(String),
    Search,
    SearchLoaded(Result<Vec<Medicamento>, String>),
    AddToCart(Medicamento),
    SetQuantity(String, i64),
    RemoveLine(String),
    ClearCart,
    SetMetodo(MetodoPago),
    Checkout,
    OrderCreated(Result<CreateOrderResponse, String>),
    PaymentSettled(Result<PaymentStatus, String>),
}
