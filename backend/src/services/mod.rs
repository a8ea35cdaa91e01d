pub mod citas;
pub mod farmacias;
pub mod medicamentos;
pub mod ordenes;
pub mod pacientes;
pub mod pagos;
pub mod recetas;
pub mod trabajadores;
pub mod ventas;

use actix_web::web::ServiceConfig;

/// Registers every API scope. Shared by `main` and the handler tests.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(pacientes::configure_routes())
        .service(trabajadores::configure_routes())
        .service(farmacias::configure_routes())
        .service(medicamentos::configure_routes())
        .service(citas::configure_routes())
        .service(recetas::configure_routes())
        .service(ordenes::configure_routes())
        .service(ventas::configure_routes())
        .service(pagos::configure_routes());
}
