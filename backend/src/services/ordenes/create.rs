//! # Order Creation Service
//!
//! `POST /api/ordenes` turns a point-of-sale cart into a `ventas` row.
//!
//! ## Workflow
//!
//! 1.  The worker must exist and be a pharmacist or an administrator; the
//!     pharmacy and the optional patient must exist.
//! 2.  The cart is rebuilt from the stored prices and on-hand counts with
//!     `common::cart::Cart`, so the same stock rule the screen applied is
//!     applied again on current data.
//! 3.  The client's `monto_centavos` must equal the rebuilt total.
//! 4.  One transaction inserts the sale and its lines and decrements stock with
//!     a guarded `UPDATE`, so two concurrent sales cannot take the same units.
//! 5.  Cash sales are `Pagada`. Card sales are `Pendiente`, registered in the
//!     payment tracker, and get a gateway link when one is configured.

use crate::db::Database;
use crate::error::ServiceError;
use crate::payments::state::PaymentsState;
use crate::payments::{numero_recibo, PaymentGateway};
use crate::services::farmacias::load_farmacia;
use crate::services::medicamentos::load_medicamento;
use crate::services::pacientes::load_paciente;
use crate::services::trabajadores::require_role;
use crate::services::ventas::load_venta;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::cart::{format_centavos, Cart, CartItem};
use common::model::trabajador::Rol;
use common::model::venta::{EstadoVenta, Venta};
use common::model::MetodoPago;
use common::requests::{CreateOrderRequest, CreateOrderResponse};
use log::info;
use rusqlite::{params, Connection};
use uuid::Uuid;

pub async fn process(
    db: web::Data<Database>,
    payments: web::Data<PaymentsState>,
    gateway: web::Data<PaymentGateway>,
    payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ServiceError> {
    let mut conn = db.connect()?;
    let venta = create_order(&mut conn, &payload)?;

    let redirect_url = match venta.metodo_pago {
        MetodoPago::Tarjeta => {
            payments.register_pending(&venta.id).await;
            gateway.checkout_url(&venta.id)
        }
        MetodoPago::Efectivo => None,
    };
    info!(
        "Order {} created: {} ({}, {} lines)",
        venta.numero_recibo,
        format_centavos(venta.total_centavos),
        venta.metodo_pago.as_str(),
        venta.lineas.len()
    );

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        order_id: venta.id,
        numero_recibo: venta.numero_recibo,
        redirect_url,
    }))
}

pub fn create_order(conn: &mut Connection, req: &CreateOrderRequest) -> Result<Venta, ServiceError> {
    if req.carrito.is_empty() {
        return Err(ServiceError::validation("El carrito está vacío"));
    }

    let tx = conn.transaction()?;
    require_role(&tx, &req.trabajador_id, &[Rol::Farmaceutico, Rol::Administrador])?;
    load_farmacia(&tx, &req.farmacia_id)?;
    if let Some(paciente_id) = &req.paciente_id {
        load_paciente(&tx, paciente_id)?;
    }

    let mut cart = Cart::new();
    for item in &req.carrito {
        let medicamento = load_medicamento(&tx, &item.medicamento_id)?;
        if medicamento.farmacia_id != req.farmacia_id {
            return Err(ServiceError::validation(format!(
                "{} no pertenece al inventario de esta farmacia",
                medicamento.nombre
            )));
        }
        cart.add(CartItem::from(&medicamento), item.cantidad)?;
    }

    let total = cart.total();
    if total != req.monto_centavos {
        return Err(ServiceError::validation(format!(
            "El monto {} no coincide con el total del carrito {}",
            format_centavos(req.monto_centavos),
            format_centavos(total)
        )));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let estado = match req.metodo_pago {
        MetodoPago::Efectivo => EstadoVenta::Pagada,
        MetodoPago::Tarjeta => EstadoVenta::Pendiente,
    };
    tx.execute(
        "INSERT INTO ventas (id, farmacia_id, trabajador_id, paciente_id, total_centavos, metodo_pago, estado, numero_recibo, creado_en)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            req.farmacia_id,
            req.trabajador_id,
            req.paciente_id,
            total,
            req.metodo_pago.as_str(),
            estado.as_str(),
            numero_recibo(now, &id),
            now.to_rfc3339(),
        ],
    )?;

    for line in cart.lines() {
        tx.execute(
            "INSERT INTO venta_lineas (venta_id, medicamento_id, nombre, precio_centavos, cantidad)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                line.item.medicamento_id,
                line.item.nombre,
                line.item.precio_centavos,
                line.cantidad,
            ],
        )?;
        let taken = tx.execute(
            "UPDATE medicamentos SET unidades = unidades - ?1 WHERE id = ?2 AND unidades >= ?1",
            params![line.cantidad, line.item.medicamento_id],
        )?;
        if taken != 1 {
            return Err(ServiceError::Conflict(format!(
                "Stock insuficiente para {}",
                line.item.nombre
            )));
        }
    }
    tx.commit()?;

    load_venta(conn, &id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pagos::confirm_payment;
    use crate::testing::{seed_farmacia, seed_medicamento, seed_trabajador, test_db};
    use common::requests::CartItemRequest;

    fn stock(conn: &Connection, id: &str) -> i64 {
        load_medicamento(conn, id).unwrap().unidades
    }

    #[test]
    fn cash_order_decrements_stock_and_is_paid() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "08:00-20:00");
        let cajero = seed_trabajador(&t.db, Rol::Farmaceutico, &farmacia.id);
        let para = seed_medicamento(&t.db, &farmacia.id, "Paracetamol", 3_500, 10);
        let ibu = seed_medicamento(&t.db, &farmacia.id, "Ibuprofeno", 4_250, 3);

        let mut conn = t.db.connect().unwrap();
        let venta = create_order(
            &mut conn,
            &CreateOrderRequest {
                monto_centavos: 2 * 3_500 + 3 * 4_250,
                carrito: vec![
                    CartItemRequest { medicamento_id: para.id.clone(), cantidad: 1 },
                    CartItemRequest { medicamento_id: ibu.id.clone(), cantidad: 3 },
                    CartItemRequest { medicamento_id: para.id.clone(), cantidad: 1 },
                ],
                paciente_id: None,
                metodo_pago: MetodoPago::Efectivo,
                farmacia_id: farmacia.id.clone(),
                trabajador_id: cajero.id.clone(),
            },
        )
        .unwrap();

        assert_eq!(venta.estado, EstadoVenta::Pagada);
        assert_eq!(venta.total_centavos, 19_750);
        assert_eq!(venta.lineas.len(), 2);
        assert!(venta.numero_recibo.starts_with("R-"));
        assert_eq!(stock(&conn, &para.id), 8);
        assert_eq!(stock(&conn, &ibu.id), 0);
    }

    #[test]
    fn rejected_orders_leave_stock_untouched() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "08:00-20:00");
        let otra = seed_farmacia(&t.db, "08:00-20:00");
        let cajero = seed_trabajador(&t.db, Rol::Farmaceutico, &farmacia.id);
        let doctor = seed_trabajador(&t.db, Rol::Doctor, &farmacia.id);
        let para = seed_medicamento(&t.db, &farmacia.id, "Paracetamol", 3_500, 2);
        let ajeno = seed_medicamento(&t.db, &otra.id, "Loratadina", 900, 5);

        let base = CreateOrderRequest {
            monto_centavos: 3 * 3_500,
            carrito: vec![CartItemRequest { medicamento_id: para.id.clone(), cantidad: 3 }],
            paciente_id: None,
            metodo_pago: MetodoPago::Efectivo,
            farmacia_id: farmacia.id.clone(),
            trabajador_id: cajero.id.clone(),
        };
        let mut conn = t.db.connect().unwrap();

        // Over stock.
        assert!(matches!(create_order(&mut conn, &base), Err(ServiceError::Conflict(_))));

        // Amount mismatch.
        let req = CreateOrderRequest {
            monto_centavos: 1,
            carrito: vec![CartItemRequest { medicamento_id: para.id.clone(), cantidad: 1 }],
            ..base.clone()
        };
        assert!(matches!(create_order(&mut conn, &req), Err(ServiceError::Validation(_))));

        // Another pharmacy's inventory.
        let req = CreateOrderRequest {
            monto_centavos: 900,
            carrito: vec![CartItemRequest { medicamento_id: ajeno.id.clone(), cantidad: 1 }],
            ..base.clone()
        };
        assert!(matches!(create_order(&mut conn, &req), Err(ServiceError::Validation(_))));

        // Wrong role.
        let req = CreateOrderRequest {
            monto_centavos: 3_500,
            carrito: vec![CartItemRequest { medicamento_id: para.id.clone(), cantidad: 1 }],
            trabajador_id: doctor.id.clone(),
            ..base.clone()
        };
        assert!(matches!(create_order(&mut conn, &req), Err(ServiceError::Forbidden(_))));

        // Empty cart.
        let req = CreateOrderRequest { carrito: vec![], monto_centavos: 0, ..base };
        assert!(matches!(create_order(&mut conn, &req), Err(ServiceError::Validation(_))));

        assert_eq!(stock(&conn, &para.id), 2);
        assert_eq!(stock(&conn, &ajeno.id), 5);
    }

    #[test]
    fn oversized_quantities_and_totals_are_rejected() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "08:00-20:00");
        let cajero = seed_trabajador(&t.db, Rol::Farmaceutico, &farmacia.id);
        let para = seed_medicamento(&t.db, &farmacia.id, "Paracetamol", 3_500, 5);
        let caro = seed_medicamento(&t.db, &farmacia.id, "Biológico", 1_000_000_000_000_000, 100_000);
        let mut conn = t.db.connect().unwrap();

        // Duplicate lines whose merged quantity passes i64::MAX.
        let req = CreateOrderRequest {
            monto_centavos: 3_500,
            carrito: vec![
                CartItemRequest { medicamento_id: para.id.clone(), cantidad: 1 },
                CartItemRequest { medicamento_id: para.id.clone(), cantidad: i64::MAX },
            ],
            paciente_id: None,
            metodo_pago: MetodoPago::Efectivo,
            farmacia_id: farmacia.id.clone(),
            trabajador_id: cajero.id.clone(),
        };
        assert!(matches!(create_order(&mut conn, &req), Err(ServiceError::Conflict(_))));

        // Price × quantity past i64::MAX.
        let req = CreateOrderRequest {
            monto_centavos: 0,
            carrito: vec![CartItemRequest { medicamento_id: caro.id.clone(), cantidad: 10_000 }],
            ..req
        };
        assert!(matches!(create_order(&mut conn, &req), Err(ServiceError::Validation(_))));

        assert_eq!(stock(&conn, &para.id), 5);
        assert_eq!(stock(&conn, &caro.id), 100_000);
    }

    #[test]
    fn rejected_card_payment_restores_stock() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "08:00-20:00");
        let cajero = seed_trabajador(&t.db, Rol::Farmaceutico, &farmacia.id);
        let para = seed_medicamento(&t.db, &farmacia.id, "Paracetamol", 3_500, 4);

        let mut conn = t.db.connect().unwrap();
        let venta = create_order(
            &mut conn,
            &CreateOrderRequest {
                monto_centavos: 7_000,
                carrito: vec![CartItemRequest { medicamento_id: para.id.clone(), cantidad: 2 }],
                paciente_id: None,
                metodo_pago: MetodoPago::Tarjeta,
                farmacia_id: farmacia.id.clone(),
                trabajador_id: cajero.id.clone(),
            },
        )
        .unwrap();
        assert_eq!(venta.estado, EstadoVenta::Pendiente);
        assert_eq!(stock(&conn, &para.id), 2);

        let status =
            confirm_payment(&mut conn, &venta.id, false, Some("Fondos insuficientes".into()))
                .unwrap();
        assert_eq!(
            status,
            common::payments::PaymentStatus::Rechazado("Fondos insuficientes".into())
        );
        assert_eq!(stock(&conn, &para.id), 4);
        assert_eq!(load_venta(&conn, &venta.id).unwrap().estado, EstadoVenta::Cancelada);

        // A settled payment cannot be settled twice.
        assert!(matches!(
            confirm_payment(&mut conn, &venta.id, true, None),
            Err(ServiceError::Conflict(_))
        ));
    }
}
