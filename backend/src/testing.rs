//! Fixtures for handler tests: a migrated database in a temporary directory
//! and helpers that insert rows through the same functions the handlers use.

use crate::db::Database;
use crate::services::farmacias::create_farmacia;
use crate::services::medicamentos::create_medicamento;
use crate::services::pacientes::register_paciente;
use crate::services::trabajadores::create_trabajador;
use common::model::farmacia::{Farmacia, NuevaFarmacia};
use common::model::medicamento::{Medicamento, NuevoMedicamento};
use common::model::paciente::{NuevoPaciente, Paciente};
use common::model::trabajador::{NuevoTrabajador, Rol, Trabajador};
use tempfile::TempDir;

pub struct TestDb {
    pub db: Database,
    _dir: TempDir,
}

pub fn test_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("portal.sqlite"));
    db.migrate().unwrap();
    TestDb { db, _dir: dir }
}

pub fn seed_farmacia(db: &Database, horario: &str) -> Farmacia {
    create_farmacia(
        db,
        NuevaFarmacia {
            nombre: "Farmacia Centro".into(),
            direccion: "Av. Juárez 10".into(),
            telefono: Some("555-0100".into()),
            horario: horario.into(),
        },
    )
    .unwrap()
}

pub fn seed_paciente(db: &Database) -> Paciente {
    register_paciente(
        db,
        NuevoPaciente {
            nombre: "Ana".into(),
            apellido: "López".into(),
            email: "ana@example.com".into(),
            telefono: None,
            fecha_nacimiento: Some("1990-02-03".into()),
        },
    )
    .unwrap()
}

pub fn seed_trabajador(db: &Database, rol: Rol, farmacia_id: &str) -> Trabajador {
    create_trabajador(
        db,
        NuevoTrabajador {
            nombre: "Luis".into(),
            apellido: "Pérez".into(),
            email: "luis@example.com".into(),
            rol,
            farmacia_id: Some(farmacia_id.to_string()),
            cedula: (rol == Rol::Doctor).then(|| "1234567".to_string()),
        },
    )
    .unwrap()
}

pub fn seed_medicamento(
    db: &Database,
    farmacia_id: &str,
    nombre: &str,
    precio_centavos: i64,
    unidades: i64,
) -> Medicamento {
    create_medicamento(
        db,
        NuevoMedicamento {
            farmacia_id: farmacia_id.to_string(),
            nombre: nombre.to_string(),
            descripcion: None,
            precio_centavos,
            unidades,
        },
    )
    .unwrap()
}
