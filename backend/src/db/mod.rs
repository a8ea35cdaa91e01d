//! Relational store of the portal.
//!
//! One SQLite file holds every table the screens read and write. Each request
//! opens its own connection through [`Database::connect`]; the schema is
//! created on startup by [`Database::migrate`].

use crate::error::ServiceError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS farmacias (
    id          TEXT PRIMARY KEY,
    nombre      TEXT NOT NULL,
    direccion   TEXT NOT NULL,
    telefono    TEXT,
    horario     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pacientes (
    id               TEXT PRIMARY KEY,
    nombre           TEXT NOT NULL,
    apellido         TEXT NOT NULL,
    email            TEXT NOT NULL,
    telefono         TEXT,
    fecha_nacimiento TEXT,
    surecode         TEXT NOT NULL UNIQUE,
    rfid             TEXT UNIQUE,
    creado_en        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS trabajadores (
    id          TEXT PRIMARY KEY,
    nombre      TEXT NOT NULL,
    apellido    TEXT NOT NULL,
    email       TEXT NOT NULL,
    rol         TEXT NOT NULL,
    farmacia_id TEXT REFERENCES farmacias(id),
    cedula      TEXT
);

CREATE TABLE IF NOT EXISTS medicamentos (
    id              TEXT PRIMARY KEY,
    farmacia_id     TEXT NOT NULL REFERENCES farmacias(id),
    nombre          TEXT NOT NULL,
    descripcion     TEXT,
    precio_centavos INTEGER NOT NULL CHECK (precio_centavos >= 0),
    unidades        INTEGER NOT NULL CHECK (unidades >= 0)
);

CREATE TABLE IF NOT EXISTS citas (
    id          TEXT PRIMARY KEY,
    paciente_id TEXT NOT NULL REFERENCES pacientes(id),
    farmacia_id TEXT NOT NULL REFERENCES farmacias(id),
    fecha       TEXT NOT NULL,
    hora        TEXT NOT NULL,
    motivo      TEXT,
    estado      TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS citas_slot_unico
    ON citas (farmacia_id, fecha, hora) WHERE estado <> 'Cancelada';

CREATE TABLE IF NOT EXISTS recetas (
    id            TEXT PRIMARY KEY,
    paciente_id   TEXT NOT NULL REFERENCES pacientes(id),
    doctor_id     TEXT NOT NULL REFERENCES trabajadores(id),
    medicamento   TEXT NOT NULL,
    dosis         TEXT NOT NULL,
    frecuencia    TEXT NOT NULL,
    duracion      TEXT NOT NULL,
    indicaciones  TEXT,
    fecha_emision TEXT NOT NULL,
    estado        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ventas (
    id             TEXT PRIMARY KEY,
    farmacia_id    TEXT NOT NULL REFERENCES farmacias(id),
    trabajador_id  TEXT NOT NULL REFERENCES trabajadores(id),
    paciente_id    TEXT REFERENCES pacientes(id),
    total_centavos INTEGER NOT NULL,
    metodo_pago    TEXT NOT NULL,
    estado         TEXT NOT NULL,
    numero_recibo  TEXT NOT NULL UNIQUE,
    creado_en      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS venta_lineas (
    venta_id        TEXT NOT NULL REFERENCES ventas(id),
    medicamento_id  TEXT NOT NULL REFERENCES medicamentos(id),
    nombre          TEXT NOT NULL,
    precio_centavos INTEGER NOT NULL,
    cantidad        INTEGER NOT NULL CHECK (cantidad > 0)
);

CREATE TABLE IF NOT EXISTS pago_e_cita (
    id             TEXT PRIMARY KEY,
    cita_id        TEXT NOT NULL REFERENCES citas(id),
    monto_centavos INTEGER NOT NULL,
    metodo_pago    TEXT NOT NULL,
    estado         TEXT NOT NULL,
    numero_recibo  TEXT NOT NULL UNIQUE,
    creado_en      TEXT NOT NULL
);
"#;

/// Handle to the database file, shared with handlers as `web::Data`.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a connection with foreign keys enforced.
    pub fn connect(&self) -> Result<Connection, ServiceError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    /// Creates missing tables and indexes.
    pub fn migrate(&self) -> Result<(), ServiceError> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

/// Reads an enum column stored as its variant name.
pub(crate) fn parse_column<T>(
    idx: usize,
    value: String,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("valor desconocido '{}'", value).into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.sqlite"));
        db.migrate().unwrap();
        db.migrate().unwrap();

        let conn = db.connect().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 9);
    }
}
