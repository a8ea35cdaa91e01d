//! Printable documents: prescriptions and sale receipts.
//!
//! Content is built as a list of [`DocLine`]s by plain functions so it can be
//! checked without fonts; [`DocumentRenderer`] lays the lines out with genpdf.

use crate::error::ServiceError;
use common::cart::format_centavos;
use common::model::farmacia::Farmacia;
use common::model::paciente::Paciente;
use common::model::receta::Receta;
use common::model::trabajador::Trabajador;
use common::model::venta::Venta;
use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::Document;
use std::path::PathBuf;

const FONT_SIZE_PT: u8 = 10;
const MARGIN_MM: i32 = 10;

/// One line of a generated document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocLine {
    Heading(String),
    Field { label: String, value: String },
    Text(String),
    Blank,
}

impl DocLine {
    fn field(label: &str, value: impl Into<String>) -> Self {
        DocLine::Field {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Renders documents with the fonts found in `fonts_dir`, injected into the
/// Actix application as `web::Data`.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    fonts_dir: PathBuf,
}

impl DocumentRenderer {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
        }
    }

    /// Arial when its TTFs are present, LiberationSans otherwise.
    fn load_font(&self) -> Result<FontFamily<FontData>, ServiceError> {
        if let Ok(family) = genpdf::fonts::from_files(&self.fonts_dir, "Arial", None) {
            return Ok(family);
        }
        genpdf::fonts::from_files(&self.fonts_dir, "LiberationSans", None).map_err(|e| {
            ServiceError::Pdf(format!(
                "no se encontraron fuentes en {}: {}",
                self.fonts_dir.display(),
                e
            ))
        })
    }

    fn configure_document(&self, title: &str) -> Result<Document, ServiceError> {
        let mut doc = Document::new(self.load_font()?);
        doc.set_title(title);
        doc.set_font_size(FONT_SIZE_PT);
        doc.set_line_spacing(1.25);

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(MARGIN_MM);
        doc.set_page_decorator(decorator);
        Ok(doc)
    }

    /// Lays out `lines` and returns the PDF bytes.
    pub fn render(&self, title: &str, lines: &[DocLine]) -> Result<Vec<u8>, ServiceError> {
        let mut doc = self.configure_document(title)?;
        for line in lines {
            match line {
                DocLine::Heading(text) => {
                    doc.push(Paragraph::new(StyledString::new(
                        text.clone(),
                        Style::new().bold().with_font_size(FONT_SIZE_PT + 4),
                    )));
                }
                DocLine::Field { label, value } => {
                    let mut p = Paragraph::new("");
                    p.push(StyledString::new(format!("{}: ", label), Style::new().bold()));
                    p.push(value.clone());
                    doc.push(p);
                }
                DocLine::Text(text) => doc.push(Paragraph::new(text.clone())),
                DocLine::Blank => doc.push(Break::new(1)),
            }
        }

        let mut bytes = Vec::new();
        doc.render(&mut bytes)?;
        Ok(bytes)
    }
}

/// Content of a printed prescription.
pub fn receta_lines(receta: &Receta, paciente: &Paciente, doctor: &Trabajador) -> Vec<DocLine> {
    let mut lines = vec![
        DocLine::Heading("Receta médica".to_string()),
        DocLine::field("Fecha de emisión", receta.fecha_emision.clone()),
        DocLine::field("Folio", receta.id.clone()),
        DocLine::Blank,
        DocLine::field("Médico", doctor.nombre_completo()),
        DocLine::field("Cédula profesional", doctor.cedula.clone().unwrap_or_default()),
        DocLine::Blank,
        DocLine::field("Paciente", paciente.nombre_completo()),
        DocLine::field("Surecode", paciente.surecode.clone()),
    ];
    if let Some(fecha) = &paciente.fecha_nacimiento {
        lines.push(DocLine::field("Fecha de nacimiento", fecha.clone()));
    }
    lines.extend([
        DocLine::Blank,
        DocLine::field("Medicamento", receta.medicamento.clone()),
        DocLine::field("Dosis", receta.dosis.clone()),
        DocLine::field("Frecuencia", receta.frecuencia.clone()),
        DocLine::field("Duración", receta.duracion.clone()),
    ]);
    if let Some(indicaciones) = receta.indicaciones.as_deref().filter(|i| !i.trim().is_empty()) {
        lines.push(DocLine::Blank);
        lines.push(DocLine::field("Indicaciones", ""));
        lines.extend(indicaciones.lines().map(|l| DocLine::Text(l.to_string())));
    }
    lines
}

/// Content of a sale receipt.
pub fn recibo_lines(venta: &Venta, farmacia: &Farmacia) -> Vec<DocLine> {
    let mut lines = vec![
        DocLine::Heading(farmacia.nombre.clone()),
        DocLine::Text(farmacia.direccion.clone()),
    ];
    if let Some(telefono) = &farmacia.telefono {
        lines.push(DocLine::Text(format!("Tel. {}", telefono)));
    }
    lines.extend([
        DocLine::Blank,
        DocLine::field("Recibo", venta.numero_recibo.clone()),
        DocLine::field("Fecha", venta.creado_en.clone()),
        DocLine::field("Método de pago", venta.metodo_pago.as_str()),
        DocLine::field("Estado", venta.estado.as_str()),
        DocLine::Blank,
    ]);
    for linea in &venta.lineas {
        lines.push(DocLine::Text(format!(
            "{} x {} @ {} = {}",
            linea.cantidad,
            linea.nombre,
            format_centavos(linea.precio_centavos),
            format_centavos(linea.subtotal())
        )));
    }
    lines.push(DocLine::Blank);
    lines.push(DocLine::field("Total", format_centavos(venta.total_centavos)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::receta::EstadoReceta;
    use common::model::trabajador::Rol;
    use common::model::venta::{EstadoVenta, LineaVenta};
    use common::model::MetodoPago;

    fn paciente() -> Paciente {
        Paciente {
            id: "p1".into(),
            nombre: "Ana".into(),
            apellido: "López".into(),
            email: "ana@example.com".into(),
            telefono: None,
            fecha_nacimiento: Some("1990-02-03".into()),
            surecode: "AB12CD34".into(),
            rfid: None,
            creado_en: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn prescription_lists_doctor_patient_and_dosage() {
        let doctor = Trabajador {
            id: "d1".into(),
            nombre: "Luis".into(),
            apellido: "Pérez".into(),
            email: "luis@example.com".into(),
            rol: Rol::Doctor,
            farmacia_id: None,
            cedula: Some("1234567".into()),
        };
        let receta = Receta {
            id: "r1".into(),
            paciente_id: "p1".into(),
            doctor_id: "d1".into(),
            medicamento: "Amoxicilina 500mg".into(),
            dosis: "1 cápsula".into(),
            frecuencia: "cada 8 horas".into(),
            duracion: "7 días".into(),
            indicaciones: Some("Tomar con alimentos\nNo suspender".into()),
            fecha_emision: "2024-03-01".into(),
            estado: EstadoReceta::Pendiente,
        };

        let lines = receta_lines(&receta, &paciente(), &doctor);
        assert!(lines.contains(&DocLine::field("Médico", "Luis Pérez")));
        assert!(lines.contains(&DocLine::field("Cédula profesional", "1234567")));
        assert!(lines.contains(&DocLine::field("Paciente", "Ana López")));
        assert!(lines.contains(&DocLine::field("Dosis", "1 cápsula")));
        assert_eq!(lines.last(), Some(&DocLine::Text("No suspender".into())));
    }

    #[test]
    fn receipt_itemizes_lines_and_total() {
        let farmacia = Farmacia {
            id: "f1".into(),
            nombre: "Farmacia Centro".into(),
            direccion: "Av. Juárez 10".into(),
            telefono: None,
            horario: "08:00-20:00".into(),
        };
        let venta = Venta {
            id: "v1".into(),
            farmacia_id: "f1".into(),
            trabajador_id: "t1".into(),
            paciente_id: None,
            total_centavos: 123_450,
            metodo_pago: MetodoPago::Efectivo,
            estado: EstadoVenta::Pagada,
            numero_recibo: "R-20240301-ABCDEF".into(),
            creado_en: "2024-03-01T10:00:00Z".into(),
            lineas: vec![LineaVenta {
                medicamento_id: "m1".into(),
                nombre: "Insulina".into(),
                precio_centavos: 61_725,
                cantidad: 2,
            }],
        };

        let lines = recibo_lines(&venta, &farmacia);
        assert_eq!(lines[0], DocLine::Heading("Farmacia Centro".into()));
        assert!(lines.contains(&DocLine::Text("2 x Insulina @ $617.25 = $1,234.50".into())));
        assert_eq!(lines.last(), Some(&DocLine::field("Total", "$1,234.50")));
    }

    #[test]
    fn missing_fonts_is_a_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DocumentRenderer::new(dir.path());
        let err = renderer.render("x", &[DocLine::Blank]).unwrap_err();
        assert!(matches!(err, ServiceError::Pdf(_)));
    }
}
