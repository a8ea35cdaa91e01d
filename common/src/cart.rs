//! Point-of-sale cart arithmetic.
//!
//! The cart checks each request against the on-hand count it was given and
//! keeps a running total in centavos. The frontend uses it to pre-validate a
//! sale; the backend rebuilds the same cart from stored prices and stock
//! before it writes the order.

use crate::model::medicamento::Medicamento;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Stock insuficiente para {nombre}: solicitado {solicitado}, disponible {disponible}")]
    StockInsuficiente {
        nombre: String,
        solicitado: i64,
        disponible: i64,
    },

    #[error("La cantidad debe ser mayor que cero")]
    CantidadInvalida,

    #[error("El medicamento {0} no está en el carrito")]
    NoEncontrado(String),

    #[error("El total del carrito excede el monto máximo permitido")]
    MontoExcedido,
}

/// What the cart needs to know about an inventory row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub medicamento_id: String,
    pub nombre: String,
    pub precio_centavos: i64,
    /// On-hand count at the time the item was looked up.
    pub disponible: i64,
}

impl From<&Medicamento> for CartItem {
    fn from(medicamento: &Medicamento) -> Self {
        CartItem {
            medicamento_id: medicamento.id.clone(),
            nombre: medicamento.nombre.clone(),
            precio_centavos: medicamento.precio_centavos,
            disponible: medicamento.unidades,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CartItem,
    pub cantidad: i64,
}

impl CartLine {
    /// Lines held by a [`Cart`] always fit; `add` and `set_quantity` reject
    /// changes whose total would not.
    pub fn subtotal(&self) -> i64 {
        self.checked_subtotal().unwrap_or(i64::MAX)
    }

    fn checked_subtotal(&self) -> Option<i64> {
        self.item.precio_centavos.checked_mul(self.cantidad)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `cantidad` units of `item`, merging with an existing line for the
    /// same medication.
    ///
    /// Rejects the request, leaving the cart untouched, when the quantity
    /// already in the cart plus `cantidad` exceeds the on-hand count.
    pub fn add(&mut self, item: CartItem, cantidad: i64) -> Result<(), CartError> {
        if cantidad <= 0 {
            return Err(CartError::CantidadInvalida);
        }

        let existing = self
            .lines
            .iter()
            .position(|line| line.item.medicamento_id == item.medicamento_id);
        let en_carrito = existing.map_or(0, |idx| self.lines[idx].cantidad);
        let solicitado = en_carrito.saturating_add(cantidad);

        if solicitado > item.disponible {
            return Err(CartError::StockInsuficiente {
                nombre: item.nombre,
                solicitado,
                disponible: item.disponible,
            });
        }
        let linea = CartLine {
            item,
            cantidad: solicitado,
        };
        self.check_total(existing, &linea)?;

        match existing {
            // Fresh lookup wins for price and stock.
            Some(idx) => self.lines[idx] = linea,
            None => self.lines.push(linea),
        }
        Ok(())
    }

    /// Replaces the quantity of a line. Zero removes it.
    pub fn set_quantity(&mut self, medicamento_id: &str, cantidad: i64) -> Result<(), CartError> {
        if cantidad < 0 {
            return Err(CartError::CantidadInvalida);
        }
        let idx = self
            .lines
            .iter()
            .position(|line| line.item.medicamento_id == medicamento_id)
            .ok_or_else(|| CartError::NoEncontrado(medicamento_id.to_string()))?;

        if cantidad == 0 {
            self.lines.remove(idx);
            return Ok(());
        }

        let line = &self.lines[idx];
        if cantidad > line.item.disponible {
            return Err(CartError::StockInsuficiente {
                nombre: line.item.nombre.clone(),
                solicitado: cantidad,
                disponible: line.item.disponible,
            });
        }
        let linea = CartLine {
            item: line.item.clone(),
            cantidad,
        };
        self.check_total(Some(idx), &linea)?;
        self.lines[idx] = linea;
        Ok(())
    }

    /// Total the cart would have with `linea` in place of the line at
    /// `replaced` (or appended), failing when it leaves the `i64` range.
    fn check_total(&self, replaced: Option<usize>, linea: &CartLine) -> Result<i64, CartError> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != replaced)
            .map(|(_, line)| line)
            .chain(std::iter::once(linea))
            .try_fold(0i64, |acc, line| acc.checked_add(line.checked_subtotal()?))
            .ok_or(CartError::MontoExcedido)
    }

    pub fn remove(&mut self, medicamento_id: &str) -> Option<CartLine> {
        let idx = self
            .lines
            .iter()
            .position(|line| line.item.medicamento_id == medicamento_id)?;
        Some(self.lines.remove(idx))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of unit price × quantity over all lines, in centavos.
    pub fn total(&self) -> i64 {
        self.lines
            .iter()
            .fold(0, |acc: i64, line| acc.saturating_add(line.subtotal()))
    }
}

/// Formats centavos as a currency label, e.g. `123450` as `$1,234.50`.
pub fn format_centavos(centavos: i64) -> String {
    let sign = if centavos < 0 { "-" } else { "" };
    let abs = centavos.unsigned_abs();
    format!(
        "{}${}.{:02}",
        sign,
        (abs / 100).to_formatted_string(&Locale::en),
        abs % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, precio: i64, disponible: i64) -> CartItem {
        CartItem {
            medicamento_id: id.to_string(),
            nombre: format!("med-{id}"),
            precio_centavos: precio,
            disponible,
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let mut cart = Cart::new();
        cart.add(item("a", 1_250, 10), 3).unwrap();
        cart.add(item("b", 99, 5), 5).unwrap();
        cart.add(item("c", 10_000, 1), 1).unwrap();

        let expected: i64 = cart
            .lines()
            .iter()
            .map(|l| l.item.precio_centavos * l.cantidad)
            .sum();
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.total(), 3 * 1_250 + 5 * 99 + 10_000);
    }

    #[test]
    fn adding_same_item_merges_quantities() {
        let mut cart = Cart::new();
        cart.add(item("a", 100, 10), 2).unwrap();
        cart.add(item("a", 100, 10), 3).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].cantidad, 5);
    }

    #[test]
    fn over_stock_add_is_rejected_without_mutation() {
        let mut cart = Cart::new();
        cart.add(item("a", 100, 4), 3).unwrap();
        let before = cart.clone();

        let err = cart.add(item("a", 100, 4), 2).unwrap_err();
        assert_eq!(
            err,
            CartError::StockInsuficiente {
                nombre: "med-a".into(),
                solicitado: 5,
                disponible: 4
            }
        );
        assert_eq!(cart, before);

        assert!(cart.add(item("b", 100, 0), 1).is_err());
        assert_eq!(cart, before);
    }

    #[test]
    fn zero_or_negative_quantity_is_rejected() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(item("a", 100, 4), 0), Err(CartError::CantidadInvalida));
        assert_eq!(cart.add(item("a", 100, 4), -1), Err(CartError::CantidadInvalida));
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_checks_stock_and_removes_on_zero() {
        let mut cart = Cart::new();
        cart.add(item("a", 100, 4), 1).unwrap();

        assert!(cart.set_quantity("a", 5).is_err());
        assert_eq!(cart.lines()[0].cantidad, 1);

        cart.set_quantity("a", 4).unwrap();
        assert_eq!(cart.total(), 400);

        cart.set_quantity("a", 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(
            cart.set_quantity("a", 1),
            Err(CartError::NoEncontrado("a".into()))
        );
    }

    #[test]
    fn remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(item("a", 100, 4), 1).unwrap();
        cart.add(item("b", 200, 4), 1).unwrap();
        assert_eq!(cart.remove("a").map(|l| l.cantidad), Some(1));
        assert_eq!(cart.remove("a"), None);
        assert_eq!(cart.total(), 200);
        cart.clear();
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn merging_past_i64_is_over_stock_not_overflow() {
        let mut cart = Cart::new();
        cart.add(item("a", 100, 10), 1).unwrap();
        let before = cart.clone();

        let err = cart.add(item("a", 100, 10), i64::MAX).unwrap_err();
        assert_eq!(
            err,
            CartError::StockInsuficiente {
                nombre: "med-a".into(),
                solicitado: i64::MAX,
                disponible: 10
            }
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn total_that_leaves_i64_is_rejected_without_mutation() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(item("caro", 1_000_000_000_000_000, 100_000), 10_000),
            Err(CartError::MontoExcedido)
        );
        assert!(cart.is_empty());

        cart.add(item("a", i64::MAX / 2, 10), 1).unwrap();
        let before = cart.clone();
        assert_eq!(
            cart.add(item("b", i64::MAX / 2, 10), 2),
            Err(CartError::MontoExcedido)
        );
        assert_eq!(cart.set_quantity("a", 3), Err(CartError::MontoExcedido));
        assert_eq!(cart, before);
        assert_eq!(cart.total(), i64::MAX / 2);
    }

    #[test]
    fn cart_item_from_inventory_row() {
        let medicamento = Medicamento {
            id: "m1".into(),
            farmacia_id: "f1".into(),
            nombre: "Paracetamol".into(),
            descripcion: None,
            precio_centavos: 3_500,
            unidades: 7,
        };
        assert_eq!(
            CartItem::from(&medicamento),
            CartItem {
                medicamento_id: "m1".into(),
                nombre: "Paracetamol".into(),
                precio_centavos: 3_500,
                disponible: 7,
            }
        );
    }

    #[test]
    fn formats_currency() {
        assert_eq!(format_centavos(0), "$0.00");
        assert_eq!(format_centavos(5), "$0.05");
        assert_eq!(format_centavos(123_450), "$1,234.50");
        assert_eq!(format_centavos(-1_000_000), "-$10,000.00");
    }
}
