pub mod citas;
pub mod inicio;
pub mod punto_venta;
pub mod recetas;
