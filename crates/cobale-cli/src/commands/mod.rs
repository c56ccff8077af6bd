pub mod boleto;
pub mod pricing;
