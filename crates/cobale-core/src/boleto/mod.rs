pub mod encoder;
pub mod modulo11;

pub use encoder::{
    encode_boleto, verify_barcode, BankParams, BoletoIdentifier, BoletoRequest,
};
