//! Transport layer: SOAP envelope and wire-format details (encoding/decoding).

mod decode;
mod envelope;
mod wsdl;

pub use decode::{SoapBody, decode_soap_response};
pub use envelope::encode_request;
pub use wsdl::decode_operations;
