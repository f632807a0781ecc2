//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{Params, Value};
pub use response::{RawResponse, XmlElement};
pub use validation::ValidationError;
pub(crate) use value::is_xml_name;
pub use value::{Environment, Language, OperationName, Password, Username};
