use quick_xml::escape::escape;

use crate::domain::{OperationName, Params, ValidationError, Value, is_xml_name};

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const PRODUCER_NS: &str = "http://arireg.x-road.eu/producer/";

/// Element every request parameter is wrapped in.
pub const BODY_WRAPPER: &str = "keha";

const LIST_ITEM: &str = "item";

/// Encode one operation call as a SOAP 1.1 request envelope.
///
/// Parameter names become child elements of `<keha>`; text values are XML
/// escaped. Names that are not valid XML element names are rejected.
pub fn encode_request(
    operation: &OperationName,
    params: &Params,
) -> Result<String, ValidationError> {
    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push_str(&format!(
        r#"<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}" xmlns:prod="{PRODUCER_NS}">"#
    ));
    out.push_str("<soapenv:Header/><soapenv:Body>");
    out.push_str(&format!("<prod:{operation}><{BODY_WRAPPER}>"));
    push_params(&mut out, params)?;
    out.push_str(&format!("</{BODY_WRAPPER}></prod:{operation}>"));
    out.push_str("</soapenv:Body></soapenv:Envelope>");
    Ok(out)
}

fn push_params(out: &mut String, params: &Params) -> Result<(), ValidationError> {
    for (name, value) in params.iter() {
        if !is_xml_name(name) {
            return Err(ValidationError::InvalidParameterName {
                input: name.to_owned(),
            });
        }
        push_value(out, name, value)?;
    }
    Ok(())
}

fn push_value(out: &mut String, name: &str, value: &Value) -> Result<(), ValidationError> {
    out.push('<');
    out.push_str(name);
    out.push('>');
    match value {
        Value::Text(text) => out.push_str(&escape(text.as_str())),
        Value::Integer(number) => out.push_str(&number.to_string()),
        Value::Boolean(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::List(items) => {
            for item in items {
                push_value(out, LIST_ITEM, item)?;
            }
        }
        Value::Nested(params) => push_params(out, params)?,
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
    Ok(())
}
