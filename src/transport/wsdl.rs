use super::decode::{TransportError, parse_xml};
use crate::domain::XmlElement;

/// Operation names declared by the WSDL `portType`s, in document order and
/// without duplicates.
pub fn decode_operations(wsdl: &str) -> Result<Vec<String>, TransportError> {
    let definitions = parse_xml(wsdl)?;
    let mut names = Vec::new();
    collect_port_type_operations(&definitions, &mut names);
    Ok(names)
}

fn collect_port_type_operations(element: &XmlElement, names: &mut Vec<String>) {
    if element.name == "portType" {
        for operation in element.children_named("operation") {
            if let Some(name) = operation.attribute("name") {
                if !names.iter().any(|known| known == name) {
                    names.push(name.to_owned());
                }
            }
        }
        return;
    }
    for child in &element.children {
        collect_port_type_operations(child, names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_port_type_operations_once() {
        let wsdl = r#"<?xml version="1.0"?>
<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/" name="ariregxml">
  <wsdl:portType name="ariregxmlPortType">
    <wsdl:operation name="lihtandmed_v2"><wsdl:input message="x"/></wsdl:operation>
    <wsdl:operation name="detailandmed_v2"/>
  </wsdl:portType>
  <wsdl:portType name="legacy">
    <wsdl:operation name="lihtandmed_v2"/>
    <wsdl:operation name="klassifikaator_v1"/>
  </wsdl:portType>
  <wsdl:binding name="b" type="ariregxmlPortType">
    <wsdl:operation name="binding_only"/>
  </wsdl:binding>
</wsdl:definitions>"#;
        assert_eq!(
            decode_operations(wsdl).unwrap(),
            ["lihtandmed_v2", "detailandmed_v2", "klassifikaator_v1"]
        );
    }

    #[test]
    fn malformed_wsdl_is_an_error() {
        assert!(decode_operations("<definitions>").is_err());
    }
}
